use serde::{Deserialize, Serialize};

/// The two drawing layers of a map surface, bottom to top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayerKind {
    Boundaries,
    Points,
}

impl LayerKind {
    pub const ALL: [Self; 2] = [Self::Boundaries, Self::Points];

    /// Class name of the layer group in markup backends.
    #[must_use]
    pub fn class_name(self) -> &'static str {
        match self {
            Self::Boundaries => "boundaries",
            Self::Points => "tips",
        }
    }
}

/// Which layers a transform write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LayerSelector {
    Boundaries,
    Points,
    Both,
}

impl LayerSelector {
    #[must_use]
    pub fn includes(self, kind: LayerKind) -> bool {
        matches!(
            (self, kind),
            (Self::Both, _)
                | (Self::Boundaries, LayerKind::Boundaries)
                | (Self::Points, LayerKind::Points)
        )
    }
}
