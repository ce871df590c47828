use serde::{Deserialize, Serialize};
use tracing::info;

/// Rendering strategy chosen from the window width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViewportMode {
    /// One shared surface driven continuously by scrolling.
    Desktop,
    /// One static snapshot surface per step container.
    Mobile,
}

impl ViewportMode {
    /// Widths strictly below `breakpoint_px` are mobile.
    #[must_use]
    pub fn from_width(window_width: u32, breakpoint_px: u32) -> Self {
        if window_width < breakpoint_px {
            Self::Mobile
        } else {
            Self::Desktop
        }
    }
}

/// Result of classifying a resize against the last observed mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ModeTransition {
    Unchanged(ViewportMode),
    Crossed { from: ViewportMode, to: ViewportMode },
}

/// Tracks the viewport mode across resizes and flags breakpoint crossings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponsiveCoordinator {
    breakpoint_px: u32,
    last_mode: ViewportMode,
}

impl ResponsiveCoordinator {
    #[must_use]
    pub fn new(breakpoint_px: u32, window_width: u32) -> Self {
        Self {
            breakpoint_px,
            last_mode: ViewportMode::from_width(window_width, breakpoint_px),
        }
    }

    #[must_use]
    pub fn mode(self) -> ViewportMode {
        self.last_mode
    }

    #[must_use]
    pub fn breakpoint_px(self) -> u32 {
        self.breakpoint_px
    }

    /// Recomputes the mode for `window_width` and records it.
    pub fn observe(&mut self, window_width: u32) -> ModeTransition {
        let mode = ViewportMode::from_width(window_width, self.breakpoint_px);
        let previous = self.last_mode;
        self.last_mode = mode;
        if mode == previous {
            ModeTransition::Unchanged(mode)
        } else {
            info!(?previous, ?mode, window_width, "viewport mode crossed breakpoint");
            ModeTransition::Crossed {
                from: previous,
                to: mode,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{ModeTransition, ResponsiveCoordinator, ViewportMode};

    #[test]
    fn breakpoint_is_exclusive_for_mobile() {
        assert_eq!(ViewportMode::from_width(480, 481), ViewportMode::Mobile);
        assert_eq!(ViewportMode::from_width(481, 481), ViewportMode::Desktop);
    }

    #[test]
    fn observe_reports_crossing_once() {
        let mut coordinator = ResponsiveCoordinator::new(481, 1024);
        assert_eq!(coordinator.mode(), ViewportMode::Desktop);
        assert_eq!(
            coordinator.observe(900),
            ModeTransition::Unchanged(ViewportMode::Desktop)
        );
        assert_eq!(
            coordinator.observe(400),
            ModeTransition::Crossed {
                from: ViewportMode::Desktop,
                to: ViewportMode::Mobile,
            }
        );
        assert_eq!(
            coordinator.observe(390),
            ModeTransition::Unchanged(ViewportMode::Mobile)
        );
    }
}
