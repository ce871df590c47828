use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

use crate::error::{MapError, MapResult};

/// Document-space extent of one narrative step element, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StepAnchor {
    pub top: f64,
    pub height: f64,
}

impl StepAnchor {
    #[must_use]
    pub const fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    #[must_use]
    pub fn contains(self, y: f64) -> bool {
        y >= self.top && y < self.top + self.height
    }
}

/// Resolves which step element sits on the trigger line for a scroll offset.
///
/// The trigger line is `trigger_offset * viewport_height` pixels below the
/// top of the viewport. A step is entered when the line falls inside it;
/// while the line is between steps nothing is entered.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollTriggerLayout {
    anchors: Vec<StepAnchor>,
    /// Anchor indices sorted by `top`.
    order: Vec<usize>,
    viewport_height: f64,
    trigger_offset: f64,
}

impl ScrollTriggerLayout {
    pub fn new(
        anchors: Vec<StepAnchor>,
        viewport_height: f64,
        trigger_offset: f64,
    ) -> MapResult<Self> {
        if !viewport_height.is_finite() || viewport_height <= 0.0 {
            return Err(MapError::InvalidData(
                "scroll viewport height must be finite and > 0".to_owned(),
            ));
        }
        if !trigger_offset.is_finite() || !(0.0..=1.0).contains(&trigger_offset) {
            return Err(MapError::InvalidData(
                "trigger offset must be finite and in [0, 1]".to_owned(),
            ));
        }
        if anchors
            .iter()
            .any(|a| !a.top.is_finite() || !a.height.is_finite() || a.height < 0.0)
        {
            return Err(MapError::InvalidData(
                "step anchors must be finite with height >= 0".to_owned(),
            ));
        }

        let mut order: Vec<usize> = (0..anchors.len()).collect();
        order.sort_by_key(|&index| OrderedFloat(anchors[index].top));
        Ok(Self {
            anchors,
            order,
            viewport_height,
            trigger_offset,
        })
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        self.anchors.len()
    }

    #[must_use]
    pub fn anchors(&self) -> &[StepAnchor] {
        &self.anchors
    }

    #[must_use]
    pub fn viewport_height(&self) -> f64 {
        self.viewport_height
    }

    /// Document y of the trigger line at `scroll_top`.
    #[must_use]
    pub fn trigger_line(&self, scroll_top: f64) -> f64 {
        scroll_top + self.trigger_offset * self.viewport_height
    }

    /// Step whose element contains the trigger line, if any.
    ///
    /// Overlapping elements resolve to the one starting lowest.
    #[must_use]
    pub fn step_at(&self, scroll_top: f64) -> Option<usize> {
        let line = self.trigger_line(scroll_top);
        let candidates = self
            .order
            .partition_point(|&index| self.anchors[index].top <= line);
        self.order[..candidates]
            .iter()
            .rev()
            .copied()
            .find(|&index| self.anchors[index].contains(line))
    }

    /// Step geometry for a new layout, keeping the trigger offset.
    pub fn resized(&self, anchors: Vec<StepAnchor>, viewport_height: f64) -> MapResult<Self> {
        Self::new(anchors, viewport_height, self.trigger_offset)
    }
}

#[cfg(test)]
mod tests {
    use super::{ScrollTriggerLayout, StepAnchor};

    fn layout() -> ScrollTriggerLayout {
        ScrollTriggerLayout::new(
            vec![
                StepAnchor::new(1000.0, 500.0),
                StepAnchor::new(1600.0, 500.0),
                StepAnchor::new(2200.0, 500.0),
            ],
            800.0,
            0.75,
        )
        .expect("layout")
    }

    #[test]
    fn trigger_line_sits_at_three_quarters() {
        assert_eq!(layout().trigger_line(100.0), 700.0);
    }

    #[test]
    fn resolves_step_under_trigger_line() {
        let layout = layout();
        assert_eq!(layout.step_at(0.0), None);
        assert_eq!(layout.step_at(400.0), Some(0));
        assert_eq!(layout.step_at(1000.0), Some(1));
        assert_eq!(layout.step_at(1600.0), Some(2));
    }

    #[test]
    fn gap_between_steps_enters_nothing() {
        assert_eq!(layout().step_at(950.0), None);
    }

    #[test]
    fn rejects_invalid_geometry() {
        assert!(ScrollTriggerLayout::new(Vec::new(), 0.0, 0.75).is_err());
        assert!(ScrollTriggerLayout::new(Vec::new(), 800.0, 1.5).is_err());
        assert!(
            ScrollTriggerLayout::new(vec![StepAnchor::new(f64::NAN, 10.0)], 800.0, 0.75).is_err()
        );
    }
}
