use std::sync::Arc;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::Viewport;
use crate::data::{PointFeature, Region};
use crate::error::MapResult;
use crate::render::RenderFrame;

use super::{
    RenderingSurface, ScrollTriggerLayout, StepAnchor, StepEncoder, StoryConfig, ViewportMode,
};

/// Page geometry reported by the host for one layout pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// Window width compared against the breakpoint.
    pub window_width: u32,
    /// Window height used for the scroll trigger line.
    pub viewport_height: f64,
    /// Container of the shared surface.
    pub map_container: Viewport,
    /// One anchor per narrative step element, in step order.
    #[serde(default)]
    pub step_anchors: Vec<StepAnchor>,
    /// One container per narrative step, in step order.
    #[serde(default)]
    pub step_containers: Vec<Viewport>,
}

#[derive(Debug, Clone)]
enum Presentation {
    Continuous {
        surface: RenderingSurface,
        triggers: ScrollTriggerLayout,
        active: Option<usize>,
        reapply_on_resize: bool,
    },
    Discrete {
        snapshots: Vec<RenderingSurface>,
    },
}

/// Owns the narrative position and the surfaces it drives.
///
/// Desktop mode keeps one shared surface whose encodings animate as steps are
/// entered. Mobile mode builds one isolated surface per step container, each
/// encoded once and never touched again.
#[derive(Debug, Clone)]
pub struct NarrativeController {
    encoder: StepEncoder,
    area_of_interest: IndexSet<String>,
    current_step: usize,
    presentation: Presentation,
}

impl NarrativeController {
    pub fn build(
        mode: ViewportMode,
        regions: Arc<[Region]>,
        points: &[PointFeature],
        layout: &PageLayout,
        config: &StoryConfig,
    ) -> MapResult<Self> {
        match mode {
            ViewportMode::Desktop => Self::continuous(regions, points, layout, config),
            ViewportMode::Mobile => Self::discrete(regions, points, layout, config),
        }
    }

    /// Builds the shared scroll-driven surface. No step is active until the
    /// first scroll or explicit entry.
    pub fn continuous(
        regions: Arc<[Region]>,
        points: &[PointFeature],
        layout: &PageLayout,
        config: &StoryConfig,
    ) -> MapResult<Self> {
        let surface = RenderingSurface::initialize(
            regions,
            points,
            layout.map_container,
            config.profile(ViewportMode::Desktop),
            config.palette,
        )?;
        let triggers = ScrollTriggerLayout::new(
            layout.step_anchors.clone(),
            layout.viewport_height,
            config.trigger_offset,
        )?;
        debug!(steps = triggers.step_count(), "continuous narrative ready");
        Ok(Self {
            encoder: StepEncoder::new(config),
            area_of_interest: config.area_of_interest.clone(),
            current_step: 0,
            presentation: Presentation::Continuous {
                surface,
                triggers,
                active: None,
                reapply_on_resize: config.reapply_step_on_resize,
            },
        })
    }

    /// Builds one static snapshot per step container, each showing its own
    /// step's encoding applied instantly.
    pub fn discrete(
        regions: Arc<[Region]>,
        points: &[PointFeature],
        layout: &PageLayout,
        config: &StoryConfig,
    ) -> MapResult<Self> {
        let encoder = StepEncoder::new(config);
        let profile = config.profile(ViewportMode::Mobile);
        let snapshots = layout
            .step_containers
            .iter()
            .enumerate()
            .map(|(step, container)| {
                let viewport = Viewport::new(
                    container.width,
                    profile.fixed_height.unwrap_or(container.height),
                );
                let mut surface = RenderingSurface::initialize(
                    Arc::clone(&regions),
                    points,
                    viewport,
                    profile,
                    config.palette,
                )?;
                for update in &encoder.encode(step) {
                    surface.apply_update(update, &config.area_of_interest, 0.0);
                }
                Ok(surface)
            })
            .collect::<MapResult<Vec<_>>>()?;
        debug!(snapshots = snapshots.len(), "discrete narrative ready");
        Ok(Self {
            encoder,
            area_of_interest: config.area_of_interest.clone(),
            current_step: 0,
            presentation: Presentation::Discrete { snapshots },
        })
    }

    #[must_use]
    pub fn mode(&self) -> ViewportMode {
        match self.presentation {
            Presentation::Continuous { .. } => ViewportMode::Desktop,
            Presentation::Discrete { .. } => ViewportMode::Mobile,
        }
    }

    #[must_use]
    pub fn encoder(&self) -> &StepEncoder {
        &self.encoder
    }

    #[must_use]
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    #[must_use]
    pub fn step_count(&self) -> usize {
        match &self.presentation {
            Presentation::Continuous { triggers, .. } => triggers.step_count(),
            Presentation::Discrete { snapshots } => snapshots.len(),
        }
    }

    /// Step element currently marked active; always `None` for snapshots.
    #[must_use]
    pub fn active_step(&self) -> Option<usize> {
        match &self.presentation {
            Presentation::Continuous { active, .. } => *active,
            Presentation::Discrete { .. } => None,
        }
    }

    /// Active flag per step element; at most one is set.
    #[must_use]
    pub fn step_active_flags(&self) -> Vec<bool> {
        let active = self.active_step();
        (0..self.step_count())
            .map(|step| Some(step) == active)
            .collect()
    }

    /// Shared surface of the continuous mode.
    #[must_use]
    pub fn surface(&self) -> Option<&RenderingSurface> {
        match &self.presentation {
            Presentation::Continuous { surface, .. } => Some(surface),
            Presentation::Discrete { .. } => None,
        }
    }

    /// Per-step surfaces of the discrete mode.
    #[must_use]
    pub fn snapshots(&self) -> &[RenderingSurface] {
        match &self.presentation {
            Presentation::Continuous { .. } => &[],
            Presentation::Discrete { snapshots } => snapshots,
        }
    }

    /// Every surface this controller draws, in container order.
    #[must_use]
    pub fn surfaces(&self) -> Vec<&RenderingSurface> {
        match &self.presentation {
            Presentation::Continuous { surface, .. } => vec![surface],
            Presentation::Discrete { snapshots } => snapshots.iter().collect(),
        }
    }

    /// Enters whichever step sits on the trigger line at `scroll_top`.
    ///
    /// Returns the newly entered step. Scrolling within the active step, or
    /// into a gap between steps, enters nothing.
    pub fn on_scroll(&mut self, scroll_top: f64, now_ms: f64) -> Option<usize> {
        let Presentation::Continuous {
            triggers, active, ..
        } = &self.presentation
        else {
            return None;
        };
        let step = triggers.step_at(scroll_top)?;
        if Some(step) == *active {
            return None;
        }
        self.enter_step(step, now_ms).then_some(step)
    }

    /// Marks `step` active and applies its encoding to the shared surface.
    ///
    /// Any transition still running is superseded. Returns `false` without
    /// touching state for out-of-range steps and in discrete mode.
    pub fn enter_step(&mut self, step: usize, now_ms: f64) -> bool {
        let step_count = self.step_count();
        let Presentation::Continuous {
            surface, active, ..
        } = &mut self.presentation
        else {
            debug!(step, "step entry ignored by static snapshots");
            return false;
        };
        if step >= step_count {
            warn!(step, step_count, "ignoring out-of-range step");
            return false;
        }

        self.current_step = step;
        *active = Some(step);
        let encoding = self.encoder.encode(step);
        for update in &encoding {
            surface.apply_update(update, &self.area_of_interest, now_ms);
        }
        debug!(step, updates = encoding.len(), "entered step");
        true
    }

    /// Same-mode resize: refits the shared surface and rebuilds the trigger
    /// geometry. Step state is preserved; snapshots are left as drawn.
    ///
    /// Either both the surface and the triggers take the new layout or
    /// neither does. Returns whether anything was refitted.
    pub fn resize(&mut self, layout: &PageLayout, now_ms: f64) -> MapResult<bool> {
        let Presentation::Continuous {
            surface,
            triggers,
            active,
            reapply_on_resize,
        } = &mut self.presentation
        else {
            return Ok(false);
        };
        let next_triggers = triggers.resized(layout.step_anchors.clone(), layout.viewport_height)?;
        surface.resize(layout.map_container)?;
        *triggers = next_triggers;

        if *reapply_on_resize {
            if let Some(step) = *active {
                for update in &self.encoder.encode(step) {
                    surface.apply_update(update, &self.area_of_interest, now_ms);
                }
            }
        }
        Ok(true)
    }

    /// One frame per surface, sampled at `now_ms`.
    #[must_use]
    pub fn frames(&self, now_ms: f64) -> Vec<RenderFrame> {
        self.surfaces()
            .into_iter()
            .map(|surface| surface.frame(now_ms))
            .collect()
    }
}
