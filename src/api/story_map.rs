use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::data::{DatasetSource, Datasets, PointFeature, Region, load_datasets};
use crate::error::MapResult;
use crate::render::{RenderFrame, Renderer};

use super::{
    ModeTransition, NarrativeController, PageLayout, ResponsiveCoordinator, StoryConfig,
    ViewportMode,
};

/// What a resize did to the map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResizeOutcome {
    /// The breakpoint was crossed; all narrative and surface state was
    /// discarded and rebuilt for the new mode.
    Reinitialized { from: ViewportMode, to: ViewportMode },
    /// The shared surface was refitted in place.
    Refitted,
    /// Nothing to refit (static snapshots).
    Unchanged,
}

/// Top-level owner of the datasets, configuration and narrative state.
///
/// Event handlers receive this object explicitly; there is no ambient
/// current-map state.
#[derive(Debug, Clone)]
pub struct StoryMap {
    config: StoryConfig,
    regions: Arc<[Region]>,
    points: Arc<[PointFeature]>,
    coordinator: ResponsiveCoordinator,
    controller: NarrativeController,
    generation: u64,
}

impl StoryMap {
    pub fn new(datasets: Datasets, config: StoryConfig, layout: &PageLayout) -> MapResult<Self> {
        config.validate()?;
        let regions: Arc<[Region]> = datasets.regions.into();
        let points: Arc<[PointFeature]> = datasets.points.into();
        let coordinator = ResponsiveCoordinator::new(config.breakpoint_px, layout.window_width);
        let controller = NarrativeController::build(
            coordinator.mode(),
            Arc::clone(&regions),
            &points,
            layout,
            &config,
        )?;
        info!(
            mode = ?coordinator.mode(),
            regions = regions.len(),
            points = points.len(),
            "story map initialized"
        );
        Ok(Self {
            config,
            regions,
            points,
            coordinator,
            controller,
            generation: 0,
        })
    }

    /// Loads both datasets through `source`, then initializes.
    ///
    /// A failure of either load aborts before anything is built.
    pub fn load<S>(source: &S, config: StoryConfig, layout: &PageLayout) -> MapResult<Self>
    where
        S: DatasetSource + ?Sized,
    {
        let datasets = load_datasets(source)?;
        Self::new(datasets, config, layout)
    }

    #[must_use]
    pub fn config(&self) -> &StoryConfig {
        &self.config
    }

    #[must_use]
    pub fn mode(&self) -> ViewportMode {
        self.coordinator.mode()
    }

    #[must_use]
    pub fn regions(&self) -> &[Region] {
        &self.regions
    }

    #[must_use]
    pub fn points(&self) -> &[PointFeature] {
        &self.points
    }

    #[must_use]
    pub fn controller(&self) -> &NarrativeController {
        &self.controller
    }

    /// Number of full reinitializations since construction.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn handle_scroll(&mut self, scroll_top: f64, now_ms: f64) -> Option<usize> {
        self.controller.on_scroll(scroll_top, now_ms)
    }

    pub fn enter_step(&mut self, step: usize, now_ms: f64) -> bool {
        self.controller.enter_step(step, now_ms)
    }

    /// Reacts to a viewport resize.
    ///
    /// Crossing the breakpoint tears down every surface and the narrative
    /// position and rebuilds them for the new mode from the loaded datasets.
    /// Within a mode only the shared surface is refitted. On error the map
    /// keeps its previous state, including the previously observed mode.
    pub fn handle_resize(&mut self, layout: &PageLayout, now_ms: f64) -> MapResult<ResizeOutcome> {
        let mut coordinator = self.coordinator;
        match coordinator.observe(layout.window_width) {
            ModeTransition::Crossed { from, to } => {
                let controller = NarrativeController::build(
                    to,
                    Arc::clone(&self.regions),
                    &self.points,
                    layout,
                    &self.config,
                )?;
                self.controller = controller;
                self.coordinator = coordinator;
                self.generation += 1;
                info!(?from, ?to, generation = self.generation, "story map reinitialized");
                Ok(ResizeOutcome::Reinitialized { from, to })
            }
            ModeTransition::Unchanged(mode) => {
                self.coordinator = coordinator;
                let refitted = self.controller.resize(layout, now_ms)?;
                debug!(?mode, refitted, "same-mode resize");
                Ok(if refitted {
                    ResizeOutcome::Refitted
                } else {
                    ResizeOutcome::Unchanged
                })
            }
        }
    }

    #[must_use]
    pub fn frames(&self, now_ms: f64) -> Vec<RenderFrame> {
        self.controller.frames(now_ms)
    }

    /// Renders the surface at `index` (the shared surface is index 0).
    ///
    /// Returns `false` when no such surface exists.
    pub fn render<R: Renderer + ?Sized>(
        &self,
        index: usize,
        renderer: &mut R,
        now_ms: f64,
    ) -> MapResult<bool> {
        let Some(surface) = self.controller.surfaces().get(index).copied() else {
            return Ok(false);
        };
        surface.render(renderer, now_ms)?;
        Ok(true)
    }
}
