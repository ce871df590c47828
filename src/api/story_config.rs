use indexmap::IndexSet;
use serde::{Deserialize, Deserializer, Serialize};

use crate::data::FeatureFields;
use crate::error::{MapError, MapResult};
use crate::render::Color;

use super::ViewportMode;

/// Per-mode rendering constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModeProfile {
    /// Pixels added to the fitted horizontal translation.
    pub fit_offset_x: f64,
    pub marker_radius: f64,
    /// Marker radius while the area-of-interest zoom is active.
    pub emphasis_radius: f64,
    /// Marker stroke width while zoomed; `None` leaves the stroke unset.
    #[serde(default)]
    pub emphasis_stroke_width: Option<f64>,
    /// Whether step changes animate or apply instantly.
    pub animated: bool,
    /// Pixels removed from the bottom of the projection fit extent.
    #[serde(default)]
    pub projection_bottom_inset: f64,
    /// Container height override, used for per-step snapshot containers.
    #[serde(default)]
    pub fixed_height: Option<u32>,
}

impl ModeProfile {
    #[must_use]
    pub fn desktop() -> Self {
        Self {
            fit_offset_x: 80.0,
            marker_radius: 3.0,
            emphasis_radius: 3.0,
            emphasis_stroke_width: Some(0.6),
            animated: true,
            projection_bottom_inset: 25.0,
            fixed_height: None,
        }
    }

    #[must_use]
    pub fn mobile() -> Self {
        Self {
            fit_offset_x: 30.0,
            marker_radius: 2.0,
            emphasis_radius: 1.0,
            emphasis_stroke_width: None,
            animated: false,
            projection_bottom_inset: 0.0,
            fixed_height: Some(300),
        }
    }

    fn validate(self, label: &str) -> MapResult<Self> {
        if !self.fit_offset_x.is_finite() {
            return Err(MapError::InvalidData(format!(
                "{label} profile `fit_offset_x` must be finite"
            )));
        }
        for (name, value) in [
            ("marker_radius", self.marker_radius),
            ("emphasis_radius", self.emphasis_radius),
            ("projection_bottom_inset", self.projection_bottom_inset),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MapError::InvalidData(format!(
                    "{label} profile `{name}` must be finite and >= 0"
                )));
            }
        }
        if let Some(width) = self.emphasis_stroke_width {
            if !width.is_finite() || width < 0.0 {
                return Err(MapError::InvalidData(format!(
                    "{label} profile `emphasis_stroke_width` must be finite and >= 0"
                )));
            }
        }
        if self.fixed_height == Some(0) {
            return Err(MapError::InvalidData(format!(
                "{label} profile `fixed_height` must be > 0"
            )));
        }
        Ok(self)
    }
}

/// Partial [`ModeProfile`] as read from configuration; absent keys keep the
/// mode's own default.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ModeProfileOverrides {
    fit_offset_x: Option<f64>,
    marker_radius: Option<f64>,
    emphasis_radius: Option<f64>,
    #[serde(deserialize_with = "present")]
    emphasis_stroke_width: Option<Option<f64>>,
    animated: Option<bool>,
    projection_bottom_inset: Option<f64>,
    #[serde(deserialize_with = "present")]
    fixed_height: Option<Option<u32>>,
}

impl ModeProfileOverrides {
    fn apply(self, base: ModeProfile) -> ModeProfile {
        ModeProfile {
            fit_offset_x: self.fit_offset_x.unwrap_or(base.fit_offset_x),
            marker_radius: self.marker_radius.unwrap_or(base.marker_radius),
            emphasis_radius: self.emphasis_radius.unwrap_or(base.emphasis_radius),
            emphasis_stroke_width: self
                .emphasis_stroke_width
                .unwrap_or(base.emphasis_stroke_width),
            animated: self.animated.unwrap_or(base.animated),
            projection_bottom_inset: self
                .projection_bottom_inset
                .unwrap_or(base.projection_bottom_inset),
            fixed_height: self.fixed_height.unwrap_or(base.fixed_height),
        }
    }
}

/// Distinguishes an explicit `null` (`Some(None)`) from an absent key (`None`).
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn desktop_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ModeProfile, D::Error> {
    ModeProfileOverrides::deserialize(deserializer).map(|o| o.apply(ModeProfile::desktop()))
}

fn mobile_profile<'de, D: Deserializer<'de>>(deserializer: D) -> Result<ModeProfile, D::Error> {
    ModeProfileOverrides::deserialize(deserializer).map(|o| o.apply(ModeProfile::mobile()))
}

/// Transition durations of the continuous mode, in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StepDurations {
    /// Layer transform reset on the overview steps.
    pub reset_ms: f64,
    /// Marker restyle on the overview steps.
    pub points_ms: f64,
    /// Zoom onto the area of interest and its marker restyle.
    pub zoom_ms: f64,
    /// Marker filtering onto the focus authority.
    pub focus_ms: f64,
}

impl Default for StepDurations {
    fn default() -> Self {
        Self {
            reset_ms: 1000.0,
            points_ms: 500.0,
            zoom_ms: 1500.0,
            focus_ms: 100.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub boundary_fill: Color,
    pub boundary_stroke: Color,
    pub boundary_stroke_width: f64,
    /// Marker fill before any step is entered.
    pub marker_initial: Color,
    /// Uniform marker fill of the introductory step.
    pub intro: Color,
    /// Category `C`.
    pub highlight_primary: Color,
    /// Category `D`.
    pub highlight_secondary: Color,
    /// Every other category, including a missing one.
    pub neutral: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            boundary_fill: Color::rgb8(0xee, 0xee, 0xee),
            boundary_stroke: Color::rgb8(0x33, 0x33, 0x33),
            boundary_stroke_width: 1.0,
            marker_initial: Color::rgb8(0x88, 0x88, 0x88),
            intro: Color::rgb8(0, 0, 255),
            highlight_primary: Color::rgb8(255, 165, 0),
            highlight_secondary: Color::rgb8(255, 0, 0),
            neutral: Color::rgb8(128, 128, 128),
        }
    }
}

/// Narrative configuration: breakpoint, step-table constants and styling.
///
/// Serializable so hosts can ship the narrative constants next to the
/// content instead of compiling them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoryConfig {
    /// Windows narrower than this many pixels use the mobile mode.
    #[serde(default = "default_breakpoint_px")]
    pub breakpoint_px: u32,
    #[serde(default)]
    pub fields: FeatureFields,
    /// Region names framed by the zoomed steps.
    #[serde(default = "default_area_of_interest")]
    pub area_of_interest: IndexSet<String>,
    /// Authority whose points stay visible on the focus step.
    #[serde(default = "default_focus_authority")]
    pub focus_authority: String,
    /// Step trigger line as a fraction of the viewport height from the top.
    #[serde(default = "default_trigger_offset")]
    pub trigger_offset: f64,
    #[serde(default)]
    pub durations: StepDurations,
    #[serde(default = "ModeProfile::desktop", deserialize_with = "desktop_profile")]
    pub desktop: ModeProfile,
    #[serde(default = "ModeProfile::mobile", deserialize_with = "mobile_profile")]
    pub mobile: ModeProfile,
    #[serde(default)]
    pub palette: Palette,
    /// Re-run the active step's encoding after a same-mode resize.
    #[serde(default)]
    pub reapply_step_on_resize: bool,
}

impl Default for StoryConfig {
    fn default() -> Self {
        Self {
            breakpoint_px: default_breakpoint_px(),
            fields: FeatureFields::default(),
            area_of_interest: default_area_of_interest(),
            focus_authority: default_focus_authority(),
            trigger_offset: default_trigger_offset(),
            durations: StepDurations::default(),
            desktop: ModeProfile::desktop(),
            mobile: ModeProfile::mobile(),
            palette: Palette::default(),
            reapply_step_on_resize: false,
        }
    }
}

impl StoryConfig {
    #[must_use]
    pub fn profile(&self, mode: ViewportMode) -> ModeProfile {
        match mode {
            ViewportMode::Desktop => self.desktop,
            ViewportMode::Mobile => self.mobile,
        }
    }

    #[must_use]
    pub fn with_area_of_interest<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.area_of_interest = names.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_focus_authority(mut self, authority: impl Into<String>) -> Self {
        self.focus_authority = authority.into();
        self
    }

    pub fn validate(&self) -> MapResult<()> {
        if self.breakpoint_px == 0 {
            return Err(MapError::InvalidData(
                "breakpoint must be > 0".to_owned(),
            ));
        }
        if !self.trigger_offset.is_finite() || !(0.0..=1.0).contains(&self.trigger_offset) {
            return Err(MapError::InvalidData(
                "trigger offset must be finite and in [0, 1]".to_owned(),
            ));
        }
        let durations = self.durations;
        for (name, value) in [
            ("reset_ms", durations.reset_ms),
            ("points_ms", durations.points_ms),
            ("zoom_ms", durations.zoom_ms),
            ("focus_ms", durations.focus_ms),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(MapError::InvalidData(format!(
                    "duration `{name}` must be finite and >= 0"
                )));
            }
        }
        self.desktop.validate("desktop")?;
        self.mobile.validate("mobile")?;

        let palette = self.palette;
        for color in [
            palette.boundary_fill,
            palette.boundary_stroke,
            palette.marker_initial,
            palette.intro,
            palette.highlight_primary,
            palette.highlight_secondary,
            palette.neutral,
        ] {
            color.validate()?;
        }
        if !palette.boundary_stroke_width.is_finite() || palette.boundary_stroke_width < 0.0 {
            return Err(MapError::InvalidData(
                "boundary stroke width must be finite and >= 0".to_owned(),
            ));
        }
        Ok(())
    }
}

fn default_breakpoint_px() -> u32 {
    481
}

fn default_area_of_interest() -> IndexSet<String> {
    [
        "Blaenau Gwent",
        "Bridgend",
        "Caerphilly",
        "Cardiff",
        "Merthyr Tydfil",
        "Neath Port Talbot",
        "Rhondda Cynon Taf",
        "Swansea",
        "Vale of Glamorgan",
    ]
    .into_iter()
    .map(str::to_owned)
    .collect()
}

fn default_focus_authority() -> String {
    "Rhondda Cynon Taf".to_owned()
}

fn default_trigger_offset() -> f64 {
    0.75
}
