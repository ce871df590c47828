use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::ProjectedShape;
use crate::error::{MapError, MapResult};

/// RGBA color in normalized 0..=1 channel values.
///
/// Serialized as a CSS color string (`#rrggbb` or `#rrggbbaa`).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    #[must_use]
    pub fn rgb8(red: u8, green: u8, blue: u8) -> Self {
        Self::rgb(
            f64::from(red) / 255.0,
            f64::from(green) / 255.0,
            f64::from(blue) / 255.0,
        )
    }

    /// Parses `#rgb`, `#rrggbb`, `#rrggbbaa` and a handful of CSS names.
    pub fn parse(input: &str) -> MapResult<Self> {
        let trimmed = input.trim();
        if let Some(hex) = trimmed.strip_prefix('#') {
            return parse_hex(hex)
                .ok_or_else(|| MapError::InvalidData(format!("invalid hex color `{input}`")));
        }
        let color = match trimmed.to_ascii_lowercase().as_str() {
            "black" => Self::rgb8(0, 0, 0),
            "white" => Self::rgb8(255, 255, 255),
            "red" => Self::rgb8(255, 0, 0),
            "blue" => Self::rgb8(0, 0, 255),
            "orange" => Self::rgb8(255, 165, 0),
            "gray" | "grey" => Self::rgb8(128, 128, 128),
            _ => {
                return Err(MapError::InvalidData(format!(
                    "unsupported color name `{input}`"
                )));
            }
        };
        Ok(color)
    }

    pub fn validate(self) -> MapResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(MapError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn lerp(self, target: Self, t: f64) -> Self {
        let mix = |a: f64, b: f64| a + (b - a) * t;
        Self {
            red: mix(self.red, target.red),
            green: mix(self.green, target.green),
            blue: mix(self.blue, target.blue),
            alpha: mix(self.alpha, target.alpha),
        }
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        let rgb = format!(
            "#{:02x}{:02x}{:02x}",
            channel(self.red),
            channel(self.green),
            channel(self.blue)
        );
        if self.alpha >= 1.0 {
            rgb
        } else {
            format!("{rgb}{:02x}", channel(self.alpha))
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = MapError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

fn parse_hex(hex: &str) -> Option<Color> {
    let nibble = |index: usize| u8::from_str_radix(hex.get(index..=index)?, 16).ok();
    let byte = |index: usize| u8::from_str_radix(hex.get(index..index + 2)?, 16).ok();
    match hex.len() {
        3 => Some(Color::rgb8(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
        )),
        6 => Some(Color::rgb8(byte(0)?, byte(2)?, byte(4)?)),
        8 => {
            let mut color = Color::rgb8(byte(0)?, byte(2)?, byte(4)?);
            color.alpha = f64::from(byte(6)?) / 255.0;
            Some(color)
        }
        _ => None,
    }
}

/// Draw command for one region outline in untransformed screen space.
#[derive(Debug, Clone, PartialEq)]
pub struct PathPrimitive {
    pub name: String,
    pub shape: ProjectedShape,
    pub fill: Color,
    pub stroke: Color,
    pub stroke_width: f64,
}

impl PathPrimitive {
    pub fn validate(&self) -> MapResult<()> {
        if self.shape.rings.iter().flatten().any(|p| !p.is_finite()) {
            return Err(MapError::InvalidData(format!(
                "path `{}` coordinates must be finite",
                self.name
            )));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(MapError::InvalidData(
                "path stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.fill.validate()?;
        self.stroke.validate()
    }
}

/// Draw command for one point marker in untransformed screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill: Color,
    pub opacity: f64,
    /// Zero means no stroke attribute is emitted.
    pub stroke_width: f64,
}

impl CirclePrimitive {
    pub fn validate(self) -> MapResult<()> {
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(MapError::InvalidData(
                "circle center must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius < 0.0 {
            return Err(MapError::InvalidData(
                "circle radius must be finite and >= 0".to_owned(),
            ));
        }
        if !self.opacity.is_finite() || !(0.0..=1.0).contains(&self.opacity) {
            return Err(MapError::InvalidData(
                "circle opacity must be finite and in [0, 1]".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(MapError::InvalidData(
                "circle stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.fill.validate()
    }
}
