//! Mandala Parameters - The Only Input
//!
//! A `MandalaSpec` is an immutable value. Edits produce a new value; the
//! segment count is clamped on every path that constructs one.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use thiserror::Error;

pub const MIN_SEGMENTS: u32 = 3;
pub const MAX_SEGMENTS: u32 = 48;

pub const DEFAULT_SEGMENTS: u32 = 12;
pub const DEFAULT_COLOR: &str = "#ff7f50";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Symmetry {
    #[default]
    Radial,
    Mirror,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid color '{0}': expected #rrggbb")]
pub struct ColorParseError(pub String);

/// Six-digit RGB hex color, stored lowercase with its leading `#`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HexColor(String);

impl HexColor {
    pub fn parse(raw: &str) -> Result<Self, ColorParseError> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorParseError(raw.to_string()));
        }
        Ok(Self(format!("#{}", digits.to_ascii_lowercase())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for HexColor {
    fn default() -> Self {
        Self(DEFAULT_COLOR.to_string())
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for HexColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

/// Clamp any integer into the supported segment range.
pub fn clamp_segments(raw: i64) -> u32 {
    raw.clamp(MIN_SEGMENTS as i64, MAX_SEGMENTS as i64) as u32
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MandalaSpec {
    segments: u32,
    symmetry: Symmetry,
    color: HexColor,
    show_watermark: bool,
}

impl MandalaSpec {
    /// Build a spec, clamping `segments` into `[3, 48]`.
    pub fn new(segments: i64, symmetry: Symmetry, color: HexColor, show_watermark: bool) -> Self {
        let clamped = clamp_segments(segments);
        if clamped as i64 != segments {
            tracing::warn!(requested = segments, clamped, "segment count out of range, clamped");
        }
        Self {
            segments: clamped,
            symmetry,
            color,
            show_watermark,
        }
    }

    pub fn segments(&self) -> u32 {
        self.segments
    }

    pub fn symmetry(&self) -> Symmetry {
        self.symmetry
    }

    pub fn color(&self) -> &HexColor {
        &self.color
    }

    pub fn show_watermark(&self) -> bool {
        self.show_watermark
    }

    pub fn with_segments(&self, segments: i64) -> Self {
        Self::new(segments, self.symmetry, self.color.clone(), self.show_watermark)
    }

    pub fn with_symmetry(&self, symmetry: Symmetry) -> Self {
        Self { symmetry, ..self.clone() }
    }

    pub fn with_color(&self, color: HexColor) -> Self {
        Self { color, ..self.clone() }
    }

    pub fn with_watermark(&self, show_watermark: bool) -> Self {
        Self { show_watermark, ..self.clone() }
    }
}

impl Default for MandalaSpec {
    fn default() -> Self {
        Self {
            segments: DEFAULT_SEGMENTS,
            symmetry: Symmetry::Radial,
            color: HexColor::default(),
            show_watermark: true,
        }
    }
}

/// Wire form of a spec as it arrives from the UI layer; segments unclamped.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawMandalaSpec {
    #[serde(default = "default_segments")]
    pub segments: i64,
    #[serde(default)]
    pub symmetry: Symmetry,
    #[serde(default = "default_color")]
    pub color: String,
    #[serde(default = "default_true")]
    pub show_watermark: bool,
}

fn default_segments() -> i64 { DEFAULT_SEGMENTS as i64 }
fn default_color() -> String { DEFAULT_COLOR.to_string() }
fn default_true() -> bool { true }

impl Default for RawMandalaSpec {
    fn default() -> Self {
        Self {
            segments: default_segments(),
            symmetry: Symmetry::Radial,
            color: default_color(),
            show_watermark: true,
        }
    }
}

impl TryFrom<RawMandalaSpec> for MandalaSpec {
    type Error = ColorParseError;

    fn try_from(raw: RawMandalaSpec) -> Result<Self, Self::Error> {
        let color = HexColor::parse(&raw.color)?;
        Ok(Self::new(raw.segments, raw.symmetry, color, raw.show_watermark))
    }
}

impl From<&MandalaSpec> for RawMandalaSpec {
    fn from(spec: &MandalaSpec) -> Self {
        Self {
            segments: spec.segments as i64,
            symmetry: spec.symmetry,
            color: spec.color.to_string(),
            show_watermark: spec.show_watermark,
        }
    }
}

impl<'de> Deserialize<'de> for MandalaSpec {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = RawMandalaSpec::deserialize(deserializer)?;
        MandalaSpec::try_from(raw).map_err(serde::de::Error::custom)
    }
}
