//! Crate-level error for the fallible surfaces (presets, sinks, JSON).
//!
//! Generation and export themselves cannot fail.

use thiserror::Error;

use crate::mandala::ColorParseError;
use crate::presets::PresetError;
use crate::sink::SinkError;

#[derive(Debug, Error)]
pub enum MandalaError {
    #[error(transparent)]
    Preset(#[from] PresetError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error(transparent)]
    Color(#[from] ColorParseError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type MandalaResult<T> = Result<T, MandalaError>;
