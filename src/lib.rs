//! Mandala Core - Parametric Pattern Generator
//!
//! # The Four Laws
//! 1. Parameters Are the Only Input
//! 2. Generation Is Pure (same spec, same scene, bit for bit)
//! 3. Export Serializes the Scene on Screen, Never a Recomputation
//! 4. No Render, No Document, No Sink Call

pub mod geometry;
pub mod mandala;
pub mod generator;
pub mod export;
pub mod sink;
pub mod studio;
pub mod validation;
pub mod presets;
pub mod hashing;
pub mod error;

pub use mandala::{MandalaSpec, RawMandalaSpec, Symmetry, HexColor, clamp_segments};
pub use generator::{generate, Scene, Primitive, Shape, Wedge, Ring};
pub use export::{export, export_latest, ExportDocument, ExportManifest};
pub use sink::{deliver, Delivery, SaveSink, DirectorySink, MemorySink, SinkError};
pub use studio::{Studio, RenderSurface, NullSurface};
pub use validation::{Validator, ValidationResult, ValidationRule, ValidationViolation, ViolationSeverity};
pub use presets::{Preset, PresetRegistry, PresetError};
pub use hashing::{compute_spec_hash, canonical_json, sha256_hex};
pub use error::{MandalaError, MandalaResult};

pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const MIN_PRESET_VERSION: &str = "1.0.0";
