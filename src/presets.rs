//! Preset System - Named Starting Points
//!
//! Built-in presets are always present; a directory of `*.json` files can add
//! or override them. Presets only pick a starting `MandalaSpec`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, warn};

use crate::mandala::{HexColor, MandalaSpec, Symmetry};
use crate::{ENGINE_VERSION, MIN_PRESET_VERSION};

pub type PresetId = String;

#[derive(Debug, Error)]
pub enum PresetError {
    #[error("Preset not found: {0}")]
    NotFound(String),

    #[error("Preset {0} requires engine >= {1}, current is {2}")]
    EngineVersionMismatch(String, String, String),

    #[error("Invalid version: {0}")]
    InvalidVersion(String),

    #[error("Failed to read presets: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid preset file: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Preset {
    pub id: PresetId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default = "default_min_version")]
    pub engine_min_version: String,
    pub spec: MandalaSpec,
}

fn default_min_version() -> String { MIN_PRESET_VERSION.to_string() }

impl Preset {
    /// Fails when this engine is older than the preset requires.
    pub fn check_engine_version(&self) -> Result<(), PresetError> {
        let engine_ver = semver::Version::parse(ENGINE_VERSION)
            .map_err(|_| PresetError::InvalidVersion(ENGINE_VERSION.into()))?;
        let min_ver = semver::Version::parse(&self.engine_min_version)
            .map_err(|_| PresetError::InvalidVersion(self.engine_min_version.clone()))?;

        if engine_ver < min_ver {
            return Err(PresetError::EngineVersionMismatch(
                self.id.clone(),
                self.engine_min_version.clone(),
                ENGINE_VERSION.to_string(),
            ));
        }
        Ok(())
    }
}

fn builtin(id: &str, name: &str, segments: i64, symmetry: Symmetry, color: &str) -> Option<Preset> {
    let color = HexColor::parse(color).ok()?;
    Some(Preset {
        id: id.to_string(),
        name: name.to_string(),
        description: String::new(),
        engine_min_version: default_min_version(),
        spec: MandalaSpec::new(segments, symmetry, color, true),
    })
}

/// Preset registry - built-ins plus anything loaded from disk
pub struct PresetRegistry {
    presets: BTreeMap<PresetId, Preset>,
}

impl PresetRegistry {
    pub fn new() -> Self {
        Self { presets: BTreeMap::new() }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        let builtins = [
            builtin("coral", "Coral", 12, Symmetry::Radial, "#ff7f50"),
            builtin("lotus", "Lotus", 16, Symmetry::Mirror, "#c71585"),
            builtin("star", "Star", 5, Symmetry::Radial, "#ffd700"),
            builtin("ocean", "Ocean", 24, Symmetry::Mirror, "#1e90ff"),
        ];
        for preset in builtins.into_iter().flatten() {
            registry.register(preset);
        }
        registry
    }

    /// Built-ins, then every readable `*.json` preset in `dir`.
    ///
    /// Unreadable files and presets requiring a newer engine are skipped
    /// with a warning; a missing directory is not an error.
    pub fn load_from_dir(dir: &Path) -> Result<Self, PresetError> {
        let mut registry = Self::with_builtins();
        if !dir.exists() {
            debug!(dir = %dir.display(), "preset directory absent; built-ins only");
            return Ok(registry);
        }
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().map_or(false, |e| e == "json") {
                match load_file(&path) {
                    Ok(preset) => registry.register(preset),
                    Err(e) => warn!(path = %path.display(), error = %e, "skipping preset"),
                }
            }
        }
        Ok(registry)
    }

    pub fn get(&self, id: &str) -> Option<&Preset> {
        self.presets.get(id)
    }

    pub fn require(&self, id: &str) -> Result<&Preset, PresetError> {
        self.get(id).ok_or_else(|| PresetError::NotFound(id.to_string()))
    }

    pub fn list(&self) -> Vec<&Preset> {
        self.presets.values().collect()
    }

    pub fn register(&mut self, preset: Preset) {
        self.presets.insert(preset.id.clone(), preset);
    }
}

impl Default for PresetRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

fn load_file(path: &Path) -> Result<Preset, PresetError> {
    let content = fs::read_to_string(path)?;
    let preset: Preset = serde_json::from_str(&content)?;
    preset.check_engine_version()?;
    Ok(preset)
}
