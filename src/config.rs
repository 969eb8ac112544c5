//! Annotation configuration exposed to the GUI layer

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::domain::{LabelStyle, LadderTable, MarkStyle, Unit};
use crate::error::ConfigurationError;

/// Font slant for ladder and lane labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontSlant {
    #[default]
    Normal,
    Italic,
    Oblique,
}

impl FontSlant {
    /// CSS/SVG `font-style` value
    pub fn css(self) -> &'static str {
        match self {
            FontSlant::Normal => "normal",
            FontSlant::Italic => "italic",
            FontSlant::Oblique => "oblique",
        }
    }
}

/// Font weight for ladder and lane labels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    #[default]
    Normal,
    Bold,
}

impl FontWeight {
    /// CSS/SVG `font-weight` value
    pub fn css(self) -> &'static str {
        match self {
            FontWeight::Normal => "normal",
            FontWeight::Bold => "bold",
        }
    }
}

/// Font used for every annotation label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FontSpec {
    pub family: String,
    /// Size in device pixels; converted to logical units at draw time
    pub size_px: f64,
    #[serde(default)]
    pub slant: FontSlant,
    #[serde(default)]
    pub weight: FontWeight,
}

impl Default for FontSpec {
    fn default() -> Self {
        Self {
            family: "Arial".to_string(),
            size_px: 11.0,
            slant: FontSlant::Normal,
            weight: FontWeight::Normal,
        }
    }
}

/// Options the GUI can set; each maps onto a session field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationConfig {
    /// Ladder used for the next placement
    pub ladder: String,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub labels: LabelStyle,
    #[serde(default)]
    pub font: FontSpec,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            ladder: LadderTable::builtin()
                .first()
                .map(|d| d.name().to_string())
                .unwrap_or_default(),
            unit: Unit::Bp,
            labels: LabelStyle {
                marks: MarkStyle::LettersUpper,
                ..Default::default()
            },
            font: FontSpec::default(),
        }
    }
}

impl AnnotationConfig {
    /// Directory holding optional user overrides
    pub fn config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("gelimage"))
    }

    /// Load `config.json` from the user config directory, or return defaults
    pub fn load() -> Self {
        let Some(path) = Self::config_dir().map(|d| d.join("config.json")) else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::from_file(&path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("Error loading config, using defaults: {}", err);
                Self::default()
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigurationError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ConfigurationError::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&text)
    }

    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let mut config: Self = serde_json::from_str(json)
            .map_err(|e| ConfigurationError::InvalidConfig(e.to_string()))?;
        let rotation = config.labels.rotation_degrees;
        config.labels.set_rotation(rotation);
        Ok(config)
    }

    /// Check that the selected ladder exists in `table`
    pub fn validate(&self, table: &LadderTable) -> Result<(), ConfigurationError> {
        table.require(&self.ladder).map(|_| ())
    }
}

/// Load `ladders.json` from the user config directory, falling back to the built-in table
pub fn load_ladder_table() -> LadderTable {
    let Some(path) = AnnotationConfig::config_dir().map(|d| d.join("ladders.json")) else {
        return LadderTable::builtin();
    };
    if !path.exists() {
        return LadderTable::builtin();
    }
    let loaded = std::fs::read_to_string(&path)
        .map_err(|e| ConfigurationError::InvalidLadderTable(e.to_string()))
        .and_then(|text| LadderTable::from_json(&text));
    match loaded {
        Ok(table) => {
            log::info!("Loaded {} ladders from {}", table.len(), path.display());
            table
        }
        Err(err) => {
            log::warn!("Could not load {}: {}, using built-in ladders", path.display(), err);
            LadderTable::builtin()
        }
    }
}
