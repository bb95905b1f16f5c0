//! Configuration structures for the picking list pipeline.

use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{PickrError, Result};
use crate::models::manifest::TokenizerMode;
use crate::picking::rules::split::SplitPolicy;

/// Main configuration for the pickr pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickrConfig {
    /// PDF processing configuration.
    pub pdf: PdfConfig,

    /// Line item extraction configuration.
    pub extraction: ExtractionConfig,

    /// Legacy code / description split chain.
    pub split: SplitPolicy,

    /// Presentation settings used by renderers.
    pub output: OutputConfig,
}

/// PDF processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PdfConfig {
    /// Maximum pages to read (0 = unlimited).
    pub max_pages: usize,

    /// Try an empty password on encrypted PDFs.
    pub decrypt_empty_password: bool,
}

impl Default for PdfConfig {
    fn default() -> Self {
        Self {
            max_pages: 0,
            decrypt_empty_password: true,
        }
    }
}

/// Line item extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Candidate segmentation strategy.
    pub mode: TokenizerMode,

    /// Phrases that must all appear on the first packing page.
    pub packing_markers: Vec<String>,

    /// Upper-cased line prefixes that mark non-data lines.
    pub skip_prefixes: Vec<String>,

    /// Upper-cased substrings that mark non-data lines.
    pub skip_contains: Vec<String>,

    /// Warehouse tags allowed to end a record in segment mode. Empty means
    /// any upper-case tag does.
    pub segment_markers: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            mode: TokenizerMode::Auto,
            packing_markers: to_strings(&["Codigo Cliente", "LN", "Liberado"]),
            skip_prefixes: to_strings(&[
                "PICKING LIST",
                "COD ",
                "N°:",
                "Nº:",
                "FECHA:",
                "HORA:",
                "ESTADO:",
                "PREPARO:",
                "CONTROLO:",
                "CONTROLÓ:",
            ]),
            skip_contains: to_strings(&["PÁGINA", "PAGINA", "COD VIEJO"]),
            segment_markers: Vec::new(),
        }
    }
}

/// Presentation settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Descriptions longer than this are cut and suffixed with `..`.
    pub description_width: usize,

    /// Status shown when the document carries none.
    pub default_status: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            description_width: 45,
            default_status: "COMPLETO".to_string(),
        }
    }
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl PickrConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| PickrError::Config(e.to_string()))
    }

    /// Load `path` if it exists, otherwise the defaults.
    pub fn from_file_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file, creating parent directories.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content =
            serde_json::to_string_pretty(self).map_err(|e| PickrError::Config(e.to_string()))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Value at a dotted key such as `extraction.mode`.
    pub fn get(&self, key: &str) -> Result<Value> {
        let json = self.to_value()?;
        let mut current = &json;
        for part in key.split('.') {
            current = current
                .get(part)
                .ok_or_else(|| PickrError::Config(format!("unknown key: {}", key)))?;
        }
        Ok(current.clone())
    }

    /// Copy of the configuration with the value at a dotted key replaced.
    ///
    /// Only existing keys can be set, and the result must still deserialize.
    pub fn with_value(&self, key: &str, value: Value) -> Result<Self> {
        let mut json = self.to_value()?;
        let unknown = || PickrError::Config(format!("unknown key: {}", key));

        let (parents, leaf) = match key.rsplit_once('.') {
            Some((parents, leaf)) => (Some(parents), leaf),
            None => (None, key),
        };
        let mut current = &mut json;
        for part in parents.into_iter().flat_map(|p| p.split('.')) {
            current = current.get_mut(part).ok_or_else(unknown)?;
        }
        let slot = current.get_mut(leaf).ok_or_else(unknown)?;
        *slot = value;

        serde_json::from_value(json)
            .map_err(|e| PickrError::Config(format!("invalid value for {}: {}", key, e)))
    }

    fn to_value(&self) -> Result<Value> {
        serde_json::to_value(self).map_err(|e| PickrError::Config(e.to_string()))
    }
}
