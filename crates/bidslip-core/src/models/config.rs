//! Configuration structures for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration for the bidslip pipeline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BidslipConfig {
    /// Text extraction configuration.
    pub extraction: ExtractionConfig,

    /// Inventory enrichment configuration.
    pub enrichment: EnrichmentConfig,

    /// Batch processing configuration.
    pub batch: BatchConfig,
}

/// Text extraction configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Remove vendor banner phrases before segmentation.
    pub strip_boilerplate: bool,

    /// Phrases removed verbatim from the raw text.
    pub boilerplate: Vec<String>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            strip_boilerplate: true,
            boilerplate: default_boilerplate(),
        }
    }
}

fn default_boilerplate() -> Vec<String> {
    [
        "Monday & Sunday: CloseTuesday - Saturday: 12:00pm - 6:30pmWe Asked All Items Should Check at Our Location",
        "Monday: CloseTuesday - Saturday: 12:00pm - 6:30pm",
        "CC Power Deals240 Bartor Road, Unit 4, North York, ON, M9M 2W6+1 416-740-2333",
        "READ NEW TERMS OF USE BEFORE YOU BID!",
        "READ EMAIL FOR PICK-UP & SHIPPING INSTRUCTIONS",
        "Sunday: CloseWe Asked All Items Should Check at Our Location",
        "NO RETURN AND REFUND",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Inventory enrichment configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// JSON file of remaining-inventory records.
    pub inventory_path: Option<PathBuf>,
}

/// Batch processing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Maximum documents processed at once.
    pub jobs: usize,

    /// Deadline for the whole batch, in seconds.
    pub timeout_secs: u64,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            jobs: 4,
            timeout_secs: 120,
        }
    }
}

impl BidslipConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }

    /// Boilerplate phrases to strip, or an empty list when stripping is off.
    pub fn active_boilerplate(&self) -> Vec<String> {
        if self.extraction.strip_boilerplate {
            self.extraction.boilerplate.clone()
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: BidslipConfig =
            serde_json::from_str(r#"{"batch": {"jobs": 8}}"#).unwrap();

        assert_eq!(config.batch.jobs, 8);
        assert_eq!(config.batch.timeout_secs, 120);
        assert!(config.extraction.strip_boilerplate);
        assert_eq!(config.enrichment.inventory_path, None);
    }

    #[test]
    fn test_default_boilerplate_keeps_anchor() {
        let config = BidslipConfig::default();
        assert!(
            config
                .extraction
                .boilerplate
                .iter()
                .all(|p| !p.contains("PRICEEXTENDEDPRICE"))
        );
    }

    #[test]
    fn test_disabled_stripping() {
        let mut config = BidslipConfig::default();
        config.extraction.strip_boilerplate = false;
        assert!(config.active_boilerplate().is_empty());
    }
}
