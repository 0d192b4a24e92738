//! TOML configuration for roster runs.
//!
//! Every section and field is optional; an empty file yields the defaults.
//!
//! ```toml
//! [classification]
//! consistency = "membership"      # or "label_equality"
//!
//! [rosters]
//! exception_scope = "exclude"     # or "include"
//!
//! [[rosters.exclude]]
//! family_name = "Lefèvre"
//! given_name = "Zoé"
//!
//! [ingest]
//! codes_column = "I"
//! header_row = 3
//! data_start_row = 4
//! delimiter = ","
//!
//! [export]
//! delimiter = ";"
//! bom = true
//! locale = "fr"
//! ```

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use roster_core::{
    ClassifierOptions, CompileOptions, ConsistencyPolicy, ExceptionScope, ExclusionList,
    RosterOptions,
};
use roster_ingest::{ColumnRef, IngestOptions};
use roster_model::Locale;
use roster_report::ExportOptions;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RosterConfig {
    pub classification: ClassificationSection,
    pub rosters: RostersSection,
    pub ingest: IngestSection,
    pub export: ExportSection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationSection {
    pub consistency: ConsistencyPolicy,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RostersSection {
    pub exception_scope: ExceptionScope,
    pub exclude: Vec<ExcludedStudent>,
}

/// A student dropped from every roster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExcludedStudent {
    pub family_name: String,
    pub given_name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSection {
    pub codes_column: ColumnRef,
    pub header_row: usize,
    pub data_start_row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub family_name_column: Option<ColumnRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub given_name_column: Option<ColumnRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_column: Option<ColumnRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier_column: Option<ColumnRef>,
    pub delimiter: char,
}

impl Default for IngestSection {
    fn default() -> Self {
        let defaults = IngestOptions::default();
        Self {
            codes_column: defaults.codes_column,
            header_row: defaults.header_row,
            data_start_row: defaults.data_start_row,
            family_name_column: None,
            given_name_column: None,
            phone_column: None,
            identifier_column: None,
            delimiter: char::from(defaults.delimiter),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSection {
    pub delimiter: char,
    pub bom: bool,
    pub locale: Locale,
}

impl Default for ExportSection {
    fn default() -> Self {
        let defaults = ExportOptions::default();
        Self {
            delimiter: char::from(defaults.delimiter),
            bom: defaults.bom,
            locale: defaults.locale,
        }
    }
}

impl RosterConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let contents =
            fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config = Self::from_toml_str(&contents)
            .with_context(|| format!("parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded configuration");
        Ok(config)
    }

    /// Load `path` when given, defaults otherwise.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn ingest_options(&self) -> Result<IngestOptions> {
        let ingest = &self.ingest;
        Ok(IngestOptions {
            codes_column: ingest.codes_column.clone(),
            header_row: ingest.header_row,
            data_start_row: ingest.data_start_row,
            family_name_column: ingest.family_name_column.clone(),
            given_name_column: ingest.given_name_column.clone(),
            phone_column: ingest.phone_column.clone(),
            identifier_column: ingest.identifier_column.clone(),
            delimiter: ascii_delimiter(ingest.delimiter)?,
        })
    }

    pub fn roster_options(&self) -> RosterOptions {
        let exclusions: ExclusionList = self
            .rosters
            .exclude
            .iter()
            .map(|student| (student.family_name.as_str(), student.given_name.as_str()))
            .collect();
        RosterOptions {
            classifier: ClassifierOptions {
                consistency: self.classification.consistency,
            },
            compile: CompileOptions {
                exception_scope: self.rosters.exception_scope,
                exclusions,
            },
        }
    }

    pub fn export_options(&self) -> Result<ExportOptions> {
        Ok(ExportOptions {
            delimiter: ascii_delimiter(self.export.delimiter)?,
            bom: self.export.bom,
            locale: self.export.locale,
        })
    }
}

/// CSV delimiters are single bytes.
pub fn ascii_delimiter(value: char) -> Result<u8> {
    if !value.is_ascii() || value.is_ascii_alphanumeric() || value == '"' {
        bail!("invalid delimiter {value:?}: expected an ASCII separator");
    }
    Ok(value as u8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = RosterConfig::from_toml_str("").unwrap();
        assert_eq!(config, RosterConfig::default());
        assert_eq!(config.ingest_options().unwrap(), IngestOptions::default());
        assert_eq!(config.export_options().unwrap(), ExportOptions::default());
    }

    #[test]
    fn default_settings_round_trip() {
        let config = RosterConfig::default();
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed = RosterConfig::from_toml_str(&text).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn rejects_multibyte_delimiter() {
        assert!(ascii_delimiter('§').is_err());
        assert!(ascii_delimiter('a').is_err());
        assert_eq!(ascii_delimiter('\t').unwrap(), b'\t');
    }
}
