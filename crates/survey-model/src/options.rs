//! Cleaning configuration: raw sources, output locations and per-source quirks.
//!
//! The configuration is plain data passed into the pipeline; nothing here
//! reads process-wide state such as the working directory.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

const DEFAULT_TARGET_INDICATOR: &str = "Symptoms of Anxiety Disorder";
const DEFAULT_INDICATOR_COLUMN: &str = "Indicator";
const DEFAULT_PHASE_COLUMN: &str = "Phase";
const DEFAULT_LABEL_COLUMN: &str = "Label (Grouping)";
const DEFAULT_PERCENT_REPLACEMENT: f64 = 0.0;

/// Whole-cell patterns recognized as "not applicable" when no source overrides them.
///
/// `(X)` and runs of `*` come from census extracts, a lone `-` from older
/// survey revisions.
pub fn default_na_markers() -> Vec<String> {
    vec![
        r"^\(X\)$".to_string(),
        r"^\*{2,}$".to_string(),
        r"^-$".to_string(),
    ]
}

/// Raw tokens read as a missing cell, mirroring the usual CSV null spellings.
pub fn default_null_values() -> Vec<String> {
    ["", "NA", "N/A", "NULL", "NaN", "n/a", "nan", "null", "#N/A"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_indicator_column() -> String {
    DEFAULT_INDICATOR_COLUMN.to_string()
}

fn default_target_indicator() -> String {
    DEFAULT_TARGET_INDICATOR.to_string()
}

fn default_phase_column() -> String {
    DEFAULT_PHASE_COLUMN.to_string()
}

fn default_label_column() -> String {
    DEFAULT_LABEL_COLUMN.to_string()
}

fn default_percent_replacement() -> f64 {
    DEFAULT_PERCENT_REPLACEMENT
}

/// Dataset-specific cleaning variant, selected once per source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum DatasetKind {
    /// Symptom-frequency survey rows: one indicator kept, phase gaps dropped.
    SymptomSurvey {
        #[serde(default = "default_indicator_column")]
        indicator_column: String,
        #[serde(default = "default_target_indicator")]
        target_indicator: String,
        #[serde(default = "default_phase_column")]
        phase_column: String,
    },
    /// Census-style extract with upper-case section divider rows and percent columns.
    CensusExtract {
        #[serde(default = "default_label_column")]
        label_column: String,
        #[serde(default = "default_percent_replacement")]
        percent_replacement: f64,
    },
}

impl DatasetKind {
    pub fn symptom_survey() -> Self {
        Self::SymptomSurvey {
            indicator_column: default_indicator_column(),
            target_indicator: default_target_indicator(),
            phase_column: default_phase_column(),
        }
    }

    pub fn census_extract() -> Self {
        Self::CensusExtract {
            label_column: default_label_column(),
            percent_replacement: DEFAULT_PERCENT_REPLACEMENT,
        }
    }

    /// Columns the variant's own rules need kept as text.
    ///
    /// The symptom survey drops rows by the phase column's text placeholder,
    /// so that column must never be inferred as a number.
    pub fn pinned_text_columns(&self) -> Vec<&str> {
        match self {
            Self::SymptomSurvey { phase_column, .. } => vec![phase_column.as_str()],
            Self::CensusExtract { .. } => Vec::new(),
        }
    }
}

/// One raw dataset and where its cleaned counterpart is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceConfig {
    /// Short dataset name used in logs and reports.
    pub name: String,
    /// Raw CSV, relative to [`CleanConfig::raw_dir`] unless absolute.
    pub raw_file: PathBuf,
    /// Cleaned CSV, relative to [`CleanConfig::clean_dir`] unless absolute.
    pub clean_file: PathBuf,
    pub variant: DatasetKind,
    /// Regex patterns whose whole-cell matches become missing before typing.
    #[serde(default = "default_na_markers")]
    pub na_markers: Vec<String>,
    /// Columns that always resolve to text, bypassing inference. The variant's
    /// own pins are added on top of these.
    #[serde(default)]
    pub text_columns: Vec<String>,
    /// Raw tokens read as missing at ingest.
    #[serde(default = "default_null_values")]
    pub null_values: Vec<String>,
}

impl SourceConfig {
    pub fn new(
        name: impl Into<String>,
        raw_file: impl Into<PathBuf>,
        clean_file: impl Into<PathBuf>,
        variant: DatasetKind,
    ) -> Self {
        Self {
            name: name.into(),
            raw_file: raw_file.into(),
            clean_file: clean_file.into(),
            variant,
            na_markers: default_na_markers(),
            text_columns: Vec::new(),
            null_values: default_null_values(),
        }
    }

    #[must_use]
    pub fn with_text_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.text_columns = columns.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_na_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.na_markers = markers.into_iter().map(Into::into).collect();
        self
    }
}

/// Top-level cleaning configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CleanConfig {
    pub raw_dir: PathBuf,
    pub clean_dir: PathBuf,
    pub sources: Vec<SourceConfig>,
}

impl CleanConfig {
    /// Built-in configuration for the three published sources under `data_dir`.
    pub fn default_for(data_dir: &Path) -> Self {
        Self {
            raw_dir: data_dir.join("raw"),
            clean_dir: data_dir.join("clean"),
            sources: vec![
                SourceConfig::new(
                    "anxiety_trends",
                    "Indicators_of_Anxiety_or_Depression_Based_on_Reported_Frequency_of_Symptoms_During_Last_7_Days.csv",
                    "anxiety_trends.csv",
                    DatasetKind::symptom_survey(),
                ),
                SourceConfig::new(
                    "demographics",
                    "ACSDP5Y2023.DP05-2025-07-25T220355.csv",
                    "demographics.csv",
                    DatasetKind::census_extract(),
                ),
                SourceConfig::new(
                    "household",
                    "ACSDP5Y2023.DP02-2025-07-25T213601.csv",
                    "household.csv",
                    DatasetKind::census_extract(),
                ),
            ],
        }
    }

    /// Parse a TOML document. Relative directories are resolved against `base_dir`.
    pub fn from_toml_str(content: &str, base_dir: &Path, origin: &Path) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(|source| ConfigError::Toml {
            path: origin.to_path_buf(),
            source,
        })?;
        if config.raw_dir.is_relative() {
            config.raw_dir = base_dir.join(&config.raw_dir);
        }
        if config.clean_dir.is_relative() {
            config.clean_dir = base_dir.join(&config.clean_dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Load a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let config = Self::from_toml_str(&content, base_dir, path)?;
        tracing::info!(path = %path.display(), sources = config.sources.len(), "loaded config");
        Ok(config)
    }

    pub fn raw_path(&self, source: &SourceConfig) -> PathBuf {
        self.raw_dir.join(&source.raw_file)
    }

    pub fn clean_path(&self, source: &SourceConfig) -> PathBuf {
        self.clean_dir.join(&source.clean_file)
    }

    pub fn source(&self, name: &str) -> Option<&SourceConfig> {
        self.sources.iter().find(|source| source.name == name)
    }

    /// Reject configurations whose outputs would collide.
    pub fn validate(&self) -> Result<()> {
        if self.sources.is_empty() {
            return Err(ConfigError::Invalid {
                message: "no sources configured".to_string(),
            });
        }
        let mut names = BTreeSet::new();
        let mut outputs = BTreeSet::new();
        for source in &self.sources {
            if source.name.trim().is_empty() {
                return Err(ConfigError::Invalid {
                    message: "source name must not be empty".to_string(),
                });
            }
            if !names.insert(source.name.as_str()) {
                return Err(ConfigError::Invalid {
                    message: format!("duplicate source name '{}'", source.name),
                });
            }
            let is_json = source
                .clean_file
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
            if is_json {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "clean file of '{}' must not use the schema extension .json",
                        source.name
                    ),
                });
            }
            if !outputs.insert(self.clean_path(source)) {
                return Err(ConfigError::Invalid {
                    message: format!(
                        "clean file {} is used by more than one source",
                        source.clean_file.display()
                    ),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_three_sources() {
        let config = CleanConfig::default_for(Path::new("data"));
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.raw_dir, PathBuf::from("data/raw"));
        assert_eq!(
            config.clean_path(&config.sources[0]),
            PathBuf::from("data/clean/anxiety_trends.csv")
        );
        assert!(config.sources[0].text_columns.is_empty());
        assert_eq!(config.sources[0].variant.pinned_text_columns(), vec!["Phase"]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn variant_pins_follow_configured_phase_column() {
        let kind = DatasetKind::SymptomSurvey {
            indicator_column: "Indicator".to_string(),
            target_indicator: "x".to_string(),
            phase_column: "Round".to_string(),
        };
        assert_eq!(kind.pinned_text_columns(), vec!["Round"]);
        assert!(DatasetKind::census_extract().pinned_text_columns().is_empty());
    }

    #[test]
    fn parses_toml_with_defaults() {
        let content = r#"
raw_dir = "raw"
clean_dir = "/srv/clean"

[[sources]]
name = "anxiety"
raw_file = "anxiety.csv"
clean_file = "anxiety_trends.csv"
text_columns = ["Phase"]

[sources.variant]
type = "symptom_survey"
target_indicator = "Symptoms of Depressive Disorder"

[[sources]]
name = "census"
raw_file = "dp05.csv"
clean_file = "demographics.csv"
na_markers = ['^\(X\)$']

[sources.variant]
type = "census_extract"
"#;
        let config =
            CleanConfig::from_toml_str(content, Path::new("/etc/survey"), Path::new("x.toml"))
                .unwrap();
        assert_eq!(config.raw_dir, PathBuf::from("/etc/survey/raw"));
        assert_eq!(config.clean_dir, PathBuf::from("/srv/clean"));
        assert_eq!(
            config.sources[0].variant,
            DatasetKind::SymptomSurvey {
                indicator_column: "Indicator".to_string(),
                target_indicator: "Symptoms of Depressive Disorder".to_string(),
                phase_column: "Phase".to_string(),
            }
        );
        assert_eq!(config.sources[0].na_markers, default_na_markers());
        assert_eq!(config.sources[1].variant, DatasetKind::census_extract());
        assert_eq!(config.sources[1].na_markers, vec![r"^\(X\)$".to_string()]);
        assert_eq!(config.sources[1].null_values, default_null_values());
    }

    #[test]
    fn rejects_duplicate_names() {
        let mut config = CleanConfig::default_for(Path::new("data"));
        config.sources[1].name = "anxiety_trends".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate source name"));
    }

    #[test]
    fn rejects_shared_clean_file() {
        let mut config = CleanConfig::default_for(Path::new("data"));
        config.sources[2].clean_file = PathBuf::from("demographics.csv");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Invalid { .. })
        ));
    }

    #[test]
    fn rejects_json_clean_file() {
        let mut config = CleanConfig::default_for(Path::new("data"));
        config.sources[0].clean_file = PathBuf::from("anxiety.json");
        assert!(config.validate().is_err());
    }

    #[test]
    fn load_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = CleanConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_reads_file_relative_to_its_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("survey.toml");
        fs::write(
            &path,
            r#"
raw_dir = "raw"
clean_dir = "clean"

[[sources]]
name = "household"
raw_file = "dp02.csv"
clean_file = "household.csv"

[sources.variant]
type = "census_extract"
percent_replacement = -1.0
"#,
        )
        .unwrap();
        let config = CleanConfig::load(&path).unwrap();
        assert_eq!(config.clean_dir, dir.path().join("clean"));
        assert_eq!(
            config.sources[0].variant,
            DatasetKind::CensusExtract {
                label_column: "Label (Grouping)".to_string(),
                percent_replacement: -1.0,
            }
        );
    }
}
