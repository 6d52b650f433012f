use std::{io, path::Path};

use serde::{Deserialize, Serialize};

use crate::domain::{
    clause::StripMode,
    keyword::{self, DEFAULT_KEYWORDS, KeywordError, KeywordFilter},
    segmenter::SegmentOptions,
};

/// Column names used for the output table when none are configured.
pub const DEFAULT_HEADER: [&str; 4] = ["section", "clause number", "text", "requirement type"];

/// How values are quoted in the CSV output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Quoting {
    /// Wrap each value in double quotes without escaping its contents.
    ///
    /// A value containing `"` produces a malformed row.
    #[default]
    Bare,

    /// Wrap each value in double quotes and double any embedded quote.
    Escaped,
}

/// Configuration for requirement extraction.
///
/// This struct holds the settings that control how clauses are segmented,
/// which keywords mark a clause as a requirement, and how the output table is
/// written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Versions", into = "Versions")]
pub struct Config {
    /// Normative keywords, matched case-insensitively as whole words.
    keywords: Vec<String>,

    /// Column names for the output table, in field order.
    header: [String; 4],

    /// How main clause markers are removed from the start of their line.
    pub strip_mode: StripMode,

    /// Whether an open sub-clause is emitted when the next main clause
    /// starts. When `false` it is discarded.
    pub flush_dangling_subclauses: bool,

    /// How CSV values are quoted.
    pub quoting: Quoting,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            keywords: default_keywords(),
            header: DEFAULT_HEADER.map(ToString::to_string),
            strip_mode: StripMode::default(),
            flush_dangling_subclauses: false,
            quoting: Quoting::default(),
        }
    }
}

impl Config {
    /// Loads the configuration from a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or if the TOML content is
    /// invalid.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::Read)?;
        toml::from_str(&content).map_err(ConfigError::Parse)
    }

    /// Saves the configuration to a TOML file at the given path.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be serialized to TOML or if
    /// the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self).map_err(ConfigError::Serialize)?;
        std::fs::write(path, content).map_err(ConfigError::Write)
    }

    /// Returns the configured keywords.
    #[must_use]
    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    /// Replaces the keyword list.
    ///
    /// # Errors
    ///
    /// Returns an error if the list is empty or a keyword is invalid. The
    /// configuration is left unchanged in that case.
    pub fn set_keywords(&mut self, keywords: Vec<String>) -> Result<(), KeywordError> {
        validate_keywords(&keywords)?;
        self.keywords = keywords;
        Ok(())
    }

    /// Returns the output column names.
    #[must_use]
    pub const fn header(&self) -> &[String; 4] {
        &self.header
    }

    /// Builds the keyword filter for this configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the combined keyword pattern cannot be compiled.
    pub fn keyword_filter(&self) -> Result<KeywordFilter, KeywordError> {
        KeywordFilter::from_vec(self.keywords.clone())
    }

    /// Segmentation options for this configuration.
    #[must_use]
    pub const fn segment_options(&self) -> SegmentOptions {
        SegmentOptions {
            strip_mode: self.strip_mode,
            flush_dangling_subclauses: self.flush_dangling_subclauses,
        }
    }
}

fn default_keywords() -> Vec<String> {
    DEFAULT_KEYWORDS.map(ToString::to_string).to_vec()
}

fn default_header() -> Vec<String> {
    DEFAULT_HEADER.map(ToString::to_string).to_vec()
}

fn validate_keywords(keywords: &[String]) -> Result<(), KeywordError> {
    if keywords.is_empty() {
        return Err(KeywordError::Empty);
    }
    keywords.iter().try_for_each(|k| keyword::validate(k))
}

/// Errors that can occur while loading, validating or saving a [`Config`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("Failed to read config file: {0}")]
    Read(#[source] io::Error),

    /// The configuration file is not valid TOML or has invalid values.
    #[error("Failed to parse config file: {0}")]
    Parse(#[source] toml::de::Error),

    /// The configuration could not be serialized.
    #[error("Failed to serialize config: {0}")]
    Serialize(#[source] toml::ser::Error),

    /// The configuration file could not be written.
    #[error("Failed to write config file: {0}")]
    Write(#[source] io::Error),

    /// The keyword list is invalid.
    #[error(transparent)]
    Keyword(#[from] KeywordError),

    /// The header does not have exactly one name per column.
    #[error("Invalid header: expected 4 column names, got {0}")]
    Header(usize),
}

/// The serialized versions of the configuration.
/// This allows for future changes to the configuration format and to the domain
/// type without breaking compatibility.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "_version")]
enum Versions {
    #[serde(rename = "1")]
    V1 {
        #[serde(default = "default_keywords")]
        keywords: Vec<String>,

        #[serde(default = "default_header")]
        header: Vec<String>,

        #[serde(default)]
        strip_mode: StripMode,

        #[serde(default)]
        flush_dangling_subclauses: bool,

        #[serde(default)]
        quoting: Quoting,
    },
}

impl TryFrom<Versions> for Config {
    type Error = ConfigError;

    fn try_from(versions: Versions) -> Result<Self, Self::Error> {
        match versions {
            Versions::V1 {
                keywords,
                header,
                strip_mode,
                flush_dangling_subclauses,
                quoting,
            } => {
                validate_keywords(&keywords)?;
                let header: [String; 4] = header
                    .try_into()
                    .map_err(|header: Vec<String>| ConfigError::Header(header.len()))?;
                Ok(Self {
                    keywords,
                    header,
                    strip_mode,
                    flush_dangling_subclauses,
                    quoting,
                })
            }
        }
    }
}

impl From<Config> for Versions {
    fn from(config: Config) -> Self {
        Self::V1 {
            keywords: config.keywords,
            header: config.header.into(),
            strip_mode: config.strip_mode,
            flush_dangling_subclauses: config.flush_dangling_subclauses,
            quoting: config.quoting,
        }
    }
}
