//! Domain models for requirement extraction.
//!
//! This module contains clause identifiers and line classification, the
//! segmenter that rebuilds the clause hierarchy, the normative keyword
//! filter, and configuration.

/// Clause identifiers and line classification.
pub mod clause;
pub use clause::{ClauseId, LineKind, StripMode};

mod config;
pub use config::{Config, ConfigError, DEFAULT_HEADER, Quoting};

/// Normative keyword matching.
pub mod keyword;
pub use keyword::{KeywordError, KeywordFilter};

/// Candidate and requirement records.
pub mod record;
pub use record::{CandidateRecord, RequirementRecord};

pub mod segmenter;
pub use segmenter::{SegmentOptions, Segmenter};
