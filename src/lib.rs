//! Normative Requirement Extraction
//!
//! Extracts clauses containing normative keywords ("must", "should",
//! "shall") from regulatory documents with numbered clauses, and writes them
//! out as a table.

pub mod domain;
pub use domain::{CandidateRecord, ClauseId, Config, KeywordFilter, RequirementRecord, Segmenter};

mod extract;
pub use extract::{Extraction, Extractor};

/// Reading input documents and writing output tables.
pub mod storage;
