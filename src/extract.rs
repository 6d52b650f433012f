use tracing::{debug, info, instrument};

use crate::domain::{
    CandidateRecord, Config, KeywordError, KeywordFilter, RequirementRecord, Segmenter,
};

/// The segment-then-filter pipeline.
///
/// ```
/// use reqex::Extractor;
///
/// let extraction = Extractor::default()
///     .extract("Heading\n41.—(1) General rule.\n(2) The applicant should apply.\n");
///
/// assert_eq!(extraction.candidates, 2);
/// assert_eq!(extraction.requirements.len(), 1);
/// assert_eq!(extraction.requirements[0].identifier().to_string(), "41.—(1) (2)");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    segmenter: Segmenter,
    filter: KeywordFilter,
}

/// The result of running the [`Extractor`] over a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// The number of candidate clauses found before filtering.
    pub candidates: usize,

    /// The clauses containing a normative keyword, in emission order.
    pub requirements: Vec<RequirementRecord>,
}

impl Extractor {
    /// Creates an extractor from its parts.
    #[must_use]
    pub const fn new(segmenter: Segmenter, filter: KeywordFilter) -> Self {
        Self { segmenter, filter }
    }

    /// Creates an extractor from configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured keywords cannot be compiled.
    pub fn from_config(config: &Config) -> Result<Self, KeywordError> {
        Ok(Self::new(
            Segmenter::new(config.segment_options()),
            config.keyword_filter()?,
        ))
    }

    /// Segments `text` and keeps the clauses that state a requirement.
    #[must_use]
    #[instrument(level = "debug", skip_all)]
    pub fn extract(&self, text: &str) -> Extraction {
        let candidates = self.segmenter.segment(text);
        let candidate_count = candidates.len();

        let requirements: Vec<_> = candidates
            .into_iter()
            .filter_map(|candidate| self.keep(candidate))
            .collect();

        info!(
            candidates = candidate_count,
            requirements = requirements.len(),
            "extraction complete"
        );

        Extraction {
            candidates: candidate_count,
            requirements,
        }
    }

    fn keep(&self, candidate: CandidateRecord) -> Option<RequirementRecord> {
        let id = candidate.identifier.to_string();
        let record = self.filter.filter(candidate);
        match &record {
            Some(record) => debug!(%id, keyword = record.matched_keyword(), "requirement"),
            None => debug!(%id, "no normative keyword"),
        }
        record
    }
}
