use nonempty::NonEmpty;
use regex::Regex;

use crate::domain::record::{CandidateRecord, RequirementRecord};

/// The normative keywords recognised when none are configured.
pub const DEFAULT_KEYWORDS: [&str; 3] = ["must", "should", "shall"];

/// Case-insensitive, whole-word search for normative keywords.
///
/// Word boundaries and case folding are Unicode-aware: `ſhall` (long s)
/// matches `shall`, and a keyword followed by a non-ASCII letter, as in
/// `mustér`, is not a whole word. An ASCII-only matcher would do the
/// opposite in both cases.
#[derive(Debug, Clone)]
pub struct KeywordFilter {
    keywords: NonEmpty<String>,
    pattern: Regex,
}

impl KeywordFilter {
    /// Builds a filter matching any of the given keywords.
    ///
    /// # Errors
    ///
    /// Returns an error if a keyword is blank or does not start and end with
    /// a word character (so that whole-word matching is meaningful).
    pub fn new(keywords: NonEmpty<String>) -> Result<Self, KeywordError> {
        for keyword in keywords.iter() {
            validate(keyword)?;
        }

        let alternatives = keywords
            .iter()
            .map(|keyword| regex::escape(keyword.trim()))
            .collect::<Vec<_>>()
            .join("|");
        let pattern = Regex::new(&format!(r"(?i)\b(?:{alternatives})\b"))?;

        Ok(Self { keywords, pattern })
    }

    /// Builds a filter from a plain list of keywords.
    ///
    /// # Errors
    ///
    /// Returns [`KeywordError::Empty`] if the list is empty, or any error
    /// from [`KeywordFilter::new`].
    pub fn from_vec(keywords: Vec<String>) -> Result<Self, KeywordError> {
        NonEmpty::from_vec(keywords).map_or(Err(KeywordError::Empty), Self::new)
    }

    /// The configured keywords.
    #[must_use]
    pub const fn keywords(&self) -> &NonEmpty<String> {
        &self.keywords
    }

    /// Returns the first keyword occurrence in `text`, in its original case.
    #[must_use]
    pub fn find<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.pattern.find(text).map(|m| m.as_str())
    }

    /// Promotes a candidate to a requirement if its body contains a keyword.
    ///
    /// Candidates without a keyword are dropped; this is the expected outcome
    /// for most clauses.
    #[must_use]
    pub fn filter(&self, candidate: CandidateRecord) -> Option<RequirementRecord> {
        let keyword = self.find(&candidate.body_text)?.to_string();
        Some(RequirementRecord::new(candidate, keyword))
    }
}

impl Default for KeywordFilter {
    fn default() -> Self {
        let keywords = NonEmpty::from((
            DEFAULT_KEYWORDS[0].to_string(),
            DEFAULT_KEYWORDS[1..].iter().map(ToString::to_string).collect(),
        ));
        Self::new(keywords).expect("default keywords are valid")
    }
}

/// Checks that a keyword can be matched as a whole word.
///
/// # Errors
///
/// Returns [`KeywordError::Invalid`] for blank keywords or keywords that do
/// not start and end with a letter, digit or underscore.
pub fn validate(keyword: &str) -> Result<(), KeywordError> {
    let trimmed = keyword.trim();
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    match (trimmed.chars().next(), trimmed.chars().last()) {
        (Some(first), Some(last)) if is_word(first) && is_word(last) => Ok(()),
        _ => Err(KeywordError::Invalid(keyword.to_string())),
    }
}

/// Errors that can occur while building a [`KeywordFilter`].
#[derive(Debug, thiserror::Error)]
pub enum KeywordError {
    /// No keywords were supplied.
    #[error("At least one normative keyword is required")]
    Empty,

    /// The keyword cannot be matched as a whole word.
    #[error("Invalid keyword '{0}': must start and end with a letter, digit or underscore")]
    Invalid(String),

    /// The combined keyword pattern failed to compile.
    #[error(transparent)]
    Pattern(#[from] regex::Error),
}

#[cfg(test)]
mod tests {
    use test_case::test_case;

    use super::*;
    use crate::domain::clause::ClauseId;

    fn candidate(body: &str) -> CandidateRecord {
        CandidateRecord {
            context_line: String::new(),
            identifier: ClauseId::main("40.").unwrap(),
            body_text: body.to_string(),
        }
    }

    #[test_case("The operator must comply.", Some("must"); "lowercase")]
    #[test_case("The operator MUST comply.", Some("MUST"); "uppercase keeps case")]
    #[test_case("Applicants Should apply.", Some("Should"); "title case")]
    #[test_case("It shall be lawful.", Some("shall"); "shall")]
    #[test_case("A mustard seed.", None; "prefix of a longer word")]
    #[test_case("Unshallow water.", None; "embedded in a word")]
    #[test_case("General rule.", None; "no keyword")]
    #[test_case("must-have items", Some("must"); "hyphen is a boundary")]
    fn find(text: &str, expected: Option<&str>) {
        assert_eq!(KeywordFilter::default().find(text), expected);
    }

    #[test]
    fn matching_is_unicode_aware() {
        let filter = KeywordFilter::default();
        assert_eq!(filter.find("Thou ſhall not."), Some("ſhall"));
        assert_eq!(filter.find("Le mustér est prêt."), None);
    }

    #[test]
    fn only_the_first_occurrence_is_recorded() {
        let filter = KeywordFilter::default();
        let record = filter
            .filter(candidate("You should, and in fact must, comply."))
            .unwrap();
        assert_eq!(record.matched_keyword(), "should");
    }

    #[test]
    fn candidates_without_keywords_are_dropped() {
        assert!(KeywordFilter::default().filter(candidate("General rule.")).is_none());
    }

    #[test]
    fn custom_keywords() {
        let filter =
            KeywordFilter::from_vec(vec!["is required to".to_string(), "may".to_string()])
                .unwrap();
        assert_eq!(filter.find("The holder Is Required To report."), Some("Is Required To"));
        assert_eq!(filter.find("The holder must report."), None);
    }

    #[test]
    fn keywords_are_escaped() {
        let filter = KeywordFilter::from_vec(vec!["a.b".to_string()]).unwrap();
        assert_eq!(filter.find("axb"), None);
        assert_eq!(filter.find("a.b"), Some("a.b"));
    }

    #[test]
    fn empty_list_is_rejected() {
        assert!(matches!(
            KeywordFilter::from_vec(Vec::new()),
            Err(KeywordError::Empty)
        ));
    }

    #[test_case(""; "empty")]
    #[test_case("   "; "blank")]
    #[test_case("-must"; "leading punctuation")]
    #[test_case("must!"; "trailing punctuation")]
    fn invalid_keywords_are_rejected(keyword: &str) {
        assert!(matches!(validate(keyword), Err(KeywordError::Invalid(_))));
    }
}
