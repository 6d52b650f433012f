use serde::Serialize;

use crate::domain::clause::ClauseId;

/// A segmented clause or sub-clause, before keyword filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateRecord {
    /// The line immediately above the line that opened the clause.
    #[serde(rename = "section")]
    pub context_line: String,

    /// The clause identifier.
    #[serde(rename = "clause number")]
    pub identifier: ClauseId,

    /// The clause body, joined across wrapped lines.
    #[serde(rename = "text")]
    pub body_text: String,
}

/// A candidate record whose body contains a normative keyword.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequirementRecord {
    #[serde(flatten)]
    candidate: CandidateRecord,

    #[serde(rename = "requirement type")]
    matched_keyword: String,
}

impl RequirementRecord {
    /// Promotes a candidate, recording the keyword exactly as it appeared.
    #[must_use]
    pub const fn new(candidate: CandidateRecord, matched_keyword: String) -> Self {
        Self {
            candidate,
            matched_keyword,
        }
    }

    /// The line above the clause, used as a section heading.
    #[must_use]
    pub fn context_line(&self) -> &str {
        &self.candidate.context_line
    }

    /// The clause identifier.
    #[must_use]
    pub const fn identifier(&self) -> &ClauseId {
        &self.candidate.identifier
    }

    /// The clause body.
    #[must_use]
    pub fn body_text(&self) -> &str {
        &self.candidate.body_text
    }

    /// The keyword that matched, in its original case.
    #[must_use]
    pub fn matched_keyword(&self) -> &str {
        &self.matched_keyword
    }

    /// Field values in column order: context, identifier, body, keyword.
    #[must_use]
    pub fn values(&self) -> [String; 4] {
        [
            self.candidate.context_line.clone(),
            self.candidate.identifier.to_string(),
            self.candidate.body_text.clone(),
            self.matched_keyword.clone(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> RequirementRecord {
        RequirementRecord::new(
            CandidateRecord {
                context_line: "Heading".to_string(),
                identifier: ClauseId::main("41.—(1)").unwrap().with_sub("(2)"),
                body_text: "The applicant should apply.".to_string(),
            },
            "should".to_string(),
        )
    }

    #[test]
    fn values_are_in_column_order() {
        assert_eq!(
            record().values(),
            [
                "Heading".to_string(),
                "41.—(1) (2)".to_string(),
                "The applicant should apply.".to_string(),
                "should".to_string(),
            ]
        );
    }

    #[test]
    fn serializes_with_column_names() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "section": "Heading",
                "clause number": "41.—(1) (2)",
                "text": "The applicant should apply.",
                "requirement type": "should",
            })
        );
    }
}
