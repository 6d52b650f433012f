use std::{borrow::Cow, fmt, str::FromStr, sync::LazyLock};

use non_empty_string::NonEmptyString;
use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

/// Main clause marker at the start of a line: `40.`, `41.—(1)`, `12. (a)`.
static MAIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*([0-9]+\.\s*—?\s*(?:\([0-9A-Za-z_]+\))?)\s*").expect("valid main pattern")
});

/// Sub-clause marker at the start of a line: `(2)`, `( 3 )`.
static SUB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\(\s*([0-9]+)\s*\)").expect("valid sub pattern"));

/// Identifier of a main clause or of a sub-clause nested under one.
///
/// A sub-clause identifier can only be built from a main identifier, so a
/// composite identifier always carries the main clause it belongs to.
///
/// ```
/// use reqex::domain::clause::ClauseId;
///
/// let main = ClauseId::main("41.—(1)").unwrap();
/// assert_eq!(main.to_string(), "41.—(1)");
///
/// let composite = main.with_sub("(2)");
/// assert_eq!(composite.to_string(), "41.—(1) (2)");
/// assert_eq!(composite.main_part(), "41.—(1)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClauseId {
    main: NonEmptyString,
    sub: Option<String>,
}

impl ClauseId {
    /// Creates a main clause identifier.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidClauseId`] if the token is empty or only whitespace.
    pub fn main(token: &str) -> Result<Self, InvalidClauseId> {
        let main = NonEmptyString::new(token.trim().to_string())
            .map_err(|_| InvalidClauseId(token.to_string()))?;
        Ok(Self { main, sub: None })
    }

    /// Returns the composite identifier for a sub-clause of this clause.
    ///
    /// Any sub-clause already on `self` is replaced.
    #[must_use]
    pub fn with_sub(&self, sub: &str) -> Self {
        Self {
            main: self.main.clone(),
            sub: Some(sub.to_string()),
        }
    }

    /// The main clause portion of the identifier.
    #[must_use]
    pub fn main_part(&self) -> &str {
        self.main.as_str()
    }

    /// The sub-clause portion, if this is a composite identifier.
    #[must_use]
    pub fn sub_part(&self) -> Option<&str> {
        self.sub.as_deref()
    }

    /// Whether this identifier names a sub-clause.
    #[must_use]
    pub const fn is_composite(&self) -> bool {
        self.sub.is_some()
    }
}

impl fmt::Display for ClauseId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.sub {
            Some(sub) => write!(f, "{} {sub}", self.main),
            None => write!(f, "{}", self.main),
        }
    }
}

impl Serialize for ClauseId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Error returned when a main clause token is blank.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Invalid clause identifier '{0}': must not be blank")]
pub struct InvalidClauseId(String);

/// How the main clause marker is removed from its line.
///
/// The marker pattern is anchored and only whitespace may precede the
/// identifier, so the first literal occurrence of the identifier is always
/// the matched one. Both modes therefore produce the same text; `Literal`
/// names the text-removal behaviour explicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StripMode {
    /// Remove the first literal occurrence of the trimmed identifier.
    #[default]
    Literal,

    /// Slice the line after the full marker match.
    Capture,
}

impl fmt::Display for StripMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Literal => f.write_str("literal"),
            Self::Capture => f.write_str("capture"),
        }
    }
}

impl FromStr for StripMode {
    type Err = UnknownStripMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "literal" => Ok(Self::Literal),
            "capture" => Ok(Self::Capture),
            _ => Err(UnknownStripMode(s.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognised [`StripMode`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("Unknown strip mode '{0}': expected 'literal' or 'capture'")]
pub struct UnknownStripMode(String);

/// The role a single trimmed line plays in the clause structure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Opens a new main clause.
    Main {
        /// The clause identifier.
        id: ClauseId,
        /// Text following the marker.
        rest: Cow<'a, str>,
    },

    /// Opens a sub-clause, if a main clause is open.
    Sub {
        /// The parenthesised sub-clause number, normalised to `(n)`.
        id: String,
        /// Text following the marker.
        rest: &'a str,
    },

    /// Body text.
    Other,
}

impl<'a> LineKind<'a> {
    /// Classifies a line. The main pattern takes precedence over the
    /// sub-clause pattern.
    #[must_use]
    pub fn classify(line: &'a str, strip: StripMode) -> Self {
        if let Some(captures) = MAIN_PATTERN.captures(line) {
            let token = captures.get(1).map_or("", |m| m.as_str());
            if let Ok(id) = ClauseId::main(token) {
                let rest = match strip {
                    StripMode::Literal => {
                        Cow::Owned(line.replacen(id.main_part(), "", 1).trim().to_string())
                    }
                    StripMode::Capture => Cow::Borrowed(line[captures[0].len()..].trim()),
                };
                return Self::Main { id, rest };
            }
        }

        if let Some(captures) = SUB_PATTERN.captures(line) {
            let number = captures.get(1).map_or("", |m| m.as_str());
            return Self::Sub {
                id: format!("({number})"),
                rest: line[captures[0].len()..].trim(),
            };
        }

        Self::Other
    }
}
