//! The generated commit message and its subject-line shape.

use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;

/// Conventional commit types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitType {
    Feat,
    Fix,
    Docs,
    Style,
    Refactor,
    Perf,
    Test,
    Build,
    Ci,
    Chore,
    Revert,
}

impl std::str::FromStr for CommitType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "feat" => Ok(Self::Feat),
            "fix" => Ok(Self::Fix),
            "docs" => Ok(Self::Docs),
            "style" => Ok(Self::Style),
            "refactor" => Ok(Self::Refactor),
            "perf" => Ok(Self::Perf),
            "test" => Ok(Self::Test),
            "build" => Ok(Self::Build),
            "ci" => Ok(Self::Ci),
            "chore" => Ok(Self::Chore),
            "revert" => Ok(Self::Revert),
            _ => Err(format!("Unknown commit type: {}", s)),
        }
    }
}

/// `type(scope)!: description`, optionally preceded by a leading emoji.
static CONVENTIONAL_SUBJECT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[^\w\s]+\s*)?(\w+)(?:\(([^)]+)\))?(!)?:\s+\S").unwrap());

/// Parsed conventional subject parts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConventionalSubject {
    pub commit_type: CommitType,
    pub scope: Option<String>,
    pub breaking: bool,
}

/// Parse a subject line as a conventional commit header.
///
/// Returns `None` when the line doesn't match or the type is unknown.
pub fn parse_conventional_subject(subject: &str) -> Option<ConventionalSubject> {
    let caps = CONVENTIONAL_SUBJECT.captures(subject.trim())?;
    let commit_type = caps.get(1)?.as_str().parse::<CommitType>().ok()?;
    Some(ConventionalSubject {
        commit_type,
        scope: caps.get(2).map(|m| m.as_str().to_string()),
        breaking: caps.get(3).is_some(),
    })
}

/// Final generated message. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitMessage(String);

impl CommitMessage {
    /// Build from accumulated model output, trimming surrounding whitespace.
    ///
    /// Returns `None` if nothing but whitespace was generated.
    pub fn from_generated(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn subject(&self) -> &str {
        self.0.lines().next().unwrap_or_default()
    }

    /// Text after the subject's blank separator line, if any.
    pub fn body(&self) -> Option<&str> {
        let (_, rest) = self.0.split_once('\n')?;
        let body = rest.trim();
        (!body.is_empty()).then_some(body)
    }

    pub fn is_conventional(&self) -> bool {
        parse_conventional_subject(self.subject()).is_some()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CommitMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
