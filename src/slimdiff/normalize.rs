//! Reduce a raw diff to the lines worth sending to the model.

use tracing::debug;

use crate::git::{RawDiff, is_excluded_path};

use super::parse::{DiffLine, Hunk, LineKind, parse};

/// Cleaned-diff size above which generation is expected to be slow.
///
/// A tunable heuristic: exceeding it only triggers a warning.
pub const SOFT_BUDGET_BYTES: usize = 2000;

/// Header metadata that carries no signal for a commit message.
const DECORATIVE_META: &[&str] = &[
    "index ",
    "similarity index ",
    "dissimilarity index ",
    "\\ No newline",
];

/// Why a file section was left out of the normalized diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElisionReason {
    Binary,
    ExcludedPath,
    NoTextualChange,
}

/// A file section dropped during normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElidedFile {
    pub path: Option<String>,
    pub reason: ElisionReason,
}

/// The retained diff lines, in original order.
///
/// Every line is byte-identical to a line of the raw diff, so the text is
/// never longer than the input it came from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDiff {
    text: String,
    files: usize,
    hunks: usize,
    elided: Vec<ElidedFile>,
}

impl NormalizedDiff {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Byte length of the retained text.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn file_count(&self) -> usize {
        self.files
    }

    pub fn hunk_count(&self) -> usize {
        self.hunks
    }

    pub fn elided(&self) -> &[ElidedFile] {
        &self.elided
    }

    pub fn exceeds_soft_budget(&self) -> bool {
        self.len() > SOFT_BUDGET_BYTES
    }

    fn push_line(&mut self, line: &DiffLine<'_>) {
        if let Some(text) = line.text() {
            self.text.push_str(text);
        }
    }
}

/// Normalize a collected diff.
pub fn normalize(raw: &RawDiff) -> NormalizedDiff {
    normalize_bytes(raw.as_bytes())
}

/// Normalize raw diff bytes.
///
/// Drops binary and excluded files, strips decorative headers and context,
/// discards hunks whose only changes are whitespace, and collapses each run of
/// whitespace-only change lines down to its first line.
pub fn normalize_bytes(input: &[u8]) -> NormalizedDiff {
    let mut out = NormalizedDiff::default();

    for file in parse(input) {
        let path = file.path();

        let reason = if file.is_binary() {
            Some(ElisionReason::Binary)
        } else if path.as_deref().is_some_and(is_excluded_path) {
            Some(ElisionReason::ExcludedPath)
        } else {
            None
        };
        if let Some(reason) = reason {
            debug!(?path, ?reason, "eliding file");
            out.elided.push(ElidedFile { path, reason });
            continue;
        }

        let hunks: Vec<Vec<DiffLine<'_>>> = file.hunks.iter().filter_map(condense_hunk).collect();
        if hunks.is_empty() {
            debug!(?path, "eliding file without textual changes");
            out.elided.push(ElidedFile {
                path,
                reason: ElisionReason::NoTextualChange,
            });
            continue;
        }

        let git_header = file.has_git_header();
        for line in file.header.iter().filter(|l| keep_header_line(l, git_header)) {
            out.push_line(line);
        }
        for hunk in &hunks {
            for line in hunk {
                out.push_line(line);
            }
        }

        out.files += 1;
        out.hunks += hunks.len();
    }

    out
}

fn keep_header_line(line: &DiffLine<'_>, git_header: bool) -> bool {
    let Some(text) = line.text() else {
        return false;
    };
    match line.kind {
        LineKind::FileHeader => true,
        // `diff --git` already names the file.
        LineKind::PathHeader => !git_header,
        LineKind::Meta => !DECORATIVE_META.iter().any(|prefix| text.starts_with(prefix)),
        _ => false,
    }
}

/// Retained lines of a hunk, or `None` if it has no meaningful change.
fn condense_hunk<'a>(hunk: &Hunk<'a>) -> Option<Vec<DiffLine<'a>>> {
    let meaningful = hunk
        .lines
        .iter()
        .any(|l| l.is_change() && l.text().is_some() && !l.is_whitespace_only());
    if !meaningful {
        return None;
    }

    let mut kept = Vec::with_capacity(hunk.lines.len() + 1);
    if let Some(header) = hunk.header.filter(|h| h.text().is_some()) {
        kept.push(header);
    }

    let mut in_whitespace_run = false;
    for line in &hunk.lines {
        // Context, no-newline markers and undecodable lines are skipped without
        // breaking a whitespace run, so the output has no adjacent runs left.
        if !line.is_change() || line.text().is_none() {
            continue;
        }
        if line.is_whitespace_only() {
            if in_whitespace_run {
                continue;
            }
            in_whitespace_run = true;
        } else {
            in_whitespace_run = false;
        }
        kept.push(*line);
    }

    Some(kept)
}
