//! Line-level parsing of unified diff output into files and hunks.
//!
//! Parsing works on bytes so that non-UTF-8 content can be classified and
//! dropped later without lossy conversion growing the text.

/// Classification of a single diff line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    /// `diff --git a/x b/x` (or any `diff ` line) opening a file section.
    FileHeader,
    /// `--- a/x` / `+++ b/x`.
    PathHeader,
    /// index, mode, rename, similarity and binary notices.
    Meta,
    /// `@@ -a,b +c,d @@`.
    HunkHeader,
    Added,
    Removed,
    Context,
    /// `\ No newline at end of file`.
    NoNewline,
}

/// One line of diff output, including its trailing newline if present.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiffLine<'a> {
    pub kind: LineKind,
    pub raw: &'a [u8],
}

impl<'a> DiffLine<'a> {
    fn new(kind: LineKind, raw: &'a [u8]) -> Self {
        Self { kind, raw }
    }

    /// The line as text, or `None` if it is not valid UTF-8.
    pub fn text(&self) -> Option<&'a str> {
        std::str::from_utf8(self.raw).ok()
    }

    pub fn is_change(&self) -> bool {
        matches!(self.kind, LineKind::Added | LineKind::Removed)
    }

    /// A change line whose content (after the `+`/`-` marker) is only whitespace.
    pub fn is_whitespace_only(&self) -> bool {
        if !self.is_change() {
            return false;
        }
        match std::str::from_utf8(&self.raw[1..]) {
            Ok(body) => body.chars().all(char::is_whitespace),
            Err(_) => false,
        }
    }
}

/// A hunk: optional `@@` header plus its lines.
///
/// Change lines that appear without a preceding `@@` header (hand-written or
/// truncated diffs) form a header-less hunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Hunk<'a> {
    pub header: Option<DiffLine<'a>>,
    pub lines: Vec<DiffLine<'a>>,
}

impl Hunk<'_> {
    fn is_empty(&self) -> bool {
        self.header.is_none() && self.lines.is_empty()
    }
}

/// The header lines and hunks of one file section.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileDiff<'a> {
    pub header: Vec<DiffLine<'a>>,
    pub hunks: Vec<Hunk<'a>>,
}

impl FileDiff<'_> {
    fn is_empty(&self) -> bool {
        self.header.is_empty() && self.hunks.is_empty()
    }

    pub fn has_git_header(&self) -> bool {
        self.header.iter().any(|l| l.kind == LineKind::FileHeader)
    }

    /// Git reports binary content without a textual body.
    pub fn is_binary(&self) -> bool {
        self.header.iter().any(|l| {
            l.kind == LineKind::Meta
                && (l.raw.starts_with(b"Binary files ") || l.raw.starts_with(b"GIT binary patch"))
        })
    }

    /// Repository-relative path of the file, preferring the post-image name.
    pub fn path(&self) -> Option<String> {
        if let Some(path) = self
            .header
            .iter()
            .find(|l| l.kind == LineKind::FileHeader)
            .and_then(|l| l.text())
            .and_then(path_from_git_header)
        {
            return Some(path);
        }

        let mut old = None;
        for line in self.header.iter().filter(|l| l.kind == LineKind::PathHeader) {
            let Some(text) = line.text() else { continue };
            if let Some(rest) = text.strip_prefix("+++ ") {
                if let Some(path) = path_from_marker(rest, "b/") {
                    return Some(path);
                }
            } else if let Some(rest) = text.strip_prefix("--- ") {
                old = path_from_marker(rest, "a/");
            }
        }
        old
    }
}

fn path_from_git_header(line: &str) -> Option<String> {
    let rest = line.trim_end().strip_prefix("diff --git ")?;
    let idx = rest.rfind(" b/").or_else(|| rest.rfind(" \"b/"))?;
    let target = rest[idx + 1..].trim_matches('"');
    target.strip_prefix("b/").map(str::to_string)
}

fn path_from_marker(rest: &str, prefix: &str) -> Option<String> {
    let name = rest.split('\t').next().unwrap_or(rest).trim_end().trim_matches('"');
    if name == "/dev/null" {
        return None;
    }
    Some(name.strip_prefix(prefix).unwrap_or(name).to_string())
}

/// Remaining old/new line counts declared by a hunk header.
#[derive(Debug, Clone, Copy)]
struct HunkBudget {
    old: usize,
    new: usize,
}

impl HunkBudget {
    fn parse(header: &[u8]) -> Option<Self> {
        let text = std::str::from_utf8(header).ok()?;
        let ranges = text.strip_prefix("@@ ")?;
        let ranges = &ranges[..ranges.find(" @@")?];
        let mut parts = ranges.split(' ');
        let old = range_len(parts.next()?.strip_prefix('-')?)?;
        let new = range_len(parts.next()?.strip_prefix('+')?)?;
        Some(Self { old, new })
    }

    fn consume(&mut self, kind: LineKind) {
        match kind {
            LineKind::Removed => self.old = self.old.saturating_sub(1),
            LineKind::Added => self.new = self.new.saturating_sub(1),
            LineKind::Context => {
                self.old = self.old.saturating_sub(1);
                self.new = self.new.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn exhausted(&self) -> bool {
        self.old == 0 && self.new == 0
    }
}

fn range_len(range: &str) -> Option<usize> {
    match range.split_once(',') {
        Some((_, len)) => len.parse().ok(),
        None => Some(1),
    }
}

fn content_kind(first: u8) -> Option<LineKind> {
    match first {
        b'+' => Some(LineKind::Added),
        b'-' => Some(LineKind::Removed),
        b' ' => Some(LineKind::Context),
        b'\\' => Some(LineKind::NoNewline),
        _ => None,
    }
}

/// Incremental builder that keeps file and hunk order exactly as read.
#[derive(Default)]
struct Parser<'a> {
    files: Vec<FileDiff<'a>>,
    file: FileDiff<'a>,
    hunk: Hunk<'a>,
    in_hunk: bool,
    budget: Option<HunkBudget>,
}

impl<'a> Parser<'a> {
    fn close_hunk(&mut self) {
        let hunk = std::mem::take(&mut self.hunk);
        if !hunk.is_empty() {
            self.file.hunks.push(hunk);
        }
        self.in_hunk = false;
        self.budget = None;
    }

    fn close_file(&mut self) {
        self.close_hunk();
        let file = std::mem::take(&mut self.file);
        if !file.is_empty() {
            self.files.push(file);
        }
    }

    fn open_file(&mut self, header: DiffLine<'a>) {
        self.close_file();
        self.file.header.push(header);
    }

    fn push_header(&mut self, line: DiffLine<'a>) {
        // Header text after hunks starts a new section so output order is kept.
        if !self.file.hunks.is_empty() || !self.hunk.is_empty() {
            self.close_file();
        }
        self.file.header.push(line);
    }

    fn push_content(&mut self, line: DiffLine<'a>) {
        if let Some(budget) = self.budget.as_mut() {
            budget.consume(line.kind);
        }
        self.hunk.lines.push(line);
    }

    fn budget_exhausted(&self) -> bool {
        self.budget.is_none_or(|b| b.exhausted())
    }
}

/// First line that survives normalization (context and no-newline markers
/// are dropped there, so file boundaries must not depend on them).
fn first_kept<'a>(lines: &[&'a [u8]]) -> Option<&'a [u8]> {
    lines
        .iter()
        .copied()
        .find(|l| !matches!(l.first(), Some(b' ' | b'\\')))
}

/// Split raw diff bytes into file sections.
pub fn parse(input: &[u8]) -> Vec<FileDiff<'_>> {
    let lines: Vec<&[u8]> = input.split_inclusive(|b| *b == b'\n').collect();
    let mut parser = Parser::default();
    let mut i = 0;

    while i < lines.len() {
        let raw = lines[i];
        let next = lines.get(i + 1).copied();
        let after_pair = lines.get(i + 2..).and_then(first_kept);
        i += 1;

        if raw.starts_with(b"diff ") {
            parser.open_file(DiffLine::new(LineKind::FileHeader, raw));
            continue;
        }

        if raw.starts_with(b"@@") {
            parser.close_hunk();
            parser.hunk.header = Some(DiffLine::new(LineKind::HunkHeader, raw));
            parser.in_hunk = true;
            parser.budget = HunkBudget::parse(raw);
            continue;
        }

        // A plain (non-git) unified diff starts each file with `---`/`+++`.
        let starts_plain_file = !parser.file.has_git_header()
            && raw.starts_with(b"--- ")
            && next.is_some_and(|n| n.starts_with(b"+++ "));

        if starts_plain_file {
            let breaks_hunk = !parser.in_hunk
                || parser.budget_exhausted()
                || after_pair.is_some_and(|n| n.starts_with(b"@@"));
            if breaks_hunk {
                parser.close_file();
                parser.file.header.push(DiffLine::new(LineKind::PathHeader, raw));
                if let Some(next) = next {
                    parser.file.header.push(DiffLine::new(LineKind::PathHeader, next));
                }
                i += 1;
                continue;
            }
        }

        if parser.in_hunk {
            if let Some(kind) = raw.first().copied().and_then(content_kind) {
                parser.push_content(DiffLine::new(kind, raw));
                continue;
            }
            parser.in_hunk = false;
        }

        let git_path_header = parser.file.has_git_header()
            && parser.file.hunks.is_empty()
            && parser.hunk.is_empty()
            && (raw.starts_with(b"--- ") || raw.starts_with(b"+++ "));
        if git_path_header {
            parser.file.header.push(DiffLine::new(LineKind::PathHeader, raw));
            continue;
        }

        match raw.first().copied().and_then(content_kind) {
            Some(LineKind::NoNewline) if parser.hunk.is_empty() => {
                parser.push_header(DiffLine::new(LineKind::Meta, raw));
            }
            Some(kind) => parser.push_content(DiffLine::new(kind, raw)),
            None => parser.push_header(DiffLine::new(LineKind::Meta, raw)),
        }
    }

    parser.close_file();
    parser.files
}

#[cfg(test)]
mod tests {
    use super::*;

    const GIT_DIFF: &str = "\
diff --git a/src/main.rs b/src/main.rs
index 3b18e51..a8c1f2d 100644
--- a/src/main.rs
+++ b/src/main.rs
@@ -3 +3 @@ fn main() {
-    println!(\"hi\");
+    println!(\"hello\");
@@ -10,0 +11,2 @@ fn helper() {
+    let x = 1;
+    let y = 2;
diff --git a/README.md b/README.md
new file mode 100644
index 0000000..e69de29
--- /dev/null
+++ b/README.md
@@ -0,0 +1 @@
+# Title
";

    fn kinds(file: &FileDiff<'_>) -> Vec<LineKind> {
        file.hunks
            .iter()
            .flat_map(|h| h.lines.iter().map(|l| l.kind))
            .collect()
    }

    #[test]
    fn test_parse_git_diff_files_and_hunks() {
        let files = parse(GIT_DIFF.as_bytes());
        assert_eq!(files.len(), 2);

        assert_eq!(files[0].path().as_deref(), Some("src/main.rs"));
        assert_eq!(files[0].hunks.len(), 2);
        assert_eq!(
            kinds(&files[0]),
            vec![LineKind::Removed, LineKind::Added, LineKind::Added, LineKind::Added]
        );

        assert_eq!(files[1].path().as_deref(), Some("README.md"));
        assert_eq!(files[1].hunks.len(), 1);
        let header_kinds: Vec<LineKind> = files[1].header.iter().map(|l| l.kind).collect();
        assert_eq!(
            header_kinds,
            vec![
                LineKind::FileHeader,
                LineKind::Meta,
                LineKind::Meta,
                LineKind::PathHeader,
                LineKind::PathHeader
            ]
        );
    }

    #[test]
    fn test_parse_keeps_triple_dash_content_inside_git_hunk() {
        let diff = "\
diff --git a/q.sql b/q.sql
@@ -1 +1 @@
--- old comment
+++ new comment
";
        let files = parse(diff.as_bytes());
        assert_eq!(files.len(), 1);
        assert_eq!(kinds(&files[0]), vec![LineKind::Removed, LineKind::Added]);
    }

    #[test]
    fn test_parse_headerless_change_lines() {
        let files = parse(b"+foo\n-bar\n");
        assert_eq!(files.len(), 1);
        assert!(files[0].header.is_empty());
        assert_eq!(files[0].hunks.len(), 1);
        assert!(files[0].hunks[0].header.is_none());
        assert_eq!(kinds(&files[0]), vec![LineKind::Added, LineKind::Removed]);
        assert_eq!(files[0].path(), None);
    }

    #[test]
    fn test_parse_plain_unified_diff_uses_hunk_counts() {
        let diff = "\
--- a/one.txt
+++ b/one.txt
@@ -1,2 +1,2 @@
--- dashes
+++ pluses
--- a/two.txt
+++ b/two.txt
@@ -1 +1 @@
-x
+y
";
        let files = parse(diff.as_bytes());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path().as_deref(), Some("one.txt"));
        assert_eq!(kinds(&files[0]), vec![LineKind::Removed, LineKind::Added]);
        assert_eq!(files[1].path().as_deref(), Some("two.txt"));
    }

    #[test]
    fn test_parse_pair_before_hunk_header_starts_file_past_markers() {
        let diff = "\
--- a/q.sql
+++ b/q.sql
@@ -1,2 +1,2 @@
 context
--- old comment
+++ new total
\\ No newline at end of file
@@ -9 +9 @@
-x
+y
";
        let files = parse(diff.as_bytes());
        assert_eq!(files.len(), 2);
        assert_eq!(files[0].path().as_deref(), Some("q.sql"));
        assert_eq!(kinds(&files[0]), vec![LineKind::Context]);
        assert_eq!(files[1].path().as_deref(), Some("new total"));
        assert_eq!(kinds(&files[1]), vec![LineKind::Removed, LineKind::Added]);
    }

    #[test]
    fn test_parse_detects_binary_file() {
        let diff = "\
diff --git a/logo.png b/logo.png
index 1111111..2222222 100644
Binary files a/logo.png and b/logo.png differ
";
        let files = parse(diff.as_bytes());
        assert_eq!(files.len(), 1);
        assert!(files[0].is_binary());
        assert!(files[0].hunks.is_empty());
    }

    #[test]
    fn test_parse_no_newline_marker_stays_in_hunk() {
        let diff = "\
diff --git a/a.txt b/a.txt
@@ -1 +1 @@
-old
\\ No newline at end of file
+new
\\ No newline at end of file
";
        let files = parse(diff.as_bytes());
        assert_eq!(
            kinds(&files[0]),
            vec![
                LineKind::Removed,
                LineKind::NoNewline,
                LineKind::Added,
                LineKind::NoNewline
            ]
        );
    }

    #[test]
    fn test_whitespace_only_detection() {
        let files = parse(b"+   \n-\t\n+x \n+\n");
        let lines = &files[0].hunks[0].lines;
        assert!(lines[0].is_whitespace_only());
        assert!(lines[1].is_whitespace_only());
        assert!(!lines[2].is_whitespace_only());
        assert!(lines[3].is_whitespace_only());
    }

    #[test]
    fn test_parse_last_line_without_newline() {
        let files = parse(b"+foo\n+bar");
        let lines = &files[0].hunks[0].lines;
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1].raw, b"+bar");
    }
}
