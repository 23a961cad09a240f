//! slimdiff: compact, information-dense diffs for prompting.

pub mod normalize;
pub mod parse;

pub use normalize::{
    ElidedFile, ElisionReason, NormalizedDiff, SOFT_BUDGET_BYTES, normalize, normalize_bytes,
};
pub use parse::{DiffLine, FileDiff, Hunk, LineKind, parse};
