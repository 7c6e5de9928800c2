//! Shape analysis of JSON response bodies

pub mod types;
pub mod infer;
pub mod diff;

pub use types::{Shape, TypeLabel};
pub use infer::{infer, infer_body, infer_with_depth, DEFAULT_MAX_DEPTH};
pub use diff::{diff, DiffKind, FieldDiff};
