//! Data models

pub mod record;
pub mod envelope;

pub use record::*;
pub use envelope::*;
