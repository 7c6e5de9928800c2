//! HTTP handlers

pub mod health;
pub mod requests;
pub mod diffs;
pub mod stats;
