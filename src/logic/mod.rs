//! Analysis logic: shape inference/diffing, per-endpoint aggregation,
//! read-side queries and the recent request log.

pub mod shape;
pub mod aggregator;
pub mod query;
pub mod request_log;
