//! Scoring and report building: per-source normalizers, aggregation and
//! the optional narrative. Everything except `narrative` and `handlers` is
//! pure and synchronous.

pub mod handlers;
pub mod narrative;
pub mod prompts;
pub mod report;
pub mod scoring;
pub mod sources;
