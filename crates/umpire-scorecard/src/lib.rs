// Library root: re-exports all modules so integration tests and external
// consumers can access the crate's public API.

pub mod aggregate;
pub mod config;
pub mod export;
pub mod ingest;
pub mod normalize;
pub mod pipeline;
pub mod ranking;
pub mod report;
