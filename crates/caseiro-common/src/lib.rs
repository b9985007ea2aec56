//! Shared data model for the Caseiro dashboard and ingestion reactor.

pub mod aws;
pub mod time;
pub mod triggers;
pub mod types;
