//! Ingestion reactor: storage event in, agent-written alert and SMS out.

pub mod config;
pub mod error;
pub mod event;
pub mod reactor;
pub mod response;

#[cfg(test)]
mod tests;

pub use config::ReactorConfig;
pub use error::ReactorError;
pub use reactor::{ProcessedAlert, Reactor};
pub use response::ReactorResponse;
