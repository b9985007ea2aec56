pub mod alerts;
pub mod triggers;
