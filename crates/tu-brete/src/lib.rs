//! Job board for San Mateo: public listing search with client-side filters,
//! employer listing management and application review.

pub mod board;
pub mod config;
pub mod error;
pub mod telemetry;
