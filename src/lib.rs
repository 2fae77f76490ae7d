pub mod account;
pub mod app;
pub mod cli;
pub mod commands;
pub mod configuration;
pub mod context;
pub mod error;
pub mod preferences;
pub mod prompt;
pub mod records;
pub mod render;
pub mod session;
pub mod storage;
pub mod tracing;
pub mod tracker;
pub mod workers;

pub use error::{TrackerError, TrackerResult, ValidationError};
pub use tracker::{SharedStorage, Tracker};
