//! Core types, configuration, errors, and collaborator traits for the
//! Autopilot campaign-automation engine.

pub mod analysis;
pub mod config;
pub mod error;
pub mod types;

pub use config::AutomationConfig;
pub use error::{AutopilotError, AutopilotResult};
