//! Core types and schedule reader for the ophaaldag waste pickup poller.

/// Platform configuration schema for the sensor surface.
pub mod config;
/// Domain models and identifiers shared by all components.
pub mod model;
/// Error taxonomy and the trait describing the waste API backend.
pub mod ports;
/// Cached schedule reader and its query API.
pub mod reader;
/// Sensor adapters producing display states from the schedule snapshot.
pub mod sensor;

pub use config::*;
pub use model::*;
pub use ports::*;
pub use reader::*;
pub use sensor::*;
