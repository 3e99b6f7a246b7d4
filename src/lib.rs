//! easy-graph: a charting facade over static and interactive rendering backends.
//!
//! Every chart call takes a [`core::Dataset`] plus column selectors, applies a
//! theme override for the duration of the call, and hands a resolved
//! [`render::Figure`] to the chosen backend. Failures come back as a
//! [`ChartOutcome`] so a sequence of chart calls keeps running.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;
pub mod theme;

pub use api::{ChartDispatcher, ChartOutcome, DispatcherConfig};
pub use error::{ChartError, ChartResult};
