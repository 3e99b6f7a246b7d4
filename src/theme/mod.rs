//! Presentation styles and the per-call theme override.
//!
//! Styles live in two registries consulted in order: a general one and a
//! statistical one. [`ThemeState::scope`] hands out a guard so an override can
//! never outlive the call that requested it.

mod registry;
mod scope;
mod style;

pub use registry::{BASELINE_STYLE, StyleRegistry};
pub use scope::{ThemeScope, ThemeState};
pub use style::Style;
