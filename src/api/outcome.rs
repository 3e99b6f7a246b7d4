use std::fmt;

use crate::core::ChartKind;
use crate::error::{ChartError, ChartResult};
use crate::render::{BackendMode, RenderHandle};

/// Result of one chart call. Failures are values, never panics or errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartOutcome {
    Rendered(RenderHandle),
    /// A selector named a column the dataset does not have.
    SelectorNotFound { column: String },
    /// The backend rejected the data or failed while drawing.
    BackendFailure { detail: String },
    /// The requested backend cannot draw this chart kind.
    UnsupportedBackend { kind: ChartKind, mode: BackendMode },
}

impl ChartOutcome {
    #[must_use]
    pub fn is_rendered(&self) -> bool {
        matches!(self, Self::Rendered(_))
    }

    #[must_use]
    pub fn handle(&self) -> Option<RenderHandle> {
        match self {
            Self::Rendered(handle) => Some(*handle),
            _ => None,
        }
    }
}

impl From<ChartError> for ChartOutcome {
    fn from(err: ChartError) -> Self {
        match err {
            ChartError::SelectorNotFound { column } => Self::SelectorNotFound { column },
            ChartError::UnsupportedBackend { kind, mode } => {
                Self::UnsupportedBackend { kind, mode }
            }
            other @ (ChartError::InvalidData(_)
            | ChartError::InvalidConfig(_)
            | ChartError::Backend(_)) => Self::BackendFailure {
                detail: other.to_string(),
            },
        }
    }
}

impl From<ChartResult<RenderHandle>> for ChartOutcome {
    fn from(result: ChartResult<RenderHandle>) -> Self {
        result.map_or_else(Self::from, Self::Rendered)
    }
}

impl fmt::Display for ChartOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rendered(handle) => write!(
                f,
                "rendered with the {} backend (handle {})",
                handle.mode(),
                handle.id()
            ),
            Self::SelectorNotFound { column } => {
                write!(f, "column `{column}` not found in dataset")
            }
            Self::BackendFailure { detail } => write!(f, "chart could not be drawn: {detail}"),
            Self::UnsupportedBackend { kind, mode } => write!(
                f,
                "{kind} charts are not supported by the {mode} backend{}",
                mode.unsupported_hint()
            ),
        }
    }
}
