use thiserror::Error;

use crate::core::ChartKind;
use crate::render::BackendMode;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("column `{column}` not found in dataset")]
    SelectorNotFound { column: String },

    #[error("{kind} charts are not supported by the {mode} backend{}", .mode.unsupported_hint())]
    UnsupportedBackend { kind: ChartKind, mode: BackendMode },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("backend failure: {0}")]
    Backend(String),
}
