pub mod chart_kind;
pub mod dataset;
pub mod primitives;
pub mod request;

pub use chart_kind::{
    ChartDescriptor, ChartKind, DEFAULT_FEATURE_ID_KEY, DEFAULT_HEXBIN_GRID_SIZE,
    DEFAULT_HISTOGRAM_BINS, DEFAULT_LAG, SelectorSlot, SeriesRole,
};
pub use dataset::{Column, ColumnKind, Dataset, Series};
pub use primitives::{datetime_to_label, datetime_to_unix_seconds, decimal_to_f64};
pub use request::{ChartOptions, ChartRequest, Selectors};
