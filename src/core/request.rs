use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::core::{ChartKind, Dataset};

/// Column names referenced by one chart call, matched positionally to the
/// chart kind's selector slots.
pub type Selectors = SmallVec<[String; 4]>;

/// Per-call display options. Every field falls back to the chart kind's
/// descriptor default when left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub x_label: Option<String>,
    #[serde(default)]
    pub y_label: Option<String>,
    #[serde(default)]
    pub bins: Option<u32>,
    #[serde(default)]
    pub grid_size: Option<u32>,
    #[serde(default)]
    pub lag: Option<usize>,
    #[serde(default)]
    pub geojson: Option<serde_json::Value>,
    #[serde(default)]
    pub feature_id_key: Option<String>,
    #[serde(default)]
    pub theme: Option<String>,
    /// `Some(true)` forces the interactive backend, `Some(false)` the static
    /// one, `None` uses the chart kind's default.
    #[serde(default)]
    pub interactive: Option<bool>,
}

impl ChartOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_x_label(mut self, label: impl Into<String>) -> Self {
        self.x_label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_y_label(mut self, label: impl Into<String>) -> Self {
        self.y_label = Some(label.into());
        self
    }

    /// Sets both axis labels.
    #[must_use]
    pub fn with_labels(self, x_label: impl Into<String>, y_label: impl Into<String>) -> Self {
        self.with_x_label(x_label).with_y_label(y_label)
    }

    /// Histogram bin count.
    #[must_use]
    pub fn with_bins(mut self, bins: u32) -> Self {
        self.bins = Some(bins);
        self
    }

    /// Hexbin grid size.
    #[must_use]
    pub fn with_grid_size(mut self, grid_size: u32) -> Self {
        self.grid_size = Some(grid_size);
        self
    }

    #[must_use]
    pub fn with_lag(mut self, lag: usize) -> Self {
        self.lag = Some(lag);
        self
    }

    #[must_use]
    pub fn with_geojson(mut self, geojson: serde_json::Value) -> Self {
        self.geojson = Some(geojson);
        self
    }

    #[must_use]
    pub fn with_feature_id_key(mut self, key: impl Into<String>) -> Self {
        self.feature_id_key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_theme(mut self, theme: impl Into<String>) -> Self {
        self.theme = Some(theme.into());
        self
    }

    #[must_use]
    pub fn interactive(mut self, interactive: bool) -> Self {
        self.interactive = Some(interactive);
        self
    }
}

/// Everything the dispatcher needs for one call.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartRequest<'a> {
    pub kind: ChartKind,
    pub dataset: &'a Dataset,
    pub selectors: Selectors,
    pub options: ChartOptions,
}

impl<'a> ChartRequest<'a> {
    #[must_use]
    pub fn new<S: Into<String>>(
        kind: ChartKind,
        dataset: &'a Dataset,
        selectors: impl IntoIterator<Item = S>,
        options: ChartOptions,
    ) -> Self {
        Self {
            kind,
            dataset,
            selectors: selectors.into_iter().map(Into::into).collect(),
            options,
        }
    }
}
