use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::theme::{BASELINE_STYLE, Style};

/// Public dispatcher bootstrap configuration.
///
/// This type is serializable so host applications can keep their chart setup
/// alongside their own settings without inventing an ad-hoc format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatcherConfig {
    /// Style restored after every chart call.
    #[serde(default = "default_baseline_theme")]
    pub baseline_theme: String,
    /// Additional styles registered in the general registry.
    #[serde(default)]
    pub extra_styles: Vec<Style>,
}

fn default_baseline_theme() -> String {
    BASELINE_STYLE.to_owned()
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            baseline_theme: default_baseline_theme(),
            extra_styles: Vec::new(),
        }
    }
}

impl DispatcherConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the style every call returns to.
    #[must_use]
    pub fn with_baseline_theme(mut self, name: impl Into<String>) -> Self {
        self.baseline_theme = name.into();
        self
    }

    /// Adds a custom style to the general registry.
    #[must_use]
    pub fn with_style(mut self, style: Style) -> Self {
        self.extra_styles.push(style);
        self
    }

    pub fn from_json_str(json: &str) -> ChartResult<Self> {
        serde_json::from_str(json)
            .map_err(|err| ChartError::InvalidConfig(format!("dispatcher config: {err}")))
    }
}
