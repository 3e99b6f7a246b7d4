use std::ops::Deref;

use tracing::{debug, warn};

use crate::error::{ChartError, ChartResult};

use super::{Style, StyleRegistry};

/// The single active presentation style plus the registries it is chosen from.
///
/// Exactly one style is active at a time. Outside a [`ThemeScope`] the active
/// style is always the baseline.
#[derive(Debug, Clone)]
pub struct ThemeState {
    general: StyleRegistry,
    statistical: StyleRegistry,
    baseline: Style,
    active: Style,
}

impl ThemeState {
    /// Builds theme state whose baseline is `baseline_name` from either registry.
    pub fn new(
        general: StyleRegistry,
        statistical: StyleRegistry,
        baseline_name: &str,
    ) -> ChartResult<Self> {
        let baseline = general
            .get(baseline_name)
            .or_else(|| statistical.get(baseline_name))
            .cloned()
            .ok_or_else(|| {
                ChartError::InvalidConfig(format!("unknown baseline style `{baseline_name}`"))
            })?;

        Ok(Self {
            general,
            statistical,
            active: baseline.clone(),
            baseline,
        })
    }

    #[must_use]
    pub fn active(&self) -> &Style {
        &self.active
    }

    #[must_use]
    pub fn baseline(&self) -> &Style {
        &self.baseline
    }

    #[must_use]
    pub fn is_baseline(&self) -> bool {
        self.active == self.baseline
    }

    /// Looks a style up in the general registry, then the statistical one.
    #[must_use]
    pub fn resolve(&self, name: &str) -> Option<&Style> {
        self.general
            .get(name)
            .or_else(|| self.statistical.get(name))
    }

    /// Activates `theme`, or the baseline when it is absent or unknown.
    ///
    /// Never fails: an unrecognized name is logged and treated as the baseline.
    pub fn apply(&mut self, theme: Option<&str>) {
        let next = match theme.map(str::trim) {
            None => None,
            Some("") => {
                warn!("empty theme name; using baseline style");
                None
            }
            Some(name) => {
                let resolved = self.resolve(name);
                if resolved.is_none() {
                    warn!(
                        theme = name,
                        baseline = %self.baseline.name,
                        "theme not found in general or statistical registry; using baseline style"
                    );
                }
                resolved.cloned()
            }
        };

        self.active = next.unwrap_or_else(|| self.baseline.clone());
        debug!(theme = %self.active.name, "applied theme");
    }

    /// Unconditionally returns to the baseline style.
    pub fn restore(&mut self) {
        if !self.is_baseline() {
            debug!(theme = %self.active.name, "restoring baseline theme");
            self.active = self.baseline.clone();
        }
    }

    /// Applies `theme` for the lifetime of the returned guard.
    pub fn scope(&mut self, theme: Option<&str>) -> ThemeScope<'_> {
        self.apply(theme);
        ThemeScope { state: self }
    }
}

/// Guard holding a theme override; dropping it restores the baseline.
#[derive(Debug)]
pub struct ThemeScope<'a> {
    state: &'a mut ThemeState,
}

impl Deref for ThemeScope<'_> {
    type Target = Style;

    fn deref(&self) -> &Style {
        self.state.active()
    }
}

impl Drop for ThemeScope<'_> {
    fn drop(&mut self) {
        self.state.restore();
    }
}
