use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};
use crate::render::Color;

/// Named bundle of default visual styling applied for the duration of one call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Style {
    pub name: String,
    pub background: Color,
    pub foreground: Color,
    /// Gridline color; `None` disables gridlines.
    #[serde(default)]
    pub grid: Option<Color>,
    pub palette: Vec<Color>,
    #[serde(default = "default_font_size_px")]
    pub font_size_px: f64,
}

fn default_font_size_px() -> f64 {
    12.0
}

impl Style {
    #[must_use]
    pub fn new(name: impl Into<String>, background: Color, foreground: Color) -> Self {
        Self {
            name: name.into(),
            background,
            foreground,
            grid: None,
            palette: vec![foreground],
            font_size_px: default_font_size_px(),
        }
    }

    #[must_use]
    pub fn with_grid(mut self, grid: Color) -> Self {
        self.grid = Some(grid);
        self
    }

    #[must_use]
    pub fn with_palette(mut self, palette: impl IntoIterator<Item = Color>) -> Self {
        self.palette = palette.into_iter().collect();
        self
    }

    #[must_use]
    pub fn with_font_size_px(mut self, font_size_px: f64) -> Self {
        self.font_size_px = font_size_px;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.name.trim().is_empty() {
            return Err(ChartError::InvalidConfig(
                "style name must not be empty".to_owned(),
            ));
        }
        if self.palette.is_empty() {
            return Err(ChartError::InvalidConfig(format!(
                "style `{}` must define at least one palette color",
                self.name
            )));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidConfig(format!(
                "style `{}` font size must be finite and > 0",
                self.name
            )));
        }
        self.background.validate()?;
        self.foreground.validate()?;
        if let Some(grid) = self.grid {
            grid.validate()?;
        }
        for color in &self.palette {
            color.validate()?;
        }
        Ok(())
    }
}
