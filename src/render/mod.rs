mod figure;
mod html_renderer;
mod null_renderer;
mod primitives;
#[cfg_attr(not(feature = "svg-backend"), allow(dead_code))]
mod stats;
#[cfg(feature = "svg-backend")]
mod svg_renderer;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use figure::{Figure, FigureParams, FigureSeries};
pub use html_renderer::{DEFAULT_PLOTLY_SRC, HtmlRenderer, PlotlyScript};
pub use null_renderer::NullRenderer;
pub use primitives::Color;
#[cfg(feature = "svg-backend")]
pub use svg_renderer::{DEFAULT_SVG_HEIGHT, DEFAULT_SVG_WIDTH, SvgRenderStats, SvgRenderer};

use crate::core::ChartKind;
use crate::error::ChartResult;

/// Which family of rendering engine draws a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// In-process figure; the viewer blocks until dismissed.
    Static,
    /// Self-contained figure viewable independently of the caller.
    Interactive,
}

impl BackendMode {
    #[must_use]
    pub fn from_interactive_flag(interactive: bool) -> Self {
        if interactive {
            Self::Interactive
        } else {
            Self::Static
        }
    }

    /// Suffix appended when a chart kind cannot be drawn by this mode.
    #[must_use]
    pub fn unsupported_hint(self) -> &'static str {
        match self {
            Self::Static => "; interactive mode is required",
            Self::Interactive => "",
        }
    }
}

impl fmt::Display for BackendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Static => f.write_str("static"),
            Self::Interactive => f.write_str("interactive"),
        }
    }
}

/// Opaque token for a displayed chart. Its lifecycle belongs to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RenderHandle {
    id: u64,
    mode: BackendMode,
}

impl RenderHandle {
    #[must_use]
    pub fn new(id: u64, mode: BackendMode) -> Self {
        Self { id, mode }
    }

    #[must_use]
    pub fn id(self) -> u64 {
        self.id
    }

    #[must_use]
    pub fn mode(self) -> BackendMode {
        self.mode
    }
}

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully resolved `Figure` (columns already looked up,
/// options defaulted, active style attached) so drawing code stays isolated
/// from selector resolution and theme handling.
pub trait RenderBackend {
    fn mode(&self) -> BackendMode;

    fn render(&mut self, figure: &Figure) -> ChartResult<RenderHandle>;

    /// Whether this backend can draw `kind` at all.
    fn supports(&self, kind: ChartKind) -> bool {
        kind.descriptor().supports(self.mode())
    }
}

impl<B: RenderBackend + ?Sized> RenderBackend for Box<B> {
    fn mode(&self) -> BackendMode {
        (**self).mode()
    }

    fn render(&mut self, figure: &Figure) -> ChartResult<RenderHandle> {
        (**self).render(figure)
    }

    fn supports(&self, kind: ChartKind) -> bool {
        (**self).supports(kind)
    }
}
