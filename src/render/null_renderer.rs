use tracing::trace;

use crate::core::ChartKind;
use crate::error::ChartResult;
use crate::render::{BackendMode, Figure, RenderBackend, RenderHandle};

/// No-op static backend used by tests and headless scripting.
///
/// It still validates figure content so callers see the same data-shape
/// failures a drawing backend would report.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub render_count: u64,
    pub last_kind: Option<ChartKind>,
    pub last_style_name: Option<String>,
    pub last_series_count: usize,
    pub last_title: Option<String>,
}

impl RenderBackend for NullRenderer {
    fn mode(&self) -> BackendMode {
        BackendMode::Static
    }

    fn render(&mut self, figure: &Figure) -> ChartResult<RenderHandle> {
        figure.validate()?;
        self.render_count += 1;
        self.last_kind = Some(figure.kind);
        self.last_style_name = Some(figure.style.name.clone());
        self.last_series_count = figure.series.len();
        self.last_title = Some(figure.title.clone());
        trace!(kind = %figure.kind, id = self.render_count, "static figure drawn");
        Ok(RenderHandle::new(self.render_count, BackendMode::Static))
    }
}
