use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use tracing::{debug, error};

use crate::core::ChartRequest;
use crate::error::{ChartError, ChartResult};
use crate::render::{BackendMode, HtmlRenderer, NullRenderer, RenderBackend, RenderHandle};
use crate::theme::{Style, StyleRegistry, ThemeState};

use super::figure_builder::build_figure;
use super::{ChartOutcome, DispatcherConfig};

/// Routes chart requests to a static or interactive backend under a
/// per-call theme override.
///
/// Every call runs `apply theme -> resolve -> render -> restore theme` and
/// reports failures as a [`ChartOutcome`] instead of propagating them, so a
/// script issuing many chart calls keeps going after one of them fails.
#[derive(Debug)]
pub struct ChartDispatcher<S: RenderBackend, I: RenderBackend> {
    static_backend: S,
    interactive_backend: I,
    theme: ThemeState,
    config: DispatcherConfig,
}

impl ChartDispatcher<NullRenderer, HtmlRenderer> {
    /// Dispatcher with the headless static backend and the HTML interactive backend.
    pub fn headless() -> ChartResult<Self> {
        Self::new(
            NullRenderer::default(),
            HtmlRenderer::default(),
            DispatcherConfig::default(),
        )
    }
}

#[cfg(feature = "svg-backend")]
impl ChartDispatcher<crate::render::SvgRenderer, HtmlRenderer> {
    /// Dispatcher drawing static charts as SVG documents of the default size.
    pub fn svg() -> ChartResult<Self> {
        Self::new(
            crate::render::SvgRenderer::default(),
            HtmlRenderer::default(),
            DispatcherConfig::default(),
        )
    }
}

impl<S: RenderBackend, I: RenderBackend> ChartDispatcher<S, I> {
    pub fn new(
        static_backend: S,
        interactive_backend: I,
        config: DispatcherConfig,
    ) -> ChartResult<Self> {
        if static_backend.mode() != BackendMode::Static {
            return Err(ChartError::InvalidConfig(
                "static backend slot holds an interactive backend".to_owned(),
            ));
        }
        if interactive_backend.mode() != BackendMode::Interactive {
            return Err(ChartError::InvalidConfig(
                "interactive backend slot holds a static backend".to_owned(),
            ));
        }

        let mut general = StyleRegistry::general();
        for style in &config.extra_styles {
            general.register(style.clone())?;
        }
        let theme = ThemeState::new(
            general,
            StyleRegistry::statistical(),
            &config.baseline_theme,
        )?;

        debug!(baseline = %theme.baseline().name, "chart dispatcher ready");
        Ok(Self {
            static_backend,
            interactive_backend,
            theme,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    #[must_use]
    pub fn theme(&self) -> &ThemeState {
        &self.theme
    }

    #[must_use]
    pub fn static_backend(&self) -> &S {
        &self.static_backend
    }

    pub fn static_backend_mut(&mut self) -> &mut S {
        &mut self.static_backend
    }

    #[must_use]
    pub fn interactive_backend(&self) -> &I {
        &self.interactive_backend
    }

    pub fn interactive_backend_mut(&mut self) -> &mut I {
        &mut self.interactive_backend
    }

    /// Renders one chart. Never panics and never returns an error; the
    /// outcome says what happened and the baseline theme is active afterwards.
    pub fn render(&mut self, request: ChartRequest<'_>) -> ChartOutcome {
        let kind = request.kind;
        let descriptor = kind.descriptor();
        let mode = request
            .options
            .interactive
            .map_or(descriptor.default_mode, BackendMode::from_interactive_flag);

        let result = {
            let scope = self.theme.scope(request.options.theme.as_deref());
            let backend: &mut dyn RenderBackend = match mode {
                BackendMode::Static => &mut self.static_backend,
                BackendMode::Interactive => &mut self.interactive_backend,
            };
            dispatch(backend, &request, mode, &scope)
        };

        let outcome = ChartOutcome::from(result);
        match &outcome {
            ChartOutcome::Rendered(handle) => debug!(
                kind = %kind,
                mode = %handle.mode(),
                id = handle.id(),
                "chart rendered"
            ),
            failed => error!(kind = %kind, mode = %mode, "{failed}"),
        }
        outcome
    }
}

fn dispatch(
    backend: &mut dyn RenderBackend,
    request: &ChartRequest<'_>,
    mode: BackendMode,
    style: &Style,
) -> ChartResult<RenderHandle> {
    let kind = request.kind;
    if !kind.descriptor().supports(mode) || !backend.supports(kind) {
        return Err(ChartError::UnsupportedBackend { kind, mode });
    }

    let figure = build_figure(request, style.clone())?;
    debug!(
        kind = %kind,
        mode = %mode,
        theme = %style.name,
        series = figure.series.len(),
        rows = figure.row_count(),
        "dispatching chart"
    );

    panic::catch_unwind(AssertUnwindSafe(|| backend.render(&figure)))
        .unwrap_or_else(|payload| Err(ChartError::Backend(panic_message(&*payload))))
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("backend panicked: {message}")
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("backend panicked: {message}")
    } else {
        "backend panicked".to_owned()
    }
}
