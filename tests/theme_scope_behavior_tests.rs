use std::cell::RefCell;
use std::rc::Rc;

use easy_graph::api::{ChartDispatcher, DispatcherConfig};
use easy_graph::core::{ChartKind, ChartOptions, ChartRequest, Column, Dataset};
use easy_graph::render::{BackendMode, Color, Figure, RenderBackend, RenderHandle};
use easy_graph::theme::{BASELINE_STYLE, Style};
use easy_graph::{ChartError, ChartResult};

/// Backend that remembers the style name of every figure it is handed.
#[derive(Debug)]
struct StyleRecorder {
    mode: BackendMode,
    seen: Rc<RefCell<Vec<String>>>,
    fail: bool,
}

impl StyleRecorder {
    fn new(mode: BackendMode, seen: Rc<RefCell<Vec<String>>>) -> Self {
        Self {
            mode,
            seen,
            fail: false,
        }
    }

    fn failing(mut self) -> Self {
        self.fail = true;
        self
    }
}

impl RenderBackend for StyleRecorder {
    fn mode(&self) -> BackendMode {
        self.mode
    }

    fn render(&mut self, figure: &Figure) -> ChartResult<RenderHandle> {
        self.seen.borrow_mut().push(figure.style.name.clone());
        if self.fail {
            return Err(ChartError::Backend("recorder rejected figure".to_owned()));
        }
        Ok(RenderHandle::new(1, self.mode))
    }
}

fn sample() -> Dataset {
    Dataset::new()
        .with_column("Month", Column::categorical(["Jan", "Feb", "Mar"]))
        .and_then(|data| data.with_column("Sales", Column::numeric([100.0, 200.0, 150.0])))
        .expect("valid dataset")
}

#[test]
fn override_is_active_during_render_and_gone_after() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut charts = ChartDispatcher::new(
        StyleRecorder::new(BackendMode::Static, seen.clone()),
        StyleRecorder::new(BackendMode::Interactive, seen.clone()),
        DispatcherConfig::default(),
    )
    .expect("dispatcher init");
    let data = sample();

    let first = charts.bar_chart(
        &data,
        "Month",
        "Sales",
        ChartOptions::default().with_theme("dark_background"),
    );
    let second = charts.line_chart(&data, "Month", "Sales", ChartOptions::default());

    assert!(first.is_rendered());
    assert!(second.is_rendered());
    assert_eq!(*seen.borrow(), ["dark_background", BASELINE_STYLE]);
    assert!(charts.theme().is_baseline());
}

#[test]
fn statistical_registry_names_are_accepted() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut charts = ChartDispatcher::new(
        StyleRecorder::new(BackendMode::Static, seen.clone()),
        StyleRecorder::new(BackendMode::Interactive, seen.clone()),
        DispatcherConfig::default(),
    )
    .expect("dispatcher init");

    let outcome = charts.histogram(
        &sample(),
        "Sales",
        ChartOptions::default().with_theme("darkgrid").interactive(true),
    );

    assert!(outcome.is_rendered());
    assert_eq!(*seen.borrow(), ["darkgrid"]);
}

#[test]
fn unknown_theme_falls_back_to_baseline_without_failing() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut charts = ChartDispatcher::new(
        StyleRecorder::new(BackendMode::Static, seen.clone()),
        StyleRecorder::new(BackendMode::Interactive, seen.clone()),
        DispatcherConfig::default(),
    )
    .expect("dispatcher init");

    let outcome = charts.boxplot(
        &sample(),
        "Sales",
        ChartOptions::default().with_theme("no-such-theme"),
    );

    assert!(outcome.is_rendered());
    assert_eq!(*seen.borrow(), [BASELINE_STYLE]);
}

#[test]
fn theme_is_restored_after_every_kind_and_outcome() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let mut charts = ChartDispatcher::new(
        StyleRecorder::new(BackendMode::Static, seen.clone()).failing(),
        StyleRecorder::new(BackendMode::Interactive, seen.clone()),
        DispatcherConfig::default(),
    )
    .expect("dispatcher init");
    let data = sample();

    for kind in ChartKind::ALL {
        for interactive in [false, true] {
            for selectors in [vec!["Month", "Sales"], vec!["Missing"]] {
                let request = ChartRequest::new(
                    kind,
                    &data,
                    selectors,
                    ChartOptions::default()
                        .with_theme("fivethirtyeight")
                        .interactive(interactive),
                );
                let _ = charts.render(request);
                assert!(
                    charts.theme().is_baseline(),
                    "{kind} (interactive={interactive}) leaked its theme"
                );
            }
        }
    }
}

#[test]
fn custom_styles_and_baseline_come_from_config() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let corporate = Style::new("corporate", Color::hex(0xfafafa), Color::hex(0x102040))
        .with_palette([Color::hex(0x0055aa), Color::hex(0xaa5500)]);
    let config = DispatcherConfig::new()
        .with_style(corporate)
        .with_baseline_theme("whitegrid");
    let mut charts = ChartDispatcher::new(
        StyleRecorder::new(BackendMode::Static, seen.clone()),
        StyleRecorder::new(BackendMode::Interactive, seen.clone()),
        config,
    )
    .expect("dispatcher init");
    let data = sample();

    let _ = charts.area_chart(
        &data,
        "Month",
        "Sales",
        ChartOptions::default().with_theme("corporate"),
    );
    let _ = charts.area_chart(&data, "Month", "Sales", ChartOptions::default());

    assert_eq!(*seen.borrow(), ["corporate", "whitegrid"]);
    assert_eq!(charts.theme().active().name, "whitegrid");
}

#[test]
fn unknown_baseline_is_rejected_at_construction() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let err = ChartDispatcher::new(
        StyleRecorder::new(BackendMode::Static, seen.clone()),
        StyleRecorder::new(BackendMode::Interactive, seen),
        DispatcherConfig::new().with_baseline_theme("solarized"),
    )
    .expect_err("unknown baseline");

    assert!(matches!(err, ChartError::InvalidConfig(_)));
}
