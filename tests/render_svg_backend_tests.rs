#![cfg(feature = "svg-backend")]

use easy_graph::api::{ChartDispatcher, ChartOutcome};
use easy_graph::core::{ChartKind, ChartOptions, Column, Dataset, Series, SeriesRole};
use easy_graph::render::{
    BackendMode, Figure, FigureSeries, HtmlRenderer, RenderBackend, SvgRenderer,
};
use easy_graph::theme::{BASELINE_STYLE, StyleRegistry};
use easy_graph::ChartError;

fn monthly() -> Dataset {
    Dataset::new()
        .with_column("Month", Column::categorical(["Jan", "Feb", "Mar", "Apr", "May", "Jun"]))
        .and_then(|data| {
            data.with_column("Sales", Column::numeric([100.0, 200.0, 150.0, 250.0, 90.0, 400.0]))
        })
        .and_then(|data| {
            data.with_column("Expense", Column::numeric([90.0, 170.0, 130.0, 210.0, 95.0, 260.0]))
        })
        .and_then(|data| {
            data.with_column(
                "Region",
                Column::categorical(["North", "South", "North", "South", "North", "South"]),
            )
        })
        .expect("valid dataset")
}

fn svg_charts() -> ChartDispatcher<SvgRenderer, HtmlRenderer> {
    ChartDispatcher::svg().expect("dispatcher init")
}

fn last_document(charts: &ChartDispatcher<SvgRenderer, HtmlRenderer>) -> &str {
    charts.static_backend().last_document().expect("svg written")
}

#[test]
fn renderer_rejects_zero_size() {
    let err = SvgRenderer::new(640, 0).expect_err("zero height");
    assert!(matches!(err, ChartError::InvalidData(_)));
    assert_eq!(SvgRenderer::default().size(), (800, 600));
}

#[test]
fn bar_chart_becomes_an_svg_document() {
    let mut charts = svg_charts();

    let outcome = charts.bar_chart(&monthly(), "Month", "Sales", ChartOptions::default());

    let handle = outcome.handle().expect("bar chart rendered");
    assert_eq!(handle.mode(), BackendMode::Static);
    let document = last_document(&charts);
    assert!(document.contains("<svg"));
    assert!(document.contains("<rect"));
    assert!(document.contains("Bar Chart"));
    assert!(document.contains("Mar"));
    let stats = charts.static_backend().last_stats();
    assert_eq!(stats.marks_drawn, 6);
    assert_eq!(stats.bytes, document.len());
    assert_eq!(charts.static_backend().render_count(), 1);
}

#[test]
fn every_static_kind_draws_marks() {
    let data = monthly();
    let signal = Series::new("Signal", Column::numeric([1.0, -1.0, 2.0, -2.0, 1.5, -0.5]));
    let mut charts = svg_charts();

    let outcomes = [
        charts.bar_chart(&data, "Month", "Sales", ChartOptions::default()),
        charts.line_chart(&data, "Month", "Sales", ChartOptions::default()),
        charts.scatter_plot(&data, "Sales", "Expense", Some("Region"), ChartOptions::default()),
        charts.histogram(&data, "Sales", ChartOptions::default().with_bins(4)),
        charts.boxplot(&data, "Sales", ChartOptions::default()),
        charts.pie_chart(&data, "Sales", "Month", ChartOptions::default()),
        charts.stacked_bar_chart(&data, "Month", &["Sales", "Expense"], ChartOptions::default()),
        charts.area_chart(&data, "Month", "Sales", ChartOptions::default()),
        charts.hexbin_plot(&data, "Sales", "Expense", ChartOptions::default().with_grid_size(5)),
        charts.violin_plot(&data, "Sales", ChartOptions::default()),
        charts.correlation_matrix(&data, &[], ChartOptions::default()),
        charts.pair_plot(&data, &[], ChartOptions::default()),
        charts.autocorrelation_plot(&signal, ChartOptions::default()),
        charts.lag_plot(&signal, ChartOptions::default()),
    ];

    for outcome in &outcomes {
        assert!(outcome.is_rendered(), "unexpected outcome: {outcome}");
    }
    assert_eq!(charts.static_backend().render_count(), outcomes.len() as u64);
    assert_eq!(charts.interactive_backend().render_count(), 0);
    assert!(charts.theme().is_baseline());
}

#[test]
fn stacked_bars_and_pie_count_their_marks() {
    let data = monthly();
    let mut charts = svg_charts();

    let _ = charts.stacked_bar_chart(
        &data,
        "Month",
        &["Sales", "Expense"],
        ChartOptions::default(),
    );
    assert_eq!(charts.static_backend().last_stats().marks_drawn, 12);
    assert!(last_document(&charts).contains("Expense"));

    let _ = charts.pie_chart(&data, "Sales", "Month", ChartOptions::default());
    assert_eq!(charts.static_backend().last_stats().marks_drawn, 6);
    assert!(last_document(&charts).contains('%'));
}

#[test]
fn active_theme_background_fills_the_canvas() {
    let mut charts = svg_charts();

    let _ = charts.line_chart(
        &monthly(),
        "Month",
        "Sales",
        ChartOptions::default().with_theme("ggplot"),
    );

    let document = last_document(&charts).to_ascii_uppercase();
    assert!(document.contains("#E5E5E5"));
    assert!(charts.theme().is_baseline());
}

#[test]
fn renderer_refuses_interactive_only_kinds() {
    let style = StyleRegistry::general()
        .get(BASELINE_STYLE)
        .cloned()
        .expect("baseline style");
    let price = |name: &str, role, value: f64| {
        FigureSeries::new(name, role, Column::numeric([value])).numeric()
    };
    let figure = Figure::new(ChartKind::Candlestick, "Candles", style)
        .with_series(FigureSeries::new("t", SeriesRole::Time, Column::numeric([1.0])))
        .with_series(price("o", SeriesRole::Open, 10.0))
        .with_series(price("h", SeriesRole::High, 12.0))
        .with_series(price("l", SeriesRole::Low, 9.0))
        .with_series(price("c", SeriesRole::Close, 11.0));
    let mut renderer = SvgRenderer::default();

    let err = renderer.render(&figure).expect_err("candlestick is interactive only");

    assert_eq!(
        ChartOutcome::from(err),
        ChartOutcome::UnsupportedBackend {
            kind: ChartKind::Candlestick,
            mode: BackendMode::Static,
        }
    );
    assert!(!renderer.supports(ChartKind::Candlestick));
    assert_eq!(renderer.render_count(), 0);
    assert!(renderer.last_document().is_none());
}

#[test]
fn take_document_hands_over_the_svg() {
    let mut charts = svg_charts();

    let _ = charts.histogram(&monthly(), "Sales", ChartOptions::default());

    let document = charts.static_backend_mut().take_document();
    assert!(document.is_some_and(|svg| svg.contains("</svg>")));
    assert!(charts.static_backend().last_document().is_none());
}
