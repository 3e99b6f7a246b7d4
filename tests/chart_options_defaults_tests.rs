use std::cell::RefCell;
use std::rc::Rc;

use easy_graph::ChartResult;
use easy_graph::api::{ChartDispatcher, DispatcherConfig};
use easy_graph::core::{
    ChartOptions, Column, DEFAULT_HEXBIN_GRID_SIZE, DEFAULT_HISTOGRAM_BINS, Dataset, Series,
    SeriesRole,
};
use easy_graph::render::{BackendMode, Figure, RenderBackend, RenderHandle};

#[derive(Debug)]
struct RecordingBackend {
    mode: BackendMode,
    figures: Rc<RefCell<Vec<Figure>>>,
}

impl RenderBackend for RecordingBackend {
    fn mode(&self) -> BackendMode {
        self.mode
    }

    fn render(&mut self, figure: &Figure) -> ChartResult<RenderHandle> {
        figure.validate()?;
        let mut figures = self.figures.borrow_mut();
        figures.push(figure.clone());
        Ok(RenderHandle::new(figures.len() as u64, self.mode))
    }
}

fn recording_dispatcher() -> (
    ChartDispatcher<RecordingBackend, RecordingBackend>,
    Rc<RefCell<Vec<Figure>>>,
) {
    let figures = Rc::new(RefCell::new(Vec::new()));
    let charts = ChartDispatcher::new(
        RecordingBackend {
            mode: BackendMode::Static,
            figures: figures.clone(),
        },
        RecordingBackend {
            mode: BackendMode::Interactive,
            figures: figures.clone(),
        },
        DispatcherConfig::default(),
    )
    .expect("dispatcher init");
    (charts, figures)
}

fn measurements() -> Dataset {
    Dataset::new()
        .with_column("Height", Column::numeric([1.0, 2.0, 2.5, 3.0, 4.5]))
        .and_then(|data| data.with_column("Weight", Column::numeric([3.0, 4.0, 4.5, 6.0, 8.0])))
        .expect("valid dataset")
}

#[test]
fn histogram_defaults_to_ten_bins() {
    let (mut charts, figures) = recording_dispatcher();
    let data = measurements();

    assert!(charts.histogram(&data, "Height", ChartOptions::default()).is_rendered());
    assert!(
        charts
            .histogram(&data, "Height", ChartOptions::default().with_bins(4))
            .is_rendered()
    );

    let figures = figures.borrow();
    assert_eq!(DEFAULT_HISTOGRAM_BINS, 10);
    assert_eq!(figures[0].params.bins, Some(10));
    assert_eq!(figures[1].params.bins, Some(4));
}

#[test]
fn hexbin_defaults_to_grid_size_fifty() {
    let (mut charts, figures) = recording_dispatcher();
    let data = measurements();

    assert!(
        charts
            .hexbin_plot(&data, "Height", "Weight", ChartOptions::default())
            .is_rendered()
    );

    assert_eq!(DEFAULT_HEXBIN_GRID_SIZE, 50);
    assert_eq!(figures.borrow()[0].params.grid_size, Some(50));
}

#[test]
fn titles_and_axis_labels_fall_back_to_kind_defaults() {
    let (mut charts, figures) = recording_dispatcher();
    let data = measurements();

    let _ = charts.scatter_plot(&data, "Height", "Weight", None, ChartOptions::default());
    let _ = charts.scatter_plot(
        &data,
        "Height",
        "Weight",
        None,
        ChartOptions::default()
            .with_title("Height vs Weight")
            .with_x_label("cm"),
    );

    let figures = figures.borrow();
    assert_eq!(figures[0].title, "Scatter Plot");
    assert_eq!(figures[0].x_label.as_deref(), Some("X-axis"));
    assert_eq!(figures[0].y_label.as_deref(), Some("Y-axis"));
    assert_eq!(figures[1].title, "Height vs Weight");
    assert_eq!(figures[1].x_label.as_deref(), Some("cm"));
    assert_eq!(figures[1].y_label.as_deref(), Some("Y-axis"));
}

#[test]
fn lag_plot_defaults_to_lag_one_and_uses_series_name() {
    let (mut charts, figures) = recording_dispatcher();
    let series = Series::new("Close", Column::numeric([1.0, 3.0, 2.0, 5.0]));

    assert!(charts.lag_plot(&series, ChartOptions::default()).is_rendered());
    assert!(
        charts
            .autocorrelation_plot(&series, ChartOptions::default())
            .is_rendered()
    );

    let figures = figures.borrow();
    assert_eq!(figures[0].params.lag, Some(1));
    assert_eq!(
        figures[0].series(SeriesRole::Value).map(|s| s.name.as_str()),
        Some("Close")
    );
    assert_eq!(figures[1].params.lag, None);
}

#[test]
fn stacked_bar_keeps_every_value_column_in_order() {
    let (mut charts, figures) = recording_dispatcher();
    let data = Dataset::new()
        .with_column("Month", Column::categorical(["Jan", "Feb"]))
        .and_then(|data| data.with_column("Sales", Column::numeric([100.0, 200.0])))
        .and_then(|data| data.with_column("Expense", Column::numeric([90.0, 170.0])))
        .expect("valid dataset");

    let _ = charts.stacked_bar_chart(
        &data,
        "Month",
        &["Expense", "Sales"],
        ChartOptions::default(),
    );

    let figures = figures.borrow();
    let stacked: Vec<_> = figures[0]
        .series_with_role(SeriesRole::Y)
        .map(|series| series.name.as_str())
        .collect();
    assert_eq!(stacked, ["Expense", "Sales"]);
}
