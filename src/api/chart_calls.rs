use crate::core::{ChartKind, ChartOptions, ChartRequest, Dataset, Series};
use crate::render::RenderBackend;

use super::{ChartDispatcher, ChartOutcome};

/// One entry point per chart kind. Each is a thin wrapper over
/// [`ChartDispatcher::render`] and shares its guarantees.
impl<S: RenderBackend, I: RenderBackend> ChartDispatcher<S, I> {
    fn chart<'n>(
        &mut self,
        kind: ChartKind,
        data: &Dataset,
        selectors: impl IntoIterator<Item = &'n str>,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.render(ChartRequest::new(kind, data, selectors, options))
    }

    pub fn bar_chart(
        &mut self,
        data: &Dataset,
        x: &str,
        y: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Bar, data, [x, y], options)
    }

    pub fn line_chart(
        &mut self,
        data: &Dataset,
        x: &str,
        y: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Line, data, [x, y], options)
    }

    /// Scatter plot, optionally split into groups by a `hue` column.
    pub fn scatter_plot(
        &mut self,
        data: &Dataset,
        x: &str,
        y: &str,
        hue: Option<&str>,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Scatter, data, [x, y].into_iter().chain(hue), options)
    }

    /// Histogram of one numeric column; 10 bins unless `options.bins` is set.
    pub fn histogram(
        &mut self,
        data: &Dataset,
        column: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Histogram, data, [column], options)
    }

    pub fn boxplot(&mut self, data: &Dataset, column: &str, options: ChartOptions) -> ChartOutcome {
        self.chart(ChartKind::Boxplot, data, [column], options)
    }

    pub fn pie_chart(
        &mut self,
        data: &Dataset,
        values: &str,
        labels: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Pie, data, [values, labels], options)
    }

    /// Bars for each `y` column stacked on the shared `x` categories.
    pub fn stacked_bar_chart(
        &mut self,
        data: &Dataset,
        x: &str,
        y: &[&str],
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(
            ChartKind::StackedBar,
            data,
            std::iter::once(x).chain(y.iter().copied()),
            options,
        )
    }

    pub fn area_chart(
        &mut self,
        data: &Dataset,
        x: &str,
        y: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Area, data, [x, y], options)
    }

    /// Hexagonal binning density plot; grid size 50 unless `options.grid_size` is set.
    pub fn hexbin_plot(
        &mut self,
        data: &Dataset,
        x: &str,
        y: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Hexbin, data, [x, y], options)
    }

    pub fn violin_plot(
        &mut self,
        data: &Dataset,
        column: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Violin, data, [column], options)
    }

    /// Pairwise correlation heatmap. An empty `columns` slice uses every
    /// numeric column.
    pub fn correlation_matrix(
        &mut self,
        data: &Dataset,
        columns: &[&str],
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::CorrelationMatrix, data, columns.iter().copied(), options)
    }

    /// Scatter matrix. An empty `columns` slice uses every numeric column.
    pub fn pair_plot(
        &mut self,
        data: &Dataset,
        columns: &[&str],
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::PairPlot, data, columns.iter().copied(), options)
    }

    /// OHLC candlesticks. Interactive only.
    #[allow(clippy::too_many_arguments)]
    pub fn candlestick_chart(
        &mut self,
        data: &Dataset,
        time: &str,
        open: &str,
        high: &str,
        low: &str,
        close: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Candlestick, data, [time, open, high, low, close], options)
    }

    pub fn autocorrelation_plot(&mut self, series: &Series, options: ChartOptions) -> ChartOutcome {
        let data = series.clone().into_dataset();
        self.chart(ChartKind::Autocorrelation, &data, [series.name.as_str()], options)
    }

    /// Scatter of `y(t)` against `y(t + lag)`; lag 1 unless `options.lag` is set.
    pub fn lag_plot(&mut self, series: &Series, options: ChartOptions) -> ChartOutcome {
        let data = series.clone().into_dataset();
        self.chart(ChartKind::Lag, &data, [series.name.as_str()], options)
    }

    /// Regions from `options.geojson` colored by `color`. Interactive only.
    pub fn choropleth_map(
        &mut self,
        data: &Dataset,
        locations: &str,
        color: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::Choropleth, data, [locations, color], options)
    }

    /// Points on a map, optionally labelled by a `text` column. Interactive only.
    pub fn scatter_geo(
        &mut self,
        data: &Dataset,
        lat: &str,
        lon: &str,
        text: Option<&str>,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::ScatterGeo, data, [lat, lon].into_iter().chain(text), options)
    }

    /// Path through the given coordinates. Interactive only.
    pub fn line_geo(
        &mut self,
        data: &Dataset,
        lat: &str,
        lon: &str,
        options: ChartOptions,
    ) -> ChartOutcome {
        self.chart(ChartKind::LineGeo, data, [lat, lon], options)
    }
}

