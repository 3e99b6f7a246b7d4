use std::f64::consts::{FRAC_PI_6, PI, TAU};
use std::fmt::Display;
use std::ops::Range;

use indexmap::IndexMap;
use plotters::coord::Shift;
use plotters::coord::cartesian::Cartesian2d;
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use tracing::trace;

use crate::core::{ChartKind, Column, DEFAULT_HEXBIN_GRID_SIZE, DEFAULT_HISTOGRAM_BINS, SeriesRole};
use crate::error::{ChartError, ChartResult};
use crate::render::stats::{
    autocorrelation, extent, histogram, kernel_density, pearson, quantile, sorted_finite,
};
use crate::render::{BackendMode, Color as ThemeColor, Figure, RenderBackend, RenderHandle};
use crate::theme::Style;

pub const DEFAULT_SVG_WIDTH: u32 = 800;
pub const DEFAULT_SVG_HEIGHT: u32 = 600;

/// Counters for the last drawn figure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SvgRenderStats {
    /// Data marks drawn: bars, points, wedges, cells, paths.
    pub marks_drawn: usize,
    pub bytes: usize,
}

/// Static backend drawing each figure into an in-memory SVG document.
#[derive(Debug)]
pub struct SvgRenderer {
    width: u32,
    height: u32,
    render_count: u64,
    last_document: Option<String>,
    last_stats: SvgRenderStats,
}

impl Default for SvgRenderer {
    fn default() -> Self {
        Self {
            width: DEFAULT_SVG_WIDTH,
            height: DEFAULT_SVG_HEIGHT,
            render_count: 0,
            last_document: None,
            last_stats: SvgRenderStats::default(),
        }
    }
}

impl SvgRenderer {
    pub fn new(width: u32, height: u32) -> ChartResult<Self> {
        if width == 0 || height == 0 {
            return Err(ChartError::InvalidData(
                "svg renderer size must be > 0".to_owned(),
            ));
        }
        Ok(Self {
            width,
            height,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[must_use]
    pub fn render_count(&self) -> u64 {
        self.render_count
    }

    #[must_use]
    pub fn last_document(&self) -> Option<&str> {
        self.last_document.as_deref()
    }

    pub fn take_document(&mut self) -> Option<String> {
        self.last_document.take()
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }

    /// Draws `figure` and returns the SVG text with the number of marks drawn.
    pub fn draw(&self, figure: &Figure) -> ChartResult<(String, usize)> {
        figure.validate()?;
        let mut svg = String::new();
        let marks = {
            let root = SVGBackend::with_string(&mut svg, (self.width, self.height))
                .into_drawing_area();
            root.fill(&rgba(figure.style.background))
                .map_err(draw_error)?;
            let marks = draw_figure(&root, figure)?;
            root.present().map_err(draw_error)?;
            marks
        };
        Ok((svg, marks))
    }
}

impl RenderBackend for SvgRenderer {
    fn mode(&self) -> BackendMode {
        BackendMode::Static
    }

    fn render(&mut self, figure: &Figure) -> ChartResult<RenderHandle> {
        let (document, marks_drawn) = self.draw(figure)?;
        self.render_count += 1;
        self.last_stats = SvgRenderStats {
            marks_drawn,
            bytes: document.len(),
        };
        trace!(
            kind = %figure.kind,
            id = self.render_count,
            marks = marks_drawn,
            bytes = document.len(),
            "static figure drawn"
        );
        self.last_document = Some(document);
        Ok(RenderHandle::new(self.render_count, BackendMode::Static))
    }
}

type Plane<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_error(err: impl Display) -> ChartError {
    ChartError::Backend(format!("svg drawing failed: {err}"))
}

fn rgba(color: ThemeColor) -> RGBAColor {
    let channel = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    RGBAColor(
        channel(color.red),
        channel(color.green),
        channel(color.blue),
        color.alpha.clamp(0.0, 1.0),
    )
}

fn palette_color(style: &Style, index: usize) -> RGBAColor {
    let color = style
        .palette
        .get(index % style.palette.len().max(1))
        .copied()
        .unwrap_or(style.foreground);
    rgba(color)
}

fn font(style: &Style, scale: f64) -> TextStyle<'static> {
    ("sans-serif", style.font_size_px * scale)
        .into_font()
        .color(&rgba(style.foreground))
}

/// Range with a 5% margin; degenerate extents widen by one unit each side.
fn padded((lo, hi): (f64, f64)) -> Range<f64> {
    if hi > lo {
        let margin = (hi - lo) * 0.05;
        (lo - margin)..(hi + margin)
    } else {
        (lo - 1.0)..(hi + 1.0)
    }
}

fn category_range(count: usize) -> Range<f64> {
    -0.5..(count.max(1) as f64 - 0.5)
}

fn category_at(categories: &[String], value: f64) -> String {
    let index = value.round();
    if (value - index).abs() > 1e-6 || index < 0.0 {
        return String::new();
    }
    categories.get(index as usize).cloned().unwrap_or_default()
}

/// Axis ranges plus optional category names for integer positions.
struct Axes<'l> {
    x: Range<f64>,
    y: Range<f64>,
    x_categories: Option<&'l [String]>,
    y_categories: Option<&'l [String]>,
}

impl<'l> Axes<'l> {
    fn new(x: Range<f64>, y: Range<f64>) -> Self {
        Self {
            x,
            y,
            x_categories: None,
            y_categories: None,
        }
    }

    fn x_categories(mut self, categories: &'l [String]) -> Self {
        self.x = category_range(categories.len());
        self.x_categories = Some(categories);
        self
    }

    fn y_categories(mut self, categories: &'l [String]) -> Self {
        self.y = category_range(categories.len());
        self.y_categories = Some(categories);
        self
    }
}

/// Titled cartesian plane with the style's axis, label and grid colors.
fn plane<'a, DB: DrawingBackend>(
    area: &'a DrawingArea<DB, Shift>,
    figure: &Figure,
    axes: Axes<'_>,
) -> ChartResult<Plane<'a, DB>> {
    let style = &figure.style;
    let mut chart = ChartBuilder::on(area)
        .caption(&figure.title, font(style, 1.4))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(56)
        .build_cartesian_2d(axes.x, axes.y)
        .map_err(draw_error)?;

    let x_categories = axes.x_categories.unwrap_or_default();
    let y_categories = axes.y_categories.unwrap_or_default();
    let x_label = |value: &f64| category_at(x_categories, *value);
    let y_label = |value: &f64| category_at(y_categories, *value);
    {
        let mut mesh = chart.configure_mesh();
        mesh.axis_style(rgba(style.foreground).stroke_width(1))
            .label_style(font(style, 1.0))
            .axis_desc_style(font(style, 1.0));
        if let Some(label) = &figure.x_label {
            mesh.x_desc(label.as_str());
        }
        if let Some(label) = &figure.y_label {
            mesh.y_desc(label.as_str());
        }
        match style.grid {
            Some(grid) => {
                mesh.bold_line_style(rgba(grid).stroke_width(1))
                    .light_line_style(rgba(grid).mix(0.3).stroke_width(1));
            }
            None => {
                mesh.disable_x_mesh().disable_y_mesh();
            }
        }
        if axes.x_categories.is_some() {
            mesh.x_labels(x_categories.len())
                .x_label_formatter(&x_label);
        }
        if axes.y_categories.is_some() {
            mesh.y_labels(y_categories.len())
                .y_label_formatter(&y_label);
        }
        mesh.draw().map_err(draw_error)?;
    }
    Ok(chart)
}

fn draw_figure<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    match figure.kind {
        ChartKind::Bar => draw_bars(area, figure),
        ChartKind::Line | ChartKind::Area => draw_line(area, figure),
        ChartKind::Scatter => draw_scatter(area, figure),
        ChartKind::Histogram => draw_histogram(area, figure),
        ChartKind::Boxplot => draw_boxplot(area, figure),
        ChartKind::Violin => draw_violin(area, figure),
        ChartKind::Pie => draw_pie(area, figure),
        ChartKind::StackedBar => draw_stacked_bars(area, figure),
        ChartKind::Hexbin => draw_hexbin(area, figure),
        ChartKind::CorrelationMatrix => draw_correlation(area, figure),
        ChartKind::PairPlot => draw_pairs(area, figure),
        ChartKind::Autocorrelation => draw_autocorrelation(area, figure),
        ChartKind::Lag => draw_lag(area, figure),
        kind @ (ChartKind::Candlestick
        | ChartKind::Choropleth
        | ChartKind::ScatterGeo
        | ChartKind::LineGeo) => Err(ChartError::UnsupportedBackend {
            kind,
            mode: BackendMode::Static,
        }),
    }
}

/// Plot positions for an x column: numeric values as-is, anything else by index.
fn positions(column: &Column) -> (Vec<f64>, Option<Vec<String>>) {
    match column.as_numeric() {
        Some(values) => (values.to_vec(), None),
        None => (
            (0..column.len()).map(|index| index as f64).collect(),
            Some(column.to_labels()),
        ),
    }
}

fn draw_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let labels = figure.require(SeriesRole::X)?.values.to_labels();
    let values = figure.numeric(SeriesRole::Y)?;
    let (lo, hi) = extent(values.iter().copied()).unwrap_or((0.0, 1.0));
    let axes = Axes::new(0.0..1.0, padded((lo.min(0.0), hi.max(0.0)))).x_categories(&labels);
    let mut chart = plane(area, figure, axes)?;

    let color = palette_color(&figure.style, 0);
    let bars: Vec<_> = values
        .iter()
        .enumerate()
        .filter(|(_, value)| value.is_finite())
        .map(|(index, &value)| {
            let x = index as f64;
            Rectangle::new([(x - 0.4, 0.0), (x + 0.4, value)], color.filled())
        })
        .collect();
    let marks = bars.len();
    chart.draw_series(bars).map_err(draw_error)?;
    Ok(marks)
}

fn draw_line<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let (xs, labels) = positions(&figure.require(SeriesRole::X)?.values);
    let ys = figure.numeric(SeriesRole::Y)?;
    let points: Vec<(f64, f64)> = xs
        .iter()
        .zip(ys)
        .filter(|(x, y)| x.is_finite() && y.is_finite())
        .map(|(&x, &y)| (x, y))
        .collect();
    let filled = figure.kind == ChartKind::Area;

    let (lo, hi) = extent(points.iter().map(|point| point.1)).unwrap_or((0.0, 1.0));
    let y_range = if filled {
        padded((lo.min(0.0), hi.max(0.0)))
    } else {
        padded((lo, hi))
    };
    let x_extent = extent(points.iter().map(|point| point.0)).unwrap_or((0.0, 1.0));
    let axes = Axes::new(padded(x_extent), y_range);
    let axes = match &labels {
        Some(labels) => axes.x_categories(labels),
        None => axes,
    };
    let mut chart = plane(area, figure, axes)?;

    let color = palette_color(&figure.style, 0);
    if filled {
        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            let mut outline = points.clone();
            outline.push((last.0, 0.0));
            outline.push((first.0, 0.0));
            chart
                .draw_series(std::iter::once(Polygon::new(outline, color.mix(0.35).filled())))
                .map_err(draw_error)?;
        }
    }
    chart
        .draw_series(std::iter::once(PathElement::new(
            points.clone(),
            color.stroke_width(2),
        )))
        .map_err(draw_error)?;
    Ok(points.len())
}

fn draw_scatter<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let xs = figure.numeric(SeriesRole::X)?;
    let ys = figure.numeric(SeriesRole::Y)?;
    let hue = figure.series(SeriesRole::Hue);
    let hue_labels = hue.map(|series| series.values.to_labels());

    let mut groups: IndexMap<String, Vec<(f64, f64)>> = IndexMap::new();
    for (index, (&x, &y)) in xs.iter().zip(ys).enumerate() {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let key = hue_labels
            .as_ref()
            .and_then(|labels| labels.get(index).cloned())
            .unwrap_or_default();
        groups.entry(key).or_default().push((x, y));
    }

    let x_extent = extent(xs.iter().copied()).unwrap_or((0.0, 1.0));
    let y_extent = extent(ys.iter().copied()).unwrap_or((0.0, 1.0));
    let mut chart = plane(area, figure, Axes::new(padded(x_extent), padded(y_extent)))?;

    let mut marks = 0;
    for (index, (label, points)) in groups.into_iter().enumerate() {
        let color = palette_color(&figure.style, index);
        marks += points.len();
        let series = chart
            .draw_series(
                points
                    .into_iter()
                    .map(|point| Circle::new(point, 4, color.filled())),
            )
            .map_err(draw_error)?;
        if let Some(hue) = hue {
            series
                .label(format!("{}={label}", hue.name))
                .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
        }
    }
    if hue.is_some() {
        draw_legend(&mut chart, &figure.style)?;
    }
    Ok(marks)
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut Plane<'a, DB>,
    style: &Style,
) -> ChartResult<()> {
    chart
        .configure_series_labels()
        .background_style(rgba(style.background).mix(0.85).filled())
        .border_style(rgba(style.foreground).stroke_width(1))
        .label_font(font(style, 0.9))
        .draw()
        .map_err(draw_error)
}

fn draw_histogram<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let values = figure.numeric(SeriesRole::Value)?;
    let bins = figure.params.bins.unwrap_or(DEFAULT_HISTOGRAM_BINS) as usize;
    let (edges, counts, width) = histogram(values, bins);
    let (Some(&first), Some(&last)) = (edges.first(), edges.last()) else {
        return Ok(0);
    };
    let tallest = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
    let axes = Axes::new(padded((first, last + width)), 0.0..tallest * 1.1);
    let mut chart = plane(area, figure, axes)?;

    let color = palette_color(&figure.style, 0);
    let outline = rgba(figure.style.background);
    chart
        .draw_series(edges.iter().zip(&counts).map(|(&edge, &count)| {
            Rectangle::new([(edge, 0.0), (edge + width, count as f64)], color.filled())
        }))
        .map_err(draw_error)?;
    chart
        .draw_series(edges.iter().zip(&counts).map(|(&edge, &count)| {
            Rectangle::new([(edge, 0.0), (edge + width, count as f64)], outline.stroke_width(1))
        }))
        .map_err(draw_error)?;
    Ok(counts.len())
}

fn draw_boxplot<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let series = figure.require(SeriesRole::Value)?;
    let sorted = sorted_finite(figure.numeric(SeriesRole::Value)?);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Ok(0);
    };
    let q1 = quantile(&sorted, 0.25);
    let median = quantile(&sorted, 0.5);
    let q3 = quantile(&sorted, 0.75);
    let reach = 1.5 * (q3 - q1);
    let low = sorted.iter().copied().find(|v| *v >= q1 - reach).unwrap_or(min);
    let high = sorted.iter().rev().copied().find(|v| *v <= q3 + reach).unwrap_or(max);

    let names = [series.name.clone()];
    let axes = Axes::new(0.0..1.0, padded((min, max))).x_categories(&names);
    let mut chart = plane(area, figure, axes)?;

    let color = palette_color(&figure.style, 0);
    let ink = rgba(figure.style.foreground).stroke_width(1);
    chart
        .draw_series([
            Rectangle::new([(-0.25, q1), (0.25, q3)], color.mix(0.5).filled()),
            Rectangle::new([(-0.25, q1), (0.25, q3)], ink),
        ])
        .map_err(draw_error)?;
    chart
        .draw_series([
            PathElement::new(vec![(-0.25, median), (0.25, median)], color.stroke_width(2)),
            PathElement::new(vec![(0.0, q3), (0.0, high)], ink),
            PathElement::new(vec![(0.0, q1), (0.0, low)], ink),
            PathElement::new(vec![(-0.12, high), (0.12, high)], ink),
            PathElement::new(vec![(-0.12, low), (0.12, low)], ink),
        ])
        .map_err(draw_error)?;
    let outliers: Vec<f64> = sorted
        .iter()
        .copied()
        .filter(|v| *v < low || *v > high)
        .collect();
    chart
        .draw_series(outliers.iter().map(|&v| Circle::new((0.0, v), 3, ink)))
        .map_err(draw_error)?;
    Ok(1 + outliers.len())
}

fn draw_violin<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    const SAMPLES: usize = 64;

    let series = figure.require(SeriesRole::Value)?;
    let sorted = sorted_finite(figure.numeric(SeriesRole::Value)?);
    let (Some(&min), Some(&max)) = (sorted.first(), sorted.last()) else {
        return Ok(0);
    };
    let span = padded((min, max));
    let step = (span.end - span.start) / (SAMPLES - 1) as f64;
    let points: Vec<f64> = (0..SAMPLES).map(|i| span.start + i as f64 * step).collect();
    let density = kernel_density(&sorted, &points);
    let peak = density.iter().copied().fold(0.0, f64::max);
    let scale = if peak > 0.0 { 0.4 / peak } else { 0.0 };

    let mut outline: Vec<(f64, f64)> = points
        .iter()
        .zip(&density)
        .map(|(&y, &d)| (d * scale, y))
        .collect();
    outline.extend(
        points
            .iter()
            .zip(&density)
            .rev()
            .map(|(&y, &d)| (-d * scale, y)),
    );

    let names = [series.name.clone()];
    let axes = Axes::new(0.0..1.0, span.clone()).x_categories(&names);
    let mut chart = plane(area, figure, axes)?;

    let color = palette_color(&figure.style, 0);
    let ink = rgba(figure.style.foreground);
    let median = quantile(&sorted, 0.5);
    chart
        .draw_series(std::iter::once(Polygon::new(outline, color.mix(0.6).filled())))
        .map_err(draw_error)?;
    chart
        .draw_series([
            PathElement::new(
                vec![(0.0, quantile(&sorted, 0.25)), (0.0, quantile(&sorted, 0.75))],
                ink.stroke_width(4),
            ),
            PathElement::new(vec![(-0.08, median), (0.08, median)], ink.stroke_width(2)),
        ])
        .map_err(draw_error)?;
    Ok(1)
}

fn draw_pie<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let values = figure.numeric(SeriesRole::Value)?;
    let labels = figure.require(SeriesRole::Label)?.values.to_labels();
    let total: f64 = values.iter().sum();

    let (width, height) = area.dim_in_pixel();
    let aspect = f64::from(width) / f64::from(height.max(1));
    let mut chart = ChartBuilder::on(area)
        .caption(&figure.title, font(&figure.style, 1.4))
        .margin(12)
        .build_cartesian_2d(-1.4 * aspect..1.4 * aspect, -1.4..1.4)
        .map_err(draw_error)?;

    let mut wedges = Vec::with_capacity(values.len());
    let mut captions = Vec::with_capacity(values.len() * 2);
    let mut start = 0.0;
    for (index, (&value, label)) in values.iter().zip(&labels).enumerate() {
        let sweep = value / total * TAU;
        let steps = ((sweep / TAU) * 96.0).ceil().max(2.0) as usize;
        let mut outline = vec![(0.0, 0.0)];
        outline.extend((0..=steps).map(|step| {
            let angle = start + sweep * step as f64 / steps as f64;
            (angle.cos(), angle.sin())
        }));
        wedges.push(Polygon::new(outline, palette_color(&figure.style, index).filled()));

        let middle = start + sweep / 2.0;
        captions.push(Text::new(
            label.clone(),
            (1.1 * middle.cos(), 1.1 * middle.sin()),
            font(&figure.style, 1.0),
        ));
        captions.push(Text::new(
            format!("{:.1}%", value / total * 100.0),
            (0.6 * middle.cos(), 0.6 * middle.sin()),
            font(&figure.style, 0.9),
        ));
        start += sweep;
    }
    let marks = wedges.len();
    chart.draw_series(wedges).map_err(draw_error)?;
    chart.draw_series(captions).map_err(draw_error)?;
    Ok(marks)
}

fn draw_stacked_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let labels = figure.require(SeriesRole::X)?.values.to_labels();
    let (names, columns) = figure.numeric_columns(SeriesRole::Y)?;

    let mut above = vec![0.0; labels.len()];
    let mut below = vec![0.0; labels.len()];
    let mut layers = Vec::with_capacity(columns.len());
    for column in &columns {
        let mut bars = Vec::with_capacity(column.len());
        for (index, &value) in column.iter().enumerate() {
            if !value.is_finite() {
                continue;
            }
            let base = if value >= 0.0 { &mut above[index] } else { &mut below[index] };
            bars.push((index as f64, *base, *base + value));
            *base += value;
        }
        layers.push(bars);
    }
    let lo = below.iter().copied().fold(0.0, f64::min);
    let hi = above.iter().copied().fold(0.0, f64::max);
    let axes = Axes::new(0.0..1.0, padded((lo, hi))).x_categories(&labels);
    let mut chart = plane(area, figure, axes)?;

    let mut marks = 0;
    for (index, (name, bars)) in names.iter().zip(layers).enumerate() {
        let color = palette_color(&figure.style, index);
        marks += bars.len();
        chart
            .draw_series(bars.into_iter().map(|(x, from, to)| {
                Rectangle::new([(x - 0.4, from), (x + 0.4, to)], color.filled())
            }))
            .map_err(draw_error)?
            .label(*name)
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));
    }
    draw_legend(&mut chart, &figure.style)?;
    Ok(marks)
}

fn draw_hexbin<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let xs = figure.numeric(SeriesRole::X)?;
    let ys = figure.numeric(SeriesRole::Y)?;
    let grid = f64::from(figure.params.grid_size.unwrap_or(DEFAULT_HEXBIN_GRID_SIZE));
    let (x_lo, x_hi) = extent(xs.iter().copied()).unwrap_or((0.0, 1.0));
    let (y_lo, y_hi) = extent(ys.iter().copied()).unwrap_or((0.0, 1.0));
    let sx = if x_hi > x_lo { (x_hi - x_lo) / grid } else { 1.0 };
    let sy = if y_hi > y_lo { (y_hi - y_lo) / grid } else { 1.0 };

    // Two offset rectangular lattices; each point joins the nearer center.
    let mut cells: IndexMap<(i64, i64, bool), usize> = IndexMap::new();
    for (&x, &y) in xs.iter().zip(ys) {
        if !(x.is_finite() && y.is_finite()) {
            continue;
        }
        let (u, v) = ((x - x_lo) / sx, (y - y_lo) / sy);
        let (au, av) = (u.round(), v.round());
        let (bu, bv) = (u.floor() + 0.5, v.floor() + 0.5);
        let near_a = (u - au).powi(2) + 3.0 * (v - av).powi(2);
        let near_b = (u - bu).powi(2) + 3.0 * (v - bv).powi(2);
        let key = if near_a <= near_b {
            (au as i64, av as i64, false)
        } else {
            (u.floor() as i64, v.floor() as i64, true)
        };
        *cells.entry(key).or_default() += 1;
    }

    let axes = Axes::new(padded((x_lo, x_hi)), padded((y_lo, y_hi)));
    let mut chart = plane(area, figure, axes)?;

    let densest = cells.values().copied().max().unwrap_or(1) as f64;
    let color = palette_color(&figure.style, 0);
    let hexagons: Vec<_> = cells
        .iter()
        .map(|(&(i, j, offset), &count)| {
            let shift = if offset { 0.5 } else { 0.0 };
            let cx = x_lo + (i as f64 + shift) * sx;
            let cy = y_lo + (j as f64 + shift) * sy;
            let outline: Vec<(f64, f64)> = (0..6)
                .map(|corner| {
                    let angle = FRAC_PI_6 + f64::from(corner) * PI / 3.0;
                    (cx + 0.58 * sx * angle.cos(), cy + 0.58 * sy * angle.sin())
                })
                .collect();
            Polygon::new(outline, color.mix(0.15 + 0.85 * count as f64 / densest).filled())
        })
        .collect();
    let marks = hexagons.len();
    chart.draw_series(hexagons).map_err(draw_error)?;
    Ok(marks)
}

/// Diverging red/blue cell color for a correlation coefficient.
fn correlation_color(r: f64) -> RGBAColor {
    if !r.is_finite() {
        RGBAColor(160, 160, 160, 0.5)
    } else if r >= 0.0 {
        RGBAColor(178, 24, 43, r.min(1.0))
    } else {
        RGBAColor(33, 102, 172, (-r).min(1.0))
    }
}

fn draw_correlation<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let (names, columns) = figure.numeric_columns(SeriesRole::Column)?;
    let names: Vec<String> = names.into_iter().map(str::to_owned).collect();
    let n = columns.len();
    let matrix: Vec<Vec<f64>> = columns
        .iter()
        .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
        .collect();

    let axes = Axes::new(0.0..1.0, 0.0..1.0)
        .x_categories(&names)
        .y_categories(&names);
    let mut chart = plane(area, figure, axes)?;

    let cells = (0..n).flat_map(|row| (0..n).map(move |col| (row, col)));
    chart
        .draw_series(cells.clone().map(|(row, col)| {
            let (x, y) = (col as f64, row as f64);
            Rectangle::new(
                [(x - 0.5, y - 0.5), (x + 0.5, y + 0.5)],
                correlation_color(matrix[row][col]).filled(),
            )
        }))
        .map_err(draw_error)?;
    chart
        .draw_series(cells.map(|(row, col)| {
            Text::new(
                format!("{:.2}", matrix[row][col]),
                (col as f64 - 0.15, row as f64),
                font(&figure.style, 0.9),
            )
        }))
        .map_err(draw_error)?;
    Ok(n * n)
}

fn draw_pairs<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let (names, columns) = figure.numeric_columns(SeriesRole::Column)?;
    let n = columns.len();
    let style = &figure.style;
    let area = area
        .titled(&figure.title, font(style, 1.4))
        .map_err(draw_error)?;
    let extents: Vec<(f64, f64)> = columns
        .iter()
        .map(|column| extent(column.iter().copied()).unwrap_or((0.0, 1.0)))
        .collect();

    let mut marks = 0;
    for (index, cell) in area.split_evenly((n, n)).iter().enumerate() {
        let (row, col) = (index / n, index % n);
        let color = palette_color(style, 0);
        if row == col {
            let (edges, counts, width) = histogram(columns[col], DEFAULT_HISTOGRAM_BINS as usize);
            let tallest = counts.iter().copied().max().unwrap_or(0).max(1) as f64;
            let mut chart = pair_cell(cell, style, padded(extents[col]), 0.0..tallest * 1.1)?;
            chart
                .draw_series(edges.iter().zip(&counts).map(|(&edge, &count)| {
                    Rectangle::new([(edge, 0.0), (edge + width, count as f64)], color.filled())
                }))
                .map_err(draw_error)?;
            chart
                .draw_series(std::iter::once(Text::new(
                    names[col].to_owned(),
                    (extents[col].0, tallest * 1.05),
                    font(style, 0.9),
                )))
                .map_err(draw_error)?;
            marks += counts.len();
        } else {
            let mut chart = pair_cell(cell, style, padded(extents[col]), padded(extents[row]))?;
            let points: Vec<(f64, f64)> = columns[col]
                .iter()
                .zip(columns[row])
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .map(|(&x, &y)| (x, y))
                .collect();
            marks += points.len();
            chart
                .draw_series(points.into_iter().map(|point| Circle::new(point, 2, color.filled())))
                .map_err(draw_error)?;
        }
    }
    Ok(marks)
}

fn pair_cell<'a, DB: DrawingBackend>(
    cell: &'a DrawingArea<DB, Shift>,
    style: &Style,
    x: Range<f64>,
    y: Range<f64>,
) -> ChartResult<Plane<'a, DB>> {
    let mut chart = ChartBuilder::on(cell)
        .margin(4)
        .x_label_area_size(20)
        .y_label_area_size(32)
        .build_cartesian_2d(x, y)
        .map_err(draw_error)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .disable_y_mesh()
        .x_labels(3)
        .y_labels(3)
        .axis_style(rgba(style.foreground).stroke_width(1))
        .label_style(font(style, 0.7))
        .draw()
        .map_err(draw_error)?;
    Ok(chart)
}

fn draw_autocorrelation<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let values = figure.numeric(SeriesRole::Value)?;
    let acf = autocorrelation(values);
    let n = values.len() as f64;
    let axes = Axes::new(0.0..n, -1.0..1.0);
    let mut chart = plane(area, figure, axes)?;

    let ink = rgba(figure.style.foreground);
    let bands = [1.96, -1.96, 2.576, -2.576].map(|z| {
        let level = z / n.sqrt();
        PathElement::new(vec![(0.0, level), (n, level)], ink.mix(0.5).stroke_width(1))
    });
    chart.draw_series(bands).map_err(draw_error)?;
    chart
        .draw_series(std::iter::once(PathElement::new(
            vec![(0.0, 0.0), (n, 0.0)],
            ink.stroke_width(1),
        )))
        .map_err(draw_error)?;
    let points: Vec<(f64, f64)> = acf
        .iter()
        .enumerate()
        .filter(|(_, r)| r.is_finite())
        .map(|(lag, &r)| ((lag + 1) as f64, r))
        .collect();
    chart
        .draw_series(std::iter::once(PathElement::new(
            points.clone(),
            palette_color(&figure.style, 0).stroke_width(2),
        )))
        .map_err(draw_error)?;
    Ok(points.len())
}

fn draw_lag<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    figure: &Figure,
) -> ChartResult<usize> {
    let values = figure.numeric(SeriesRole::Value)?;
    let lag = figure.params.lag.unwrap_or(1).min(values.len());
    let points: Vec<(f64, f64)> = values[..values.len() - lag]
        .iter()
        .zip(&values[lag..])
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect();
    let range = padded(extent(values.iter().copied()).unwrap_or((0.0, 1.0)));
    let mut chart = plane(area, figure, Axes::new(range.clone(), range))?;

    let color = palette_color(&figure.style, 0);
    chart
        .draw_series(points.iter().map(|&point| Circle::new(point, 4, color.filled())))
        .map_err(draw_error)?;
    Ok(points.len())
}
