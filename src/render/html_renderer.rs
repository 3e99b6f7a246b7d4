use serde_json::{Map, Value, json};
use tracing::trace;

use crate::core::{ChartKind, Column, SeriesRole};
use crate::error::{ChartError, ChartResult};
use crate::render::stats::{autocorrelation, pearson};
use crate::render::{BackendMode, Figure, RenderBackend, RenderHandle};

pub const DEFAULT_PLOTLY_SRC: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// Where a generated page loads plotly.js from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlotlyScript {
    /// `<script src=...>`. The page needs network access to the URL when opened.
    Linked(String),
    /// Library source embedded in the page, which then opens offline.
    Inline(String),
}

impl PlotlyScript {
    fn tag(&self) -> String {
        match self {
            Self::Linked(src) => format!("<script src=\"{}\"></script>", escape_html(src)),
            Self::Inline(source) => {
                format!("<script>\n{}\n</script>", source.replace("</script", "<\\/script"))
            }
        }
    }
}

/// Interactive backend producing an HTML page per chart.
///
/// The page embeds a declarative Plotly figure (`data` + `layout`) so it can be
/// opened in any browser without calling back into this crate. By default the
/// library itself is linked from [`DEFAULT_PLOTLY_SRC`]; pages built with
/// [`HtmlRenderer::with_inline_script`] carry the library and need no network.
#[derive(Debug)]
pub struct HtmlRenderer {
    script: PlotlyScript,
    render_count: u64,
    last_document: Option<String>,
}

impl Default for HtmlRenderer {
    fn default() -> Self {
        Self::new(DEFAULT_PLOTLY_SRC)
    }
}

impl HtmlRenderer {
    #[must_use]
    pub fn new(plotly_src: impl Into<String>) -> Self {
        Self::with_script(PlotlyScript::Linked(plotly_src.into()))
    }

    /// Embeds `plotly_source` (the minified library text) in every page.
    #[must_use]
    pub fn with_inline_script(plotly_source: impl Into<String>) -> Self {
        Self::with_script(PlotlyScript::Inline(plotly_source.into()))
    }

    #[must_use]
    pub fn with_script(script: PlotlyScript) -> Self {
        Self {
            script,
            render_count: 0,
            last_document: None,
        }
    }

    #[must_use]
    pub fn script(&self) -> &PlotlyScript {
        &self.script
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

    /// Builds the `{ data, layout }` figure object for `figure`.
    pub fn figure_json(figure: &Figure) -> ChartResult<Value> {
        let mut layout = layout(figure);
        let data = traces(figure, &mut layout)?;
        Ok(json!({ "data": data, "layout": Value::Object(layout) }))
    }

    fn document(&self, figure: &Figure, figure_json: &Value) -> ChartResult<String> {
        let payload = serde_json::to_string(figure_json)
            .map_err(|err| ChartError::Backend(format!("figure serialization failed: {err}")))?
            .replace("</", "<\\/");
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
             {script}\n</head>\n<body style=\"margin:0\">\n\
             <div id=\"chart\" style=\"width:100%;height:100vh\"></div>\n\
             <script type=\"application/json\" id=\"figure-data\">{payload}</script>\n\
             <script>\nconst fig = JSON.parse(\
             document.getElementById(\"figure-data\").textContent);\n\
             Plotly.newPlot(\"chart\", fig.data, fig.layout, {{ responsive: true }});\n\
             </script>\n\
             </body>\n</html>\n",
            title = escape_html(&figure.title),
            script = self.script.tag(),
        ))
    }
}

impl RenderBackend for HtmlRenderer {
    fn mode(&self) -> BackendMode {
        BackendMode::Interactive
    }

    fn render(&mut self, figure: &Figure) -> ChartResult<RenderHandle> {
        figure.validate()?;
        let figure_json = Self::figure_json(figure)?;
        let document = self.document(figure, &figure_json)?;
        self.render_count += 1;
        trace!(
            kind = %figure.kind,
            id = self.render_count,
            bytes = document.len(),
            "interactive figure built"
        );
        self.last_document = Some(document);
        Ok(RenderHandle::new(self.render_count, BackendMode::Interactive))
    }
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn column_json(column: &Column) -> Value {
    match column {
        Column::Numeric(values) => json!(values),
        Column::Categorical(values) => json!(values),
        Column::Temporal(_) => json!(column.to_labels()),
    }
}

fn layout(figure: &Figure) -> Map<String, Value> {
    let style = &figure.style;
    let axis = |label: &Option<String>| {
        let mut axis = json!({ "showgrid": style.grid.is_some() });
        if let Some(label) = label {
            axis["title"] = json!({ "text": label });
        }
        if let Some(grid) = style.grid {
            axis["gridcolor"] = json!(grid.to_css());
        }
        axis
    };

    let mut layout = Map::new();
    layout.insert("title".to_owned(), json!({ "text": figure.title }));
    layout.insert("xaxis".to_owned(), axis(&figure.x_label));
    layout.insert("yaxis".to_owned(), axis(&figure.y_label));
    layout.insert("paper_bgcolor".to_owned(), json!(style.background.to_css()));
    layout.insert("plot_bgcolor".to_owned(), json!(style.background.to_css()));
    layout.insert(
        "font".to_owned(),
        json!({ "color": style.foreground.to_css(), "size": style.font_size_px }),
    );
    layout.insert(
        "colorway".to_owned(),
        Value::Array(
            style
                .palette
                .iter()
                .map(|color| json!(color.to_css()))
                .collect(),
        ),
    );
    layout
}

fn traces(figure: &Figure, layout: &mut Map<String, Value>) -> ChartResult<Vec<Value>> {
    let trace = match figure.kind {
        ChartKind::Bar | ChartKind::Line | ChartKind::Area => {
            let x = figure.require(SeriesRole::X)?;
            let y = figure.require(SeriesRole::Y)?;
            let mut trace = json!({
                "name": y.name,
                "x": column_json(&x.values),
                "y": column_json(&y.values),
            });
            match figure.kind {
                ChartKind::Bar => trace["type"] = json!("bar"),
                ChartKind::Line => {
                    trace["type"] = json!("scatter");
                    trace["mode"] = json!("lines");
                }
                _ => {
                    trace["type"] = json!("scatter");
                    trace["mode"] = json!("lines");
                    trace["fill"] = json!("tozeroy");
                }
            }
            trace
        }
        ChartKind::Scatter => return scatter_traces(figure),
        ChartKind::Histogram => {
            let value = figure.require(SeriesRole::Value)?;
            json!({
                "type": "histogram",
                "name": value.name,
                "x": column_json(&value.values),
                "nbinsx": figure.params.bins,
            })
        }
        ChartKind::Boxplot | ChartKind::Violin => {
            let value = figure.require(SeriesRole::Value)?;
            let mut trace = json!({ "name": value.name, "y": column_json(&value.values) });
            if figure.kind == ChartKind::Boxplot {
                trace["type"] = json!("box");
            } else {
                trace["type"] = json!("violin");
                trace["box"] = json!({ "visible": true });
            }
            trace
        }
        ChartKind::Pie => {
            let value = figure.require(SeriesRole::Value)?;
            let label = figure.require(SeriesRole::Label)?;
            json!({
                "type": "pie",
                "values": column_json(&value.values),
                "labels": label.values.to_labels(),
            })
        }
        ChartKind::StackedBar => {
            let x = column_json(&figure.require(SeriesRole::X)?.values);
            layout.insert("barmode".to_owned(), json!("stack"));
            return Ok(figure
                .series_with_role(SeriesRole::Y)
                .map(|y| {
                    json!({
                        "type": "bar",
                        "name": y.name,
                        "x": x,
                        "y": column_json(&y.values),
                    })
                })
                .collect());
        }
        ChartKind::Hexbin => {
            let x = figure.require(SeriesRole::X)?;
            let y = figure.require(SeriesRole::Y)?;
            json!({
                "type": "histogram2d",
                "x": column_json(&x.values),
                "y": column_json(&y.values),
                "nbinsx": figure.params.grid_size,
                "nbinsy": figure.params.grid_size,
            })
        }
        ChartKind::CorrelationMatrix => {
            let (names, columns) = figure.numeric_columns(SeriesRole::Column)?;
            let matrix: Vec<Vec<f64>> = columns
                .iter()
                .map(|a| columns.iter().map(|b| pearson(a, b)).collect())
                .collect();
            json!({
                "type": "heatmap",
                "x": names,
                "y": names,
                "z": matrix,
                "zmin": -1.0,
                "zmax": 1.0,
                "colorscale": "RdBu",
            })
        }
        ChartKind::PairPlot => {
            let dimensions: Vec<Value> = figure
                .series_with_role(SeriesRole::Column)
                .map(|series| {
                    json!({ "label": series.name, "values": column_json(&series.values) })
                })
                .collect();
            json!({ "type": "splom", "dimensions": dimensions })
        }
        ChartKind::Candlestick => json!({
            "type": "candlestick",
            "x": column_json(&figure.require(SeriesRole::Time)?.values),
            "open": column_json(&figure.require(SeriesRole::Open)?.values),
            "high": column_json(&figure.require(SeriesRole::High)?.values),
            "low": column_json(&figure.require(SeriesRole::Low)?.values),
            "close": column_json(&figure.require(SeriesRole::Close)?.values),
        }),
        ChartKind::Autocorrelation => {
            let values = figure.numeric(SeriesRole::Value)?;
            let lags: Vec<usize> = (1..values.len()).collect();
            let band = 1.96 / (values.len() as f64).sqrt();
            let line = |level: f64, name: &str| {
                let levels = vec![level; lags.len()];
                json!({
                    "type": "scatter",
                    "mode": "lines",
                    "name": name,
                    "x": lags,
                    "y": levels,
                    "line": { "dash": "dash" },
                    "showlegend": false,
                })
            };
            return Ok(vec![
                json!({
                    "type": "scatter",
                    "mode": "lines",
                    "name": figure.require(SeriesRole::Value)?.name,
                    "x": lags,
                    "y": autocorrelation(values),
                }),
                line(band, "95% band"),
                line(-band, "95% band"),
            ]);
        }
        ChartKind::Lag => {
            let values = figure.numeric(SeriesRole::Value)?;
            let lag = figure.params.lag.unwrap_or(1).min(values.len());
            json!({
                "type": "scatter",
                "mode": "markers",
                "x": values[..values.len() - lag],
                "y": values[lag..],
            })
        }
        ChartKind::Choropleth => {
            let feature_id_key = figure
                .params
                .feature_id_key
                .clone()
                .unwrap_or_else(|| crate::core::DEFAULT_FEATURE_ID_KEY.to_owned());
            json!({
                "type": "choropleth",
                "geojson": figure.params.geojson,
                "featureidkey": feature_id_key,
                "locations": figure.require(SeriesRole::Location)?.values.to_labels(),
                "z": column_json(&figure.require(SeriesRole::Color)?.values),
            })
        }
        ChartKind::ScatterGeo | ChartKind::LineGeo => {
            let mode = if figure.kind == ChartKind::LineGeo {
                "lines"
            } else {
                "markers"
            };
            let mut trace = json!({
                "type": "scattergeo",
                "lat": column_json(&figure.require(SeriesRole::Latitude)?.values),
                "lon": column_json(&figure.require(SeriesRole::Longitude)?.values),
                "mode": mode,
            });
            if let Some(text) = figure.series(SeriesRole::Text) {
                trace["text"] = json!(text.values.to_labels());
            }
            trace
        }
    };
    Ok(vec![trace])
}

fn scatter_traces(figure: &Figure) -> ChartResult<Vec<Value>> {
    let x = figure.numeric(SeriesRole::X)?;
    let y = figure.numeric(SeriesRole::Y)?;
    let Some(hue) = figure.series(SeriesRole::Hue) else {
        return Ok(vec![json!({ "type": "scatter", "mode": "markers", "x": x, "y": y })]);
    };

    let labels = hue.values.to_labels();
    let mut groups: indexmap::IndexMap<&str, (Vec<f64>, Vec<f64>)> = indexmap::IndexMap::new();
    for ((label, &x), &y) in labels.iter().zip(x).zip(y) {
        let group = groups.entry(label.as_str()).or_default();
        group.0.push(x);
        group.1.push(y);
    }
    Ok(groups
        .into_iter()
        .map(|(label, (x, y))| {
            json!({
                "type": "scatter",
                "mode": "markers",
                "name": format!("{}={label}", hue.name),
                "x": x,
                "y": y,
            })
        })
        .collect())
}
