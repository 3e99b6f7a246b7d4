use std::collections::HashSet;

use serde::Serialize;

use crate::core::{ChartKind, Column, SeriesRole};
use crate::error::{ChartError, ChartResult};
use crate::theme::Style;

/// One resolved column inside a figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FigureSeries {
    pub name: String,
    pub role: SeriesRole,
    #[serde(skip)]
    pub requires_numeric: bool,
    pub values: Column,
}

impl FigureSeries {
    #[must_use]
    pub fn new(name: impl Into<String>, role: SeriesRole, values: Column) -> Self {
        Self {
            name: name.into(),
            role,
            requires_numeric: false,
            values,
        }
    }

    #[must_use]
    pub fn numeric(mut self) -> Self {
        self.requires_numeric = true;
        self
    }
}

/// Chart-specific parameters, only set for the kinds that use them.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FigureParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bins: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lag: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geojson: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_id_key: Option<String>,
}

/// Backend-agnostic description of one chart draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: Option<String>,
    pub y_label: Option<String>,
    pub series: Vec<FigureSeries>,
    pub params: FigureParams,
    pub style: Style,
}

impl Figure {
    #[must_use]
    pub fn new(kind: ChartKind, title: impl Into<String>, style: Style) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: None,
            y_label: None,
            series: Vec::new(),
            params: FigureParams::default(),
            style,
        }
    }

    #[must_use]
    pub fn with_labels(mut self, x_label: Option<String>, y_label: Option<String>) -> Self {
        self.x_label = x_label;
        self.y_label = y_label;
        self
    }

    #[must_use]
    pub fn with_series(mut self, series: FigureSeries) -> Self {
        self.series.push(series);
        self
    }

    #[must_use]
    pub fn with_params(mut self, params: FigureParams) -> Self {
        self.params = params;
        self
    }

    /// First series carrying `role`.
    #[must_use]
    pub fn series(&self, role: SeriesRole) -> Option<&FigureSeries> {
        self.series.iter().find(|series| series.role == role)
    }

    pub fn series_with_role(&self, role: SeriesRole) -> impl Iterator<Item = &FigureSeries> {
        self.series.iter().filter(move |series| series.role == role)
    }

    /// First series carrying `role`, or an error naming the missing role.
    pub fn require(&self, role: SeriesRole) -> ChartResult<&FigureSeries> {
        self.series(role).ok_or_else(|| {
            ChartError::InvalidData(format!("{} figure has no {role:?} series", self.kind))
        })
    }

    /// Numeric values of the first series carrying `role`.
    pub fn numeric(&self, role: SeriesRole) -> ChartResult<&[f64]> {
        let series = self.require(role)?;
        series.values.as_numeric().ok_or_else(|| {
            ChartError::InvalidData(format!("column `{}` must be numeric", series.name))
        })
    }

    /// Names and numeric values of every series carrying `role`, in order.
    pub fn numeric_columns(&self, role: SeriesRole) -> ChartResult<(Vec<&str>, Vec<&[f64]>)> {
        let mut names = Vec::new();
        let mut columns = Vec::new();
        for series in self.series_with_role(role) {
            let values = series.values.as_numeric().ok_or_else(|| {
                ChartError::InvalidData(format!("column `{}` must be numeric", series.name))
            })?;
            names.push(series.name.as_str());
            columns.push(values);
        }
        Ok((names, columns))
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.series.first().map_or(0, |series| series.values.len())
    }

    /// Checks that the figure is drawable by any backend.
    pub fn validate(&self) -> ChartResult<()> {
        self.style.validate()?;

        if self.series.is_empty() {
            return Err(ChartError::InvalidData(format!(
                "{} chart has no columns to draw",
                self.kind
            )));
        }

        let rows = self.row_count();
        if rows == 0 {
            return Err(ChartError::InvalidData("dataset has no rows".to_owned()));
        }

        for series in &self.series {
            if series.values.len() != rows {
                return Err(ChartError::InvalidData(format!(
                    "column `{}` has {} rows, expected {rows}",
                    series.name,
                    series.values.len()
                )));
            }
            if series.requires_numeric && series.values.as_numeric().is_none() {
                return Err(ChartError::InvalidData(format!(
                    "column `{}` must be numeric for {} charts, found {:?}",
                    series.name,
                    self.kind,
                    series.values.kind()
                )));
            }
        }

        match self.kind {
            ChartKind::Histogram => validate_positive(self.params.bins, "bin count"),
            ChartKind::Hexbin => validate_positive(self.params.grid_size, "grid size"),
            ChartKind::Pie => self.validate_pie(),
            ChartKind::Candlestick => self.validate_ohlc(),
            ChartKind::Autocorrelation if rows < 2 => Err(ChartError::InvalidData(
                "autocorrelation needs at least two observations".to_owned(),
            )),
            ChartKind::Lag => {
                let lag = self.params.lag.unwrap_or_default();
                if lag == 0 || lag >= rows {
                    return Err(ChartError::InvalidData(format!(
                        "lag must be in 1..{rows}, got {lag}"
                    )));
                }
                Ok(())
            }
            ChartKind::ScatterGeo | ChartKind::LineGeo => self.validate_coordinates(),
            ChartKind::Choropleth => self.validate_geojson(),
            _ => Ok(()),
        }
    }

    fn validate_pie(&self) -> ChartResult<()> {
        let values = self.numeric(SeriesRole::Value)?;
        if values.iter().any(|value| !value.is_finite() || *value < 0.0) {
            return Err(ChartError::InvalidData(
                "pie values must be finite and non-negative".to_owned(),
            ));
        }
        if values.iter().sum::<f64>() <= 0.0 {
            return Err(ChartError::InvalidData(
                "pie values must not all be zero".to_owned(),
            ));
        }

        let labels = self
            .series(SeriesRole::Label)
            .map(|series| series.values.to_labels())
            .unwrap_or_default();
        let distinct: HashSet<&str> = labels.iter().map(String::as_str).collect();
        if distinct.len() < 2 {
            return Err(ChartError::InvalidData(
                "pie chart needs at least two categories".to_owned(),
            ));
        }
        Ok(())
    }

    fn validate_ohlc(&self) -> ChartResult<()> {
        let open = self.numeric(SeriesRole::Open)?;
        let high = self.numeric(SeriesRole::High)?;
        let low = self.numeric(SeriesRole::Low)?;
        let close = self.numeric(SeriesRole::Close)?;

        for (row, (((&open, &high), &low), &close)) in
            open.iter().zip(high).zip(low).zip(close).enumerate()
        {
            if !(open.is_finite() && high.is_finite() && low.is_finite() && close.is_finite()) {
                return Err(ChartError::InvalidData(format!(
                    "ohlc row {row} must be finite"
                )));
            }
            if low > high {
                return Err(ChartError::InvalidData(format!(
                    "ohlc row {row}: low must be <= high"
                )));
            }
            if open < low || open > high || close < low || close > high {
                return Err(ChartError::InvalidData(format!(
                    "ohlc row {row}: open/close must be inside [low, high]"
                )));
            }
        }
        Ok(())
    }

    fn validate_coordinates(&self) -> ChartResult<()> {
        for (role, limit) in [(SeriesRole::Latitude, 90.0), (SeriesRole::Longitude, 180.0)] {
            let values = self.numeric(role)?;
            if let Some(value) = values
                .iter()
                .find(|value| !value.is_finite() || value.abs() > limit)
            {
                return Err(ChartError::InvalidData(format!(
                    "{role:?} value {value} is outside [-{limit}, {limit}]"
                )));
            }
        }
        Ok(())
    }

    fn validate_geojson(&self) -> ChartResult<()> {
        let features = self
            .params
            .geojson
            .as_ref()
            .and_then(|geojson| geojson.get("features"))
            .and_then(serde_json::Value::as_array);
        match features {
            Some(features) if !features.is_empty() => Ok(()),
            _ => Err(ChartError::InvalidData(
                "choropleth geojson must be a FeatureCollection with at least one feature"
                    .to_owned(),
            )),
        }
    }
}

fn validate_positive(value: Option<u32>, name: &str) -> ChartResult<()> {
    match value {
        Some(value) if value > 0 => Ok(()),
        _ => Err(ChartError::InvalidData(format!("{name} must be > 0"))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::theme::StyleRegistry;

    fn baseline() -> Style {
        StyleRegistry::general()
            .get(crate::theme::BASELINE_STYLE)
            .cloned()
            .expect("baseline style")
    }

    #[test]
    fn single_category_pie_is_rejected() {
        let figure = Figure::new(ChartKind::Pie, "Pie", baseline())
            .with_series(
                FigureSeries::new("Sales", SeriesRole::Value, Column::numeric([1.0, 2.0]))
                    .numeric(),
            )
            .with_series(FigureSeries::new(
                "Month",
                SeriesRole::Label,
                Column::categorical(["Jan", "Jan"]),
            ));
        let err = figure.validate().expect_err("degenerate pie");
        assert!(err.to_string().contains("two categories"));
    }

    #[test]
    fn numeric_role_rejects_categorical_column() {
        let figure = Figure::new(ChartKind::Histogram, "Histogram", baseline())
            .with_series(
                FigureSeries::new("Month", SeriesRole::Value, Column::categorical(["Jan"]))
                    .numeric(),
            )
            .with_params(FigureParams {
                bins: Some(10),
                ..FigureParams::default()
            });
        assert!(figure.validate().is_err());
    }

    #[test]
    fn empty_feature_collection_is_rejected() {
        let figure = Figure::new(ChartKind::Choropleth, "Map", baseline())
            .with_series(FigureSeries::new(
                "state",
                SeriesRole::Location,
                Column::categorical(["CA"]),
            ))
            .with_series(
                FigureSeries::new("value", SeriesRole::Color, Column::numeric([1.0])).numeric(),
            )
            .with_params(FigureParams {
                geojson: Some(json!({ "type": "FeatureCollection", "features": [] })),
                ..FigureParams::default()
            });
        assert!(figure.validate().is_err());
    }

    fn price(name: &str, role: SeriesRole, value: f64) -> FigureSeries {
        FigureSeries::new(name, role, Column::numeric([value])).numeric()
    }

    #[test]
    fn inverted_candle_is_rejected() {
        let figure = Figure::new(ChartKind::Candlestick, "Candles", baseline())
            .with_series(FigureSeries::new("t", SeriesRole::Time, Column::numeric([1.0])))
            .with_series(price("o", SeriesRole::Open, 10.0))
            .with_series(price("h", SeriesRole::High, 9.0))
            .with_series(price("l", SeriesRole::Low, 11.0))
            .with_series(price("c", SeriesRole::Close, 10.0));
        assert!(figure.validate().is_err());
    }
}
