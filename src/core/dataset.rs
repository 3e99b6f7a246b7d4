use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::primitives::{datetime_to_label, decimal_to_f64};
use crate::error::{ChartError, ChartResult};

/// Scalar type carried by a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    Numeric,
    Categorical,
    Temporal,
}

/// One column of uniformly typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "values", rename_all = "snake_case")]
pub enum Column {
    Numeric(Vec<f64>),
    Categorical(Vec<String>),
    Temporal(Vec<DateTime<Utc>>),
}

impl Column {
    #[must_use]
    pub fn numeric(values: impl IntoIterator<Item = f64>) -> Self {
        Self::Numeric(values.into_iter().collect())
    }

    #[must_use]
    pub fn categorical<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::Categorical(values.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn temporal(values: impl IntoIterator<Item = DateTime<Utc>>) -> Self {
        Self::Temporal(values.into_iter().collect())
    }

    /// Builds a numeric column from exact decimal quotes.
    pub fn from_decimals(values: impl IntoIterator<Item = Decimal>) -> ChartResult<Self> {
        values
            .into_iter()
            .map(|value| decimal_to_f64(value, "column value"))
            .collect::<ChartResult<Vec<_>>>()
            .map(Self::Numeric)
    }

    #[must_use]
    pub fn kind(&self) -> ColumnKind {
        match self {
            Self::Numeric(_) => ColumnKind::Numeric,
            Self::Categorical(_) => ColumnKind::Categorical,
            Self::Temporal(_) => ColumnKind::Temporal,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Numeric(values) => values.len(),
            Self::Categorical(values) => values.len(),
            Self::Temporal(values) => values.len(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn as_numeric(&self) -> Option<&[f64]> {
        match self {
            Self::Numeric(values) => Some(values),
            _ => None,
        }
    }

    /// Renders every value as a display label.
    #[must_use]
    pub fn to_labels(&self) -> Vec<String> {
        match self {
            Self::Numeric(values) => values.iter().map(f64::to_string).collect(),
            Self::Categorical(values) => values.clone(),
            Self::Temporal(values) => values.iter().copied().map(datetime_to_label).collect(),
        }
    }
}

/// Ordered collection of equally long named columns.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDataset")]
pub struct Dataset {
    columns: IndexMap<String, Column>,
}

/// Wire shape of [`Dataset`]; converted through `insert_column` so the
/// equal-length rule holds for deserialized data too.
#[derive(Deserialize)]
struct RawDataset {
    columns: IndexMap<String, Column>,
}

impl TryFrom<RawDataset> for Dataset {
    type Error = ChartError;

    fn try_from(raw: RawDataset) -> ChartResult<Self> {
        let mut dataset = Self::default();
        for (name, column) in raw.columns {
            dataset.insert_column(name, column)?;
        }
        Ok(dataset)
    }
}

impl Dataset {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a column, replacing any column with the same name.
    ///
    /// Fails when the column length differs from the existing row count.
    pub fn with_column(mut self, name: impl Into<String>, column: Column) -> ChartResult<Self> {
        self.insert_column(name, column)?;
        Ok(self)
    }

    pub fn insert_column(&mut self, name: impl Into<String>, column: Column) -> ChartResult<()> {
        let name = name.into();
        let existing_rows = self
            .columns
            .iter()
            .find(|(existing, _)| **existing != name)
            .map(|(_, existing)| existing.len());
        if let Some(rows) = existing_rows {
            if rows != column.len() {
                return Err(ChartError::InvalidData(format!(
                    "column `{name}` has {} rows but dataset has {rows}",
                    column.len()
                )));
            }
        }
        self.columns.insert(name, column);
        Ok(())
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.get(name)
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    /// Names of numeric columns in insertion order.
    pub fn numeric_column_names(&self) -> impl Iterator<Item = &str> {
        self.columns
            .iter()
            .filter(|(_, column)| column.kind() == ColumnKind::Numeric)
            .map(|(name, _)| name.as_str())
    }

    #[must_use]
    pub fn row_count(&self) -> usize {
        self.columns.values().next().map_or(0, Column::len)
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.row_count() == 0
    }
}

/// A single named ordered series, as consumed by autocorrelation and lag charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series {
    pub name: String,
    pub values: Column,
}

impl Series {
    #[must_use]
    pub fn new(name: impl Into<String>, values: Column) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    #[must_use]
    pub fn into_dataset(self) -> Dataset {
        let mut columns = IndexMap::with_capacity(1);
        columns.insert(self.name, self.values);
        Dataset { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_ragged_columns() {
        let err = Dataset::new()
            .with_column("a", Column::numeric([1.0, 2.0]))
            .and_then(|data| data.with_column("b", Column::numeric([1.0])))
            .expect_err("ragged");
        assert!(matches!(err, ChartError::InvalidData(_)));
    }

    #[test]
    fn deserialization_rejects_ragged_columns() {
        let json = r#"{"columns":{
            "a":{"kind":"numeric","values":[1.0,2.0,3.0]},
            "b":{"kind":"numeric","values":[1.0]}
        }}"#;
        let err = serde_json::from_str::<Dataset>(json).expect_err("ragged");
        assert!(err.to_string().contains("column `b` has 1 rows but dataset has 3"));
    }

    #[test]
    fn serialized_dataset_deserializes_unchanged() {
        let data = Dataset::new()
            .with_column("Month", Column::categorical(["Jan", "Feb"]))
            .and_then(|data| data.with_column("Sales", Column::numeric([1.0, 2.0])))
            .expect("dataset");
        let json = serde_json::to_string(&data).expect("serialize");
        let back: Dataset = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, data);
    }

    #[test]
    fn replacing_sole_column_may_change_length() {
        let data = Dataset::new()
            .with_column("a", Column::numeric([1.0, 2.0]))
            .and_then(|data| data.with_column("a", Column::numeric([1.0, 2.0, 3.0])))
            .expect("replace");
        assert_eq!(data.row_count(), 3);
        assert_eq!(data.column_count(), 1);
    }

    #[test]
    fn numeric_names_keep_insertion_order() {
        let data = Dataset::new()
            .with_column("z", Column::numeric([1.0]))
            .and_then(|data| data.with_column("label", Column::categorical(["x"])))
            .and_then(|data| data.with_column("a", Column::numeric([2.0])))
            .expect("dataset");
        let names: Vec<_> = data.numeric_column_names().collect();
        assert_eq!(names, ["z", "a"]);
    }
}
