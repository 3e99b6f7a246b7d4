use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

use crate::error::{ChartError, ChartResult};

pub fn decimal_to_f64(value: Decimal, field_name: &str) -> ChartResult<f64> {
    value.to_f64().ok_or_else(|| {
        ChartError::InvalidData(format!("{field_name} cannot be represented as f64"))
    })
}

#[must_use]
pub fn datetime_to_unix_seconds(time: DateTime<Utc>) -> f64 {
    time.timestamp_millis() as f64 / 1000.0
}

/// Formats a timestamp the way both backends label temporal axes.
#[must_use]
pub fn datetime_to_label(time: DateTime<Utc>) -> String {
    time.to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn decimal_conversion_keeps_value() {
        let value = decimal_to_f64(Decimal::new(12_345, 2), "price").expect("convert");
        assert!((value - 123.45).abs() <= 1e-9);
    }

    #[test]
    fn datetime_label_is_rfc3339_utc() {
        let time = Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).single().expect("time");
        assert_eq!(datetime_to_label(time), "2024-03-01T09:30:00Z");
        assert_eq!(datetime_to_unix_seconds(time), 1_709_285_400.0);
    }
}
