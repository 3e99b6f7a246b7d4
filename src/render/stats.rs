//! Summary statistics the backends derive from figure columns.

pub(crate) fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson correlation; `NaN` when either column has zero variance.
pub(crate) fn pearson(a: &[f64], b: &[f64]) -> f64 {
    let (mean_a, mean_b) = (mean(a), mean(b));
    let mut covariance = 0.0;
    let mut variance_a = 0.0;
    let mut variance_b = 0.0;
    for (&a, &b) in a.iter().zip(b) {
        covariance += (a - mean_a) * (b - mean_b);
        variance_a += (a - mean_a).powi(2);
        variance_b += (b - mean_b).powi(2);
    }
    covariance / (variance_a * variance_b).sqrt()
}

/// Sample autocorrelation for lags `1..n`, normalized by the lag-0 variance.
pub(crate) fn autocorrelation(values: &[f64]) -> Vec<f64> {
    let n = values.len();
    let mean = mean(values);
    let c0 = values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / n as f64;
    (1..n)
        .map(|lag| {
            let c = values[..n - lag]
                .iter()
                .zip(&values[lag..])
                .map(|(a, b)| (a - mean) * (b - mean))
                .sum::<f64>()
                / n as f64;
            c / c0
        })
        .collect()
}

/// Finite `(min, max)` of `values`, or `None` when nothing is finite.
pub(crate) fn extent(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|value| value.is_finite())
        .fold(None, |acc, value| match acc {
            None => Some((value, value)),
            Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
        })
}

/// Equal-width bins over the finite values: `(left edges, counts, width)`.
pub(crate) fn histogram(values: &[f64], bins: usize) -> (Vec<f64>, Vec<usize>, f64) {
    let bins = bins.max(1);
    let Some((lo, hi)) = extent(values.iter().copied()) else {
        return (Vec::new(), Vec::new(), 0.0);
    };
    let width = if hi > lo { (hi - lo) / bins as f64 } else { 1.0 };
    let mut counts = vec![0; bins];
    for value in values.iter().copied().filter(|value| value.is_finite()) {
        let index = (((value - lo) / width) as usize).min(bins - 1);
        counts[index] += 1;
    }
    let edges = (0..bins).map(|bin| lo + bin as f64 * width).collect();
    (edges, counts, width)
}

/// Linear-interpolated quantile of already sorted values.
pub(crate) fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * fraction
}

/// Finite values in ascending order.
pub(crate) fn sorted_finite(values: &[f64]) -> Vec<f64> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    sorted
}

/// Gaussian kernel density at `points`, Silverman bandwidth.
pub(crate) fn kernel_density(values: &[f64], points: &[f64]) -> Vec<f64> {
    let n = values.len() as f64;
    let mean = mean(values);
    let std_dev = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let bandwidth = if std_dev > 0.0 {
        1.06 * std_dev * n.powf(-0.2)
    } else {
        1.0
    };
    let norm = n * bandwidth * (2.0 * std::f64::consts::PI).sqrt();
    points
        .iter()
        .map(|point| {
            values
                .iter()
                .map(|value| (-0.5 * ((point - value) / bandwidth).powi(2)).exp())
                .sum::<f64>()
                / norm
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn pearson_of_linear_columns_is_one() {
        assert_relative_eq!(pearson(&[1.0, 2.0, 3.0], &[2.0, 4.0, 6.0]), 1.0);
        assert_relative_eq!(pearson(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]), -1.0);
        assert!(pearson(&[1.0, 1.0], &[1.0, 2.0]).is_nan());
    }

    #[test]
    fn autocorrelation_of_alternating_series_is_negative_at_lag_one() {
        let acf = autocorrelation(&[1.0, -1.0, 1.0, -1.0]);
        assert_eq!(acf.len(), 3);
        assert_relative_eq!(acf[0], -0.75);
        assert_relative_eq!(acf[1], 0.5);
    }

    #[test]
    fn histogram_puts_the_maximum_in_the_last_bin() {
        let (edges, counts, width) = histogram(&[0.0, 1.0, 2.0, 3.0, 4.0], 4);
        assert_eq!(counts, [1, 1, 1, 2]);
        assert_relative_eq!(width, 1.0);
        assert_relative_eq!(edges[3], 3.0);
    }

    #[test]
    fn quantiles_interpolate_between_ranks() {
        let sorted = sorted_finite(&[4.0, 1.0, f64::NAN, 3.0, 2.0]);
        assert_eq!(sorted, [1.0, 2.0, 3.0, 4.0]);
        assert_relative_eq!(quantile(&sorted, 0.5), 2.5);
        assert_relative_eq!(quantile(&sorted, 0.25), 1.75);
    }

    #[test]
    fn density_peaks_at_the_data() {
        let density = kernel_density(&[0.0, 0.0, 0.1], &[0.0, 5.0]);
        assert!(density[0] > density[1]);
    }
}
