/// Arithmetic mean of `values`, or `0.0` when empty.
///
/// # Examples
///
/// ```
/// use tempo_stats::average;
///
/// assert_eq!(average(&[1.0, 2.0, 3.0]), 2.0);
/// assert_eq!(average(&[]), 0.0);
/// ```
#[must_use]
pub fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Median of `values`, or `0.0` when empty.
///
/// Even-length input averages the two middle elements.
///
/// # Examples
///
/// ```
/// use tempo_stats::median;
///
/// assert_eq!(median(&[3.0, 1.0, 2.0]), 2.0);
/// assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), 2.5);
/// ```
#[must_use]
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Nearest-rank percentile of `values`, or `0.0` when empty.
///
/// Sorts ascending and picks index `ceil(p / 100 * n) - 1`, clamped to the
/// valid range, so `p <= 0` yields the smallest element and `p >= 100` the
/// largest. Monotonic in `p`.
///
/// # Examples
///
/// ```
/// use tempo_stats::percentile;
///
/// let values = [15.0, 20.0, 35.0, 40.0, 50.0];
/// assert_eq!(percentile(&values, 30.0), 20.0);
/// assert_eq!(percentile(&values, 90.0), 50.0);
/// assert_eq!(percentile(&values, 0.0), 15.0);
/// ```
#[must_use]
pub fn percentile(values: &[f64], p: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let rank = (p / 100.0 * sorted.len() as f64).ceil() as isize - 1;
    let idx = rank.clamp(0, sorted.len() as isize - 1) as usize;
    sorted[idx]
}

/// Sum of `values`.
///
/// # Examples
///
/// ```
/// use tempo_stats::sum;
///
/// assert_eq!(sum(&[1.5, 2.5]), 4.0);
/// assert_eq!(sum(&[]), 0.0);
/// ```
#[must_use]
pub fn sum(values: &[f64]) -> f64 {
    values.iter().sum()
}

/// Smallest of `values`, or `0.0` when empty.
///
/// # Examples
///
/// ```
/// use tempo_stats::min_value;
///
/// assert_eq!(min_value(&[3.0, 1.0, 2.0]), 1.0);
/// assert_eq!(min_value(&[]), 0.0);
/// ```
#[must_use]
pub fn min_value(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().copied().fold(f64::INFINITY, f64::min)
    }
}

/// Largest of `values`, or `0.0` when empty.
///
/// # Examples
///
/// ```
/// use tempo_stats::max_value;
///
/// assert_eq!(max_value(&[3.0, 1.0, 2.0]), 3.0);
/// assert_eq!(max_value(&[]), 0.0);
/// ```
#[must_use]
pub fn max_value(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Population standard deviation of `values`, or `0.0` when empty.
///
/// # Examples
///
/// ```
/// use tempo_stats::std_dev;
///
/// assert_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
/// assert_eq!(std_dev(&[]), 0.0);
/// ```
#[must_use]
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = average(values);
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// `part` as a percentage of `whole`, rounded to 2 decimals.
///
/// A zero `whole` yields `0.0` rather than a division error.
///
/// # Examples
///
/// ```
/// use tempo_stats::percentage;
///
/// assert_eq!(percentage(1.0, 3.0), 33.33);
/// assert_eq!(percentage(5.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn percentage(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    round2(part / whole * 100.0)
}

/// Percentage change from `previous` to `current`, rounded to 2 decimals.
///
/// A zero `previous` yields `100.0` when `current` is positive and `0.0`
/// otherwise, so a metric appearing from nothing reads as full growth.
///
/// # Examples
///
/// ```
/// use tempo_stats::percentage_change;
///
/// assert_eq!(percentage_change(150.0, 100.0), 50.0);
/// assert_eq!(percentage_change(5.0, 0.0), 100.0);
/// assert_eq!(percentage_change(0.0, 0.0), 0.0);
/// ```
#[must_use]
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round2((current - previous) / previous * 100.0)
}

/// Round to 2 decimal places.
///
/// # Examples
///
/// ```
/// use tempo_stats::round2;
///
/// assert_eq!(round2(2.456), 2.46);
/// ```
#[must_use]
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Drop IQR outliers from `values` using the standard 1.5 fence.
///
/// See [`filter_outliers_with`].
#[must_use]
pub fn filter_outliers(values: &[f64]) -> Vec<f64> {
    filter_outliers_with(values, 1.5)
}

/// Drop values outside `[Q1 - multiplier*IQR, Q3 + multiplier*IQR]`.
///
/// Fewer than 4 samples give no meaningful quartiles, so short input is
/// returned unchanged.
///
/// # Examples
///
/// ```
/// use tempo_stats::filter_outliers_with;
///
/// let values = [1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 100.0];
/// let kept = filter_outliers_with(&values, 1.5);
/// assert!(!kept.contains(&100.0));
/// assert_eq!(kept.len(), 6);
/// ```
#[must_use]
pub fn filter_outliers_with(values: &[f64], multiplier: f64) -> Vec<f64> {
    if values.len() < 4 {
        return values.to_vec();
    }
    let q1 = percentile(values, 25.0);
    let q3 = percentile(values, 75.0);
    let iqr = q3 - q1;
    let lower = q1 - multiplier * iqr;
    let upper = q3 + multiplier * iqr;
    values
        .iter()
        .copied()
        .filter(|v| *v >= lower && *v <= upper)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_handles_empty_and_nonempty() {
        assert_eq!(average(&[]), 0.0);
        assert_eq!(average(&[10.0]), 10.0);
        assert_eq!(average(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn median_odd_and_even_counts() {
        assert_eq!(median(&[]), 0.0);
        assert_eq!(median(&[5.0]), 5.0);
        assert_eq!(median(&[9.0, 1.0, 5.0]), 5.0);
        assert_eq!(median(&[1.0, 2.0, 3.0, 4.0]), 2.5);
    }

    #[test]
    fn percentile_nearest_rank() {
        let values = [15.0, 20.0, 35.0, 40.0, 50.0];
        assert_eq!(percentile(&values, 5.0), 15.0);
        assert_eq!(percentile(&values, 30.0), 20.0);
        assert_eq!(percentile(&values, 40.0), 20.0);
        assert_eq!(percentile(&values, 50.0), 35.0);
        assert_eq!(percentile(&values, 100.0), 50.0);
    }

    #[test]
    fn percentile_is_monotonic_in_p() {
        let values = [3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0];
        let mut last = f64::MIN;
        for p in (0..=100).step_by(5) {
            let v = percentile(&values, f64::from(p));
            assert!(v >= last, "p{p} gave {v}, below previous {last}");
            last = v;
        }
    }

    #[test]
    fn percentile_clamps_out_of_range_p() {
        let values = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&values, -10.0), 1.0);
        assert_eq!(percentile(&values, 0.0), 1.0);
        assert_eq!(percentile(&values, 150.0), 3.0);
        assert_eq!(percentile(&[], 90.0), 0.0);
    }

    #[test]
    fn sum_min_max_handle_empty_input() {
        assert_eq!(sum(&[]), 0.0);
        assert_eq!(min_value(&[]), 0.0);
        assert_eq!(max_value(&[]), 0.0);
        let values = [4.0, -1.0, 2.5];
        assert_eq!(sum(&values), 5.5);
        assert_eq!(min_value(&values), -1.0);
        assert_eq!(max_value(&values), 4.0);
    }

    #[test]
    fn std_dev_population_formula() {
        assert_eq!(std_dev(&[]), 0.0);
        assert_eq!(std_dev(&[4.0, 4.0, 4.0]), 0.0);
        assert_eq!(std_dev(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]), 2.0);
    }

    #[test]
    fn percentage_guards_zero_whole() {
        assert_eq!(percentage(5.0, 0.0), 0.0);
        assert_eq!(percentage(0.0, 0.0), 0.0);
        assert_eq!(percentage(1.0, 4.0), 25.0);
        assert_eq!(percentage(2.0, 3.0), 66.67);
    }

    #[test]
    fn percentage_change_guards_zero_previous() {
        assert_eq!(percentage_change(10.0, 0.0), 100.0);
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
        assert_eq!(percentage_change(-3.0, 0.0), 0.0);
        assert_eq!(percentage_change(50.0, 100.0), -50.0);
        assert_eq!(percentage_change(110.0, 100.0), 10.0);
    }

    #[test]
    fn round2_rounds_half_away_from_zero() {
        assert_eq!(round2(2.456), 2.46);
        assert_eq!(round2(1.004), 1.0);
        // 2.125 * 100 is exactly 212.5, so the half case is actually hit.
        assert_eq!(round2(2.125), 2.13);
        assert_eq!(round2(-2.125), -2.13);
    }

    #[test]
    fn filter_outliers_passes_short_input_through() {
        let values = [1.0, 2.0, 1000.0];
        assert_eq!(filter_outliers(&values), values.to_vec());
    }

    #[test]
    fn filter_outliers_drops_extremes() {
        let values = [10.0, 12.0, 12.0, 13.0, 12.0, 11.0, 500.0];
        let kept = filter_outliers(&values);
        assert!(!kept.contains(&500.0));
        assert_eq!(kept.len(), 6);
    }

    #[test]
    fn filter_outliers_multiplier_widens_fence() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0, 20.0];
        let strict = filter_outliers_with(&values, 1.5);
        let loose = filter_outliers_with(&values, 10.0);
        assert!(strict.len() <= loose.len());
        assert!(loose.contains(&20.0));
    }
}
