//! Pure statistics helpers shared by the scoring and valuation engines.

/// Arithmetic mean. Empty input yields 0.0.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n, not n - 1).
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Compound annual growth rate in percent:
/// ((end / start)^(1/periods) - 1) * 100, floored at 0.
///
/// A non-positive start value has no computable growth base and yields 0.
pub fn compound_growth_rate(start: f64, end: f64, periods: u32) -> f64 {
    if start <= 0.0 || periods == 0 {
        return 0.0;
    }
    let ratio = end / start;
    let cagr = (ratio.powf(1.0 / periods as f64) - 1.0) * 100.0;
    // max() also absorbs the NaN from a negative ratio
    cagr.max(0.0)
}
