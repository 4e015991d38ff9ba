//! Descriptive statistics over number columns.

/// Count, mean, spread and quartiles of a set of values.
///
/// Quartiles use linear interpolation between closest ranks, and the standard
/// deviation is the sample one (`n - 1` in the denominator).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// `None` with fewer than two values.
    pub std: Option<f64>,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Value at quantile `q` (0..=1) of ascending `sorted` values.
pub fn quantile(sorted: &[f64], q: f64) -> Option<f64> {
    let last = sorted.len().checked_sub(1)?;
    let position = q.clamp(0.0, 1.0) * last as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Summarize values, or `None` when there are none.
pub fn summarize(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let count = sorted.len();
    let mean = sorted.iter().sum::<f64>() / count as f64;
    let std = (count > 1).then(|| {
        let squares: f64 = sorted.iter().map(|v| (v - mean).powi(2)).sum();
        (squares / (count - 1) as f64).sqrt()
    });
    Some(NumericSummary {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25)?,
        median: quantile(&sorted, 0.5)?,
        q75: quantile(&sorted, 0.75)?,
        max: sorted[count - 1],
    })
}
