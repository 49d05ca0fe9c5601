/// Aggregates over possibly-missing measurements. Missing values are skipped,
/// never treated as zero.
pub struct Statistics;

impl Statistics {
    pub fn sum_present<I>(values: I) -> f64
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        values.into_iter().flatten().sum()
    }

    pub fn mean_present<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut sum = 0.0;
        let mut count = 0usize;
        for v in values.into_iter().flatten() {
            sum += v;
            count += 1;
        }
        (count > 0).then(|| sum / count as f64)
    }

    pub fn max_present<I>(values: I) -> Option<f64>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        values.into_iter().flatten().reduce(f64::max)
    }

    /// `(min, max)` of the present values.
    pub fn extent<I>(values: I) -> Option<(f64, f64)>
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        let mut present = values.into_iter().flatten();
        let first = present.next()?;
        Some(present.fold((first, first), |(lo, hi), v| (lo.min(v), hi.max(v))))
    }
}
