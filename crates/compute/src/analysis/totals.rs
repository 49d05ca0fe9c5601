use formats::{PeriodTable, TimeSeriesRecord};

/// Sum of `record` over `categories`; absent or missing fields count as 0.
pub fn total_across_categories<S: AsRef<str>>(record: &TimeSeriesRecord, categories: &[S]) -> f64 {
    categories
        .iter()
        .filter_map(|c| record.value(c.as_ref()))
        .sum()
}

/// `(period, total)` for every record of `table`, in period order.
pub fn totals_by_period<S: AsRef<str>>(table: &PeriodTable, categories: &[S]) -> Vec<(i32, f64)> {
    table
        .records
        .iter()
        .map(|r| (r.period, total_across_categories(r, categories)))
        .collect()
}
