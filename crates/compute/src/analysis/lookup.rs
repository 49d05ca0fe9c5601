use formats::{Observation, normalize_name};

use crate::analysis::statistics::Statistics;

/// Mean of the present values observed at `period`, optionally restricted to
/// one category (matched by normalized name). `None` when nothing matches.
pub fn value_at(observations: &[Observation], period: i32, category: Option<&str>) -> Option<f64> {
    let key = category.map(normalize_name);
    Statistics::mean_present(
        observations
            .iter()
            .filter(|o| o.period == period)
            .filter(|o| key.as_ref().is_none_or(|k| normalize_name(&o.category) == *k))
            .map(|o| o.value),
    )
}

/// Mean across categories at `period`, leaving out `excluded` (e.g. an
/// aggregate row such as the national total).
pub fn mean_excluding(observations: &[Observation], period: i32, excluded: &str) -> Option<f64> {
    let excluded = normalize_name(excluded);
    Statistics::mean_present(
        observations
            .iter()
            .filter(|o| o.period == period && normalize_name(&o.category) != excluded)
            .map(|o| o.value),
    )
}

/// First row whose name joins to `name`.
pub fn find_by_name<'a, T>(rows: &'a [T], name: &str, key: impl Fn(&T) -> &str) -> Option<&'a T> {
    let wanted = normalize_name(name);
    rows.iter().find(|row| normalize_name(key(row)) == wanted)
}

/// Share of `value` within `subset`, in `[0, 1]` for non-negative input.
/// `None` when the subset sums to zero or less.
pub fn share_of(value: f64, subset: &[f64]) -> Option<f64> {
    let total: f64 = subset.iter().sum();
    (total > 0.0).then(|| value / total)
}
