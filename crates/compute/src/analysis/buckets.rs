use formats::OTHER_CATEGORY;

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub label: String,
    pub value: f64,
    pub is_other: bool,
}

/// Folds categories under `threshold * total` into a trailing "Other" entry.
///
/// Kept entries stay in input order. "Other" is only emitted when the folded
/// sum is positive. For non-negative inputs the output total equals the input
/// total; a negative folded sum is dropped.
pub fn bucket_small_categories<S: AsRef<str>>(values: &[(S, f64)], threshold: f64) -> Vec<Bucket> {
    let total: f64 = values.iter().map(|(_, v)| v).sum();
    let cutoff = threshold * total;

    let mut out = Vec::with_capacity(values.len() + 1);
    let mut other = 0.0;
    for (label, value) in values {
        if *value >= cutoff {
            out.push(Bucket {
                label: label.as_ref().to_string(),
                value: *value,
                is_other: false,
            });
        } else {
            other += value;
        }
    }
    if other > 0.0 {
        out.push(Bucket {
            label: OTHER_CATEGORY.to_string(),
            value: other,
            is_other: true,
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::bucket_small_categories;
    use pretty_assertions::assert_eq;

    fn labels(buckets: &[super::Bucket]) -> Vec<&str> {
        buckets.iter().map(|b| b.label.as_str()).collect()
    }

    #[test]
    fn small_slices_fold_into_trailing_other() {
        let values = [("ON", 60.0), ("PE", 2.0), ("QC", 30.0), ("YT", 1.0), ("BC", 7.0)];
        let buckets = bucket_small_categories(&values, 0.05);
        assert_eq!(labels(&buckets), vec!["ON", "QC", "BC", "Other"]);
        assert_eq!(buckets[3].value, 3.0);
        assert!(buckets[3].is_other);
    }

    #[test]
    fn bucketing_preserves_total() {
        let values = [("a", 0.4), ("b", 11.3), ("c", 0.01), ("d", 97.0), ("e", 2.2)];
        let total: f64 = values.iter().map(|(_, v)| v).sum();
        for threshold in [0.0, 0.01, 0.05, 0.2, 1.0] {
            let sum: f64 = bucket_small_categories(&values, threshold)
                .iter()
                .map(|b| b.value)
                .sum();
            assert!((sum - total).abs() < 1e-9, "threshold {threshold}");
        }
    }

    #[test]
    fn no_other_when_nothing_is_folded() {
        let buckets = bucket_small_categories(&[("a", 50.0), ("b", 50.0)], 0.05);
        assert_eq!(labels(&buckets), vec!["a", "b"]);
        let zeros = bucket_small_categories(&[("a", 10.0), ("z", 0.0)], 0.05);
        assert_eq!(labels(&zeros), vec!["a"]);
    }

    #[test]
    fn negative_folded_sum_is_dropped() {
        let buckets = bucket_small_categories(&[("a", 10.0), ("b", -1.0)], 0.05);
        assert_eq!(labels(&buckets), vec!["a"]);
        assert_eq!(buckets.iter().map(|b| b.value).sum::<f64>(), 10.0);
    }

    #[test]
    fn value_exactly_at_threshold_is_kept() {
        let buckets = bucket_small_categories(&[("a", 95.0), ("b", 5.0)], 0.05);
        assert_eq!(labels(&buckets), vec!["a", "b"]);
    }
}
