//! Small aggregation helpers shared by the view builders.

use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LabelMean {
    pub label: String,
    pub mean: f64,
    pub count: usize,
}

pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Median with the midpoint average for even lengths.
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Counts labels and returns the `limit` most frequent, ties broken by
/// label so the output is stable.
pub fn top_labels<'a, I>(labels: I, limit: usize) -> Vec<LabelCount>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_insert(0) += 1;
    }
    let mut list: Vec<LabelCount> = counts
        .into_iter()
        .map(|(label, count)| LabelCount {
            label: label.to_string(),
            count,
        })
        .collect();
    list.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    list.truncate(limit);
    list
}

/// Descending order for optional floats with missing values last.
pub fn cmp_desc_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_and_median() {
        assert_eq!(mean(&[]), None);
        assert_eq!(median(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(median(&[6.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median(&[4.0, 1.0, 3.0, 2.0]), Some(2.5));
    }

    #[test]
    fn test_top_labels_orders_by_count_then_label() {
        let labels = ["Drama", "Action", "Comedy", "Action", "Drama", "Romance"];
        let top = top_labels(labels, 3);
        assert_eq!(
            top,
            vec![
                LabelCount {
                    label: "Action".to_string(),
                    count: 2
                },
                LabelCount {
                    label: "Drama".to_string(),
                    count: 2
                },
                LabelCount {
                    label: "Comedy".to_string(),
                    count: 1
                },
            ]
        );
    }

    #[test]
    fn test_cmp_desc_missing_last() {
        let mut values = vec![Some(7.0), None, Some(9.0), Some(8.0)];
        values.sort_by(|a, b| cmp_desc_missing_last(*a, *b));
        assert_eq!(values, vec![Some(9.0), Some(8.0), Some(7.0), None]);
    }
}
