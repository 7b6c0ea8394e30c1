// Quantile summaries for box-plot buckets

use serde::Serialize;
use std::hash::Hash;

use crate::error::ChartError;
use crate::group::Groups;

/// Five-number summary of one bucket
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QuantileSummary {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl QuantileSummary {
    pub fn iqr(&self) -> f64 {
        self.q3 - self.q1
    }
}

/// Linear-interpolation quantile (R-7) of already sorted data.
/// Returns `None` for empty input.
pub fn quantile_sorted(sorted_data: &[f64], p: f64) -> Option<f64> {
    let n = sorted_data.len();
    if n == 0 {
        return None;
    }
    if n == 1 {
        return Some(sorted_data[0]);
    }

    let rank = p.clamp(0.0, 1.0) * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    let lower = sorted_data[lower_idx];
    if lower_idx == upper_idx {
        Some(lower)
    } else {
        let weight = rank - lower_idx as f64;
        Some(lower + weight * (sorted_data[upper_idx] - lower))
    }
}

/// Summarize a bucket's values. Input order does not matter.
pub fn summarize(values: &[f64]) -> Result<QuantileSummary, ChartError> {
    if values.is_empty() {
        return Err(ChartError::EmptyGroup { key: None });
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let at = |p: f64| quantile_sorted(&sorted, p).ok_or(ChartError::EmptyGroup { key: None });

    Ok(QuantileSummary {
        min: sorted[0],
        q1: at(0.25)?,
        median: at(0.50)?,
        q3: at(0.75)?,
        max: sorted[sorted.len() - 1],
    })
}

/// Summarize every bucket of `groups`, in bucket order, using `value`
/// to pull the measured number out of each record
pub fn summarize_groups<K, R, F>(groups: &Groups<K, R>, value: F) -> Result<Vec<(K, QuantileSummary)>, ChartError>
where
    K: Clone + Eq + Hash + ToString,
    F: Fn(&R) -> f64,
{
    groups
        .iter()
        .map(|(key, bucket)| {
            let values: Vec<f64> = bucket.iter().map(&value).collect();
            summarize(&values)
                .map(|summary| (key.clone(), summary))
                .map_err(|_| ChartError::EmptyGroup { key: Some(key.to_string()) })
        })
        .collect()
}
