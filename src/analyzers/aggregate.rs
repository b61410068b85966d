use crate::analyzers::utility::{max, mean, min};
use crate::stats::ScoredRecord;
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::hash::Hash;

/// Returns at most `n` records ordered by `key` descending.
///
/// The sort is stable, so records with equal keys keep their input order.
pub fn top_n<F>(records: &[ScoredRecord], n: usize, key: F) -> Vec<ScoredRecord>
where
    F: Fn(&ScoredRecord) -> f64,
{
    let mut sorted: Vec<&ScoredRecord> = records.iter().collect();
    sorted.sort_by(|a, b| key(b).total_cmp(&key(a)));
    sorted.into_iter().take(n).cloned().collect()
}

/// Top `n` records by QPR.
pub fn top_n_by_qpr(records: &[ScoredRecord], n: usize) -> Vec<ScoredRecord> {
    top_n(records, n, |r| r.qpr)
}

/// Summary of one group of scored records.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupSummary<K> {
    pub key: K,
    pub count: usize,
    pub mean_qpr: f64,
    pub mean_price: f64,
    pub max_price: f64,
}

/// Groups records by `key_of` and summarises each group. Records whose key
/// is `None` belong to no group.
///
/// The map is unordered; use [`rank_groups`] to impose the display order.
pub fn group_by<K, F>(records: &[ScoredRecord], key_of: F) -> HashMap<K, GroupSummary<K>>
where
    K: Eq + Hash + Clone,
    F: Fn(&ScoredRecord) -> Option<K>,
{
    let mut series: HashMap<K, (Vec<f64>, Vec<f64>)> = HashMap::new();

    for r in records {
        let Some(key) = key_of(r) else {
            continue;
        };
        let (qprs, prices) = series.entry(key).or_default();
        qprs.push(r.qpr);
        prices.push(r.price_avg);
    }

    series
        .into_iter()
        .filter_map(|(key, (qprs, prices))| {
            let summary = GroupSummary {
                key: key.clone(),
                count: qprs.len(),
                mean_qpr: mean(&qprs)?,
                mean_price: mean(&prices)?,
                max_price: max(&prices)?,
            };
            Some((key, summary))
        })
        .collect()
}

/// Drops groups with fewer than `min_count` members, sorts the rest by mean
/// QPR descending (ties by key ascending) and keeps the first `limit`.
pub fn rank_groups<K: Ord>(
    groups: HashMap<K, GroupSummary<K>>,
    min_count: usize,
    limit: usize,
) -> Vec<GroupSummary<K>> {
    let mut ranked: Vec<GroupSummary<K>> = groups
        .into_values()
        .filter(|g| g.count >= min_count)
        .collect();

    ranked.sort_by(|a, b| match b.mean_qpr.total_cmp(&a.mean_qpr) {
        Ordering::Equal => a.key.cmp(&b.key),
        other => other,
    });
    ranked.truncate(limit);
    ranked
}

/// Rescales each column of `matrix` to `[0, 1]` with `(v - min) / (max - min)`.
///
/// A column whose values are all equal has no range; its cells become `0.0`.
pub fn normalize_min_max(matrix: &[Vec<f64>]) -> Vec<Vec<f64>> {
    let width = matrix.iter().map(Vec::len).max().unwrap_or(0);

    let bounds: Vec<Option<(f64, f64)>> = (0..width)
        .map(|c| {
            let column: Vec<f64> =
                matrix.iter().filter_map(|row| row.get(c).copied()).collect();
            Some((min(&column)?, max(&column)?))
        })
        .collect();

    matrix
        .iter()
        .map(|row| {
            row.iter()
                .zip(&bounds)
                .map(|(v, b)| match b {
                    Some((lo, hi)) if hi > lo => (v - lo) / (hi - lo),
                    _ => 0.0,
                })
                .collect()
        })
        .collect()
}
