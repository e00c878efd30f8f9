use std::collections::HashMap;
use std::hash::Hash;

use crate::data::{Dataset, Record};
use crate::error::{ChartError, Result};

/// Records partitioned by key. Keys iterate in the order they were first seen.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupedSeries<K> {
    groups: Vec<(K, Vec<Record>)>,
}

impl<K: Copy + Eq + Hash> GroupedSeries<K> {
    pub fn keys(&self) -> Vec<K> {
        self.groups.iter().map(|(k, _)| *k).collect()
    }

    pub fn get(&self, key: &K) -> Option<&[Record]> {
        self.groups
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, records)| records.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, &[Record])> + '_ {
        self.groups.iter().map(|(k, records)| (*k, records.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Compute one value per group, keeping key order. The first failure aborts.
    pub fn map_values<F>(&self, mut f: F) -> Result<Vec<(K, f64)>>
    where
        F: FnMut(&[Record]) -> Result<f64>,
    {
        self.iter().map(|(k, records)| Ok((k, f(records)?))).collect()
    }
}

/// Partition a dataset by `key_fn`.
pub fn group_by<K, F>(dataset: &Dataset, key_fn: F) -> GroupedSeries<K>
where
    K: Copy + Eq + Hash,
    F: Fn(&Record) -> K,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<Record>)> = Vec::new();

    for record in dataset {
        let key = key_fn(record);
        let slot = *index.entry(key).or_insert_with(|| {
            groups.push((key, Vec::new()));
            groups.len() - 1
        });
        groups[slot].1.push(*record);
    }

    GroupedSeries { groups }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggOp {
    Mean,
    Sum,
    Count,
}

impl AggOp {
    fn name(self) -> &'static str {
        match self {
            AggOp::Mean => "mean",
            AggOp::Sum => "sum",
            AggOp::Count => "count",
        }
    }
}

/// Reduce a group to a single number. Empty groups are an error for every op.
pub fn aggregate<F>(group: &[Record], value_fn: F, op: AggOp) -> Result<f64>
where
    F: Fn(&Record) -> f64,
{
    if group.is_empty() {
        return Err(ChartError::EmptyGroup { op: op.name() });
    }
    // Left-to-right accumulation in record order
    let sum = || group.iter().map(&value_fn).fold(0.0, |acc, v| acc + v);
    Ok(match op {
        AggOp::Count => group.len() as f64,
        AggOp::Sum => sum(),
        AggOp::Mean => sum() / group.len() as f64,
    })
}

/// R-7 quantile of already sorted values.
pub fn quantile(sorted: &[f64], p: f64) -> Result<f64> {
    if !(0.0..=1.0).contains(&p) {
        return Err(ChartError::InvalidParameter { name: "quantile probability", value: p });
    }
    let n = sorted.len();
    if n == 0 {
        return Err(ChartError::EmptyGroup { op: "quantile" });
    }
    if n == 1 {
        return Ok(sorted[0]);
    }

    let rank = p * (n - 1) as f64;
    let lower_idx = rank.floor() as usize;
    let upper_idx = rank.ceil() as usize;

    if lower_idx == upper_idx {
        Ok(sorted[lower_idx])
    } else {
        let weight = rank - lower_idx as f64;
        Ok(sorted[lower_idx] * (1.0 - weight) + sorted[upper_idx] * weight)
    }
}

/// Median of unsorted values.
pub fn median(values: &[f64]) -> Result<f64> {
    quantile(&sorted_copy(values), 0.5)
}

pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// Summary statistics of one group, computed from a single sorted copy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryStat {
    pub count: usize,
    pub sum: Option<f64>,
    pub mean: Option<f64>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub median: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
}

pub fn summarize(values: &[f64]) -> Result<SummaryStat> {
    if values.is_empty() {
        return Err(ChartError::EmptyGroup { op: "summary" });
    }
    let sorted = sorted_copy(values);
    let sum = values.iter().fold(0.0, |acc, v| acc + v);

    Ok(SummaryStat {
        count: values.len(),
        sum: Some(sum),
        mean: Some(sum / values.len() as f64),
        min: sorted.first().copied(),
        max: sorted.last().copied(),
        median: Some(quantile(&sorted, 0.5)?),
        q1: Some(quantile(&sorted, 0.25)?),
        q3: Some(quantile(&sorted, 0.75)?),
    })
}
