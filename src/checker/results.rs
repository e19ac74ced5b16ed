//! Ordered probe results and their summary statistics

use crate::checker::ProbeResult;
use std::collections::BTreeMap;

/// Ordered outcome of one run; `results[i]` belongs to input channel `i`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    results: Vec<ProbeResult>,
}

/// Aggregate statistics over a `ResultSet`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Summary {
    /// Number of probed channels
    pub total: usize,

    /// Channels that answered with a status below 400
    pub available: usize,

    /// `total - available`
    pub unavailable: usize,

    /// Unavailable channels that were skipped for their scheme
    pub unsupported: usize,

    /// `available / total`, 0 when empty
    pub success_rate: f64,

    /// Mean latency over available channels, 0 when none
    pub avg_latency_ms: f64,

    /// Count per status category (`ok`, `timeout`, `bad status`, ...)
    pub by_status: BTreeMap<&'static str, usize>,
}

impl Summary {
    /// Success rate as a percentage
    pub fn success_percent(&self) -> f64 {
        self.success_rate * 100.0
    }
}

impl ResultSet {
    pub fn new(results: Vec<ProbeResult>) -> Self {
        Self { results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ProbeResult> {
        self.results.iter()
    }

    pub fn get(&self, index: usize) -> Option<&ProbeResult> {
        self.results.get(index)
    }

    pub fn as_slice(&self) -> &[ProbeResult] {
        &self.results
    }

    /// Reachable results in input order
    pub fn available(&self) -> Vec<&ProbeResult> {
        self.results.iter().filter(|r| r.reachable()).collect()
    }

    /// Unreachable results in input order
    pub fn unavailable(&self) -> Vec<&ProbeResult> {
        self.results.iter().filter(|r| !r.reachable()).collect()
    }

    /// Count of results per status category
    pub fn status_breakdown(&self) -> BTreeMap<&'static str, usize> {
        self.summary().by_status
    }

    /// Computes summary statistics
    ///
    /// An empty set yields all zeros rather than NaN.
    pub fn summary(&self) -> Summary {
        summarize(&self.results)
    }
}

/// Summary over any slice of results
pub fn summarize(results: &[ProbeResult]) -> Summary {
    let total = results.len();
    let latencies: Vec<u64> = results.iter().filter_map(|r| r.latency_ms()).collect();
    let available = latencies.len();
    let unsupported = results
        .iter()
        .filter(|r| r.status().needs_manual_check())
        .count();

    let success_rate = if total > 0 {
        available as f64 / total as f64
    } else {
        0.0
    };

    let avg_latency_ms = if available > 0 {
        latencies.iter().sum::<u64>() as f64 / available as f64
    } else {
        0.0
    };

    let mut by_status = BTreeMap::new();
    for result in results {
        *by_status.entry(result.status().category()).or_insert(0) += 1;
    }

    Summary {
        total,
        available,
        unavailable: total - available,
        unsupported,
        success_rate,
        avg_latency_ms,
        by_status,
    }
}

impl FromIterator<ProbeResult> for ResultSet {
    fn from_iter<I: IntoIterator<Item = ProbeResult>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ResultSet {
    type Item = &'a ProbeResult;
    type IntoIter = std::slice::Iter<'a, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}
