// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cardinality summaries and the join-selectivity rule
//!
//! A `CardinalityStat` summarizes any binary relation of (source, target)
//! pairs. It is produced both as an estimate (by the estimator and planner)
//! and as an exact answer (by the evaluator), so the two can be compared.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Summary of a binary relation of (source, target) pairs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CardinalityStat {
    /// Number of distinct source vertices
    pub distinct_sources: u64,
    /// Number of (source, target) paths
    pub path_count: u64,
    /// Number of distinct target vertices
    pub distinct_targets: u64,
}

impl CardinalityStat {
    pub fn new(distinct_sources: u64, path_count: u64, distinct_targets: u64) -> Self {
        Self {
            distinct_sources,
            path_count,
            distinct_targets,
        }
    }

    /// The empty relation
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// The same relation with source and target roles swapped
    pub fn inverted(&self) -> Self {
        Self {
            distinct_sources: self.distinct_targets,
            path_count: self.path_count,
            distinct_targets: self.distinct_sources,
        }
    }
}

impl fmt::Display for CardinalityStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{{sources: {}, paths: {}, targets: {}}}",
            self.distinct_sources, self.path_count, self.distinct_targets
        )
    }
}

/// Estimate the concatenation `left/right` under a uniformity assumption.
///
/// The shared intermediate vertex set is estimated from both sides
/// (`left.distinct_targets` and `right.distinct_sources`); each estimate
/// bounds the joined path count at `cross / distinct_join_vertices`, and the
/// smaller bound wins. An empty join side makes the whole estimate zero.
pub fn estimate_concatenation(left: &CardinalityStat, right: &CardinalityStat) -> CardinalityStat {
    let v_join = left.distinct_targets;
    let u_join = right.distinct_sources;
    if v_join == 0 || u_join == 0 {
        return CardinalityStat::zero();
    }

    let cross_paths = left.path_count as f64 * right.path_count as f64;
    let by_left = cross_paths / v_join as f64;
    let by_right = cross_paths / u_join as f64;
    let path_count = by_left.min(by_right);

    CardinalityStat {
        distinct_sources: left.distinct_sources,
        path_count: saturating_count(path_count),
        distinct_targets: right.distinct_targets,
    }
}

/// Running cost of a plan: the sum of the estimated intermediate path counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanCost {
    pub intermediate_paths: f64,
    pub joins: usize,
}

impl PlanCost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one join producing `result`
    pub fn add_join(&mut self, result: &CardinalityStat) {
        self.intermediate_paths += result.path_count as f64;
        self.joins += 1;
    }

    pub fn total_cost(&self) -> f64 {
        self.intermediate_paths
    }
}

fn saturating_count(value: f64) -> u64 {
    if !value.is_finite() || value >= u64::MAX as f64 {
        u64::MAX
    } else {
        value.max(0.0) as u64
    }
}
