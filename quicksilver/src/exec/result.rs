// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query result types

use serde::{Deserialize, Serialize};

use crate::plan::cost::CardinalityStat;

/// Outcome of one path query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResult {
    /// Query text as submitted
    pub query: String,
    /// Exact statistics of the answer set
    pub stats: CardinalityStat,
    /// Planner estimate for the whole chain, if the query was planned
    pub estimate: Option<CardinalityStat>,
    /// Bracketing that was evaluated, if the query was planned
    pub plan: Option<String>,
    pub execution_time_ms: u64,
    /// Diagnostics for recovered problems (e.g. a malformed atom)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<String>,
}

impl QueryResult {
    pub fn new(query: impl Into<String>, stats: CardinalityStat) -> Self {
        Self {
            query: query.into(),
            stats,
            estimate: None,
            plan: None,
            execution_time_ms: 0,
            warnings: Vec::new(),
        }
    }

    /// Zero result for a query whose text could not be turned into atoms
    pub fn malformed(query: impl Into<String>, atom: &str) -> Self {
        let mut result = Self::new(query, CardinalityStat::zero());
        result
            .warnings
            .push(format!("Label parsing failed for atom '{}'", atom));
        result
    }

    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Ratio of the larger to the smaller of estimated and actual path
    /// counts (the q-error). `None` without an estimate; both sides are
    /// clamped to at least one path.
    pub fn q_error(&self) -> Option<f64> {
        let estimate = self.estimate?.path_count.max(1) as f64;
        let actual = self.stats.path_count.max(1) as f64;
        Some(estimate.max(actual) / estimate.min(actual))
    }
}
