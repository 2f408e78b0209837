// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Cardinality estimation for path queries
//!
//! `prepare()` makes a single pass over every label of a base graph and
//! records per-label aggregates. `estimate()` then predicts the size of any
//! concatenation of atoms without materializing intermediate results.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;

use crate::ast::parser::{parse_path_query, ParserError};
use crate::ast::{Atom, Direction, PathExpr};
use crate::exec::error::ExecutionError;
use crate::plan::cost::{estimate_concatenation, CardinalityStat};
use crate::storage::{Edge, GraphStore, StorageError};

/// Aggregates for a single label
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelStatistics {
    /// Edges of this label counted from their source side
    pub total_out: u64,
    /// Edges of this label counted from their target side
    pub total_in: u64,
    /// Distinct vertices with an outgoing edge of this label
    pub distinct_out: u64,
    /// Distinct vertices with an incoming edge of this label
    pub distinct_in: u64,
}

impl LabelStatistics {
    /// Stat of the label walked in `direction`
    pub fn as_stat(&self, direction: Direction) -> CardinalityStat {
        match direction {
            Direction::Forward => {
                CardinalityStat::new(self.distinct_out, self.total_out, self.distinct_in)
            }
            Direction::Inverse => {
                CardinalityStat::new(self.distinct_in, self.total_in, self.distinct_out)
            }
        }
    }
}

/// Whole-graph counts gathered alongside the per-label aggregates
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphSummary {
    pub vertices: u32,
    pub edges: u64,
    pub labels: u32,
    /// Vertices without any incoming or outgoing edge
    pub isolated_vertices: u64,
}

/// Per-label aggregates of one base graph; immutable once built
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PerLabelStatistics {
    pub labels: Vec<LabelStatistics>,
    pub summary: GraphSummary,
}

impl PerLabelStatistics {
    /// Collect statistics from a sorted store
    pub fn collect(graph: &GraphStore, parallel: bool) -> Result<Self, ExecutionError> {
        if let Some(label) = (0..graph.label_count()).find(|l| !graph.is_label_sorted(*l)) {
            return Err(ExecutionError::PlanningError(format!(
                "cannot collect statistics: label {} is not sorted",
                label
            )));
        }

        let labels = if parallel {
            (0..graph.label_count())
                .into_par_iter()
                .map(|label| label_statistics(graph, label))
                .collect::<Result<Vec<_>, _>>()?
        } else {
            (0..graph.label_count())
                .map(|label| label_statistics(graph, label))
                .collect::<Result<Vec<_>, _>>()?
        };

        let summary = GraphSummary {
            vertices: graph.vertex_count(),
            edges: graph.total_edge_count(),
            labels: graph.label_count(),
            isolated_vertices: count_isolated(graph)?,
        };

        Ok(Self { labels, summary })
    }

    pub fn get(&self, label: u32) -> Option<&LabelStatistics> {
        self.labels.get(label as usize)
    }
}

fn label_statistics(graph: &GraphStore, label: u32) -> Result<LabelStatistics, StorageError> {
    let forward = graph.forward(label)?;
    let reverse = graph.reverse(label)?;

    Ok(LabelStatistics {
        total_out: reverse.len() as u64,
        total_in: forward.len() as u64,
        distinct_out: count_key_changes(reverse, |edge| edge.source),
        distinct_in: count_key_changes(forward, |edge| edge.target),
    })
}

/// Count distinct keys in a sequence sorted on that key
fn count_key_changes(edges: &[Edge], key: impl Fn(&Edge) -> u32) -> u64 {
    let mut distinct = 0u64;
    let mut previous = None;

    for edge in edges {
        let current = key(edge);
        if previous != Some(current) {
            distinct += 1;
            previous = Some(current);
        }
    }

    distinct
}

fn count_isolated(graph: &GraphStore) -> Result<u64, StorageError> {
    let mut touched = vec![false; graph.vertex_count() as usize];
    for label in 0..graph.label_count() {
        for edge in graph.reverse(label)? {
            touched[edge.source as usize] = true;
            touched[edge.target as usize] = true;
        }
    }
    Ok(touched.iter().filter(|seen| !**seen).count() as u64)
}

/// Estimates path query cardinalities from per-label aggregates
#[derive(Debug, Clone)]
pub struct CardinalityEstimator {
    graph: Arc<GraphStore>,
    statistics: Option<PerLabelStatistics>,
    parallel: bool,
}

impl CardinalityEstimator {
    /// Create an estimator for `graph`; call `prepare()` before estimating
    pub fn new(graph: Arc<GraphStore>) -> Self {
        Self {
            graph,
            statistics: None,
            parallel: true,
        }
    }

    /// Collect per-label statistics on the rayon pool (default) or inline
    pub fn with_parallelism(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Compute the per-label aggregates. Calling it again recomputes them.
    pub fn prepare(&mut self) -> Result<(), ExecutionError> {
        let started = Instant::now();
        let statistics = PerLabelStatistics::collect(&self.graph, self.parallel)?;

        log::info!(
            "Prepared estimator: {} labels, {} edges, {} isolated vertices in {:.2?}",
            statistics.summary.labels,
            statistics.summary.edges,
            statistics.summary.isolated_vertices,
            started.elapsed()
        );
        for (label, stats) in statistics.labels.iter().enumerate() {
            log::debug!(
                "label {}: out {} (distinct {}), in {} (distinct {})",
                label,
                stats.total_out,
                stats.distinct_out,
                stats.total_in,
                stats.distinct_in
            );
        }

        self.statistics = Some(statistics);
        Ok(())
    }

    pub fn is_prepared(&self) -> bool {
        self.statistics.is_some()
    }

    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.graph
    }

    pub fn statistics(&self) -> Option<&PerLabelStatistics> {
        self.statistics.as_ref()
    }

    pub fn label_statistics(&self, label: u32) -> Option<LabelStatistics> {
        self.statistics.as_ref()?.get(label).copied()
    }

    /// Estimate a single atom; exact for leaves
    pub fn estimate_atom(&self, atom: &Atom) -> Result<CardinalityStat, ExecutionError> {
        let statistics = self.prepared()?;
        let label_stats = statistics
            .get(atom.label)
            .ok_or(StorageError::LabelOutOfRange {
                label: atom.label,
                label_count: statistics.summary.labels,
            })?;
        Ok(label_stats.as_stat(atom.direction))
    }

    /// Estimate the cardinality of `expr`, recursing over concatenations
    pub fn estimate(&self, expr: &PathExpr) -> Result<CardinalityStat, ExecutionError> {
        match expr {
            PathExpr::Leaf(atom) => self.estimate_atom(atom),
            PathExpr::Concat(left, right) => {
                let left = self.estimate(left)?;
                let right = self.estimate(right)?;
                Ok(estimate_concatenation(&left, &right))
            }
        }
    }

    /// Estimate query text. A malformed atom is reported and yields the zero
    /// stat; other syntax errors are returned.
    pub fn estimate_text(&self, text: &str) -> Result<CardinalityStat, ExecutionError> {
        match parse_path_query(text) {
            Ok(expr) => self.estimate(&expr),
            Err(ParserError::MalformedAtom(atom)) => {
                log::warn!("Label parsing failed for atom '{}'", atom);
                Ok(CardinalityStat::zero())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn prepared(&self) -> Result<&PerLabelStatistics, ExecutionError> {
        self.statistics.as_ref().ok_or_else(|| {
            ExecutionError::PlanningError("estimator has not been prepared".to_string())
        })
    }
}
