// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query Coordinator - single entry point for path query evaluation
//!
//! Owns one base graph together with its prepared estimator and evaluator,
//! and turns query text into `QueryResult`s.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use crate::ast::parser::{parse_path_query, ParserError};
use crate::ast::PathExpr;
use crate::config::EngineConfig;
use crate::exec::{ExecutionError, QueryEvaluator, QueryResult};
use crate::plan::cost::CardinalityStat;
use crate::plan::estimator::PerLabelStatistics;
use crate::plan::trace::TraceStep;
use crate::storage::{GraphLoader, GraphStore, StorageError};

/// Query Coordinator - orchestrates loading, planning and evaluation
///
/// Every query runs against the same immutable base graph, so a single
/// coordinator can be shared between threads behind an `Arc`.
pub struct QueryCoordinator {
    evaluator: QueryEvaluator,
}

impl QueryCoordinator {
    /// Load a graph file and prepare it for querying
    ///
    /// # Example
    /// ```ignore
    /// use quicksilver::{EngineConfig, QueryCoordinator};
    ///
    /// let coordinator = QueryCoordinator::from_graph_file("graph.nt", EngineConfig::default())?;
    /// let result = coordinator.process_query("0+/1-")?;
    /// println!("{} paths", result.stats.path_count);
    /// ```
    pub fn from_graph_file(
        path: impl AsRef<Path>,
        config: EngineConfig,
    ) -> Result<Self, ExecutionError> {
        let store = GraphLoader::load_file(path)?;
        Self::from_store(store, config)
    }

    /// Wrap an in-memory store. Unsorted labels are sorted first.
    pub fn from_store(mut store: GraphStore, config: EngineConfig) -> Result<Self, ExecutionError> {
        if !store.is_sorted() {
            store.sort_all();
        }

        let mut evaluator = QueryEvaluator::with_config(Arc::new(store), config);
        evaluator.prepare()?;
        Ok(Self { evaluator })
    }

    /// Execute one query
    ///
    /// A malformed atom does not fail the call: the result carries the zero
    /// stat and a warning. Other syntax errors, and labels outside the
    /// graph, are returned as errors.
    pub fn process_query(&self, query_text: &str) -> Result<QueryResult, ExecutionError> {
        let expr = match parse_path_query(query_text) {
            Ok(expr) => expr,
            Err(ParserError::MalformedAtom(atom)) => {
                log::warn!("Label parsing failed for atom '{}' in '{}'", atom, query_text);
                return Ok(QueryResult::malformed(query_text, &atom));
            }
            Err(e) => return Err(e.into()),
        };

        let report = self.evaluator.evaluate_traced(&expr)?;
        Ok(QueryResult {
            query: query_text.to_string(),
            stats: report.stats,
            estimate: report.estimate,
            plan: report.plan.map(|plan| plan.expression),
            execution_time_ms: report.elapsed.as_millis() as u64,
            warnings: Vec::new(),
        })
    }

    /// Estimate a query without evaluating it
    pub fn estimate_query(&self, query_text: &str) -> Result<CardinalityStat, ExecutionError> {
        let estimator = self.evaluator.estimator().ok_or_else(|| {
            ExecutionError::PlanningError("no estimator attached".to_string())
        })?;
        estimator.estimate_text(query_text)
    }

    /// Explain how a query would be evaluated without evaluating it
    pub fn explain_query(&self, query_text: &str) -> Result<QueryPlan, ExecutionError> {
        let started = Instant::now();
        let expr = parse_path_query(query_text)?;
        let plan = self.evaluator.plan(&expr)?;
        let elapsed = started.elapsed();

        let plan = match plan {
            Some(plan) => plan,
            None => {
                return Ok(QueryPlan {
                    query: query_text.to_string(),
                    expression: expr,
                    merges: Vec::new(),
                    estimate: None,
                    planning_steps: Vec::new(),
                    total_planning_time_ms: elapsed.as_millis() as u64,
                })
            }
        };

        Ok(QueryPlan {
            query: query_text.to_string(),
            expression: plan.to_path_expr()?,
            merges: plan.merges,
            estimate: Some(plan.estimate),
            planning_steps: plan.trace.map(|trace| trace.steps).unwrap_or_default(),
            total_planning_time_ms: elapsed.as_millis() as u64,
        })
    }

    /// Run a workload file: one query per line, blank lines and lines
    /// starting with `#` are skipped
    pub fn run_workload(&self, path: impl AsRef<Path>) -> Result<Vec<QueryResult>, ExecutionError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(StorageError::from)?;

        let mut results = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            let query = line.trim();
            if query.is_empty() || query.starts_with('#') {
                continue;
            }

            match self.process_query(query) {
                Ok(result) => results.push(result),
                Err(e) => {
                    log::error!("{}:{}: {}", path.display(), index + 1, e);
                    return Err(e);
                }
            }
        }

        log::info!("Ran {} queries from {}", results.len(), path.display());
        Ok(results)
    }

    /// Per-label statistics of the base graph
    pub fn statistics(&self) -> Option<&PerLabelStatistics> {
        self.evaluator.estimator()?.statistics()
    }

    pub fn graph(&self) -> &Arc<GraphStore> {
        self.evaluator.graph()
    }

    pub fn evaluator(&self) -> &QueryEvaluator {
        &self.evaluator
    }

    pub fn config(&self) -> &EngineConfig {
        self.evaluator.config()
    }
}

/// How a query would be evaluated
#[derive(Debug, Clone)]
pub struct QueryPlan {
    pub query: String,
    /// Expression in the bracketing that would be evaluated
    pub expression: PathExpr,
    /// Planner merge positions; empty when the query is evaluated as written
    pub merges: Vec<usize>,
    pub estimate: Option<CardinalityStat>,
    /// Recorded merges when plan tracing is enabled
    pub planning_steps: Vec<TraceStep>,
    pub total_planning_time_ms: u64,
}

impl QueryPlan {
    /// Format the chosen bracketing as a tree for display
    pub fn format_tree(&self) -> String {
        crate::ast::pretty_printer::render_tree(&self.expression).join("\n")
    }

    /// Get a summary of the plan
    pub fn summary(&self) -> String {
        match &self.estimate {
            Some(estimate) => format!(
                "Planning time: {}ms | Joins: {} | Estimated: {}",
                self.total_planning_time_ms,
                self.merges.len(),
                estimate
            ),
            None => format!(
                "Planning time: {}ms | Evaluated as written",
                self.total_planning_time_ms
            ),
        }
    }
}
