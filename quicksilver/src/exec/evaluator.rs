// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Path query evaluator
//!
//! Evaluation runs in three steps:
//! 1. **Planning**: atoms are estimated and the greedy planner rebrackets
//!    the chain (skipped without a prepared estimator)
//! 2. **Execution**: the rebracketed AST is evaluated bottom-up with
//!    projections and sort-merge joins
//! 3. **Statistics**: the final relation is sorted and measured exactly

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::ast::parser::parse_path_query;
use crate::ast::{Atom, PathExpr};
use crate::config::EngineConfig;
use crate::exec::error::ExecutionError;
use crate::exec::operators::{compute_stats, join, project};
use crate::plan::cost::CardinalityStat;
use crate::plan::estimator::CardinalityEstimator;
use crate::plan::join_order::{JoinPlan, JoinPlanner};
use crate::storage::{GraphStore, RELATION_SLOT};

/// Longest chain `plan` accepts. The planner brackets every merge, so its
/// output nests at most one level per atom and stays within the parser's
/// nesting limit.
pub const MAX_CHAIN_ATOMS: usize = 256;

/// Everything learned while evaluating one query
#[derive(Debug, Clone)]
pub struct EvaluationReport {
    /// Exact statistics of the answer
    pub stats: CardinalityStat,
    /// Planner estimate, when a plan was made
    pub estimate: Option<CardinalityStat>,
    pub plan: Option<JoinPlan>,
    /// The expression that was actually evaluated
    pub evaluated: PathExpr,
    pub elapsed: Duration,
}

/// Evaluates path queries against one immutable base graph
pub struct QueryEvaluator {
    graph: Arc<GraphStore>,
    estimator: Option<CardinalityEstimator>,
    planner: JoinPlanner,
    config: EngineConfig,
}

impl QueryEvaluator {
    /// Create an evaluator with default settings and no estimator
    pub fn new(graph: Arc<GraphStore>) -> Self {
        Self::with_config(graph, EngineConfig::default())
    }

    pub fn with_config(graph: Arc<GraphStore>, config: EngineConfig) -> Self {
        Self {
            graph,
            estimator: None,
            planner: JoinPlanner::new().with_tracing(config.trace_planning),
            config,
        }
    }

    /// Use `estimator` for planning. It should describe the same graph.
    pub fn attach_estimator(&mut self, estimator: CardinalityEstimator) {
        if !Arc::ptr_eq(estimator.graph(), &self.graph) {
            log::warn!("Attached estimator was built for a different graph instance");
        }
        self.estimator = Some(estimator);
    }

    /// Build and prepare an estimator over the base graph and attach it
    pub fn prepare(&mut self) -> Result<(), ExecutionError> {
        let mut estimator = CardinalityEstimator::new(Arc::clone(&self.graph))
            .with_parallelism(self.config.parallel_statistics);
        estimator.prepare()?;
        self.estimator = Some(estimator);
        Ok(())
    }

    pub fn graph(&self) -> &Arc<GraphStore> {
        &self.graph
    }

    pub fn estimator(&self) -> Option<&CardinalityEstimator> {
        self.estimator.as_ref()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate `expr` and return the exact statistics of its answer
    pub fn evaluate(&self, expr: &PathExpr) -> Result<CardinalityStat, ExecutionError> {
        Ok(self.evaluate_traced(expr)?.stats)
    }

    /// Parse and evaluate query text
    pub fn evaluate_text(&self, text: &str) -> Result<CardinalityStat, ExecutionError> {
        let expr = parse_path_query(text)?;
        self.evaluate(&expr)
    }

    /// Evaluate `expr`, keeping the plan, estimate and timing
    pub fn evaluate_traced(&self, expr: &PathExpr) -> Result<EvaluationReport, ExecutionError> {
        let started = Instant::now();

        let plan = self.plan(expr)?;
        let evaluated = match &plan {
            Some(plan) => plan.to_path_expr()?,
            None => expr.clone(),
        };
        log::debug!("Evaluating {}", evaluated);

        let mut result = self.evaluate_aux(&evaluated)?;
        result.sort_label(RELATION_SLOT)?;
        let stats = compute_stats(&result)?;

        let elapsed = started.elapsed();
        log::info!("{} -> {} in {:.2?}", expr, stats, elapsed);

        Ok(EvaluationReport {
            stats,
            estimate: plan.as_ref().map(|plan| plan.estimate),
            plan,
            evaluated,
            elapsed,
        })
    }

    /// Choose a bracketing for `expr` without evaluating it.
    ///
    /// Returns `None` when planning is disabled or no prepared estimator is
    /// attached; the expression is then evaluated in its written order.
    /// Chains longer than `MAX_CHAIN_ATOMS` are rejected either way, since
    /// both planning and evaluation recurse once per concatenation.
    pub fn plan(&self, expr: &PathExpr) -> Result<Option<JoinPlan>, ExecutionError> {
        let atoms = expr.len();
        if atoms > MAX_CHAIN_ATOMS {
            return Err(ExecutionError::InvalidQuery(format!(
                "query has {} atoms, at most {} allowed",
                atoms, MAX_CHAIN_ATOMS
            )));
        }

        if !self.config.planning_enabled {
            log::debug!("Planning disabled, evaluating {} as written", expr);
            return Ok(None);
        }

        let estimator = match self.estimator.as_ref() {
            Some(estimator) if estimator.is_prepared() => estimator,
            _ => {
                log::warn!("No prepared estimator, evaluating {} as written", expr);
                return Ok(None);
            }
        };

        let estimated = flatten(expr)
            .into_iter()
            .map(|atom| Ok((atom, estimator.estimate_atom(&atom)?)))
            .collect::<Result<Vec<_>, ExecutionError>>()?;

        self.planner.plan(&estimated).map(Some)
    }

    /// Evaluate `expr` bottom-up in its own bracketing. Join results are
    /// sorted before they are returned so they can feed further joins.
    pub fn evaluate_aux(&self, expr: &PathExpr) -> Result<GraphStore, ExecutionError> {
        match expr {
            PathExpr::Leaf(atom) => project(atom.label, atom.direction.is_inverse(), &self.graph),
            PathExpr::Concat(left, right) => {
                let left = self.evaluate_aux(left)?;
                let right = self.evaluate_aux(right)?;

                let mut joined = join(&left, &right)?;
                joined.sort_label(RELATION_SLOT)?;
                if self.config.deduplicate_intermediates {
                    let removed = joined.dedup_label(RELATION_SLOT)?;
                    if removed > 0 {
                        log::debug!("Removed {} duplicate paths", removed);
                    }
                }
                Ok(joined)
            }
        }
    }
}

/// Atoms of `expr` in query order
pub fn flatten(expr: &PathExpr) -> Vec<Atom> {
    expr.atoms()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// V=4, L=2: (0,1,l0), (1,2,l0), (1,3,l1)
    fn small_graph() -> Arc<GraphStore> {
        let mut store = GraphStore::with_labels(4, 2);
        for (source, target, label) in [(0, 1, 0), (1, 2, 0), (1, 3, 1)] {
            store.insert_edge(source, target, label).unwrap();
            store.insert_reverse_edge(source, target, label).unwrap();
        }
        store.sort_all();
        Arc::new(store)
    }

    fn prepared_evaluator(config: EngineConfig) -> QueryEvaluator {
        let mut evaluator = QueryEvaluator::with_config(small_graph(), config);
        evaluator.prepare().unwrap();
        evaluator
    }

    #[test]
    fn test_concatenation_end_to_end() {
        let evaluator = prepared_evaluator(EngineConfig::default());
        let stats = evaluator.evaluate_text("0+/1+").unwrap();
        assert_eq!(stats, CardinalityStat::new(1, 1, 1));
    }

    #[test]
    fn test_inverse_atom_end_to_end() {
        let evaluator = prepared_evaluator(EngineConfig::default());
        let stats = evaluator.evaluate_text("0-").unwrap();
        assert_eq!(stats, CardinalityStat::new(2, 2, 1));
    }

    #[test]
    fn test_without_estimator_evaluates_as_written() {
        let evaluator = QueryEvaluator::new(small_graph());
        let expr = parse_path_query("0+/0+/1-").unwrap();

        let report = evaluator.evaluate_traced(&expr).unwrap();
        assert!(report.plan.is_none());
        assert!(report.estimate.is_none());
        assert_eq!(report.evaluated, expr);
        // 0->1->2 then 2 has no incoming label-1 edge
        assert_eq!(report.stats, CardinalityStat::zero());
    }

    #[test]
    fn test_planning_disabled() {
        let evaluator = prepared_evaluator(EngineConfig::unplanned());
        let expr = parse_path_query("0+/1+").unwrap();
        assert!(evaluator.plan(&expr).unwrap().is_none());
        assert_eq!(evaluator.evaluate(&expr).unwrap(), CardinalityStat::new(1, 1, 1));
    }

    #[test]
    fn test_plan_and_evaluation_agree_across_bracketings() {
        let evaluator = prepared_evaluator(EngineConfig::default());
        let planned = evaluator.evaluate_text("0-/0+/1+").unwrap();
        let right_deep = evaluator.evaluate_text("0-/(0+/1+)").unwrap();

        let unplanned = QueryEvaluator::new(small_graph())
            .evaluate_text("0-/0+/1+")
            .unwrap();
        assert_eq!(planned, unplanned);
        assert_eq!(planned, right_deep);
    }

    #[test]
    fn test_duplicates_do_not_change_path_count() {
        let query = parse_path_query("0-/0+/0-/0+").unwrap();

        let deduped = prepared_evaluator(EngineConfig::default());
        let kept = prepared_evaluator(EngineConfig::keep_duplicates());

        let with_dedup = deduped.evaluate_aux(&query).unwrap();
        let without_dedup = kept.evaluate_aux(&query).unwrap();
        assert!(with_dedup.total_edge_count() <= without_dedup.total_edge_count());
        assert_eq!(
            deduped.evaluate(&query).unwrap(),
            kept.evaluate(&query).unwrap()
        );
    }

    #[test]
    fn test_intermediates_are_sorted() {
        let evaluator = prepared_evaluator(EngineConfig::default());
        let expr = parse_path_query("(0-/0+)/(0+/1+)").unwrap();
        let result = evaluator.evaluate_aux(&expr).unwrap();
        assert!(result.is_label_sorted(RELATION_SLOT));
    }

    #[test]
    fn test_malformed_atom_is_a_syntax_error() {
        let evaluator = prepared_evaluator(EngineConfig::default());
        assert!(matches!(
            evaluator.evaluate_text("0+/abc"),
            Err(ExecutionError::SyntaxError(_))
        ));
    }

    #[test]
    fn test_label_out_of_range() {
        let evaluator = QueryEvaluator::new(small_graph());
        assert!(matches!(
            evaluator.evaluate_text("7+"),
            Err(ExecutionError::StorageError(_))
        ));

        let planned = prepared_evaluator(EngineConfig::default());
        assert!(planned.evaluate_text("0+/7+").is_err());
    }

    #[test]
    fn test_unprepared_estimator_is_not_used() {
        let mut evaluator = QueryEvaluator::new(small_graph());
        evaluator.attach_estimator(CardinalityEstimator::new(Arc::clone(evaluator.graph())));
        assert!(evaluator.estimator().is_some());

        let report = evaluator
            .evaluate_traced(&parse_path_query("0+/1+").unwrap())
            .unwrap();
        assert!(report.plan.is_none());
        assert!(report.estimate.is_none());
        assert_eq!(report.stats, CardinalityStat::new(1, 1, 1));
    }

    #[test]
    fn test_attached_prepared_estimator_plans() {
        let graph = small_graph();
        let mut estimator = CardinalityEstimator::new(Arc::clone(&graph));
        estimator.prepare().unwrap();

        let mut evaluator = QueryEvaluator::new(graph);
        evaluator.attach_estimator(estimator);
        let report = evaluator
            .evaluate_traced(&parse_path_query("0+/1+").unwrap())
            .unwrap();
        assert_eq!(report.plan.unwrap().expression, "(0+/1+)");
    }

    #[test]
    fn test_chain_length_limit() {
        let chain = |atoms: usize| PathExpr::chain(&vec![Atom::forward(0); atoms]).unwrap();
        let evaluator = prepared_evaluator(EngineConfig::default());

        let longest = evaluator.evaluate_traced(&chain(MAX_CHAIN_ATOMS)).unwrap();
        assert!(longest.plan.is_some());
        assert!(longest.stats.is_zero());

        assert!(matches!(
            evaluator.evaluate(&chain(2000)),
            Err(ExecutionError::InvalidQuery(_))
        ));
        assert!(matches!(
            evaluator.plan(&chain(MAX_CHAIN_ATOMS + 1)),
            Err(ExecutionError::InvalidQuery(_))
        ));

        let unplanned = prepared_evaluator(EngineConfig::unplanned());
        assert!(unplanned.evaluate(&chain(2000)).is_err());
    }

    #[test]
    fn test_traced_report_carries_plan() {
        let config = EngineConfig {
            trace_planning: true,
            ..EngineConfig::default()
        };
        let evaluator = prepared_evaluator(config);
        let expr = parse_path_query("0+/1+").unwrap();

        let report = evaluator.evaluate_traced(&expr).unwrap();
        let plan = report.plan.unwrap();
        assert_eq!(plan.merges, vec![0]);
        assert_eq!(plan.expression, "(0+/1+)");
        assert!(plan.trace.is_some());
        assert!(report.estimate.is_some());
    }
}
