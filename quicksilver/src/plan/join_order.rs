// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Greedy join ordering for path chains
//!
//! Repeatedly merges the adjacent pair of sub-expressions with the smallest
//! estimated result until one expression remains. Ties go to the leftmost
//! pair. The result is a fully bracketed query string that the parser turns
//! back into an AST whose shape encodes the evaluation order.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::ast::parser::{parse_path_query, ParserError};
use crate::ast::{Atom, PathExpr};
use crate::exec::error::ExecutionError;
use crate::plan::cost::{estimate_concatenation, CardinalityStat, PlanCost};
use crate::plan::trace::{PlanTrace, PlanTracer};

/// Evaluation order chosen by the planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinPlan {
    /// Left index of each merged pair, in merge order, relative to the list
    /// as it was before that merge
    pub merges: Vec<usize>,
    /// Fully bracketed query text, e.g. `((0+/1-)/2+)`
    pub expression: String,
    /// Estimated cardinality of the whole chain
    pub estimate: CardinalityStat,
    /// Sum of estimated intermediate sizes
    pub cost: PlanCost,
    pub trace: Option<PlanTrace>,
}

impl JoinPlan {
    /// True for single-atom chains, which need no joins
    pub fn is_trivial(&self) -> bool {
        self.merges.is_empty()
    }

    /// Re-parse the bracketed expression into an AST
    pub fn to_path_expr(&self) -> Result<PathExpr, ParserError> {
        parse_path_query(&self.expression)
    }

    /// Replay `merges` over `parts`, wrapping each merged pair in parentheses.
    /// Returns `None` if a position does not name an adjacent pair.
    pub fn bracket(parts: &[String], merges: &[usize]) -> Option<String> {
        let mut parts = parts.to_vec();
        for &position in merges {
            if position + 1 >= parts.len() {
                return None;
            }
            let right = parts.remove(position + 1);
            let left = &mut parts[position];
            *left = format!("({}/{})", left, right);
        }
        if parts.len() == 1 {
            parts.pop()
        } else {
            None
        }
    }
}

/// Greedy smallest-intermediate-first join planner
#[derive(Debug, Clone, Default)]
pub struct JoinPlanner {
    trace: bool,
}

impl JoinPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a `PlanTrace` for every plan
    pub fn with_tracing(mut self, trace: bool) -> Self {
        self.trace = trace;
        self
    }

    /// Choose a bracketing for `atoms`, given in query order with their
    /// estimated cardinalities
    pub fn plan(&self, atoms: &[(Atom, CardinalityStat)]) -> Result<JoinPlan, ExecutionError> {
        if atoms.is_empty() {
            return Err(ExecutionError::PlanningError(
                "cannot plan an empty path".to_string(),
            ));
        }

        let mut tracer = self.trace.then(PlanTracer::new);
        let mut items: Vec<(String, CardinalityStat)> = atoms
            .iter()
            .map(|(atom, stat)| (atom.to_string(), *stat))
            .collect();

        // Pair estimates keyed by operand text; unchanged neighbours are not
        // recomputed in later rounds.
        let mut pair_estimates: HashMap<(String, String), CardinalityStat> = HashMap::new();
        let mut merges = Vec::with_capacity(items.len().saturating_sub(1));
        let mut cost = PlanCost::new();

        while items.len() > 1 {
            if let Some(tracer) = tracer.as_mut() {
                tracer.start_step();
            }

            let mut best: Option<(usize, CardinalityStat)> = None;
            for position in 0..items.len() - 1 {
                let (left_text, left_stat) = &items[position];
                let (right_text, right_stat) = &items[position + 1];
                let joined = *pair_estimates
                    .entry((left_text.clone(), right_text.clone()))
                    .or_insert_with(|| estimate_concatenation(left_stat, right_stat));

                let better = match best {
                    Some((_, current)) => joined.path_count < current.path_count,
                    None => true,
                };
                if better {
                    best = Some((position, joined));
                }
            }

            let Some((position, joined)) = best else {
                break;
            };
            let candidates = items.len() - 1;
            let (right_text, _) = items.remove(position + 1);
            let (left_text, left_stat) = &mut items[position];

            if let Some(tracer) = tracer.as_mut() {
                tracer.end_step(position, candidates, left_text, &right_text, joined);
            }
            log::debug!(
                "Merging {} / {} at {} (estimated {} paths)",
                left_text,
                right_text,
                position,
                joined.path_count
            );

            *left_text = format!("({}/{})", left_text, right_text);
            *left_stat = joined;
            merges.push(position);
            cost.add_join(&joined);
        }

        let trace = tracer.map(PlanTracer::finish);
        if let Some(trace) = &trace {
            log::info!("{}", trace);
        }

        let (expression, estimate) = items.pop().ok_or_else(|| {
            ExecutionError::PlanningError("planner produced no expression".to_string())
        })?;

        Ok(JoinPlan {
            merges,
            expression,
            estimate,
            cost,
            trace,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(sources: u64, paths: u64, targets: u64) -> CardinalityStat {
        CardinalityStat::new(sources, paths, targets)
    }

    #[test]
    fn test_single_atom_needs_no_merges() {
        let plan = JoinPlanner::new()
            .plan(&[(Atom::forward(3), stat(2, 5, 2))])
            .unwrap();
        assert!(plan.is_trivial());
        assert_eq!(plan.expression, "3+");
        assert_eq!(plan.estimate, stat(2, 5, 2));
    }

    #[test]
    fn test_two_atoms_one_merge() {
        let plan = JoinPlanner::new()
            .plan(&[
                (Atom::forward(1), stat(2, 4, 2)),
                (Atom::inverse(2), stat(2, 4, 2)),
            ])
            .unwrap();
        assert_eq!(plan.merges, vec![0]);
        assert_eq!(plan.expression, "(1+/2-)");
        assert_eq!(plan.cost.joins, 1);
    }

    #[test]
    fn test_smallest_pair_merged_first() {
        // 0+/1+ estimates 10_000 paths, 1+/2+ estimates 10
        let plan = JoinPlanner::new()
            .plan(&[
                (Atom::forward(0), stat(10, 1000, 10)),
                (Atom::forward(1), stat(10, 100, 10)),
                (Atom::forward(2), stat(10, 1, 10)),
            ])
            .unwrap();
        assert_eq!(plan.merges, vec![1, 0]);
        assert_eq!(plan.expression, "(0+/(1+/2+))");
    }

    #[test]
    fn test_ties_pick_leftmost() {
        let uniform = stat(5, 10, 5);
        let plan = JoinPlanner::new()
            .plan(&[
                (Atom::forward(0), uniform),
                (Atom::forward(1), uniform),
                (Atom::forward(2), uniform),
                (Atom::forward(3), uniform),
            ])
            .unwrap();
        assert_eq!(plan.merges[0], 0);
        assert_eq!(plan.merges.len(), 3);
    }

    #[test]
    fn test_plan_reparses_to_same_atoms() {
        let atoms = [
            (Atom::forward(4), stat(3, 9, 3)),
            (Atom::inverse(0), stat(1, 2, 2)),
            (Atom::forward(7), stat(8, 8, 8)),
            (Atom::inverse(2), stat(2, 3, 1)),
        ];
        let plan = JoinPlanner::new().plan(&atoms).unwrap();
        let expr = plan.to_path_expr().unwrap();
        let expected: Vec<Atom> = atoms.iter().map(|(atom, _)| *atom).collect();
        assert_eq!(expr.atoms(), expected);
    }

    #[test]
    fn test_bracket_replays_merges() {
        let atoms = [
            (Atom::forward(0), stat(10, 1000, 10)),
            (Atom::forward(1), stat(10, 100, 10)),
            (Atom::forward(2), stat(10, 1, 10)),
        ];
        let plan = JoinPlanner::new().plan(&atoms).unwrap();
        let parts: Vec<String> = atoms.iter().map(|(atom, _)| atom.to_string()).collect();
        assert_eq!(
            JoinPlan::bracket(&parts, &plan.merges),
            Some(plan.expression.clone())
        );
        assert_eq!(JoinPlan::bracket(&parts, &[5]), None);
        assert_eq!(JoinPlan::bracket(&parts, &[0]), None);
    }

    #[test]
    fn test_empty_chain_is_an_error() {
        assert!(JoinPlanner::new().plan(&[]).is_err());
    }

    #[test]
    fn test_tracing() {
        let plan = JoinPlanner::new()
            .with_tracing(true)
            .plan(&[
                (Atom::forward(0), stat(1, 1, 1)),
                (Atom::forward(1), stat(1, 1, 1)),
            ])
            .unwrap();
        let trace = plan.trace.unwrap();
        assert_eq!(trace.steps.len(), 1);
        assert_eq!(trace.steps[0].left, "0+");
    }
}
