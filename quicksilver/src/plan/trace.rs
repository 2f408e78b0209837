// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Join planning trace
//!
//! Captures every greedy merge the planner performs so a chosen bracketing
//! can be explained after the fact.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::{Duration, Instant};

use crate::plan::cost::CardinalityStat;

/// Trace information for one planning run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanTrace {
    pub steps: Vec<TraceStep>,
    pub total_duration: Duration,
}

/// One merge of two adjacent sub-expressions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceStep {
    /// Index of the left operand in the list before the merge
    pub position: usize,
    /// Number of candidate pairs compared
    pub candidates: usize,
    pub left: String,
    pub right: String,
    pub estimate: CardinalityStat,
    pub duration: Duration,
}

/// Builder for plan traces
pub struct PlanTracer {
    steps: Vec<TraceStep>,
    start_time: Instant,
    current_step_start: Instant,
}

impl PlanTracer {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            steps: Vec::new(),
            start_time: now,
            current_step_start: now,
        }
    }

    /// Mark the start of the next merge round
    pub fn start_step(&mut self) {
        self.current_step_start = Instant::now();
    }

    /// Record the merge chosen in the current round
    pub fn end_step(
        &mut self,
        position: usize,
        candidates: usize,
        left: &str,
        right: &str,
        estimate: CardinalityStat,
    ) {
        self.steps.push(TraceStep {
            position,
            candidates,
            left: left.to_string(),
            right: right.to_string(),
            estimate,
            duration: self.current_step_start.elapsed(),
        });
    }

    pub fn finish(self) -> PlanTrace {
        PlanTrace {
            steps: self.steps,
            total_duration: self.start_time.elapsed(),
        }
    }
}

impl Default for PlanTracer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PlanTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Join planning: {} merges in {:.2?}",
            self.steps.len(),
            self.total_duration
        )?;
        for (round, step) in self.steps.iter().enumerate() {
            writeln!(
                f,
                "  {}. merge @{} of {} pairs: {} / {} -> {}",
                round + 1,
                step.position,
                step.candidates,
                step.left,
                step.right,
                step.estimate
            )?;
        }
        Ok(())
    }
}
