// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query execution: physical operators and the path query evaluator

pub mod error;
pub mod evaluator;
pub mod operators;
pub mod result;

pub use error::ExecutionError;
pub use evaluator::{EvaluationReport, QueryEvaluator};
pub use operators::{compute_stats, join, project};
pub use result::QueryResult;
