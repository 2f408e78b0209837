// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Quicksilver - regular path query evaluation over labeled graphs
//!
//! Quicksilver answers concatenation-only regular path queries such as
//! `0+/1-/2+` ("follow a label-0 edge forward, a label-1 edge backward, then a
//! label-2 edge forward") and reports the exact cardinality of the answer set.
//!
//! # Features
//!
//! - **Label-partitioned storage**: every label keeps a target-sorted and a
//!   source-sorted edge sequence, ready for merge joins
//! - **Cardinality estimation**: per-label aggregates predict intermediate
//!   result sizes without materializing them
//! - **Join ordering**: a greedy planner rebrackets the path so the smallest
//!   estimated intermediates are produced first
//! - **Sort-merge evaluation**: projections and merge joins over sorted edge
//!   lists produce the final relation and its exact statistics
//!
//! # Usage
//!
//! ```ignore
//! use quicksilver::{EngineConfig, QueryCoordinator};
//!
//! let coordinator = QueryCoordinator::from_graph_file("graph.nt", EngineConfig::default())?;
//! let result = coordinator.process_query("0+/1-")?;
//! println!("{}", result.stats);
//! ```

// Public modules - exposed to external users
pub mod config;
pub mod coordinator;

pub mod ast;
pub mod exec;
pub mod plan;
pub mod storage;

// Re-export the public API
pub use ast::parser::parse_path_query;
pub use ast::{Atom, Direction, PathExpr};
pub use config::EngineConfig;
pub use coordinator::{QueryCoordinator, QueryResult};
pub use exec::{ExecutionError, QueryEvaluator};
pub use plan::cost::CardinalityStat;
pub use plan::estimator::CardinalityEstimator;
pub use plan::join_order::{JoinPlan, JoinPlanner};
pub use storage::{GraphLoader, GraphStore, StorageError};

/// Quicksilver version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Quicksilver crate name
pub const CRATE_NAME: &str = env!("CARGO_PKG_NAME");
