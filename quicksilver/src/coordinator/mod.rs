// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query Coordinator - central orchestration for path query evaluation

pub mod query_coordinator;

pub use query_coordinator::{QueryCoordinator, QueryPlan};

// Re-export types needed for the public API
pub use crate::exec::QueryResult;
