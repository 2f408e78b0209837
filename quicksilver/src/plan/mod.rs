// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Query planning for path queries
//!
//! This module turns per-label statistics into cardinality estimates and
//! uses those estimates to choose the order in which a path's joins run.

pub mod cost;
pub mod estimator;
pub mod join_order;
pub mod trace;
