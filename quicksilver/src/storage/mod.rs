// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Graph storage for path query evaluation
//!
//! This module provides:
//! - Edge and error types for graph operations
//! - Label-partitioned edge storage with a target-sorted (forward) and a
//!   source-sorted (reverse) sequence per label
//! - Ingestion of the contiguous `subject predicate object .` file format

pub mod graph_store;
pub mod loader;
pub mod types;

pub use graph_store::{GraphStore, RELATION_SLOT};
pub use loader::GraphLoader;
pub use types::{Edge, StorageError};
