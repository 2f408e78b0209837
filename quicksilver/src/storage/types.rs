// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Edge structure and error types
//!
//! Defines the `(source, target)` edge pair stored per label,
//! along with error types for storage and ingestion operations.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

/// Error types for storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Label {label} out of range (graph has {label_count} labels)")]
    LabelOutOfRange { label: u32, label_count: u32 },

    #[error("Vertex {vertex} out of range (graph has {vertex_count} vertices)")]
    VertexOutOfRange { vertex: u32, vertex_count: u32 },

    #[error("Invalid graph header: {0}")]
    InvalidHeader(String),

    #[error("Invalid edge on line {line}: {text}")]
    InvalidEdgeLine { line: usize, text: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A directed edge between two vertices. The label is implied by the
/// sequence the edge is stored in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edge {
    pub source: u32,
    pub target: u32,
}

impl Edge {
    /// Create a new edge
    pub fn new(source: u32, target: u32) -> Self {
        Self { source, target }
    }

    /// The same edge walked backwards
    pub fn swapped(&self) -> Self {
        Self {
            source: self.target,
            target: self.source,
        }
    }

    /// Forward order: by target, ties broken by source
    pub fn cmp_by_target(&self, other: &Edge) -> Ordering {
        (self.target, self.source).cmp(&(other.target, other.source))
    }

    /// Reverse order: by source, ties broken by target
    pub fn cmp_by_source(&self, other: &Edge) -> Ordering {
        (self.source, self.target).cmp(&(other.source, other.target))
    }
}

impl From<(u32, u32)> for Edge {
    fn from((source, target): (u32, u32)) -> Self {
        Self::new(source, target)
    }
}
