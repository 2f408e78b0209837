// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Label-partitioned edge storage
//!
//! Every label owns two independently sorted copies of its edge set:
//! - `forward[l]` ordered by target, ties broken by source
//! - `reverse[l]` ordered by source, ties broken by target
//!
//! A merge join reads the forward sequence of its left operand against the
//! reverse sequence of its right operand, so both orders must be established
//! (`sort_label`) before a label is used as a join operand. Inserts append
//! without sorting so that bulk loads stay linear.

use crate::storage::types::{Edge, StorageError};

/// Label slot holding "the current path relation" in projection and join
/// results, independent of the base graph's label numbering.
pub const RELATION_SLOT: u32 = 0;

/// Label-partitioned, dual-sorted edge storage
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    vertex_count: u32,
    label_count: u32,

    /// Per label: edges ordered by (target, source)
    forward: Vec<Vec<Edge>>,

    /// Per label: edges ordered by (source, target)
    reverse: Vec<Vec<Edge>>,

    /// Per label: whether both sequences are known to be sorted
    sorted: Vec<bool>,

    /// Number of edges appended through `insert_edge`
    total_edges: u64,
}

impl GraphStore {
    /// Create an empty store over `vertex_count` vertices with zero labels
    pub fn new(vertex_count: u32) -> Self {
        Self {
            vertex_count,
            ..Self::default()
        }
    }

    /// Create an empty store with its label slots already allocated
    pub fn with_labels(vertex_count: u32, label_count: u32) -> Self {
        let mut store = Self::new(vertex_count);
        store.set_label_count(label_count);
        store
    }

    /// Allocate the forward/reverse sequences for `label_count` labels.
    ///
    /// Growing keeps existing edges. Shrinking drops the removed labels and
    /// their edges from the total.
    pub fn set_label_count(&mut self, label_count: u32) {
        let slots = label_count as usize;
        self.forward.resize_with(slots, Vec::new);
        self.reverse.resize_with(slots, Vec::new);
        self.sorted.resize(slots, true);
        self.label_count = label_count;
        self.total_edges = self.forward.iter().map(|edges| edges.len() as u64).sum();
    }

    /// Append an edge to the forward sequence of `label`
    pub fn insert_edge(&mut self, source: u32, target: u32, label: u32) -> Result<(), StorageError> {
        let slot = self.check_edge(source, target, label)?;
        self.forward[slot].push(Edge::new(source, target));
        self.sorted[slot] = false;
        self.total_edges += 1;
        Ok(())
    }

    /// Append an edge to the reverse sequence of `label`
    ///
    /// Kept separate from `insert_edge` so operators can build only one side
    /// when the other is not needed.
    pub fn insert_reverse_edge(
        &mut self,
        source: u32,
        target: u32,
        label: u32,
    ) -> Result<(), StorageError> {
        let slot = self.check_edge(source, target, label)?;
        self.reverse[slot].push(Edge::new(source, target));
        self.sorted[slot] = false;
        Ok(())
    }

    /// Sort `forward[label]` by target and `reverse[label]` by source
    pub fn sort_label(&mut self, label: u32) -> Result<(), StorageError> {
        let slot = self.check_label(label)?;
        if !self.sorted[slot] {
            self.forward[slot].sort_unstable_by(Edge::cmp_by_target);
            self.reverse[slot].sort_unstable_by(Edge::cmp_by_source);
            self.sorted[slot] = true;
        }
        Ok(())
    }

    /// Sort every label
    pub fn sort_all(&mut self) {
        for slot in 0..self.forward.len() {
            if !self.sorted[slot] {
                self.forward[slot].sort_unstable_by(Edge::cmp_by_target);
                self.reverse[slot].sort_unstable_by(Edge::cmp_by_source);
                self.sorted[slot] = true;
            }
        }
    }

    /// Collapse exact duplicate edges of `label`, returning how many forward
    /// entries were removed. Sorts the label first if needed.
    pub fn dedup_label(&mut self, label: u32) -> Result<usize, StorageError> {
        self.sort_label(label)?;
        let slot = label as usize;

        let before = self.forward[slot].len();
        self.forward[slot].dedup();
        self.reverse[slot].dedup();
        let removed = before - self.forward[slot].len();

        self.total_edges -= removed as u64;
        Ok(removed)
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn label_count(&self) -> u32 {
        self.label_count
    }

    pub fn total_edge_count(&self) -> u64 {
        self.total_edges
    }

    /// Number of edges stored under `label`
    pub fn label_edge_count(&self, label: u32) -> Result<usize, StorageError> {
        let slot = self.check_label(label)?;
        Ok(self.forward[slot].len())
    }

    /// Edges of `label` ordered by (target, source) once sorted
    pub fn forward(&self, label: u32) -> Result<&[Edge], StorageError> {
        let slot = self.check_label(label)?;
        Ok(&self.forward[slot])
    }

    /// Edges of `label` ordered by (source, target) once sorted
    pub fn reverse(&self, label: u32) -> Result<&[Edge], StorageError> {
        let slot = self.check_label(label)?;
        Ok(&self.reverse[slot])
    }

    /// Whether both sequences of `label` are currently sorted
    pub fn is_label_sorted(&self, label: u32) -> bool {
        self.sorted.get(label as usize).copied().unwrap_or(false)
    }

    /// Whether every label is sorted
    pub fn is_sorted(&self) -> bool {
        self.sorted.iter().all(|sorted| *sorted)
    }

    /// Sum over labels of the distinct `(source, target)` pairs per label.
    ///
    /// A pair stored under two labels counts once for each. Counts runs of
    /// equal pairs in each reverse sequence, which must be sorted by the
    /// composite key `(source, target)`. For single-relation results this
    /// is the distinct-edge count of the relation slot.
    pub fn distinct_edge_count(&self) -> u64 {
        self.reverse
            .iter()
            .enumerate()
            .map(|(slot, edges)| {
                debug_assert!(
                    self.sorted[slot],
                    "distinct_edge_count on unsorted label {}",
                    slot
                );
                count_runs(edges)
            })
            .sum()
    }

    fn check_label(&self, label: u32) -> Result<usize, StorageError> {
        if label >= self.label_count {
            return Err(StorageError::LabelOutOfRange {
                label,
                label_count: self.label_count,
            });
        }
        Ok(label as usize)
    }

    fn check_edge(&self, source: u32, target: u32, label: u32) -> Result<usize, StorageError> {
        let slot = self.check_label(label)?;
        for vertex in [source, target] {
            if vertex >= self.vertex_count {
                return Err(StorageError::VertexOutOfRange {
                    vertex,
                    vertex_count: self.vertex_count,
                });
            }
        }
        Ok(slot)
    }
}

/// Count maximal runs of identical adjacent edges
fn count_runs(edges: &[Edge]) -> u64 {
    let mut runs = 0u64;
    let mut previous: Option<&Edge> = None;

    for edge in edges {
        if previous != Some(edge) {
            runs += 1;
            previous = Some(edge);
        }
    }

    runs
}
