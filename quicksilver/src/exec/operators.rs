// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Physical operators: label projection, sort-merge join, exact statistics
//!
//! Operators never mutate their operands; each call allocates a fresh
//! single-relation `GraphStore` whose edges live in `RELATION_SLOT`.

use crate::exec::error::ExecutionError;
use crate::plan::cost::CardinalityStat;
use crate::storage::{GraphStore, RELATION_SLOT};

/// Copy every edge of `label` into a fresh single-relation store, swapping
/// source and target when `inverse` is set. The result is sorted.
pub fn project(label: u32, inverse: bool, source: &GraphStore) -> Result<GraphStore, ExecutionError> {
    let edges = source.forward(label)?;
    let mut out = GraphStore::with_labels(source.vertex_count(), 1);

    for edge in edges {
        let edge = if inverse { edge.swapped() } else { *edge };
        out.insert_edge(edge.source, edge.target, RELATION_SLOT)?;
        out.insert_reverse_edge(edge.source, edge.target, RELATION_SLOT)?;
    }
    out.sort_label(RELATION_SLOT)?;

    log::debug!(
        "project({}{}) -> {} edges",
        label,
        if inverse { "-" } else { "+" },
        out.total_edge_count()
    );
    Ok(out)
}

/// Sort-merge join of two single-relation stores on
/// `left.target == right.source`.
///
/// Walks `left`'s forward sequence (ordered by target) against `right`'s
/// reverse sequence (ordered by source). Equal-key groups on both sides are
/// expanded as a full cross product before either cursor moves past them.
/// Both operands must be sorted; the output is not.
pub fn join(left: &GraphStore, right: &GraphStore) -> Result<GraphStore, ExecutionError> {
    debug_assert!(
        left.is_label_sorted(RELATION_SLOT),
        "left join operand is not sorted"
    );
    debug_assert!(
        right.is_label_sorted(RELATION_SLOT),
        "right join operand is not sorted"
    );

    let by_target = left.forward(RELATION_SLOT)?;
    let by_source = right.reverse(RELATION_SLOT)?;
    let vertex_count = left.vertex_count().max(right.vertex_count());
    let mut out = GraphStore::with_labels(vertex_count, 1);

    let (mut i, mut j) = (0usize, 0usize);
    while i < by_target.len() && j < by_source.len() {
        let key = by_target[i].target;
        let other = by_source[j].source;

        if key < other {
            i += 1;
        } else if key > other {
            j += 1;
        } else {
            let left_end = i + by_target[i..]
                .iter()
                .take_while(|edge| edge.target == key)
                .count();
            let right_end = j + by_source[j..]
                .iter()
                .take_while(|edge| edge.source == key)
                .count();

            for left_edge in &by_target[i..left_end] {
                for right_edge in &by_source[j..right_end] {
                    out.insert_edge(left_edge.source, right_edge.target, RELATION_SLOT)?;
                    out.insert_reverse_edge(left_edge.source, right_edge.target, RELATION_SLOT)?;
                }
            }

            i = left_end;
            j = right_end;
        }
    }

    log::debug!(
        "join({} x {}) -> {} edges",
        left.total_edge_count(),
        right.total_edge_count(),
        out.total_edge_count()
    );
    Ok(out)
}

/// Exact statistics of a sorted result store.
///
/// The path count is the number of distinct (source, target) pairs; the
/// boundary counts come from vertex-indexed presence sets over every slot.
pub fn compute_stats(store: &GraphStore) -> Result<CardinalityStat, ExecutionError> {
    let vertex_count = store.vertex_count() as usize;
    let mut sources = vec![false; vertex_count];
    let mut targets = vec![false; vertex_count];

    for label in 0..store.label_count() {
        for edge in store.reverse(label)? {
            sources[edge.source as usize] = true;
            targets[edge.target as usize] = true;
        }
    }

    Ok(CardinalityStat {
        distinct_sources: sources.iter().filter(|present| **present).count() as u64,
        path_count: store.distinct_edge_count(),
        distinct_targets: targets.iter().filter(|present| **present).count() as u64,
    })
}
