// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Contiguous edge-file ingestion
//!
//! The file starts with a `nodeCount,edgeCount,labelCount` header followed by
//! one `subject predicate object .` line per edge. Lines that do not look
//! like an edge are skipped.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Instant;

use crate::storage::graph_store::GraphStore;
use crate::storage::types::StorageError;

static HEADER_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+),(\d+),(\d+)").expect("valid header pattern"));

static EDGE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)\s(\d+)\s(\d+)\s\.").expect("valid edge pattern"));

/// Builds a sorted `GraphStore` from the contiguous edge format
pub struct GraphLoader;

impl GraphLoader {
    /// Load a graph file from disk
    pub fn load_file(path: impl AsRef<Path>) -> Result<GraphStore, StorageError> {
        let path = path.as_ref();
        log::debug!("Loading graph from {}", path.display());
        let file = File::open(path)?;
        Self::load_reader(BufReader::new(file))
    }

    /// Load a graph from any buffered reader
    pub fn load_reader(reader: impl BufRead) -> Result<GraphStore, StorageError> {
        let started = Instant::now();
        let mut lines = reader.lines();

        let header = match lines.next() {
            Some(line) => line?,
            None => return Err(StorageError::InvalidHeader("empty input".to_string())),
        };
        let (vertex_count, declared_edges, label_count) = parse_header(&header)?;

        let mut store = GraphStore::with_labels(vertex_count, label_count);

        for (index, line) in lines.enumerate() {
            let line = line?;
            // header is line 1
            let line_number = index + 2;

            let Some(captures) = EDGE_PATTERN.captures(&line) else {
                if !line.trim().is_empty() {
                    log::debug!("Skipping line {}: {:?}", line_number, line);
                }
                continue;
            };

            let subject = parse_number(&captures[1], line_number, &line)?;
            let predicate = parse_number(&captures[2], line_number, &line)?;
            let object = parse_number(&captures[3], line_number, &line)?;

            store
                .insert_edge(subject, object, predicate)
                .map_err(|e| edge_error(e, line_number, &line))?;
            store
                .insert_reverse_edge(subject, object, predicate)
                .map_err(|e| edge_error(e, line_number, &line))?;
        }

        store.sort_all();

        if store.total_edge_count() != declared_edges {
            log::warn!(
                "Header declares {} edges but {} were read",
                declared_edges,
                store.total_edge_count()
            );
        }
        log::info!(
            "Loaded graph: {} vertices, {} edges, {} labels in {:.2?}",
            store.vertex_count(),
            store.total_edge_count(),
            store.label_count(),
            started.elapsed()
        );

        Ok(store)
    }
}

fn parse_header(line: &str) -> Result<(u32, u64, u32), StorageError> {
    let captures = HEADER_PATTERN
        .captures(line)
        .ok_or_else(|| StorageError::InvalidHeader(line.to_string()))?;

    let invalid = || StorageError::InvalidHeader(line.to_string());
    let vertices = captures[1].parse::<u32>().map_err(|_| invalid())?;
    let edges = captures[2].parse::<u64>().map_err(|_| invalid())?;
    let labels = captures[3].parse::<u32>().map_err(|_| invalid())?;

    Ok((vertices, edges, labels))
}

fn parse_number(digits: &str, line: usize, text: &str) -> Result<u32, StorageError> {
    digits
        .parse::<u32>()
        .map_err(|_| StorageError::InvalidEdgeLine {
            line,
            text: text.to_string(),
        })
}

fn edge_error(error: StorageError, line: usize, text: &str) -> StorageError {
    StorageError::InvalidEdgeLine {
        line,
        text: format!("{} ({})", text, error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_load_reader_sorts_labels() {
        let input = "4,3,2\n1 0 2 .\n0 0 1 .\n1 1 3 .\n";
        let store = GraphLoader::load_reader(Cursor::new(input)).unwrap();

        assert_eq!(store.vertex_count(), 4);
        assert_eq!(store.label_count(), 2);
        assert_eq!(store.total_edge_count(), 3);
        assert!(store.is_sorted());

        let label0: Vec<(u32, u32)> = store
            .forward(0)
            .unwrap()
            .iter()
            .map(|e| (e.source, e.target))
            .collect();
        assert_eq!(label0, vec![(0, 1), (1, 2)]);
    }

    #[test]
    fn test_missing_header() {
        let result = GraphLoader::load_reader(Cursor::new("0 0 1 .\n"));
        assert!(matches!(result, Err(StorageError::InvalidHeader(_))));

        let result = GraphLoader::load_reader(Cursor::new(""));
        assert!(matches!(result, Err(StorageError::InvalidHeader(_))));
    }

    #[test]
    fn test_non_edge_lines_are_skipped() {
        let input = "3,1,1\n# comment\n\n0 0 2 .\nnot an edge\n";
        let store = GraphLoader::load_reader(Cursor::new(input)).unwrap();
        assert_eq!(store.total_edge_count(), 1);
    }

    #[test]
    fn test_label_out_of_range_reports_line() {
        let input = "3,2,1\n0 0 1 .\n0 5 1 .\n";
        match GraphLoader::load_reader(Cursor::new(input)) {
            Err(StorageError::InvalidEdgeLine { line, .. }) => assert_eq!(line, 3),
            other => panic!("expected InvalidEdgeLine, got {:?}", other),
        }
    }
}
