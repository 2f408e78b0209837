//! Test fixture for Quicksilver integration tests
//!
//! Writes a graph to a temporary file in the ingestion format and loads it
//! through the public `QueryCoordinator` API, so every fixture also
//! exercises the loader.

use quicksilver::{CardinalityStat, EngineConfig, ExecutionError, QueryCoordinator, QueryResult};
use std::fs;
use std::io::Write;
use std::path::PathBuf;

use super::graph_generator::random_edges;
use super::reference::{self, LabeledEdge};

/// V=4, L=2: (0,1,l0), (1,2,l0), (1,3,l1)
pub const SMALL_GRAPH: &[LabeledEdge] = &[(0, 1, 0), (1, 2, 0), (1, 3, 1)];

pub struct TestFixture {
    coordinator: QueryCoordinator,
    edges: Vec<LabeledEdge>,
    vertex_count: u32,
    label_count: u32,
    temp_dir: tempfile::TempDir,
}

impl TestFixture {
    /// The four-vertex graph used throughout the end-to-end tests
    pub fn small() -> Result<Self, Box<dyn std::error::Error>> {
        Self::from_edges(4, 2, SMALL_GRAPH, EngineConfig::default())
    }

    /// Seeded random graph
    pub fn random(
        seed: u64,
        vertex_count: u32,
        label_count: u32,
        edge_count: usize,
        config: EngineConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let mut rng = fastrand::Rng::with_seed(seed);
        let edges = random_edges(&mut rng, vertex_count, label_count, edge_count);
        Self::from_edges(vertex_count, label_count, &edges, config)
    }

    pub fn from_edges(
        vertex_count: u32,
        label_count: u32,
        edges: &[LabeledEdge],
        config: EngineConfig,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let _ = env_logger::builder().is_test(true).try_init();

        let temp_dir = tempfile::tempdir()?;
        let graph_path = temp_dir.path().join("graph.nt");

        let mut file = fs::File::create(&graph_path)?;
        writeln!(file, "{},{},{}", vertex_count, edges.len(), label_count)?;
        for (source, target, label) in edges {
            writeln!(file, "{} {} {} .", source, label, target)?;
        }
        file.flush()?;

        let coordinator = QueryCoordinator::from_graph_file(&graph_path, config)?;

        Ok(Self {
            coordinator,
            edges: edges.to_vec(),
            vertex_count,
            label_count,
            temp_dir,
        })
    }

    pub fn coordinator(&self) -> &QueryCoordinator {
        &self.coordinator
    }

    pub fn edges(&self) -> &[LabeledEdge] {
        &self.edges
    }

    pub fn vertex_count(&self) -> u32 {
        self.vertex_count
    }

    pub fn label_count(&self) -> u32 {
        self.label_count
    }

    pub fn query(&self, query: &str) -> Result<QueryResult, ExecutionError> {
        self.coordinator.process_query(query)
    }

    /// Exact answer computed by nested loops over the raw edge list
    pub fn reference(&self, query: &str) -> CardinalityStat {
        reference::evaluate(&self.edges, query)
    }

    /// Assert that `query` evaluates to the same stats as the reference
    pub fn assert_matches_reference(&self, query: &str) {
        let result = self
            .query(query)
            .unwrap_or_else(|e| panic!("query '{}' failed: {}", query, e));
        assert_eq!(
            result.stats,
            self.reference(query),
            "query '{}' (plan {:?})",
            query,
            result.plan
        );
    }

    /// Write a workload file next to the graph
    pub fn write_workload(&self, lines: &[&str]) -> Result<PathBuf, Box<dyn std::error::Error>> {
        let path = self.temp_dir.path().join("workload.txt");
        fs::write(&path, lines.join("\n"))?;
        Ok(path)
    }
}
