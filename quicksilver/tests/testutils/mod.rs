//! Test utilities for Quicksilver integration tests
//!
//! - TestFixture: a coordinator over a graph written to a temporary file
//! - reference: naive nested-loop evaluation to check results against
//! - graph_generator: seeded random graphs and queries

#![allow(dead_code)]

pub mod graph_generator;
pub mod reference;
pub mod test_fixture;
