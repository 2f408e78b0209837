// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI module for Quicksilver
//!
//! Provides one-off query evaluation, workload runs, graph statistics and
//! an interactive query console.

pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{Cli, Commands};
pub use handlers::{handle_query, handle_repl, handle_stats, handle_workload};
