// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Engine configuration

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::exec::error::ExecutionError;

/// Evaluation settings shared by the estimator, planner and evaluator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Rebracket queries with the join planner before evaluating them
    pub planning_enabled: bool,

    /// Collapse duplicate (source, target) pairs after every join
    pub deduplicate_intermediates: bool,

    /// Collect per-label statistics on the rayon pool
    pub parallel_statistics: bool,

    /// Record and log every planner merge step
    pub trace_planning: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            planning_enabled: true,
            deduplicate_intermediates: true,
            parallel_statistics: true,
            trace_planning: false,
        }
    }
}

impl EngineConfig {
    /// Evaluate every query exactly as written, without rebracketing.
    /// Statistics are still collected for estimates.
    pub fn unplanned() -> Self {
        Self {
            planning_enabled: false,
            ..Self::default()
        }
    }

    /// Keep every intermediate path, including duplicates
    pub fn keep_duplicates() -> Self {
        let mut config = Self::default();
        config.deduplicate_intermediates = false;
        config
    }

    /// Parse a configuration from JSON. Missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ExecutionError> {
        serde_json::from_str(json)
            .map_err(|e| ExecutionError::ConfigError(format!("Invalid engine config: {}", e)))
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExecutionError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| {
            ExecutionError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&contents)
    }

    /// Serialize the configuration as pretty-printed JSON
    pub fn to_json(&self) -> Result<String, ExecutionError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| ExecutionError::ConfigError(e.to_string()))
    }
}
