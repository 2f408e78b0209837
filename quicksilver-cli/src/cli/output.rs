// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Result formatting for CLI output

use colored::*;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};
use quicksilver::coordinator::QueryPlan;
use quicksilver::plan::estimator::PerLabelStatistics;
use quicksilver::QueryResult;

use crate::cli::commands::OutputFormat;

/// Result formatter for different output formats
pub struct ResultFormatter;

impl ResultFormatter {
    /// Format one query result
    pub fn format(result: &QueryResult, format: OutputFormat) -> String {
        match format {
            OutputFormat::Table => Self::format_table(result),
            OutputFormat::Json => Self::to_json(&serde_json::json!({
                "status": "success",
                "result": result,
            })),
        }
    }

    fn format_table(result: &QueryResult) -> String {
        let mut output = String::new();

        output.push_str(&format!("{}\n", "Query Result".bold().green()));
        output.push_str(&format!("Query: {}\n", result.query));
        if let Some(plan) = &result.plan {
            output.push_str(&format!("Plan: {}\n", plan));
        }
        output.push_str(&format!(
            "Execution time: {} ms\n\n",
            result.execution_time_ms
        ));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(vec![
            Cell::new("").fg(Color::Green),
            Cell::new("Sources").fg(Color::Green),
            Cell::new("Paths").fg(Color::Green),
            Cell::new("Targets").fg(Color::Green),
        ]);
        table.add_row(vec![
            "actual".to_string(),
            result.stats.distinct_sources.to_string(),
            result.stats.path_count.to_string(),
            result.stats.distinct_targets.to_string(),
        ]);
        if let Some(estimate) = &result.estimate {
            table.add_row(vec![
                "estimated".to_string(),
                estimate.distinct_sources.to_string(),
                estimate.path_count.to_string(),
                estimate.distinct_targets.to_string(),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        Self::push_warnings(&mut output, &result.warnings);
        output
    }

    /// Format the results of a workload run, one row per query
    pub fn format_workload(results: &[QueryResult], format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::to_json(&serde_json::json!({
                "status": "success",
                "queries": results.len(),
                "results": results,
            }));
        }

        if results.is_empty() {
            return format!("{}\n", "No queries found".yellow());
        }

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            ["Query", "Sources", "Paths", "Targets", "Estimated paths", "q-error", "ms"]
                .into_iter()
                .map(|column| Cell::new(column).fg(Color::Green))
                .collect::<Vec<_>>(),
        );

        let mut warnings = Vec::new();
        for result in results {
            table.add_row(vec![
                result.query.clone(),
                result.stats.distinct_sources.to_string(),
                result.stats.path_count.to_string(),
                result.stats.distinct_targets.to_string(),
                result
                    .estimate
                    .map(|estimate| estimate.path_count.to_string())
                    .unwrap_or_else(|| "-".to_string()),
                result
                    .q_error()
                    .map(|q| format!("{:.2}", q))
                    .unwrap_or_else(|| "-".to_string()),
                result.execution_time_ms.to_string(),
            ]);
            warnings.extend(
                result
                    .warnings
                    .iter()
                    .map(|warning| format!("{}: {}", result.query, warning)),
            );
        }

        let mut output = format!("{}\n{}\n", "Workload Results".bold().green(), table);
        Self::push_warnings(&mut output, &warnings);
        output
    }

    /// Format per-label statistics
    pub fn format_stats(statistics: &PerLabelStatistics, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::to_json(&serde_json::json!(statistics));
        }

        let summary = &statistics.summary;
        let mut output = format!("{}\n", "Graph Statistics".bold().green());
        output.push_str(&format!(
            "Vertices: {} ({} isolated)\nEdges: {}\nLabels: {}\n\n",
            summary.vertices, summary.isolated_vertices, summary.edges, summary.labels
        ));

        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(
            ["Label", "Out edges", "Distinct sources", "In edges", "Distinct targets"]
                .into_iter()
                .map(|column| Cell::new(column).fg(Color::Green))
                .collect::<Vec<_>>(),
        );
        for (label, stats) in statistics.labels.iter().enumerate() {
            table.add_row(vec![
                label.to_string(),
                stats.total_out.to_string(),
                stats.distinct_out.to_string(),
                stats.total_in.to_string(),
                stats.distinct_in.to_string(),
            ]);
        }

        output.push_str(&table.to_string());
        output.push('\n');
        output
    }

    /// Format an explained plan
    pub fn format_plan(plan: &QueryPlan, format: OutputFormat) -> String {
        if format == OutputFormat::Json {
            return Self::to_json(&serde_json::json!({
                "query": plan.query,
                "expression": plan.expression.to_query_string(),
                "merges": plan.merges,
                "estimate": plan.estimate,
                "planning_time_ms": plan.total_planning_time_ms,
            }));
        }

        let mut output = format!("{}\n", "Query Plan".bold().green());
        output.push_str(&format!("Query: {}\n", plan.query));
        output.push_str(&format!("Evaluated as: {}\n", plan.expression));
        output.push_str(&format!("{}\n\n", plan.summary()));
        output.push_str(&plan.format_tree());
        output.push('\n');

        if !plan.planning_steps.is_empty() {
            output.push_str(&format!("\n{}\n", "Merge steps:".bold()));
            for (round, step) in plan.planning_steps.iter().enumerate() {
                output.push_str(&format!(
                    "  {}. @{} {} / {} -> {}\n",
                    round + 1,
                    step.position,
                    step.left,
                    step.right,
                    step.estimate
                ));
            }
        }
        output
    }

    fn push_warnings(output: &mut String, warnings: &[String]) {
        if warnings.is_empty() {
            return;
        }
        output.push_str(&format!("\n{}\n", "Warnings:".bold().yellow()));
        for (i, warning) in warnings.iter().enumerate() {
            output.push_str(&format!("  {}. {}\n", i + 1, warning.yellow()));
        }
    }

    fn to_json(value: &serde_json::Value) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|_| {
            "{\"status\": \"error\", \"error\": \"Could not serialize results to JSON\"}"
                .to_string()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quicksilver::CardinalityStat;

    #[test]
    fn test_json_result_contains_stats() {
        let mut result = QueryResult::new("0+/1+", CardinalityStat::new(1, 2, 3));
        result.plan = Some("(0+/1+)".to_string());

        let json: serde_json::Value =
            serde_json::from_str(&ResultFormatter::format(&result, OutputFormat::Json)).unwrap();
        assert_eq!(json["status"], "success");
        assert_eq!(json["result"]["stats"]["path_count"], 2);
        assert_eq!(json["result"]["plan"], "(0+/1+)");
    }

    #[test]
    fn test_table_lists_warnings() {
        let result = QueryResult::malformed("abc", "abc");
        let output = ResultFormatter::format(&result, OutputFormat::Table);
        assert!(output.contains("Warnings"));
        assert!(output.contains("abc"));
    }

    #[test]
    fn test_empty_workload() {
        let output = ResultFormatter::format_workload(&[], OutputFormat::Table);
        assert!(output.contains("No queries found"));
    }
}
