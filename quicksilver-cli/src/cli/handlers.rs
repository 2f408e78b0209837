// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! CLI command handlers for Quicksilver

use colored::Colorize;
use rustyline::{error::ReadlineError, CompletionType, Config, EditMode, Editor};
use std::path::{Path, PathBuf};
use std::time::Instant;

use super::commands::OutputFormat;
use super::output::ResultFormatter;
use quicksilver::{EngineConfig, QueryCoordinator};

/// Handle the query command (one-off query evaluation)
pub fn handle_query(
    graph: Option<PathBuf>,
    config: Option<PathBuf>,
    query: String,
    format: OutputFormat,
    explain: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = load_graph(graph, config)?;

    if explain {
        let plan = coordinator.explain_query(&query)?;
        println!("{}", ResultFormatter::format_plan(&plan, format));
        return Ok(());
    }

    match coordinator.process_query(&query) {
        Ok(result) => {
            println!("{}", ResultFormatter::format(&result, format));
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", format!("Error: {}", e).red());
            Err(e.into())
        }
    }
}

/// Handle the workload command
pub fn handle_workload(
    graph: Option<PathBuf>,
    config: Option<PathBuf>,
    file: PathBuf,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = load_graph(graph, config)?;

    let started = Instant::now();
    let results = coordinator.run_workload(&file)?;
    println!("{}", ResultFormatter::format_workload(&results, format));

    if format == OutputFormat::Table {
        println!(
            "{}",
            format!("{} queries in {:.2?}", results.len(), started.elapsed()).cyan()
        );
    }
    Ok(())
}

/// Handle the stats command
pub fn handle_stats(
    graph: Option<PathBuf>,
    config: Option<PathBuf>,
    format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = load_graph(graph, config)?;
    let statistics = coordinator
        .statistics()
        .ok_or("Graph statistics are not available")?;

    println!("{}", ResultFormatter::format_stats(statistics, format));
    Ok(())
}

/// Handle the repl command
pub fn handle_repl(
    graph: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    let coordinator = load_graph(graph, config)?;

    println!("{}", "Quicksilver".bold().green());
    println!("Type 'help' for commands, 'exit' or 'quit' to exit");
    if let Some(statistics) = coordinator.statistics() {
        let summary = statistics.summary;
        println!(
            "{}\n",
            format!(
                "Graph: {} vertices, {} edges, {} labels",
                summary.vertices, summary.edges, summary.labels
            )
            .cyan()
        );
    }

    let config = Config::builder()
        .edit_mode(EditMode::Emacs)
        .history_ignore_space(true)
        .completion_type(CompletionType::List)
        .auto_add_history(false)
        .build();

    let mut rl = Editor::<(), _>::with_config(config)?;

    let history_path = ".quicksilver/.rpq_history.txt";
    if let Some(parent) = Path::new(history_path).parent() {
        std::fs::create_dir_all(parent)?;
    }
    let _ = rl.load_history(history_path);

    loop {
        let line = match rl.readline("rpq> ") {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => continue,
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        };

        let trimmed = line.trim().trim_end_matches(';').trim();

        match trimmed.to_lowercase().as_str() {
            "exit" | "quit" => {
                println!("{}", "Goodbye!".green());
                break;
            }
            "help" => {
                print_help();
                continue;
            }
            "stats" => {
                if let Some(statistics) = coordinator.statistics() {
                    println!(
                        "{}",
                        ResultFormatter::format_stats(statistics, OutputFormat::Table)
                    );
                }
                continue;
            }
            "" => continue,
            _ => {}
        }

        rl.add_history_entry(trimmed)?;

        let outcome = match trimmed.strip_prefix("explain ") {
            Some(query) => coordinator
                .explain_query(query.trim())
                .map(|plan| ResultFormatter::format_plan(&plan, OutputFormat::Table)),
            None => coordinator
                .process_query(trimmed)
                .map(|result| ResultFormatter::format(&result, OutputFormat::Table)),
        };

        match outcome {
            Ok(output) => println!("{}", output),
            Err(e) => eprintln!("{}", format!("Error: {}", e).red()),
        }
    }

    let _ = rl.save_history(history_path);

    Ok(())
}

/// Load the graph named by `--graph`, with the optional engine config
fn load_graph(
    graph: Option<PathBuf>,
    config: Option<PathBuf>,
) -> Result<QueryCoordinator, Box<dyn std::error::Error>> {
    let graph = graph.ok_or("No graph file given. Use --graph <FILE>.")?;
    if !graph.exists() {
        return Err(format!("Graph file not found at {:?}", graph).into());
    }

    let config = match config {
        Some(path) => EngineConfig::from_json_file(path)?,
        None => EngineConfig::default(),
    };

    let started = Instant::now();
    let coordinator = QueryCoordinator::from_graph_file(&graph, config)?;
    log::info!("Loaded {:?} in {:.2?}", graph, started.elapsed());

    Ok(coordinator)
}

/// Print help message
fn print_help() {
    println!("{}", "Available commands:".bold().green());
    println!("  {}  - Show this help message", "help".cyan());
    println!("  {}  - Exit the console", "exit/quit".cyan());
    println!("  {}  - Show per-label statistics", "stats".cyan());
    println!("  {}  - Show the plan for a query", "explain <query>".cyan());
    println!("\n{}", "Query syntax:".bold().green());
    println!("  <label>+ follows an edge forward, <label>- follows it backward");
    println!("  Atoms are joined with '/', parentheses fix the evaluation order");
    println!("\n{}", "Examples:".bold().green());
    println!("  {}", "0+/1-".yellow());
    println!("  {}", "(0+/1+)/2-".yellow());
    println!("  {}", "explain 0+/1+/2+".yellow());
}
