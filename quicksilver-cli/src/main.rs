// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Quicksilver CLI entry point

use clap::Parser;
use colored::Colorize;

mod cli;
use cli::{Cli, Commands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse command line arguments first to get log level
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else if let Some(level) = cli.log_level {
        level.to_level_filter()
    } else {
        // Default to Warn (can still be overridden by RUST_LOG env var)
        log::LevelFilter::Warn
    };

    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match cli.command {
        Commands::Version => {
            println!("{} {}", "Quicksilver".bold().green(), quicksilver::VERSION);
            println!("Regular path query evaluation");
            Ok(())
        }

        Commands::Query {
            query,
            format,
            explain,
        } => cli::handle_query(cli.graph, cli.config, query, format, explain),

        Commands::Workload { file, format } => {
            cli::handle_workload(cli.graph, cli.config, file, format)
        }

        Commands::Stats { format } => cli::handle_stats(cli.graph, cli.config, format),

        Commands::Repl => cli::handle_repl(cli.graph, cli.config),
    }
}
