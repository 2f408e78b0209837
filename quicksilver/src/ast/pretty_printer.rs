// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Pretty printer for path ASTs with debug logging

use log::debug;

use crate::ast::ast::PathExpr;

/// Log a path AST as an indented tree at debug level
pub fn pretty_print_path(expr: &PathExpr) {
    if !log::log_enabled!(log::Level::Debug) {
        return;
    }
    debug!("Path query ({} atoms)", expr.len());
    for line in render_tree(expr) {
        debug!("{}", line);
    }
}

/// Render a path AST as indented lines, one per node
pub fn render_tree(expr: &PathExpr) -> Vec<String> {
    let mut lines = Vec::new();
    render_node(expr, 1, &mut lines);
    lines
}

fn render_node(expr: &PathExpr, indent: usize, lines: &mut Vec<String>) {
    match expr {
        PathExpr::Leaf(atom) => {
            lines.push(format!(
                "{}Leaf {} (label {}, {:?})",
                get_indent(indent),
                atom,
                atom.label,
                atom.direction
            ));
        }
        PathExpr::Concat(left, right) => {
            lines.push(format!("{}Concat", get_indent(indent)));
            render_node(left, indent + 1, lines);
            render_node(right, indent + 1, lines);
        }
    }
}

fn get_indent(level: usize) -> String {
    "  ".repeat(level)
}
