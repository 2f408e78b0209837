// Copyright (c) 2024-2025 DeepGraph Inc.
// SPDX-License-Identifier: Apache-2.0
//
//! Abstract Syntax Tree (AST) structures for path queries

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction in which a labeled edge is traversed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// `<label>+`: follow the edge from source to target
    Forward,
    /// `<label>-`: follow the edge from target to source
    Inverse,
}

impl Direction {
    pub fn is_inverse(&self) -> bool {
        matches!(self, Direction::Inverse)
    }

    fn suffix(&self) -> char {
        match self {
            Direction::Forward => '+',
            Direction::Inverse => '-',
        }
    }
}

/// One directed-or-inverse labeled step of a path query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Atom {
    pub label: u32,
    pub direction: Direction,
}

impl Atom {
    pub fn forward(label: u32) -> Self {
        Self {
            label,
            direction: Direction::Forward,
        }
    }

    pub fn inverse(label: u32) -> Self {
        Self {
            label,
            direction: Direction::Inverse,
        }
    }

    /// Parse atom text of the form `<digits>+` or `<digits>-`
    pub fn from_text(text: &str) -> Option<Self> {
        let direction = match text.chars().last()? {
            '+' => Direction::Forward,
            '-' => Direction::Inverse,
            _ => return None,
        };

        let digits = &text[..text.len() - 1];
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }

        let label = digits.parse::<u32>().ok()?;
        Some(Self { label, direction })
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.label, self.direction.suffix())
    }
}

/// A concatenation-only path expression
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathExpr {
    Leaf(Atom),
    Concat(Box<PathExpr>, Box<PathExpr>),
}

impl PathExpr {
    pub fn leaf(atom: Atom) -> Self {
        PathExpr::Leaf(atom)
    }

    pub fn concat(left: PathExpr, right: PathExpr) -> Self {
        PathExpr::Concat(Box::new(left), Box::new(right))
    }

    /// Left-deep concatenation of `atoms`; `None` when empty
    pub fn chain(atoms: &[Atom]) -> Option<Self> {
        let (first, rest) = atoms.split_first()?;
        Some(
            rest.iter()
                .fold(PathExpr::Leaf(*first), |acc, atom| {
                    PathExpr::concat(acc, PathExpr::Leaf(*atom))
                }),
        )
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, PathExpr::Leaf(_))
    }

    /// Leaf atoms in left-to-right query order
    pub fn atoms(&self) -> Vec<Atom> {
        let mut atoms = Vec::new();
        self.collect_atoms(&mut atoms);
        atoms
    }

    fn collect_atoms(&self, atoms: &mut Vec<Atom>) {
        match self {
            PathExpr::Leaf(atom) => atoms.push(*atom),
            PathExpr::Concat(left, right) => {
                left.collect_atoms(atoms);
                right.collect_atoms(atoms);
            }
        }
    }

    /// Number of leaf atoms
    pub fn len(&self) -> usize {
        match self {
            PathExpr::Leaf(_) => 1,
            PathExpr::Concat(left, right) => left.len() + right.len(),
        }
    }

    /// Depth of the concatenation tree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        match self {
            PathExpr::Leaf(_) => 1,
            PathExpr::Concat(left, right) => 1 + left.depth().max(right.depth()),
        }
    }

    /// Canonical query text; nested concatenations are parenthesized
    pub fn to_query_string(&self) -> String {
        self.to_string()
    }

    fn write_nested(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpr::Leaf(atom) => write!(f, "{}", atom),
            PathExpr::Concat(..) => {
                write!(f, "(")?;
                self.write_root(f)?;
                write!(f, ")")
            }
        }
    }

    fn write_root(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathExpr::Leaf(atom) => write!(f, "{}", atom),
            PathExpr::Concat(left, right) => {
                left.write_nested(f)?;
                write!(f, "/")?;
                right.write_nested(f)
            }
        }
    }
}

impl fmt::Display for PathExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_root(f)
    }
}
