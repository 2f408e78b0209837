//! Naive reference evaluation
//!
//! Composes path relations with nested loops over plain edge lists. Slow,
//! but simple enough to trust.

use quicksilver::{parse_path_query, Atom, CardinalityStat};
use std::collections::BTreeSet;

/// Labeled edge as (source, target, label)
pub type LabeledEdge = (u32, u32, u32);

/// Distinct (source, target) pairs of one atom
pub fn atom_relation(edges: &[LabeledEdge], atom: &Atom) -> BTreeSet<(u32, u32)> {
    edges
        .iter()
        .filter(|(_, _, label)| *label == atom.label)
        .map(|&(source, target, _)| {
            if atom.direction.is_inverse() {
                (target, source)
            } else {
                (source, target)
            }
        })
        .collect()
}

/// Compose two relations on `left.target == right.source`
pub fn compose(
    left: &BTreeSet<(u32, u32)>,
    right: &BTreeSet<(u32, u32)>,
) -> BTreeSet<(u32, u32)> {
    let mut out = BTreeSet::new();
    for &(source, middle) in left {
        for &(other, target) in right {
            if middle == other {
                out.insert((source, target));
            }
        }
    }
    out
}

/// Exact statistics of a relation
pub fn stats_of(relation: &BTreeSet<(u32, u32)>) -> CardinalityStat {
    let sources: BTreeSet<u32> = relation.iter().map(|(s, _)| *s).collect();
    let targets: BTreeSet<u32> = relation.iter().map(|(_, t)| *t).collect();
    CardinalityStat::new(
        sources.len() as u64,
        relation.len() as u64,
        targets.len() as u64,
    )
}

/// Evaluate query text left to right against `edges`
pub fn evaluate(edges: &[LabeledEdge], query: &str) -> CardinalityStat {
    let expr = parse_path_query(query).expect("reference query must parse");
    let atoms = expr.atoms();

    let mut relation = atom_relation(edges, &atoms[0]);
    for atom in &atoms[1..] {
        relation = compose(&relation, &atom_relation(edges, atom));
    }
    stats_of(&relation)
}
