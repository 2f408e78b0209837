//! Seeded random graphs and path queries

use super::reference::LabeledEdge;

/// `edge_count` random labeled edges; duplicates and self loops allowed
pub fn random_edges(
    rng: &mut fastrand::Rng,
    vertex_count: u32,
    label_count: u32,
    edge_count: usize,
) -> Vec<LabeledEdge> {
    (0..edge_count)
        .map(|_| {
            (
                rng.u32(0..vertex_count),
                rng.u32(0..vertex_count),
                rng.u32(0..label_count),
            )
        })
        .collect()
}

/// Random concatenation of `length` atoms, written without brackets
pub fn random_query(rng: &mut fastrand::Rng, label_count: u32, length: usize) -> String {
    (0..length)
        .map(|_| {
            let suffix = if rng.bool() { '+' } else { '-' };
            format!("{}{}", rng.u32(0..label_count), suffix)
        })
        .collect::<Vec<_>>()
        .join("/")
}
