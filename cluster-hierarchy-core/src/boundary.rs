//! Boundary-edge extraction (§4.1): for each cluster, the sorted set of
//! edges that belong to exactly one of its triangles.

use std::collections::HashMap;

use crate::buffers::{Buffers, Cluster};
use crate::util::pack_sorted_edge;

/// Extracts the sorted boundary-edge key sequence for a single cluster.
///
/// A cluster's triangles are welded: an edge shared by two triangles of the
/// same cluster is interior; an edge belonging to only one triangle lies on
/// the cluster's border. Locking these edges during simplification is what
/// keeps neighbouring groups stitched together (see
/// [`crate::group::GroupSimplifier`]).
#[must_use]
pub fn extract_boundary(buffers: &Buffers, cluster: &Cluster) -> Vec<u64> {
    let mut counts: HashMap<u64, u32> = HashMap::new();
    let triangle_bytes = &buffers.triangles[cluster.triangle_byte_range()];
    for corners in triangle_bytes.chunks_exact(3) {
        let global = |local: u8| buffers.vertices[cluster.vertex_offset as usize + usize::from(local)];
        let a = global(corners[0]);
        let b = global(corners[1]);
        let c = global(corners[2]);
        for edge in [pack_sorted_edge(a, b), pack_sorted_edge(a, c), pack_sorted_edge(b, c)] {
            *counts.entry(edge).or_insert(0) += 1;
        }
    }

    let mut boundary: Vec<u64> = counts
        .into_iter()
        .filter_map(|(edge, count)| (count == 1).then_some(edge))
        .collect();
    boundary.sort_unstable();
    boundary
}

/// Extracts boundaries for every cluster in `clusters`, in order.
///
/// Callers that want this run in parallel should route the call through
/// [`crate::loop_runner::LoopRunner`]; this function itself is sequential so
/// it can be reused from both parallel and single-threaded call sites.
#[must_use]
pub fn extract_boundaries(buffers: &Buffers, clusters: &[Cluster]) -> Vec<Vec<u64>> {
    clusters.iter().map(|cluster| extract_boundary(buffers, cluster)).collect()
}
