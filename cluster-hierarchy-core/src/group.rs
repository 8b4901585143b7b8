//! Group-level simplification (§4.4): merging a group's triangles into a
//! single index buffer and running locked-border edge-collapse
//! simplification over it.

use crate::buffers::{Buffers, ClusterIndex};
use crate::params::HierarchyParams;
use crate::simplify::Simplifier;

/// The outcome of attempting to simplify one group's merged geometry.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GroupSimplifyOutcome {
    /// `true` iff the simplified index count was strictly smaller than the
    /// merged index count (§4.4 step 3). When `false`, the caller must
    /// forward the group's clusters unchanged rather than read `indices`
    /// or `error`.
    pub simplified: bool,
    /// The simplifier's output index buffer. Only meaningful when
    /// `simplified` is `true`.
    pub indices: Vec<u32>,
    /// The simplifier's reported absolute error. Only meaningful when
    /// `simplified` is `true`.
    pub error: f32,
}

/// Concatenates a group's triangles, expanded to global mesh-vertex
/// indices, into one buffer (§4.4 step 1).
#[must_use]
pub fn merge_group_indices(buffers: &Buffers, group: &[ClusterIndex]) -> Vec<u32> {
    let mut merged = Vec::new();
    for cluster_index in group {
        let cluster = buffers.clusters[cluster_index.index];
        merged.extend(buffers.global_triangle_indices(&cluster));
    }
    merged
}

/// Runs §4.4 step 2–3 over a group's already-merged index buffer.
///
/// The target index count halves when the group has two or fewer members,
/// matching the source pipeline's treatment of small groups: a two-cluster
/// group is close enough to a single cluster's budget that simplifying all
/// the way to the full target would rarely reduce anything.
#[must_use]
pub fn simplify_group(
    simplifier: &dyn Simplifier,
    merged_indices: &[u32],
    positions: &[f32],
    vertex_stride: usize,
    group_size: usize,
    params: &HierarchyParams,
) -> GroupSimplifyOutcome {
    #[expect(
        clippy::integer_division,
        reason = "divisor is the constant 1 or 2, not a precision-sensitive runtime ratio"
    )]
    let target_index_count = if group_size <= 2 {
        params.simplify_target_index_count() / 2
    } else {
        params.simplify_target_index_count()
    };

    let result = simplifier.simplify(
        merged_indices,
        positions,
        vertex_stride,
        target_index_count,
        f32::INFINITY,
    );

    let simplified = result.indices.len() < merged_indices.len();
    if simplified {
        GroupSimplifyOutcome {
            simplified: true,
            indices: result.indices,
            error: result.error,
        }
    } else {
        GroupSimplifyOutcome::default()
    }
}
