//! Re-clustering simplified geometry into parent clusters (§4.5).

use crate::geometry::ClusterBounds;
use crate::meshlet::{BuiltMeshlets, MeshletBuilder};
use crate::params::HierarchyParams;

/// The outcome of attempting to build parent clusters from a group's
/// simplified indices.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParentBuildOutcome {
    /// `true` iff the builder produced strictly fewer clusters than the
    /// group it replaces (§4.5). When `false`, the caller must forward the
    /// group's clusters unchanged rather than read `built` or `bounds`.
    pub useful: bool,
    /// The newly built parent clusters, with offsets local to this call.
    /// Only meaningful when `useful` is `true`.
    pub built: BuiltMeshlets,
    /// Culling bounds for each of `built.clusters`, in the same order. Only
    /// meaningful when `useful` is `true`.
    pub bounds: Vec<ClusterBounds>,
}

/// Runs §4.5 over a group's simplified indices: re-clusters them into
/// bounded-size parent clusters, then optimizes and bounds each one.
#[must_use]
pub fn build_parents(
    meshlet_builder: &dyn MeshletBuilder,
    simplified_indices: &[u32],
    positions: &[f32],
    vertex_stride: usize,
    group_child_count: usize,
    params: &HierarchyParams,
) -> ParentBuildOutcome {
    let built = meshlet_builder.build(
        simplified_indices,
        positions,
        vertex_stride,
        params.max_vertices_per_cluster().get(),
        params.max_triangles_per_cluster().get(),
        params.cluster_cone_weight(),
    );

    if built.clusters.len() >= group_child_count {
        return ParentBuildOutcome::default();
    }

    let (built, bounds) = optimize_and_bound(meshlet_builder, built, positions, vertex_stride);
    ParentBuildOutcome {
        useful: true,
        built,
        bounds,
    }
}

/// Optimizes the vertex order of, and computes culling bounds for, every
/// cluster in a freshly built batch (§6.2 `optimizeMeshlet`,
/// `computeMeshletBounds`).
///
/// Shared between [`build_parents`] and the driver's level-0 leaf
/// construction, since both need the same per-cluster post-processing
/// after calling [`MeshletBuilder::build`].
#[must_use]
pub fn optimize_and_bound(
    meshlet_builder: &dyn MeshletBuilder,
    mut built: BuiltMeshlets,
    positions: &[f32],
    vertex_stride: usize,
) -> (BuiltMeshlets, Vec<ClusterBounds>) {
    let mut bounds = Vec::with_capacity(built.clusters.len());
    for cluster in &built.clusters {
        let vertex_range = cluster.vertex_range();
        let triangle_range = cluster.triangle_byte_range();
        meshlet_builder.optimize(
            &mut built.vertices[vertex_range.clone()],
            &mut built.triangles[triangle_range.clone()],
        );
        bounds.push(meshlet_builder.bounds(
            &built.vertices[vertex_range],
            &built.triangles[triangle_range],
            positions,
            vertex_stride,
        ));
    }
    (built, bounds)
}
