//! The cluster-hierarchy build pipeline (§4.8): build leaf clusters from the
//! input mesh, then repeatedly partition the working set into groups,
//! simplify and re-cluster each group, and merge the results into the next
//! level's working set, until the set stops shrinking or the depth budget
//! runs out.

use tracing::{debug, info, instrument};

use crate::adjacency::build_adjacency;
use crate::boundary::extract_boundary;
use crate::buffers::{Buffers, ClusterIndex};
use crate::error::{BuildError, Result};
use crate::error_propagation::propagate_group_error;
use crate::geometry::NodeErrorBounds;
use crate::group::{merge_group_indices, simplify_group};
use crate::loop_runner::LoopRunner;
use crate::merge::{GroupOutcome, merge_level};
use crate::meshlet::MeshletBuilder;
use crate::node::{ClusterHierarchy, LevelStats, Node};
use crate::parent::{build_parents, optimize_and_bound};
use crate::params::HierarchyParams;
use crate::partition::{GraphPartitioner, num_parts, resolve_groups};
use crate::simplify::Simplifier;

/// Validates raw mesh input before building a hierarchy (§7).
///
/// # Errors
/// Returns [`BuildError::ZeroParameter`] when `vertex_stride` is zero,
/// [`BuildError::InvalidIndexCount`] when `indices.len()` is not a multiple
/// of 3, and [`BuildError::InvalidVertexStride`] when the vertex buffer's
/// byte length is not a multiple of `vertex_stride`.
pub fn validate_input(indices: &[u32], vertices: &[f32], vertex_stride: usize) -> Result<()> {
    if vertex_stride == 0 {
        return Err(BuildError::ZeroParameter {
            field: "vertex_stride",
        });
    }
    if indices.len() % 3 != 0 {
        return Err(BuildError::InvalidIndexCount { len: indices.len() });
    }
    let byte_len = vertices.len() * std::mem::size_of::<f32>();
    if byte_len % vertex_stride != 0 {
        return Err(BuildError::InvalidVertexStride {
            float_count: vertices.len(),
            byte_len,
            vertex_stride,
        });
    }
    Ok(())
}

/// Runs the full build pipeline over already-validated collaborators.
///
/// This is the engine behind [`crate::builder::HierarchyBuilder::build`];
/// callers normally reach it through that builder rather than directly.
///
/// # Errors
/// Propagates any error the `partitioner` returns.
#[instrument(skip_all, fields(index_count = indices.len()))]
pub fn build_cluster_hierarchy(
    indices: &[u32],
    vertices: &[f32],
    vertex_stride: usize,
    params: &HierarchyParams,
    meshlet_builder: &dyn MeshletBuilder,
    simplifier: &dyn Simplifier,
    partitioner: &dyn GraphPartitioner,
    loop_runner: &LoopRunner,
) -> Result<ClusterHierarchy> {
    validate_input(indices, vertices, vertex_stride)?;

    let mut buffers = Buffers::new();
    let mut errors: Vec<NodeErrorBounds> = Vec::new();
    let mut bounds = Vec::new();
    let mut nodes: Vec<Node> = Vec::new();
    let mut stats = Vec::new();

    let mut pool = build_leaves(
        indices,
        vertices,
        vertex_stride,
        params,
        meshlet_builder,
        &mut buffers,
        &mut errors,
        &mut bounds,
        &mut nodes,
    );
    info!(leaf_count = pool.len(), "built leaf clusters");

    for level in 1..=params.max_hierarchy_depth().get() {
        if pool.len() <= 1 {
            break;
        }

        let clusters_in = pool.len();
        let groups = partition_level(&pool, &buffers, params, partitioner, loop_runner)?;
        let group_count = groups.len();
        debug!(
            level,
            clusters_in, group_count, "partitioned level into groups"
        );

        let outcomes: Vec<GroupOutcome> = loop_runner.run_collect(groups.len(), |g| {
            process_group(
                &groups[g],
                &pool,
                &buffers,
                &errors,
                vertices,
                vertex_stride,
                meshlet_builder,
                simplifier,
                params,
            )
        });

        let merge_result = merge_level(
            level,
            &mut buffers,
            &mut errors,
            &mut bounds,
            &mut nodes,
            outcomes,
        );

        let next_count = merge_result.next_clusters.len();
        let groups_simplified = merge_result.groups_simplified;
        let groups_forwarded = merge_result.groups_forwarded;
        let is_last = next_count <= 1 || groups_simplified == 0 || level == params.max_hierarchy_depth().get();
        info!(
            level,
            groups_simplified, groups_forwarded, next_count, is_last, "level complete"
        );

        stats.push(LevelStats {
            level,
            clusters_in,
            group_count,
            groups_simplified,
            groups_forwarded,
        });

        pool = merge_result.next_clusters;
        if groups_simplified == 0 {
            break;
        }
    }

    let root_nodes = pool.iter().map(|cluster_index| cluster_index.index).collect();

    Ok(ClusterHierarchy {
        nodes,
        root_nodes,
        errors,
        bounds,
        buffers,
        stats,
    })
}

/// Builds level-0 leaf clusters straight from the input mesh (§4.8 Init).
#[allow(clippy::too_many_arguments, reason = "mirrors the buffer triple every level step threads through")]
fn build_leaves(
    indices: &[u32],
    vertices: &[f32],
    vertex_stride: usize,
    params: &HierarchyParams,
    meshlet_builder: &dyn MeshletBuilder,
    buffers: &mut Buffers,
    errors: &mut Vec<NodeErrorBounds>,
    bounds: &mut Vec<crate::geometry::ClusterBounds>,
    nodes: &mut Vec<Node>,
) -> Vec<ClusterIndex> {
    let built = meshlet_builder.build(
        indices,
        vertices,
        vertex_stride,
        params.max_vertices_per_cluster().get(),
        params.max_triangles_per_cluster().get(),
        params.cluster_cone_weight(),
    );
    let (built, leaf_bounds) = optimize_and_bound(meshlet_builder, built, vertices, vertex_stride);

    buffers.reserve(built.clusters.len(), built.vertices.len(), built.triangles.len());
    buffers.vertices.extend(built.vertices);
    buffers.triangles.extend(built.triangles);

    let mut pool = Vec::with_capacity(built.clusters.len());
    for (cluster, cluster_bounds) in built.clusters.into_iter().zip(leaf_bounds) {
        let cluster_index = buffers.clusters.len();
        buffers.clusters.push(cluster);
        nodes.push(Node::new(cluster_index, Vec::new()));
        errors.push(NodeErrorBounds::leaf(cluster_bounds.sphere));
        bounds.push(cluster_bounds);
        pool.push(ClusterIndex::new(cluster_index, 0));
    }
    pool
}

/// Splits the current working set into groups (§4.2–§4.3): a single group
/// covering the whole pool once it is small enough to be a final root
/// group, otherwise a k-way min-cut partition of the adjacency graph built
/// from shared cluster boundaries.
fn partition_level(
    pool: &[ClusterIndex],
    buffers: &Buffers,
    params: &HierarchyParams,
    partitioner: &dyn GraphPartitioner,
    loop_runner: &LoopRunner,
) -> Result<Vec<Vec<usize>>> {
    if pool.len() <= params.target_clusters_per_group().get() {
        return Ok(vec![(0..pool.len()).collect()]);
    }

    let boundaries = loop_runner.run_collect(pool.len(), |i| {
        extract_boundary(buffers, &buffers.clusters[pool[i].index])
    });
    let graph = build_adjacency(&boundaries, loop_runner);
    let parts = num_parts(pool.len(), params.target_clusters_per_group());
    let partition = partitioner.part_kway(&graph, parts)?;
    Ok(resolve_groups(&partition, parts))
}

/// Runs §4.4–§4.6 over a single group: merge, simplify, re-cluster, and
/// (when the result is an improvement) propagate error bounds. Falls back
/// to forwarding the group's clusters unchanged whenever simplification or
/// re-clustering does not reduce cluster count.
#[allow(clippy::too_many_arguments, reason = "bundles the group's full read-only context for one call site")]
fn process_group(
    member_indices: &[usize],
    pool: &[ClusterIndex],
    buffers: &Buffers,
    errors: &[NodeErrorBounds],
    positions: &[f32],
    vertex_stride: usize,
    meshlet_builder: &dyn MeshletBuilder,
    simplifier: &dyn Simplifier,
    params: &HierarchyParams,
) -> GroupOutcome {
    let children: Vec<ClusterIndex> = member_indices.iter().map(|&i| pool[i]).collect();
    let merged = merge_group_indices(buffers, &children);
    let simplify_outcome = simplify_group(
        simplifier,
        &merged,
        positions,
        vertex_stride,
        children.len(),
        params,
    );
    if !simplify_outcome.simplified {
        return GroupOutcome::Forwarded(children);
    }

    let parent_outcome = build_parents(
        meshlet_builder,
        &simplify_outcome.indices,
        positions,
        vertex_stride,
        children.len(),
        params,
    );
    if !parent_outcome.useful {
        return GroupOutcome::Forwarded(children);
    }

    let child_errors: Vec<NodeErrorBounds> =
        children.iter().map(|child| errors[child.index]).collect();
    let group_error = propagate_group_error(&child_errors, simplify_outcome.error);

    GroupOutcome::Simplified {
        children,
        built: parent_outcome.built,
        parent_bounds: parent_outcome.bounds,
        group_error,
    }
}
