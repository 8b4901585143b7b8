//! Level merging (§4.7): stitching each level's independently-produced
//! per-group outputs into the shared, process-wide [`Buffers`].

use crate::buffers::{Buffers, ClusterIndex};
use crate::geometry::{ClusterBounds, ErrorBounds, NodeErrorBounds};
use crate::meshlet::BuiltMeshlets;
use crate::node::Node;

/// The outcome of attempting to simplify one group (§4.4–§4.6).
pub enum GroupOutcome {
    /// The group did not simplify (or reverted after a failed attempt): its
    /// clusters are forwarded unchanged into the next level's working set.
    Forwarded(Vec<ClusterIndex>),
    /// The group simplified successfully: `built` holds its new parent
    /// clusters, `parent_bounds` their culling bounds (parallel to
    /// `built.clusters`), and `group_error` the error bounds every new
    /// parent shares.
    Simplified {
        /// The group's children, whose `parent_error` will be updated.
        children: Vec<ClusterIndex>,
        /// The new parent clusters, with offsets local to this call.
        built: BuiltMeshlets,
        /// Culling bounds for each of `built.clusters`, in the same order.
        parent_bounds: Vec<ClusterBounds>,
        /// The error bounds shared by every parent cluster in this group.
        group_error: ErrorBounds,
    },
}

/// Result of merging one level's group outcomes into the global buffers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelMergeResult {
    /// The working set for the next level.
    pub next_clusters: Vec<ClusterIndex>,
    /// Number of groups that simplified successfully.
    pub groups_simplified: usize,
    /// Number of groups forwarded unchanged.
    pub groups_forwarded: usize,
}

/// Appends a level's group outcomes onto the shared buffers, fixing up
/// vertex/triangle/cluster offsets as it goes, in group order.
///
/// Every new parent cluster gets exactly one [`Node`], whose index is made
/// to equal the cluster's index in [`Buffers::clusters`] — so a child's
/// `ClusterIndex::index` always doubles as its node index, and no separate
/// cluster-to-node lookup table is needed.
pub fn merge_level(
    level: usize,
    buffers: &mut Buffers,
    errors: &mut Vec<NodeErrorBounds>,
    bounds: &mut Vec<ClusterBounds>,
    nodes: &mut Vec<Node>,
    outcomes: Vec<GroupOutcome>,
) -> LevelMergeResult {
    let mut next_clusters = Vec::new();
    let mut groups_simplified = 0;
    let mut groups_forwarded = 0;

    for outcome in outcomes {
        match outcome {
            GroupOutcome::Forwarded(children) => {
                groups_forwarded += 1;
                next_clusters.extend(children);
            }
            GroupOutcome::Simplified {
                children,
                built,
                parent_bounds,
                group_error,
            } => {
                groups_simplified += 1;

                let vertex_base = u32::try_from(buffers.vertices.len()).unwrap_or(u32::MAX);
                let triangle_base = u32::try_from(buffers.triangles.len()).unwrap_or(u32::MAX);
                buffers.vertices.extend(built.vertices);
                buffers.triangles.extend(built.triangles);

                let child_node_indices: Vec<usize> = children.iter().map(|c| c.index).collect();

                for (parent_cluster, parent_bound) in
                    built.clusters.into_iter().zip(parent_bounds)
                {
                    let mut cluster = parent_cluster;
                    cluster.vertex_offset += vertex_base;
                    cluster.triangle_offset += triangle_base;

                    let cluster_index = buffers.clusters.len();
                    buffers.clusters.push(cluster);
                    nodes.push(Node::new(cluster_index, child_node_indices.clone()));
                    errors.push(NodeErrorBounds {
                        parent_error: ErrorBounds::new(group_error.sphere, f32::INFINITY),
                        cluster_error: group_error,
                    });
                    bounds.push(parent_bound);
                    next_clusters.push(ClusterIndex::new(cluster_index, level));
                }

                for child in &children {
                    errors[child.index].parent_error = group_error;
                }
            }
        }
    }

    LevelMergeResult {
        next_clusters,
        groups_simplified,
        groups_forwarded,
    }
}
