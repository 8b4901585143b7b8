//! The output DAG: nodes, roots, and the finished [`ClusterHierarchy`].

use crate::buffers::{Buffers, Cluster};
use crate::geometry::{ClusterBounds, NodeErrorBounds};

/// One node of the cluster DAG.
///
/// A node with an empty `child_node_indices` is a leaf, produced directly
/// from the input mesh before any simplification pass ran. A node with
/// children was produced by simplifying and re-clustering the group formed
/// by those children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// Index of this node's cluster in [`ClusterHierarchy::clusters`].
    pub cluster_index: usize,
    /// Indices, into [`ClusterHierarchy::nodes`], of this node's children.
    pub child_node_indices: Vec<usize>,
}

impl Node {
    /// Creates a new node.
    #[must_use]
    pub const fn new(cluster_index: usize, child_node_indices: Vec<usize>) -> Self {
        Self {
            cluster_index,
            child_node_indices,
        }
    }

    /// Returns `true` if this node has no children, i.e. it is a leaf.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.child_node_indices.is_empty()
    }
}

/// Per-level bookkeeping, collected purely for diagnostics.
///
/// This introduces no invariant of its own; every field is derived from
/// values the driver already computes while building a level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelStats {
    /// Hierarchy level this entry describes.
    pub level: usize,
    /// Number of clusters in the working set entering this level.
    pub clusters_in: usize,
    /// Number of groups the partitioner produced for this level.
    pub group_count: usize,
    /// Number of groups that were successfully simplified.
    pub groups_simplified: usize,
    /// Number of groups forwarded unchanged (not simplified, or reverted).
    pub groups_forwarded: usize,
}

/// The finished output of [`crate::driver::build_cluster_hierarchy`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ClusterHierarchy {
    /// Every node in the DAG, across every level.
    pub nodes: Vec<Node>,
    /// Indices, into `nodes`, of nodes with no parent.
    pub root_nodes: Vec<usize>,
    /// Error bounds, parallel to `clusters`.
    pub errors: Vec<NodeErrorBounds>,
    /// View-dependent culling bounds, parallel to `clusters`.
    pub bounds: Vec<ClusterBounds>,
    /// Backing cluster/vertex/triangle storage.
    pub buffers: Buffers,
    /// Diagnostic per-level statistics, in level order.
    pub stats: Vec<LevelStats>,
}

impl ClusterHierarchy {
    /// Returns the clusters backing this hierarchy.
    #[must_use]
    pub fn clusters(&self) -> &[Cluster] {
        &self.buffers.clusters
    }

    /// Returns the diagnostic per-level statistics collected while building
    /// this hierarchy.
    #[must_use]
    pub fn stats(&self) -> &[LevelStats] {
        &self.stats
    }
}
