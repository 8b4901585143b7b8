//! Cluster-hierarchy core library.
//!
//! Builds a DAG of triangle clusters from a raw indexed mesh, suitable for
//! continuous level-of-detail rendering: each level groups clusters,
//! simplifies their merged geometry, and re-clusters the result into fewer,
//! coarser parent clusters, with monotonic error bounds tracked from leaves
//! to roots.

mod adjacency;
mod boundary;
mod buffers;
mod builder;
mod driver;
mod error;
mod error_propagation;
mod geometry;
mod group;
mod loop_runner;
mod memory;
mod merge;
mod meshlet;
mod node;
mod params;
mod parent;
mod partition;
mod simplify;
#[cfg(test)]
mod test_utils;
mod util;

pub use crate::adjacency::CsrGraph;
pub use crate::buffers::{Buffers, Cluster, ClusterIndex};
pub use crate::builder::HierarchyBuilder;
pub use crate::driver::build_cluster_hierarchy;
pub use crate::error::{BuildError, BuildErrorCode, Result};
pub use crate::geometry::{ClusterBounds, ErrorBounds, NodeErrorBounds, NormalCone, Sphere};
pub use crate::loop_runner::LoopRunner;
pub use crate::memory::{estimate_peak_bytes, format_bytes};
pub use crate::meshlet::{BuiltMeshlets, MeshletBuilder};
pub use crate::node::{ClusterHierarchy, LevelStats, Node};
pub use crate::params::{HierarchyParams, HierarchyParamsBuilder, MAX_VERTICES_PER_CLUSTER_LIMIT};
pub use crate::partition::GraphPartitioner;
pub use crate::simplify::{SimplifyResult, Simplifier};
pub use crate::util::{pack_sorted_edge, sorted_intersection_len};

#[cfg(feature = "cpu")]
pub use crate::meshlet::MeshoptMeshletBuilder;
#[cfg(feature = "cpu")]
pub use crate::partition::MetisPartitioner;
#[cfg(feature = "cpu")]
pub use crate::simplify::MeshoptSimplifier;
