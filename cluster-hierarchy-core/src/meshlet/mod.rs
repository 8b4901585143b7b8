//! The meshlet-builder external contract (§6.2): partitioning a triangle
//! soup into bounded-size clusters, optimizing their vertex order, and
//! computing their culling bounds.

#[cfg(feature = "cpu")]
mod meshopt_impl;

#[cfg(feature = "cpu")]
pub use meshopt_impl::MeshoptMeshletBuilder;

use crate::buffers::Cluster;
use crate::geometry::ClusterBounds;

/// The output of [`MeshletBuilder::build`]: a batch of clusters local to
/// one builder call, with their own 0-based vertex/triangle offsets.
///
/// [`crate::merge::LevelMerger`] shifts these offsets when appending the
/// batch onto the process-wide [`crate::buffers::Buffers`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuiltMeshlets {
    /// Clusters produced by this call, with offsets local to `vertices` and
    /// `triangles` below.
    pub clusters: Vec<Cluster>,
    /// Global mesh-vertex indices referenced by `clusters`.
    pub vertices: Vec<u32>,
    /// Cluster-local triangle-corner bytes referenced by `clusters`.
    pub triangles: Vec<u8>,
}

/// The external meshlet-builder contract (§6.2).
///
/// Implementations must guarantee that every cluster returned by
/// [`MeshletBuilder::build`] has at most `max_vertices` unique vertices and
/// at most `max_triangles` triangles, and that the triangle bytes it returns
/// index into that cluster's own local vertex slice.
pub trait MeshletBuilder: Send + Sync {
    /// Returns an upper bound on the number of clusters [`MeshletBuilder::build`]
    /// will produce for an index buffer of length `index_count`.
    fn bound(&self, index_count: usize, max_vertices: usize, max_triangles: usize) -> usize;

    /// Partitions `indices` into bounded-size clusters over `positions`.
    fn build(
        &self,
        indices: &[u32],
        positions: &[f32],
        vertex_stride: usize,
        max_vertices: usize,
        max_triangles: usize,
        cone_weight: f32,
    ) -> BuiltMeshlets;

    /// Reorders a single cluster's local vertex/triangle slices in place to
    /// improve post-transform cache usage. Must not change the cluster's
    /// semantics (which triangles reference which vertices).
    fn optimize(&self, vertices: &mut [u32], triangles: &mut [u8]);

    /// Computes the culling bounds (bounding sphere and normal cone) for a
    /// single cluster.
    fn bounds(
        &self,
        vertices: &[u32],
        triangles: &[u8],
        positions: &[f32],
        vertex_stride: usize,
    ) -> ClusterBounds;
}
