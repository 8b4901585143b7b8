//! [`MeshletBuilder`] backed by the `meshopt` crate (a Rust binding to
//! `meshoptimizer`), the same library the original reference implementation
//! of this pipeline links against.

use meshopt::{Meshlets, VertexDataAdapter};

use crate::buffers::Cluster;
use crate::geometry::{ClusterBounds, NormalCone, Sphere};
use crate::meshlet::{BuiltMeshlets, MeshletBuilder};

/// The default [`MeshletBuilder`], calling into `meshopt::build_meshlets`
/// and the associated bounds/cache-optimization routines.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeshoptMeshletBuilder;

fn adapter(positions: &[f32], vertex_stride: usize) -> VertexDataAdapter<'_> {
    let bytes: &[u8] = bytemuck::cast_slice(positions);
    VertexDataAdapter::new(bytes, vertex_stride, 0)
        .expect("vertex buffer byte length is a multiple of vertex_stride (validated at API entry)")
}

fn from_meshopt(result: Meshlets) -> BuiltMeshlets {
    let clusters = result
        .meshlets
        .iter()
        .map(|m| {
            Cluster::new(
                m.vertex_offset,
                m.triangle_offset,
                m.vertex_count as u8,
                u16::try_from(m.triangle_count).unwrap_or(u16::MAX),
            )
        })
        .collect();
    BuiltMeshlets {
        clusters,
        vertices: result.vertices,
        triangles: result.triangles,
    }
}

impl MeshletBuilder for MeshoptMeshletBuilder {
    fn bound(&self, index_count: usize, max_vertices: usize, max_triangles: usize) -> usize {
        meshopt::build_meshlets_bound(index_count, max_vertices, max_triangles)
    }

    fn build(
        &self,
        indices: &[u32],
        positions: &[f32],
        vertex_stride: usize,
        max_vertices: usize,
        max_triangles: usize,
        cone_weight: f32,
    ) -> BuiltMeshlets {
        let vertices = adapter(positions, vertex_stride);
        let result =
            meshopt::build_meshlets(indices, &vertices, max_vertices, max_triangles, cone_weight);
        from_meshopt(result)
    }

    fn optimize(&self, vertices: &mut [u32], triangles: &mut [u8]) {
        // No safe `meshopt` binding takes this meshlet-local (u8 triangles,
        // local-u32-vertex-table) shape; `meshopt_optimizeMeshlet` is the
        // exact C entry point for it (see `trichi.cpp`'s per-meshlet loop),
        // so call it directly through `meshopt::ffi`, as `virtual_mesh.rs`
        // does for `meshopt_simplifyWithAttributes`.
        let triangle_count = triangles.len() / 3;
        // SAFETY: `vertices` and `triangles` are valid, properly-sized
        // slices for a single meshlet; `meshopt_optimizeMeshlet` reorders
        // them in place and performs no allocation.
        unsafe {
            meshopt::ffi::meshopt_optimizeMeshlet(
                vertices.as_mut_ptr(),
                triangles.as_mut_ptr(),
                triangle_count,
                vertices.len(),
            );
        }
    }

    fn bounds(
        &self,
        vertices: &[u32],
        triangles: &[u8],
        positions: &[f32],
        vertex_stride: usize,
    ) -> ClusterBounds {
        // Same rationale as `optimize` above: `compute_meshlet_bounds` only
        // accepts a `meshopt::Meshlet` drawn from a live `Meshlets` batch,
        // not an arbitrary local slice pair, so this calls
        // `meshopt_computeMeshletBounds` directly.
        let triangle_count = triangles.len() / 3;
        let vertex_count = positions.len() / (vertex_stride / std::mem::size_of::<f32>());
        // SAFETY: `vertices`/`triangles` describe one meshlet's local
        // geometry; `positions`/`vertex_count`/`vertex_stride` describe the
        // backing position buffer they index into. All pointers stay valid
        // for the duration of this call.
        let bounds = unsafe {
            meshopt::ffi::meshopt_computeMeshletBounds(
                vertices.as_ptr(),
                triangles.as_ptr(),
                triangle_count,
                positions.as_ptr(),
                vertex_count,
                vertex_stride,
            )
        };
        ClusterBounds::new(
            Sphere::new(bounds.center, bounds.radius),
            NormalCone::new(bounds.cone_apex, bounds.cone_axis, bounds.cone_cutoff),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_triangle_produces_a_single_meshlet() {
        let positions = [0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = [0_u32, 1, 2];
        let built = MeshoptMeshletBuilder.build(&indices, &positions, 12, 64, 128, 0.0);
        assert_eq!(built.clusters.len(), 1);
        assert_eq!(built.clusters[0].triangle_count, 1);
    }
}
