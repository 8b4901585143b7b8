//! Synthetic mesh generation for benchmarking.
//!
//! Provides [`GridMesh`], a regular N×N grid of quads triangulated into a
//! flat indexed mesh. Grid meshes are cheap to generate at any size and
//! exercise the boundary-extraction, adjacency, and simplification stages
//! the same way a real dense asset would.

/// Errors that may occur during grid mesh generation.
#[derive(Clone, Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridMeshError {
    /// The requested grid resolution was too small to form a single quad.
    #[error("grid resolution must be at least 2x2, got {resolution}x{resolution}")]
    ResolutionTooSmall {
        /// The rejected resolution.
        resolution: usize,
    },
}

/// Configuration for regular-grid mesh generation.
#[derive(Clone, Copy, Debug)]
pub struct GridMeshConfig {
    /// Number of vertices along each edge of the grid.
    pub resolution: usize,
    /// World-space spacing between adjacent grid vertices.
    pub spacing: f32,
}

/// A flat indexed triangle mesh over a regular grid of vertices.
///
/// Vertices are laid out row-major in the XZ plane with Y displaced by a
/// small per-vertex ripple, so that clusters built over it have non-trivial
/// normal variation. Each quad is split into two triangles.
///
/// # Examples
///
/// ```
/// use cluster_hierarchy_benches::source::{GridMesh, GridMeshConfig};
///
/// let mesh = GridMesh::generate(&GridMeshConfig { resolution: 4, spacing: 1.0 })
///     .expect("valid resolution");
/// assert_eq!(mesh.vertex_count(), 16);
/// assert_eq!(mesh.triangle_count(), 18);
/// ```
#[derive(Clone, Debug)]
pub struct GridMesh {
    indices: Vec<u32>,
    vertices: Vec<f32>,
    resolution: usize,
}

/// Number of `f32` components stored per vertex (position only).
const VERTEX_STRIDE_FLOATS: usize = 3;

impl GridMesh {
    /// Generates a triangulated grid mesh from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GridMeshError::ResolutionTooSmall`] when `resolution < 2`.
    ///
    /// # Examples
    ///
    /// ```
    /// use cluster_hierarchy_benches::source::{GridMesh, GridMeshConfig};
    ///
    /// let mesh = GridMesh::generate(&GridMeshConfig { resolution: 8, spacing: 0.5 })
    ///     .expect("valid resolution");
    /// assert_eq!(mesh.vertex_count(), 64);
    /// ```
    #[expect(
        clippy::float_arithmetic,
        reason = "vertex positions are computed from float spacing"
    )]
    #[expect(
        clippy::cast_precision_loss,
        reason = "grid resolutions used in benchmarks stay well under f32's exact-integer range"
    )]
    #[expect(
        clippy::cast_possible_truncation,
        reason = "benchmark grid resolutions stay well under u32::MAX"
    )]
    pub fn generate(config: &GridMeshConfig) -> Result<Self, GridMeshError> {
        if config.resolution < 2 {
            return Err(GridMeshError::ResolutionTooSmall {
                resolution: config.resolution,
            });
        }
        let resolution = config.resolution;

        let mut vertices = Vec::with_capacity(resolution * resolution * VERTEX_STRIDE_FLOATS);
        for row in 0..resolution {
            for col in 0..resolution {
                let x = col as f32 * config.spacing;
                let z = row as f32 * config.spacing;
                let ripple = 0.05 * config.spacing * ((row + col) % 4) as f32;
                vertices.extend_from_slice(&[x, ripple, z]);
            }
        }

        let quads_per_side = resolution - 1;
        let mut indices = Vec::with_capacity(quads_per_side * quads_per_side * 6);
        for row in 0..quads_per_side {
            for col in 0..quads_per_side {
                let top_left = (row * resolution + col) as u32;
                let top_right = top_left + 1;
                let bottom_left = top_left + resolution as u32;
                let bottom_right = bottom_left + 1;
                indices.extend_from_slice(&[
                    top_left,
                    bottom_left,
                    top_right,
                    top_right,
                    bottom_left,
                    bottom_right,
                ]);
            }
        }

        Ok(Self {
            indices,
            vertices,
            resolution,
        })
    }

    /// Returns the flat triangle index buffer.
    #[must_use]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Returns the flat vertex position buffer (3 floats per vertex).
    #[must_use]
    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    /// Returns the byte stride between consecutive vertices.
    #[must_use]
    pub const fn vertex_stride_bytes() -> usize {
        VERTEX_STRIDE_FLOATS * std::mem::size_of::<f32>()
    }

    /// Returns the number of vertices along one edge of the grid.
    #[must_use]
    pub const fn resolution(&self) -> usize {
        self.resolution
    }

    /// Returns the total number of vertices in the mesh.
    #[must_use]
    pub const fn vertex_count(&self) -> usize {
        self.resolution * self.resolution
    }

    /// Returns the total number of triangles in the mesh.
    #[must_use]
    pub const fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::small(2, 1, 2)]
    #[case::medium(10, 81, 162)]
    #[case::large(64, 63 * 63, 63 * 63 * 2)]
    fn generates_correct_counts(
        #[case] resolution: usize,
        #[case] expected_quads: usize,
        #[case] expected_triangles: usize,
    ) {
        let mesh = GridMesh::generate(&GridMeshConfig {
            resolution,
            spacing: 1.0,
        })
        .expect("generation must succeed");
        assert_eq!(mesh.vertex_count(), resolution * resolution);
        assert_eq!(mesh.triangle_count(), expected_triangles);
        assert_eq!(expected_quads * 2, expected_triangles);
    }

    #[rstest]
    fn index_buffer_length_is_a_multiple_of_three() {
        let mesh = GridMesh::generate(&GridMeshConfig {
            resolution: 17,
            spacing: 2.0,
        })
        .expect("generation must succeed");
        assert_eq!(mesh.indices().len() % 3, 0);
    }

    #[rstest]
    fn vertex_buffer_matches_stride_and_count() {
        let mesh = GridMesh::generate(&GridMeshConfig {
            resolution: 9,
            spacing: 1.0,
        })
        .expect("generation must succeed");
        assert_eq!(mesh.vertices().len(), mesh.vertex_count() * VERTEX_STRIDE_FLOATS);
    }

    #[rstest]
    fn indices_stay_within_vertex_bounds() {
        let mesh = GridMesh::generate(&GridMeshConfig {
            resolution: 12,
            spacing: 1.0,
        })
        .expect("generation must succeed");
        let vertex_count = u32::try_from(mesh.vertex_count()).expect("fits in u32");
        for &index in mesh.indices() {
            assert!(index < vertex_count, "index {index} out of bounds");
        }
    }

    #[rstest]
    #[case(0)]
    #[case(1)]
    fn rejects_resolutions_below_two(#[case] resolution: usize) {
        let err = GridMesh::generate(&GridMeshConfig {
            resolution,
            spacing: 1.0,
        })
        .expect_err("small resolution must be rejected");
        assert_eq!(err, GridMeshError::ResolutionTooSmall { resolution });
    }
}
