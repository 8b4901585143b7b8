//! [`Simplifier`] backed by `meshopt::simplify`, configured with the flags
//! named in §4.4: lock the input mesh's open border, favour sparse
//! (non-uniform) vertex density, and treat the error target as an absolute
//! model-space distance rather than a normalized one.

use meshopt::{SimplifyOptions, VertexDataAdapter};

use crate::simplify::{SimplifyResult, Simplifier};

/// The default [`Simplifier`], wrapping `meshopt::simplify`.
#[derive(Debug, Default, Clone, Copy)]
pub struct MeshoptSimplifier;

impl Simplifier for MeshoptSimplifier {
    fn simplify(
        &self,
        indices: &[u32],
        positions: &[f32],
        vertex_stride: usize,
        target_index_count: usize,
        target_error: f32,
    ) -> SimplifyResult {
        let bytes: &[u8] = bytemuck::cast_slice(positions);
        let vertices = VertexDataAdapter::new(bytes, vertex_stride, 0).expect(
            "vertex buffer byte length is a multiple of vertex_stride (validated at API entry)",
        );

        let options = SimplifyOptions::LockBorder | SimplifyOptions::Sparse | SimplifyOptions::ErrorAbsolute;
        let mut error = 0.0_f32;
        let simplified = meshopt::simplify(
            indices,
            &vertices,
            target_index_count,
            target_error,
            options,
            Some(&mut error),
        );

        SimplifyResult {
            indices: simplified,
            error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simplifying_a_single_triangle_below_its_own_size_is_a_no_op() {
        let positions = [0.0_f32, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
        let indices = [0_u32, 1, 2];
        let result = MeshoptSimplifier.simplify(&indices, &positions, 12, 3, f32::MAX);
        assert_eq!(result.indices.len(), 3);
    }
}
