//! The edge-collapse simplifier external contract (§6.2, §4.4).

#[cfg(feature = "cpu")]
mod meshopt_impl;

#[cfg(feature = "cpu")]
pub use meshopt_impl::MeshoptSimplifier;

/// The result of a [`Simplifier::simplify`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SimplifyResult {
    /// The simplified index buffer. May equal the input when no reduction
    /// was possible.
    pub indices: Vec<u32>,
    /// The reported absolute geometric error introduced by simplification.
    pub error: f32,
}

/// The external edge-collapse simplifier contract (§6.2).
///
/// Implementations must never fail: a target that cannot be reached is
/// satisfied as closely as possible, returning whatever index count and
/// error that implies. [`crate::error::BuildError::SimplifierInternal`]
/// exists only to surface a contract violation by a caller-supplied
/// implementation.
pub trait Simplifier: Send + Sync {
    /// Simplifies `indices` over `positions`, targeting `target_index_count`
    /// indices and `target_error` absolute error, while locking the
    /// boundary edges of the input mesh (edges belonging to exactly one
    /// triangle) so neighbouring groups remain stitched.
    fn simplify(
        &self,
        indices: &[u32],
        positions: &[f32],
        vertex_stride: usize,
        target_index_count: usize,
        target_error: f32,
    ) -> SimplifyResult;
}
