//! Benchmark setup error type.
//!
//! Aggregates the various error types that may arise during benchmark
//! data preparation so that setup functions can propagate failures
//! with `?` instead of using `.expect()`.

use cluster_hierarchy_core::BuildError;

use crate::profiling::ProfilingError;
use crate::source::GridMeshError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic grid-mesh generation failed.
    #[error("grid mesh generation failed: {0}")]
    GridMesh(#[from] GridMeshError),
    /// The hierarchy build pipeline itself failed.
    #[error("hierarchy build failed: {0}")]
    Build(#[from] BuildError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
    /// Memory profiling failed.
    #[error("memory profiling failed: {0}")]
    Profiling(#[from] ProfilingError),
}
