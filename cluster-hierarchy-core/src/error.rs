//! Error types for the cluster-hierarchy-core library.
//!
//! Defines the error enum exposed by the public API, a stable companion
//! error-code enum, and a convenient result alias.

use std::fmt;

use thiserror::Error;

/// Stable codes describing [`BuildError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum BuildErrorCode {
    /// `indices.len()` was not a multiple of 3.
    InvalidIndexCount,
    /// The vertex buffer's byte length was not a multiple of `vertex_stride`.
    InvalidVertexStride,
    /// `max_vertices_per_cluster` was zero or exceeded the byte-indexing
    /// limit of 256.
    InvalidMaxVerticesPerCluster,
    /// A parameter that must be non-zero was zero.
    ZeroParameter,
    /// The graph partitioner rejected its input.
    PartitionerInput,
    /// The graph partitioner ran out of memory.
    PartitionerMemory,
    /// The graph partitioner failed for an unrecognised reason.
    PartitionerUnknown,
    /// The simplifier reported an internal failure.
    ///
    /// The [`crate::simplify::Simplifier`] contract forbids failure; this
    /// variant exists only to surface a contract violation by a
    /// caller-supplied implementation rather than panicking.
    SimplifierInternal,
    /// No collaborator was configured and the `cpu` feature is disabled, so
    /// no default implementation could be resolved.
    MissingCollaborator,
}

impl BuildErrorCode {
    /// Returns the stable, machine-readable representation of this error
    /// code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidIndexCount => "CLUSTER_HIERARCHY_INVALID_INDEX_COUNT",
            Self::InvalidVertexStride => "CLUSTER_HIERARCHY_INVALID_VERTEX_STRIDE",
            Self::InvalidMaxVerticesPerCluster => {
                "CLUSTER_HIERARCHY_INVALID_MAX_VERTICES_PER_CLUSTER"
            }
            Self::ZeroParameter => "CLUSTER_HIERARCHY_ZERO_PARAMETER",
            Self::PartitionerInput => "CLUSTER_HIERARCHY_PARTITIONER_INPUT",
            Self::PartitionerMemory => "CLUSTER_HIERARCHY_PARTITIONER_MEMORY",
            Self::PartitionerUnknown => "CLUSTER_HIERARCHY_PARTITIONER_UNKNOWN",
            Self::SimplifierInternal => "CLUSTER_HIERARCHY_SIMPLIFIER_INTERNAL",
            Self::MissingCollaborator => "CLUSTER_HIERARCHY_MISSING_COLLABORATOR",
        }
    }
}

impl fmt::Display for BuildErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced while validating parameters or building a cluster
/// hierarchy.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum BuildError {
    /// `indices.len()` was not a multiple of 3.
    #[error("indices length {len} is not a multiple of 3")]
    InvalidIndexCount {
        /// The offending length.
        len: usize,
    },
    /// The vertex buffer's byte length was not a multiple of `vertex_stride`.
    #[error(
        "vertex buffer has {float_count} floats ({byte_len} bytes), which is not a multiple of vertex_stride {vertex_stride}"
    )]
    InvalidVertexStride {
        /// Number of `f32` entries in the supplied vertex buffer.
        float_count: usize,
        /// `float_count * size_of::<f32>()`.
        byte_len: usize,
        /// The configured vertex stride, in bytes.
        vertex_stride: usize,
    },
    /// `max_vertices_per_cluster` was zero or exceeded the byte-indexing
    /// limit of 256.
    #[error("max_vertices_per_cluster must be in 1..=256 (got {got})")]
    InvalidMaxVerticesPerCluster {
        /// The offending value.
        got: usize,
    },
    /// A parameter that must be non-zero was zero.
    #[error("{field} must be non-zero")]
    ZeroParameter {
        /// Name of the offending field.
        field: &'static str,
    },
    /// The graph partitioner rejected its input.
    #[error("graph partitioner rejected its input: {message}")]
    PartitionerInput {
        /// Diagnostic detail from the partitioner.
        message: String,
    },
    /// The graph partitioner ran out of memory.
    #[error("graph partitioner ran out of memory: {message}")]
    PartitionerMemory {
        /// Diagnostic detail from the partitioner.
        message: String,
    },
    /// The graph partitioner failed for an unrecognised reason.
    #[error("graph partitioner failed: {message}")]
    PartitionerUnknown {
        /// Diagnostic detail from the partitioner.
        message: String,
    },
    /// The simplifier reported an internal failure.
    #[error("simplifier reported an internal failure: {message}")]
    SimplifierInternal {
        /// Diagnostic detail from the simplifier.
        message: String,
    },
    /// No collaborator was configured and the `cpu` feature is disabled, so
    /// no default implementation could be resolved.
    #[error(
        "no {which} was configured and the `cpu` feature is disabled, so no default implementation is available"
    )]
    MissingCollaborator {
        /// Which collaborator is missing: `"meshlet builder"`, `"simplifier"`,
        /// or `"graph partitioner"`.
        which: &'static str,
    },
}

impl BuildError {
    /// Retrieves the stable [`BuildErrorCode`] for this error.
    #[must_use]
    pub const fn code(&self) -> BuildErrorCode {
        match self {
            Self::InvalidIndexCount { .. } => BuildErrorCode::InvalidIndexCount,
            Self::InvalidVertexStride { .. } => BuildErrorCode::InvalidVertexStride,
            Self::InvalidMaxVerticesPerCluster { .. } => {
                BuildErrorCode::InvalidMaxVerticesPerCluster
            }
            Self::ZeroParameter { .. } => BuildErrorCode::ZeroParameter,
            Self::PartitionerInput { .. } => BuildErrorCode::PartitionerInput,
            Self::PartitionerMemory { .. } => BuildErrorCode::PartitionerMemory,
            Self::PartitionerUnknown { .. } => BuildErrorCode::PartitionerUnknown,
            Self::SimplifierInternal { .. } => BuildErrorCode::SimplifierInternal,
            Self::MissingCollaborator { .. } => BuildErrorCode::MissingCollaborator,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, BuildError>;
