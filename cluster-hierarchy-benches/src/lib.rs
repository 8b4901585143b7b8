//! Benchmark support crate for `cluster-hierarchy-core`.
//!
//! Provides synthetic mesh sources and parameter types used by Criterion
//! benchmarks for the hierarchy build pipeline: leaf meshlet construction,
//! boundary/adjacency computation, per-group simplification, and the
//! full multi-level build.

pub mod error;
pub mod params;
pub mod profiling;
pub mod source;
