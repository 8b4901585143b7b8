//! Benchmark parameter types.
//!
//! Groups related benchmark parameters into structs so that benchmark
//! helper functions stay under the Clippy `too-many-arguments` threshold.

use std::fmt;

/// Parameters for a synthetic-grid-mesh generation run.
#[derive(Clone, Debug)]
pub struct GridBenchParams {
    /// Number of vertices along each edge of the grid.
    pub resolution: usize,
}

impl fmt::Display for GridBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "res={}", self.resolution)
    }
}

/// Parameters for a full hierarchy-build benchmark run.
#[derive(Clone, Debug)]
pub struct HierarchyBenchParams {
    /// Number of vertices along each edge of the source grid.
    pub resolution: usize,
    /// Desired number of clusters per group passed to the partitioner.
    pub target_clusters_per_group: usize,
}

impl fmt::Display for HierarchyBenchParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "res={},group={}",
            self.resolution, self.target_clusters_per_group,
        )
    }
}
