//! Configuration for [`crate::driver::build_cluster_hierarchy`].

use std::num::NonZeroUsize;

use crate::error::{BuildError, Result};

/// The byte-indexed triangle storage (see [`crate::buffers::Cluster`]) caps a
/// cluster's unique vertex count at this value.
pub const MAX_VERTICES_PER_CLUSTER_LIMIT: usize = 256;

/// Validated parameters controlling cluster size, grouping, and depth.
///
/// Constructed through [`HierarchyParamsBuilder`], which validates every
/// field before returning a `HierarchyParams`.
///
/// # Examples
/// ```
/// use cluster_hierarchy_core::HierarchyParamsBuilder;
///
/// let params = HierarchyParamsBuilder::new()
///     .with_max_vertices_per_cluster(64)
///     .with_max_triangles_per_cluster(128)
///     .build()
///     .expect("default-adjacent parameters are valid");
/// assert_eq!(params.max_vertices_per_cluster().get(), 64);
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HierarchyParams {
    max_vertices_per_cluster: NonZeroUsize,
    max_triangles_per_cluster: NonZeroUsize,
    cluster_cone_weight: f32,
    target_clusters_per_group: NonZeroUsize,
    max_hierarchy_depth: NonZeroUsize,
    thread_pool_size: NonZeroUsize,
}

impl HierarchyParams {
    /// Hard cap on unique vertices per cluster.
    #[must_use]
    pub const fn max_vertices_per_cluster(&self) -> NonZeroUsize {
        self.max_vertices_per_cluster
    }

    /// Hard cap on triangles per cluster.
    #[must_use]
    pub const fn max_triangles_per_cluster(&self) -> NonZeroUsize {
        self.max_triangles_per_cluster
    }

    /// Importance of normal-cone cohesion when building meshlets, in `[0,1]`.
    #[must_use]
    pub const fn cluster_cone_weight(&self) -> f32 {
        self.cluster_cone_weight
    }

    /// Desired number of clusters per group.
    #[must_use]
    pub const fn target_clusters_per_group(&self) -> NonZeroUsize {
        self.target_clusters_per_group
    }

    /// Maximum number of hierarchy levels to build.
    #[must_use]
    pub const fn max_hierarchy_depth(&self) -> NonZeroUsize {
        self.max_hierarchy_depth
    }

    /// Number of worker threads to use.
    #[must_use]
    pub const fn thread_pool_size(&self) -> NonZeroUsize {
        self.thread_pool_size
    }

    /// The index-count target used by [`crate::group::GroupSimplifier`]:
    /// `min(max_vertices_per_cluster, max_triangles_per_cluster) * 6`.
    #[must_use]
    pub fn simplify_target_index_count(&self) -> usize {
        self.max_vertices_per_cluster
            .get()
            .min(self.max_triangles_per_cluster.get())
            .saturating_mul(6)
    }
}

/// Builds and validates [`HierarchyParams`].
///
/// # Examples
/// ```
/// use cluster_hierarchy_core::HierarchyParamsBuilder;
///
/// let params = HierarchyParamsBuilder::new().build().expect("defaults are valid");
/// assert_eq!(params.target_clusters_per_group().get(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct HierarchyParamsBuilder {
    max_vertices_per_cluster: usize,
    max_triangles_per_cluster: usize,
    cluster_cone_weight: f32,
    target_clusters_per_group: usize,
    max_hierarchy_depth: usize,
    thread_pool_size: usize,
}

impl Default for HierarchyParamsBuilder {
    fn default() -> Self {
        Self {
            max_vertices_per_cluster: 64,
            max_triangles_per_cluster: 128,
            cluster_cone_weight: 0.0,
            target_clusters_per_group: 4,
            max_hierarchy_depth: 25,
            thread_pool_size: 1,
        }
    }
}

impl HierarchyParamsBuilder {
    /// Creates a builder populated with default parameters.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overrides the maximum unique vertices per cluster.
    #[must_use]
    pub fn with_max_vertices_per_cluster(mut self, max: usize) -> Self {
        self.max_vertices_per_cluster = max;
        self
    }

    /// Overrides the maximum triangles per cluster.
    #[must_use]
    pub fn with_max_triangles_per_cluster(mut self, max: usize) -> Self {
        self.max_triangles_per_cluster = max;
        self
    }

    /// Overrides the normal-cone cohesion weight used when building
    /// meshlets. Expected to lie in `[0, 1]`, though this is not enforced.
    #[must_use]
    pub fn with_cluster_cone_weight(mut self, weight: f32) -> Self {
        self.cluster_cone_weight = weight;
        self
    }

    /// Overrides the desired number of clusters per group.
    #[must_use]
    pub fn with_target_clusters_per_group(mut self, target: usize) -> Self {
        self.target_clusters_per_group = target;
        self
    }

    /// Overrides the maximum number of hierarchy levels to build.
    #[must_use]
    pub fn with_max_hierarchy_depth(mut self, depth: usize) -> Self {
        self.max_hierarchy_depth = depth;
        self
    }

    /// Overrides the worker thread-pool size. `0` is treated as `1`.
    #[must_use]
    pub fn with_thread_pool_size(mut self, size: usize) -> Self {
        self.thread_pool_size = size;
        self
    }

    /// Validates the configuration and constructs [`HierarchyParams`].
    ///
    /// # Errors
    /// Returns [`BuildError::InvalidMaxVerticesPerCluster`] when
    /// `max_vertices_per_cluster` is zero or exceeds
    /// [`MAX_VERTICES_PER_CLUSTER_LIMIT`], and [`BuildError::ZeroParameter`]
    /// when any other size parameter is zero.
    pub fn build(self) -> Result<HierarchyParams> {
        if self.max_vertices_per_cluster == 0
            || self.max_vertices_per_cluster > MAX_VERTICES_PER_CLUSTER_LIMIT
        {
            return Err(BuildError::InvalidMaxVerticesPerCluster {
                got: self.max_vertices_per_cluster,
            });
        }
        let max_vertices_per_cluster = NonZeroUsize::new(self.max_vertices_per_cluster)
            .ok_or(BuildError::InvalidMaxVerticesPerCluster { got: 0 })?;
        let max_triangles_per_cluster = NonZeroUsize::new(self.max_triangles_per_cluster)
            .ok_or(BuildError::ZeroParameter {
                field: "max_triangles_per_cluster",
            })?;
        let target_clusters_per_group = NonZeroUsize::new(self.target_clusters_per_group)
            .ok_or(BuildError::ZeroParameter {
                field: "target_clusters_per_group",
            })?;
        let max_hierarchy_depth =
            NonZeroUsize::new(self.max_hierarchy_depth).ok_or(BuildError::ZeroParameter {
                field: "max_hierarchy_depth",
            })?;
        let thread_pool_size = NonZeroUsize::new(self.thread_pool_size.max(1))
            .ok_or(BuildError::ZeroParameter {
                field: "thread_pool_size",
            })?;

        Ok(HierarchyParams {
            max_vertices_per_cluster,
            max_triangles_per_cluster,
            cluster_cone_weight: self.cluster_cone_weight,
            target_clusters_per_group,
            max_hierarchy_depth,
            thread_pool_size,
        })
    }
}
