//! Builder utilities for configuring and running [`build_cluster_hierarchy`](crate::driver::build_cluster_hierarchy).
//!
//! Exposes the collaborator-override surface and validation used before
//! running the build pipeline.

use std::sync::Arc;

use crate::driver;
use crate::error::{BuildError, Result};
use crate::loop_runner::LoopRunner;
use crate::meshlet::MeshletBuilder;
use crate::node::ClusterHierarchy;
use crate::params::HierarchyParams;
use crate::partition::GraphPartitioner;
use crate::simplify::Simplifier;

#[cfg(feature = "cpu")]
use crate::meshlet::MeshoptMeshletBuilder;
#[cfg(feature = "cpu")]
use crate::partition::MetisPartitioner;
#[cfg(feature = "cpu")]
use crate::simplify::MeshoptSimplifier;

/// Configures and runs the cluster-hierarchy build pipeline.
///
/// # Examples
/// ```
/// use cluster_hierarchy_core::{HierarchyBuilder, HierarchyParamsBuilder};
///
/// # #[cfg(feature = "cpu")]
/// # fn run() {
/// let params = HierarchyParamsBuilder::new().build().expect("valid defaults");
/// let indices: Vec<u32> = (0..3).collect();
/// let vertices = vec![0.0_f32; 9];
/// let hierarchy = HierarchyBuilder::new(params)
///     .build(&indices, &vertices, 12)
///     .expect("valid input builds a hierarchy");
/// assert_eq!(hierarchy.clusters().len(), 1);
/// # }
/// ```
pub struct HierarchyBuilder {
    params: HierarchyParams,
    meshlet_builder: Option<Arc<dyn MeshletBuilder>>,
    simplifier: Option<Arc<dyn Simplifier>>,
    partitioner: Option<Arc<dyn GraphPartitioner>>,
}

impl HierarchyBuilder {
    /// Creates a builder for the given validated parameters.
    #[must_use]
    pub fn new(params: HierarchyParams) -> Self {
        Self {
            params,
            meshlet_builder: None,
            simplifier: None,
            partitioner: None,
        }
    }

    /// Overrides the meshlet builder. When not set, `build` falls back to
    /// [`MeshoptMeshletBuilder`] under the `cpu` feature.
    #[must_use]
    pub fn with_meshlet_builder(mut self, meshlet_builder: Arc<dyn MeshletBuilder>) -> Self {
        self.meshlet_builder = Some(meshlet_builder);
        self
    }

    /// Overrides the simplifier. When not set, `build` falls back to
    /// [`MeshoptSimplifier`] under the `cpu` feature.
    #[must_use]
    pub fn with_simplifier(mut self, simplifier: Arc<dyn Simplifier>) -> Self {
        self.simplifier = Some(simplifier);
        self
    }

    /// Overrides the graph partitioner. When not set, `build` falls back to
    /// [`MetisPartitioner`] under the `cpu` feature.
    #[must_use]
    pub fn with_partitioner(mut self, partitioner: Arc<dyn GraphPartitioner>) -> Self {
        self.partitioner = Some(partitioner);
        self
    }

    /// Resolves collaborators and runs the build pipeline over `indices` and
    /// `vertices` (§6.1).
    ///
    /// # Errors
    /// Returns [`BuildError::MissingCollaborator`] when an override was not
    /// supplied and the `cpu` feature is disabled, and otherwise propagates
    /// any [`BuildError`] from input validation or from the configured
    /// partitioner.
    pub fn build(
        self,
        indices: &[u32],
        vertices: &[f32],
        vertex_stride: usize,
    ) -> Result<ClusterHierarchy> {
        let meshlet_builder = self.resolve_meshlet_builder()?;
        let simplifier = self.resolve_simplifier()?;
        let partitioner = self.resolve_partitioner()?;
        let loop_runner = LoopRunner::new(self.params.thread_pool_size());

        driver::build_cluster_hierarchy(
            indices,
            vertices,
            vertex_stride,
            &self.params,
            meshlet_builder.as_ref(),
            simplifier.as_ref(),
            partitioner.as_ref(),
            &loop_runner,
        )
    }

    #[cfg(feature = "cpu")]
    fn resolve_meshlet_builder(&self) -> Result<Arc<dyn MeshletBuilder>> {
        Ok(self
            .meshlet_builder
            .clone()
            .unwrap_or_else(|| Arc::new(MeshoptMeshletBuilder)))
    }

    #[cfg(not(feature = "cpu"))]
    fn resolve_meshlet_builder(&self) -> Result<Arc<dyn MeshletBuilder>> {
        self.meshlet_builder.clone().ok_or(BuildError::MissingCollaborator {
            which: "meshlet builder",
        })
    }

    #[cfg(feature = "cpu")]
    fn resolve_simplifier(&self) -> Result<Arc<dyn Simplifier>> {
        Ok(self
            .simplifier
            .clone()
            .unwrap_or_else(|| Arc::new(MeshoptSimplifier)))
    }

    #[cfg(not(feature = "cpu"))]
    fn resolve_simplifier(&self) -> Result<Arc<dyn Simplifier>> {
        self.simplifier
            .clone()
            .ok_or(BuildError::MissingCollaborator { which: "simplifier" })
    }

    #[cfg(feature = "cpu")]
    fn resolve_partitioner(&self) -> Result<Arc<dyn GraphPartitioner>> {
        Ok(self
            .partitioner
            .clone()
            .unwrap_or_else(|| Arc::new(MetisPartitioner)))
    }

    #[cfg(not(feature = "cpu"))]
    fn resolve_partitioner(&self) -> Result<Arc<dyn GraphPartitioner>> {
        self.partitioner.clone().ok_or(BuildError::MissingCollaborator {
            which: "graph partitioner",
        })
    }
}
