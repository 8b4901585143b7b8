//! Graph partitioning (§4.3, §6.3): splitting a level's adjacency graph into
//! groups of bounded size via k-way min-cut.

#[cfg(feature = "cpu")]
mod metis_impl;

#[cfg(feature = "cpu")]
pub use metis_impl::MetisPartitioner;

use std::num::NonZeroUsize;

use crate::adjacency::CsrGraph;
use crate::error::Result;

/// The external graph-partitioner contract (§6.3).
///
/// Implementations receive a weighted undirected graph in CSR form and must
/// return a partition vector of the same length as
/// [`CsrGraph::vertex_count`], with values in `0..num_parts`.
///
/// Implementations must honour `graph.is_contiguous`: when `false`, they
/// must not attempt to enforce contiguous partitions (the graph may be
/// disconnected, in which case that constraint is unsatisfiable).
pub trait GraphPartitioner: Send + Sync {
    /// Partitions `graph` into `num_parts` roughly equal-weight groups,
    /// minimizing the total edge-cut weight.
    ///
    /// # Errors
    /// Returns [`crate::error::BuildError::PartitionerInput`],
    /// [`crate::error::BuildError::PartitionerMemory`], or
    /// [`crate::error::BuildError::PartitionerUnknown`] when the underlying
    /// partitioner rejects the graph.
    fn part_kway(&self, graph: &CsrGraph, num_parts: NonZeroUsize) -> Result<Vec<u32>>;
}

/// Computes the number of parts to request for a working set of `cluster_count`
/// clusters and a `target_clusters_per_group` size, per §4.3:
/// `max(n / target, 2)`.
#[must_use]
pub fn num_parts(cluster_count: usize, target_clusters_per_group: NonZeroUsize) -> NonZeroUsize {
    let parts = cluster_count / target_clusters_per_group.get();
    NonZeroUsize::new(parts.max(2)).unwrap_or(NonZeroUsize::MIN)
}

/// Buckets a partition vector (one part-id per vertex) into per-group vertex
/// index lists.
#[must_use]
pub fn resolve_groups(partition: &[u32], num_groups: NonZeroUsize) -> Vec<Vec<usize>> {
    let mut groups = vec![Vec::new(); num_groups.get()];
    for (vertex, &part) in partition.iter().enumerate() {
        if let Some(group) = groups.get_mut(part as usize) {
            group.push(vertex);
        }
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn num_parts_never_drops_below_two() {
        let target = NonZeroUsize::new(4).expect("non-zero");
        assert_eq!(num_parts(3, target).get(), 2);
        assert_eq!(num_parts(0, target).get(), 2);
    }

    #[test]
    fn num_parts_scales_with_cluster_count() {
        let target = NonZeroUsize::new(4).expect("non-zero");
        assert_eq!(num_parts(40, target).get(), 10);
    }

    #[test]
    fn resolve_groups_buckets_by_partition_id() {
        let partition = [0_u32, 1, 0, 1, 2];
        let groups = resolve_groups(&partition, NonZeroUsize::new(3).expect("non-zero"));
        assert_eq!(groups, vec![vec![0, 2], vec![1, 3], vec![4]]);
    }
}
