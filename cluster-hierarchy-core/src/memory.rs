//! Pre-flight memory estimation for the cluster-hierarchy build pipeline.
//!
//! Provides a conservative estimate of peak memory consumption so callers
//! can reject oversized meshes before any allocation occurs. The estimate is
//! intentionally pessimistic — it uses a safety multiplier to account for
//! heap fragmentation, Rayon thread-local buffers, and transient allocations
//! that are difficult to predict statically.

use crate::params::HierarchyParams;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Safety multiplier applied to the raw estimate to cover heap
/// fragmentation, Rayon thread-local buffers, and transient allocations.
/// 1.5x is chosen as a balance between avoiding false positives and catching
/// genuine OOM risks.
const SAFETY_MULTIPLIER_NUMERATOR: u64 = 3;
const SAFETY_MULTIPLIER_DENOMINATOR: u64 = 2;

/// Size of a [`crate::buffers::Cluster`] record: two `u32` offsets, a `u16`
/// triangle count, and a `u8` vertex count, with alignment padding.
const CLUSTER_RECORD_BYTES: u64 = 12;

/// Size of one entry in [`crate::buffers::Buffers::vertices`].
const VERTEX_INDEX_BYTES: u64 = 4;

/// Size of one triangle-corner byte in [`crate::buffers::Buffers::triangles`].
const TRIANGLE_CORNER_BYTES: u64 = 1;

/// Size of a [`crate::geometry::NodeErrorBounds`] record: two nested
/// `ErrorBounds` (a `[f32; 3]` centre, `f32` radius, `f32` error each).
const NODE_ERROR_BOUNDS_BYTES: u64 = 40;

/// Size of a [`crate::geometry::ClusterBounds`] record: a bounding sphere
/// plus a normal cone (two `[f32; 3]` vectors and a cutoff).
const CLUSTER_BOUNDS_BYTES: u64 = 44;

/// Fixed overhead of a [`crate::node::Node`] record before accounting for
/// its `child_node_indices` heap allocation: a `usize` cluster index plus a
/// `Vec` header.
const NODE_BASE_BYTES: u64 = 32;

/// Size of one entry in a [`crate::node::Node::child_node_indices`] list.
const CHILD_INDEX_BYTES: u64 = 8;

// ---------------------------------------------------------------------------
// Estimation
// ---------------------------------------------------------------------------

/// Returns a conservative estimate of peak memory (in bytes) that building a
/// cluster hierarchy over `index_count` triangle-corner indices will
/// require under `params`.
///
/// The estimate covers, across every hierarchy level:
///
/// - [`crate::buffers::Cluster`] records.
/// - Vertex-index and triangle-corner-byte storage, sized at each level's
///   worst case (`max_vertices_per_cluster` / `max_triangles_per_cluster`
///   per cluster).
/// - [`crate::node::Node`] records, including an average child-list
///   allocation sized by `target_clusters_per_group`.
/// - [`crate::geometry::NodeErrorBounds`] and
///   [`crate::geometry::ClusterBounds`] records.
///
/// The total cluster count across all levels is bounded by a geometric
/// series: each level reduces the working set by roughly
/// `target_clusters_per_group`, capped at `max_hierarchy_depth` levels.
///
/// A 1.5x safety multiplier is applied to the raw total to account for heap
/// fragmentation, Rayon thread-local buffers, and transient allocations.
///
/// # Examples
///
/// ```
/// use cluster_hierarchy_core::{HierarchyParamsBuilder, estimate_peak_bytes};
///
/// let params = HierarchyParamsBuilder::new().build().expect("valid defaults");
/// let bytes = estimate_peak_bytes(30_000, &params);
/// assert!(bytes > 0, "estimate must be positive for a non-empty mesh");
///
/// let zero = estimate_peak_bytes(0, &params);
/// assert_eq!(zero, 0, "empty mesh requires no memory");
/// ```
#[must_use]
pub fn estimate_peak_bytes(index_count: usize, params: &HierarchyParams) -> u64 {
    if index_count == 0 {
        return 0;
    }

    let triangle_count = (index_count as u64).div_ceil(3);
    let max_vertices_per_cluster = params.max_vertices_per_cluster().get() as u64;
    let max_triangles_per_cluster = params.max_triangles_per_cluster().get() as u64;
    let target_clusters_per_group = (params.target_clusters_per_group().get() as u64).max(2);
    let max_hierarchy_depth = params.max_hierarchy_depth().get() as u64;

    let leaf_clusters = triangle_count.div_ceil(max_triangles_per_cluster).max(1);
    let total_clusters =
        total_cluster_bound(leaf_clusters, target_clusters_per_group, max_hierarchy_depth);

    let cluster_bytes = total_clusters.saturating_mul(CLUSTER_RECORD_BYTES);
    let vertex_bytes = total_clusters
        .saturating_mul(max_vertices_per_cluster)
        .saturating_mul(VERTEX_INDEX_BYTES);
    let triangle_bytes = total_clusters
        .saturating_mul(max_triangles_per_cluster)
        .saturating_mul(3)
        .saturating_mul(TRIANGLE_CORNER_BYTES);
    let node_bytes = total_clusters.saturating_mul(
        NODE_BASE_BYTES.saturating_add(target_clusters_per_group.saturating_mul(CHILD_INDEX_BYTES)),
    );
    let error_bytes = total_clusters.saturating_mul(NODE_ERROR_BOUNDS_BYTES);
    let bounds_bytes = total_clusters.saturating_mul(CLUSTER_BOUNDS_BYTES);

    let subtotal = cluster_bytes
        .saturating_add(vertex_bytes)
        .saturating_add(triangle_bytes)
        .saturating_add(node_bytes)
        .saturating_add(error_bytes)
        .saturating_add(bounds_bytes);

    subtotal
        .saturating_mul(SAFETY_MULTIPLIER_NUMERATOR)
        .saturating_div(SAFETY_MULTIPLIER_DENOMINATOR)
}

/// Bounds the total cluster count across every hierarchy level: a geometric
/// series starting at `leaf_clusters`, shrinking by `branching` each level,
/// capped at `max_depth` terms.
fn total_cluster_bound(leaf_clusters: u64, branching: u64, max_depth: u64) -> u64 {
    let mut total = 0_u64;
    let mut level_count = leaf_clusters;
    for _ in 0..=max_depth {
        if level_count == 0 {
            break;
        }
        total = total.saturating_add(level_count);
        let next = level_count / branching;
        if next >= level_count {
            break;
        }
        level_count = next;
    }
    total
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Formats a byte count as a human-readable string using binary units.
///
/// Returns values like `"0 B"`, `"1.0 KiB"`, `"2.4 GiB"`. The result uses
/// one decimal place for values >= 1 KiB.
///
/// # Examples
///
/// ```
/// use cluster_hierarchy_core::format_bytes;
///
/// assert_eq!(format_bytes(0), "0 B");
/// assert_eq!(format_bytes(1024), "1.0 KiB");
/// ```
#[must_use]
pub fn format_bytes(bytes: u64) -> String {
    const KIB: u64 = 1024;
    const MIB: u64 = 1024 * KIB;
    const GIB: u64 = 1024 * MIB;
    const TIB: u64 = 1024 * GIB;

    if bytes >= TIB {
        format!("{:.1} TiB", bytes as f64 / TIB as f64)
    } else if bytes >= GIB {
        format!("{:.1} GiB", bytes as f64 / GIB as f64)
    } else if bytes >= MIB {
        format!("{:.1} MiB", bytes as f64 / MIB as f64)
    } else if bytes >= KIB {
        format!("{:.1} KiB", bytes as f64 / KIB as f64)
    } else {
        format!("{bytes} B")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::HierarchyParamsBuilder;
    use rstest::rstest;

    fn params() -> HierarchyParams {
        HierarchyParamsBuilder::new().build().expect("valid defaults")
    }

    #[test]
    fn empty_mesh_requires_no_memory() {
        assert_eq!(estimate_peak_bytes(0, &params()), 0);
    }

    #[test]
    fn non_empty_mesh_yields_a_positive_estimate() {
        assert!(estimate_peak_bytes(3_000, &params()) > 0);
    }

    #[rstest]
    #[case::small(3_000, 30_000)]
    #[case::medium(30_000, 300_000)]
    fn estimate_grows_with_index_count(#[case] small: usize, #[case] large: usize) {
        let params = params();
        assert!(estimate_peak_bytes(large, &params) > estimate_peak_bytes(small, &params));
    }

    #[test]
    fn estimate_grows_with_larger_cluster_caps() {
        let small = HierarchyParamsBuilder::new()
            .with_max_vertices_per_cluster(32)
            .with_max_triangles_per_cluster(64)
            .build()
            .expect("valid");
        let large = HierarchyParamsBuilder::new()
            .with_max_vertices_per_cluster(128)
            .with_max_triangles_per_cluster(256)
            .build()
            .expect("valid");
        assert!(estimate_peak_bytes(30_000, &large) > estimate_peak_bytes(30_000, &small));
    }

    #[test]
    fn huge_index_counts_do_not_overflow_or_panic() {
        let bytes = estimate_peak_bytes(usize::MAX, &params());
        assert!(bytes > 0);
    }

    #[test]
    fn total_cluster_bound_terminates_for_branching_factor_of_two() {
        let total = total_cluster_bound(1_000, 2, 25);
        assert!(total > 1_000);
        assert!(total < 3_000);
    }

    #[rstest]
    #[case::zero(0, "0 B")]
    #[case::one_kib(1024, "1.0 KiB")]
    #[case::one_mib(1_048_576, "1.0 MiB")]
    #[case::one_gib(1_073_741_824, "1.0 GiB")]
    fn format_bytes_produces_expected_output(#[case] input: u64, #[case] expected: &str) {
        assert_eq!(format_bytes(input), expected);
    }
}
