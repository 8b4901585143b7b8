#![cfg(feature = "cpu")]
#![expect(clippy::expect_used, reason = "tests require contextual panics")]
#![expect(clippy::float_arithmetic, reason = "synthetic mesh generation and error-bound checks are float-heavy by nature")]
#![expect(clippy::cast_precision_loss, reason = "grid resolutions used in tests stay well under f32's exact-integer range")]
#![expect(clippy::cast_possible_truncation, reason = "test grid resolutions stay well under u32::MAX")]
//! End-to-end tests of `build_cluster_hierarchy` against the concrete
//! scenarios and invariants of the hierarchy-build specification, driven
//! through the public `HierarchyBuilder` API with the default
//! `meshopt`/`metis` collaborators.

use cluster_hierarchy_core::{BuildErrorCode, HierarchyBuilder, HierarchyParamsBuilder};
use cluster_hierarchy_test_support::ci::property_test_profile::ProptestRunProfile;
use proptest::prelude::*;
use proptest::test_runner::Config as ProptestConfig;
use rstest::rstest;

/// A single welded triangle: (0,0,0), (1,0,0), (0,1,0).
fn single_triangle() -> (Vec<u32>, Vec<f32>) {
    let indices = vec![0_u32, 1, 2];
    let vertices = vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    (indices, vertices)
}

/// Two disjoint, unwelded triangles sharing no vertices.
fn two_disjoint_triangles() -> (Vec<u32>, Vec<f32>) {
    let indices = vec![0_u32, 1, 2, 3, 4, 5];
    let vertices = vec![
        0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, // first triangle
        10.0, 0.0, 0.0, 11.0, 0.0, 0.0, 10.0, 1.0, 0.0, // second triangle
    ];
    (indices, vertices)
}

/// A regular `resolution x resolution` grid of welded vertices, triangulated
/// into two triangles per quad, rippled slightly in Y so clusters built over
/// it have non-trivial normal variation (spec §8 scenario S3).
fn grid_mesh(resolution: usize, spacing: f32) -> (Vec<u32>, Vec<f32>) {
    let mut vertices = Vec::with_capacity(resolution * resolution * 3);
    for row in 0..resolution {
        for col in 0..resolution {
            let x = col as f32 * spacing;
            let z = row as f32 * spacing;
            let ripple = 0.05 * spacing * ((row + col) % 4) as f32;
            vertices.extend_from_slice(&[x, ripple, z]);
        }
    }

    let quads_per_side = resolution - 1;
    let mut indices = Vec::with_capacity(quads_per_side * quads_per_side * 6);
    for row in 0..quads_per_side {
        for col in 0..quads_per_side {
            let top_left = (row * resolution + col) as u32;
            let top_right = top_left + 1;
            let bottom_left = top_left + resolution as u32;
            let bottom_right = bottom_left + 1;
            indices.extend_from_slice(&[
                top_left,
                bottom_left,
                top_right,
                top_right,
                bottom_left,
                bottom_right,
            ]);
        }
    }
    (indices, vertices)
}

#[rstest]
fn s1_degenerate_tiny_mesh_yields_a_single_leaf_root() {
    let (indices, vertices) = single_triangle();
    let params = HierarchyParamsBuilder::new().build().expect("valid defaults");
    let hierarchy = HierarchyBuilder::new(params)
        .build(&indices, &vertices, 12)
        .expect("a single welded triangle builds a hierarchy");

    assert_eq!(hierarchy.clusters().len(), 1);
    assert_eq!(hierarchy.clusters()[0].vertex_count, 3);
    assert_eq!(hierarchy.clusters()[0].triangle_count, 1);
    assert_eq!(hierarchy.root_nodes, vec![0]);
    assert_eq!(hierarchy.errors[0].cluster_error.error, 0.0);
    assert!(hierarchy.errors[0].parent_error.error.is_infinite());
}

#[rstest]
fn s2_two_disjoint_triangles_still_build_a_hierarchy() {
    let (indices, vertices) = two_disjoint_triangles();
    let params = HierarchyParamsBuilder::new().build().expect("valid defaults");
    let hierarchy = HierarchyBuilder::new(params)
        .build(&indices, &vertices, 12)
        .expect("a disconnected mesh still partitions and builds");

    // Either one leaf per disjoint triangle, or a single merged leaf,
    // depending on how the meshlet builder groups unconnected geometry.
    assert!(!hierarchy.clusters().is_empty());
    assert!(hierarchy.clusters().len() <= 2);
    assert!(!hierarchy.root_nodes.is_empty());
}

#[rstest]
fn s5_depth_one_yields_only_leaves_with_infinite_parent_error() {
    let (indices, vertices) = grid_mesh(8, 1.0);
    let params = HierarchyParamsBuilder::new()
        .with_max_hierarchy_depth(1)
        .build()
        .expect("valid params");
    let hierarchy = HierarchyBuilder::new(params)
        .build(&indices, &vertices, 12)
        .expect("depth-1 build succeeds");

    assert!(hierarchy.nodes.iter().all(cluster_hierarchy_core::Node::is_leaf));
    let mut roots: Vec<usize> = hierarchy.root_nodes.clone();
    roots.sort_unstable();
    let mut all_indices: Vec<usize> = (0..hierarchy.nodes.len()).collect();
    all_indices.sort_unstable();
    assert_eq!(roots, all_indices, "every leaf must be a root at depth 1");
    for error in &hierarchy.errors {
        assert!(error.parent_error.error.is_infinite());
    }
}

#[rstest]
fn s6_invalid_stride_is_rejected_before_any_meshlet_is_built() {
    // 13 floats can never divide evenly into 12-byte (3-float) vertices.
    let vertices = vec![0.0_f32; 13];
    let params = HierarchyParamsBuilder::new().build().expect("valid defaults");
    let err = HierarchyBuilder::new(params)
        .build(&[0, 1, 2], &vertices, 12)
        .expect_err("misaligned vertex buffer must be rejected");
    assert_eq!(err.code(), BuildErrorCode::InvalidVertexStride);
}

#[rstest]
fn index_count_not_a_multiple_of_three_is_rejected() {
    let params = HierarchyParamsBuilder::new().build().expect("valid defaults");
    let err = HierarchyBuilder::new(params)
        .build(&[0, 1], &[0.0; 9], 12)
        .expect_err("4 corners... no, 2 corners is not a multiple of 3 either");
    assert_eq!(err.code(), BuildErrorCode::InvalidIndexCount);
}

#[rstest]
fn s3_regular_grid_builds_a_monotonic_multi_level_hierarchy() {
    let (indices, vertices) = grid_mesh(32, 1.0);
    let params = HierarchyParamsBuilder::new().build().expect("valid defaults");
    let hierarchy = HierarchyBuilder::new(params)
        .build(&indices, &vertices, 12)
        .expect("a 32x32 grid builds a hierarchy");

    assert!(hierarchy.clusters().len() > 1, "a 32x32 grid needs more than one leaf cluster");
    assert!(!hierarchy.root_nodes.is_empty());
    assert!(
        !hierarchy.stats().is_empty(),
        "at least one level of simplification should have been attempted"
    );

    assert_cluster_size_caps(&hierarchy, 64, 128);
    assert_offsets_in_range(&hierarchy);
    assert_triangle_indices_valid(&hierarchy);
    assert_error_monotonicity(&hierarchy);
    assert_sphere_monotonicity(&hierarchy);
    assert_leaves_are_level_zero(&hierarchy);
    assert_root_coverage(&hierarchy);
}

#[rstest]
fn s4_thread_pool_size_does_not_change_the_result() {
    let (indices, vertices) = grid_mesh(16, 1.0);

    let single = HierarchyParamsBuilder::new()
        .with_thread_pool_size(1)
        .build()
        .expect("valid params");
    let multi = HierarchyParamsBuilder::new()
        .with_thread_pool_size(4)
        .build()
        .expect("valid params");

    let hierarchy_single = HierarchyBuilder::new(single)
        .build(&indices, &vertices, 12)
        .expect("single-threaded build succeeds");
    let hierarchy_multi = HierarchyBuilder::new(multi)
        .build(&indices, &vertices, 12)
        .expect("multi-threaded build succeeds");

    assert_eq!(hierarchy_single.clusters().len(), hierarchy_multi.clusters().len());
    assert_eq!(hierarchy_single.buffers.vertices, hierarchy_multi.buffers.vertices);
    assert_eq!(hierarchy_single.buffers.triangles, hierarchy_multi.buffers.triangles);
    assert_eq!(hierarchy_single.root_nodes, hierarchy_multi.root_nodes);
}

// ---------------------------------------------------------------------------
// Shared invariant checks (spec §8, properties 1-7)
// ---------------------------------------------------------------------------

fn assert_cluster_size_caps(
    hierarchy: &cluster_hierarchy_core::ClusterHierarchy,
    max_vertices: usize,
    max_triangles: usize,
) {
    for cluster in hierarchy.clusters() {
        assert!(usize::from(cluster.vertex_count) <= max_vertices);
        assert!(usize::from(cluster.triangle_count) <= max_triangles);
    }
}

fn assert_offsets_in_range(hierarchy: &cluster_hierarchy_core::ClusterHierarchy) {
    for cluster in hierarchy.clusters() {
        let vertex_range = cluster.vertex_range();
        assert!(vertex_range.end <= hierarchy.buffers.vertices.len());
        let triangle_range = cluster.triangle_byte_range();
        assert!(triangle_range.end <= hierarchy.buffers.triangles.len());
    }
}

fn assert_triangle_indices_valid(hierarchy: &cluster_hierarchy_core::ClusterHierarchy) {
    for cluster in hierarchy.clusters() {
        for &byte in &hierarchy.buffers.triangles[cluster.triangle_byte_range()] {
            assert!(usize::from(byte) < usize::from(cluster.vertex_count));
        }
    }
}

fn assert_error_monotonicity(hierarchy: &cluster_hierarchy_core::ClusterHierarchy) {
    for node in &hierarchy.nodes {
        let parent_error = hierarchy.errors[node.cluster_index].cluster_error.error;
        for &child in &node.child_node_indices {
            let child_cluster_index = hierarchy.nodes[child].cluster_index;
            let child_error = hierarchy.errors[child_cluster_index].cluster_error.error;
            assert!(
                child_error <= parent_error,
                "child error {child_error} must not exceed parent error {parent_error}"
            );
        }
    }
}

fn assert_sphere_monotonicity(hierarchy: &cluster_hierarchy_core::ClusterHierarchy) {
    const EPSILON: f32 = 1e-3;
    for node in &hierarchy.nodes {
        let parent_bounds = hierarchy.errors[node.cluster_index].cluster_error;
        for &child in &node.child_node_indices {
            let child_cluster_index = hierarchy.nodes[child].cluster_index;
            let child_bounds = hierarchy.errors[child_cluster_index].cluster_error;
            assert!(
                parent_bounds.contains(&child_bounds, EPSILON),
                "parent sphere must contain child sphere (within epsilon)"
            );
        }
    }
}

fn assert_leaves_are_level_zero(hierarchy: &cluster_hierarchy_core::ClusterHierarchy) {
    let leaf_count_before_any_level =
        hierarchy.stats().first().map_or(hierarchy.nodes.len(), |stats| stats.clusters_in);
    let leaves: Vec<&cluster_hierarchy_core::Node> =
        hierarchy.nodes.iter().filter(|node| node.is_leaf()).collect();
    assert_eq!(leaves.len(), leaf_count_before_any_level);
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: ProptestRunProfile::load(24, false).cases(),
        fork: ProptestRunProfile::load(24, false).fork(),
        ..ProptestConfig::default()
    })]

    /// Invariants 1-5 of spec §8 hold for any regular-grid mesh in the
    /// small size range that keeps this property fast under CI's default
    /// case count, per the `PROGTEST_CASES`/`CLUSTER_HIERARCHY_PBT_FORK`
    /// profile honoured by every other property suite in this crate.
    #[test]
    fn size_caps_and_monotonicity_hold_for_any_small_grid(resolution in 3_usize..12) {
        let (indices, vertices) = grid_mesh(resolution, 1.0);
        let params = HierarchyParamsBuilder::new()
            .with_max_vertices_per_cluster(16)
            .with_max_triangles_per_cluster(32)
            .with_target_clusters_per_group(3)
            .build()
            .expect("valid params");
        let hierarchy = HierarchyBuilder::new(params)
            .build(&indices, &vertices, 12)
            .expect("a small grid always builds a hierarchy");

        assert_cluster_size_caps(&hierarchy, 16, 32);
        assert_offsets_in_range(&hierarchy);
        assert_triangle_indices_valid(&hierarchy);
        assert_error_monotonicity(&hierarchy);
        assert_sphere_monotonicity(&hierarchy);
    }
}

fn assert_root_coverage(hierarchy: &cluster_hierarchy_core::ClusterHierarchy) {
    let mut reachable = vec![false; hierarchy.nodes.len()];
    let mut stack: Vec<usize> = hierarchy.root_nodes.clone();
    while let Some(node_index) = stack.pop() {
        if std::mem::replace(&mut reachable[node_index], true) {
            continue;
        }
        stack.extend(hierarchy.nodes[node_index].child_node_indices.iter().copied());
    }
    assert!(reachable.into_iter().all(|seen| seen), "every node must be reachable from a root");
}
