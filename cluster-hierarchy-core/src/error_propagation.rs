//! Error-bound propagation (§4.6): computing a group's conservative error
//! sphere and folding it into every child's `parent_error`, so error is
//! monotonic from leaves to roots.

use crate::geometry::{ErrorBounds, NodeErrorBounds, Sphere};

/// Computes the error bounds a newly simplified group's parent clusters
/// should all share.
///
/// The centre is the weighted average of the children's error-sphere
/// centres, weighted by child radius (children contribute to the shape of
/// the merged region in proportion to the space they occupy, not in
/// proportion to their count). The radius is then grown just enough that
/// every child's sphere is fully contained. The error is the maximum of the
/// simplifier's own reported error and every child's error, which is what
/// keeps the DAG's error monotonic: a parent can never claim to be more
/// accurate than any cluster it replaces.
///
/// # Panics
/// Panics if `children` is empty; callers only reach this function for
/// groups of at least two clusters (see [`crate::driver`]).
#[must_use]
pub fn propagate_group_error(children: &[NodeErrorBounds], simplifier_error: f32) -> ErrorBounds {
    assert!(!children.is_empty(), "a group must have at least one child");

    let center = weighted_center(children);
    let radius = children
        .iter()
        .map(|child| {
            let sphere = child.cluster_error.sphere;
            Sphere::new(center, 0.0).distance_to(&sphere) + sphere.radius
        })
        .fold(0.0_f32, f32::max);
    let error = children
        .iter()
        .map(|child| child.cluster_error.error)
        .fold(simplifier_error, f32::max);

    ErrorBounds::new(Sphere::new(center, radius), error)
}

fn weighted_center(children: &[NodeErrorBounds]) -> [f32; 3] {
    let total_weight: f32 = children.iter().map(|c| c.cluster_error.sphere.radius).sum();
    if total_weight > 0.0 {
        let mut acc = [0.0_f32; 3];
        for child in children {
            let sphere = child.cluster_error.sphere;
            for axis in 0..3 {
                acc[axis] += sphere.center[axis] * sphere.radius;
            }
        }
        acc.map(|component| component / total_weight)
    } else {
        #[allow(
            clippy::cast_precision_loss,
            reason = "children.len() is bounded by max_hierarchy depth fan-out, far under f32's exact-integer range"
        )]
        let count = children.len() as f32;
        let mut acc = [0.0_f32; 3];
        for child in children {
            let sphere = child.cluster_error.sphere;
            for axis in 0..3 {
                acc[axis] += sphere.center[axis];
            }
        }
        acc.map(|component| component / count)
    }
}
