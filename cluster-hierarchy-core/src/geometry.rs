//! Bounding geometry and error-bound types shared across the hierarchy.
//!
//! These types carry no behaviour beyond plain construction and containment
//! queries; the algorithms that produce and combine them live in
//! [`crate::error_propagation`] and [`crate::parent`].

/// A bounding sphere in model space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Sphere {
    /// Sphere centre, in model-space coordinates.
    pub center: [f32; 3],
    /// Sphere radius. Never negative.
    pub radius: f32,
}

impl Sphere {
    /// Creates a new sphere.
    #[must_use]
    pub const fn new(center: [f32; 3], radius: f32) -> Self {
        Self { center, radius }
    }

    /// Euclidean distance between this sphere's centre and `other`'s.
    #[must_use]
    pub fn distance_to(&self, other: &Self) -> f32 {
        let dx = self.center[0] - other.center[0];
        let dy = self.center[1] - other.center[1];
        let dz = self.center[2] - other.center[2];
        dx.mul_add(dx, dy.mul_add(dy, dz * dz)).sqrt()
    }
}

/// A cone bounding the normals of a cluster's triangles, used to cull
/// clusters that face entirely away from the viewer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NormalCone {
    /// Apex of the cone, in model-space coordinates.
    pub apex: [f32; 3],
    /// Cone axis, a unit vector.
    pub axis: [f32; 3],
    /// Cosine of the half-angle beyond which triangles are considered
    /// back-facing with respect to the cone.
    pub cutoff: f32,
}

impl NormalCone {
    /// Creates a new normal cone.
    #[must_use]
    pub const fn new(apex: [f32; 3], axis: [f32; 3], cutoff: f32) -> Self {
        Self { apex, axis, cutoff }
    }
}

/// View-independent bounding information used for culling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClusterBounds {
    /// Bounding sphere of the cluster's triangles.
    pub sphere: Sphere,
    /// Bounding cone of the cluster's triangle normals.
    pub cone: NormalCone,
}

impl ClusterBounds {
    /// Creates new cluster bounds from a sphere and a normal cone.
    #[must_use]
    pub const fn new(sphere: Sphere, cone: NormalCone) -> Self {
        Self { sphere, cone }
    }
}

/// A bounding sphere paired with an absolute simplification error, in model
/// units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ErrorBounds {
    /// Conservative bounding sphere for the error measurement.
    pub sphere: Sphere,
    /// Absolute geometric error, in model units.
    pub error: f32,
}

impl ErrorBounds {
    /// Creates new error bounds.
    #[must_use]
    pub const fn new(sphere: Sphere, error: f32) -> Self {
        Self { sphere, error }
    }

    /// Error bounds for a leaf cluster: zero error, no parent yet.
    #[must_use]
    pub const fn leaf(sphere: Sphere) -> Self {
        Self { sphere, error: 0.0 }
    }

    /// Returns `true` if `inner`'s sphere is contained within this sphere,
    /// allowing a small epsilon for floating-point error.
    #[must_use]
    pub fn contains(&self, inner: &Self, epsilon: f32) -> bool {
        let dist = self.sphere.distance_to(&inner.sphere);
        dist + inner.sphere.radius <= self.sphere.radius + epsilon
    }
}

/// The pair of error bounds tracked per cluster: the cluster's own error at
/// the level it was produced, and the error of the group its parent belongs
/// to.
///
/// `parent_error.error` is `f32::INFINITY` until the cluster is absorbed into
/// a group that successfully simplifies; a cluster that becomes a permanent
/// root keeps this sentinel forever.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeErrorBounds {
    /// Error bounds for the group this cluster's parent, if any, belongs to.
    pub parent_error: ErrorBounds,
    /// This cluster's own error bounds.
    pub cluster_error: ErrorBounds,
}

impl NodeErrorBounds {
    /// Creates a fresh leaf's error bounds: zero cluster error, infinite
    /// parent error sentinel.
    #[must_use]
    pub const fn leaf(sphere: Sphere) -> Self {
        Self {
            parent_error: ErrorBounds::new(sphere, f32::INFINITY),
            cluster_error: ErrorBounds::leaf(sphere),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_distance_to_is_symmetric() {
        let a = Sphere::new([0.0, 0.0, 0.0], 1.0);
        let b = Sphere::new([3.0, 4.0, 0.0], 2.0);
        assert!((a.distance_to(&b) - 5.0).abs() < 1e-6);
        assert!((b.distance_to(&a) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn error_bounds_contains_nested_sphere() {
        let outer = ErrorBounds::new(Sphere::new([0.0, 0.0, 0.0], 10.0), 0.5);
        let inner = ErrorBounds::new(Sphere::new([1.0, 0.0, 0.0], 2.0), 0.1);
        assert!(outer.contains(&inner, 1e-5));
    }

    #[test]
    fn error_bounds_rejects_sphere_outside() {
        let outer = ErrorBounds::new(Sphere::new([0.0, 0.0, 0.0], 1.0), 0.5);
        let inner = ErrorBounds::new(Sphere::new([10.0, 0.0, 0.0], 2.0), 0.1);
        assert!(!outer.contains(&inner, 1e-5));
    }

    #[test]
    fn leaf_node_error_bounds_has_infinite_parent_error() {
        let bounds = NodeErrorBounds::leaf(Sphere::new([0.0, 0.0, 0.0], 1.0));
        assert_eq!(bounds.cluster_error.error, 0.0);
        assert!(bounds.parent_error.error.is_infinite());
    }
}
