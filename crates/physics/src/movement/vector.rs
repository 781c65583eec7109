//! Small vector helpers shared by the movement models.

use glam::Vec3;

/// Every component is within `tolerance` of zero.
#[inline]
pub fn is_nearly_zero(v: Vec3, tolerance: f32) -> bool {
    v.abs().max_element() <= tolerance
}

/// Horizontal part of `v` with the Z component dropped.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, v.y, 0.0)
}

/// Length of the horizontal part of `v`.
#[inline]
pub fn size_2d(v: Vec3) -> f32 {
    v.truncate().length()
}

/// Unit-length horizontal direction of `v`, or zero.
#[inline]
pub fn safe_normal_2d(v: Vec3) -> Vec3 {
    flatten(v).normalize_or_zero()
}

/// Project `v` onto `axis`. Returns zero for a zero axis.
#[inline]
pub fn project_onto(v: Vec3, axis: Vec3) -> Vec3 {
    let len_sq = axis.length_squared();
    if len_sq <= f32::EPSILON {
        Vec3::ZERO
    } else {
        axis * (v.dot(axis) / len_sq)
    }
}

/// Remove the component of `v` along the unit `normal`.
#[inline]
pub fn project_onto_plane(v: Vec3, normal: Vec3) -> Vec3 {
    v - normal * v.dot(normal)
}

#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}
