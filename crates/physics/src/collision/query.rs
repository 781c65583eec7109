//! The query interface the movement code runs against.

use glam::{Quat, Vec3};

use super::hit::{CapsuleShape, HitResult, ObjectId, QueryFilter};

/// Blocking, synchronous collision queries against scene geometry.
///
/// [`CollisionWorld`](super::CollisionWorld) implements this over parry3d
/// shapes; a host engine can implement it over its own scene instead.
pub trait CollisionQuery {
    /// Sweep a capsule centered at `start` toward `end`.
    ///
    /// A zero-length sweep is an overlap test: `start_penetrating` reports
    /// whether the capsule overlaps blocking geometry at `start`.
    fn sweep_capsule(
        &self,
        start: Vec3,
        end: Vec3,
        rotation: Quat,
        shape: CapsuleShape,
        filter: &QueryFilter,
    ) -> HitResult;

    /// Trace an infinitely thin ray from `start` to `end`.
    fn line_trace(&self, start: Vec3, end: Vec3, filter: &QueryFilter) -> HitResult;

    /// Whether a character may step up onto `object`.
    fn can_step_up_on(&self, _object: ObjectId) -> bool {
        true
    }

    /// Whether `object` may act as a base for a character standing on it.
    fn can_be_base(&self, _object: ObjectId) -> bool {
        true
    }
}
