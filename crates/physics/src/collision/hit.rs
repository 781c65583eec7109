//! Hit results and shapes for collision queries.

use glam::Vec3;
use serde::{Deserialize, Serialize};

use super::flags::ContentFlags;

/// Opaque handle to a piece of collision geometry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ObjectId(pub u32);

/// Result of a sweep or line trace through the world.
///
/// Sweeps move a shape from `trace_start` toward `trace_end` and report the
/// first blocking contact along the way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitResult {
    /// Whether the query was stopped by blocking geometry.
    pub blocking_hit: bool,

    /// Whether the shape was already overlapping geometry at `trace_start`.
    ///
    /// When set, `normal` is the push-out direction and `penetration_depth`
    /// how far the shape must move along it to be free.
    pub start_penetrating: bool,

    /// How far along the query we got before hitting something.
    ///
    /// - `1.0` = traveled the full distance (no collision)
    /// - `0.0` = hit something immediately at start
    pub time: f32,

    /// Distance traveled, `time * |trace_end - trace_start|`.
    pub distance: f32,

    /// Final location of the shape (or ray) after the query.
    ///
    /// Slightly backed off from the impact to avoid resting in contact.
    pub location: Vec3,

    /// Point of contact on the struck surface.
    pub impact_point: Vec3,

    /// Normal of the sweep: from the impact point back toward the shape.
    ///
    /// For capsules hitting an edge this differs from `impact_normal`.
    pub normal: Vec3,

    /// Normal of the struck surface itself.
    pub impact_normal: Vec3,

    /// Depth of the initial overlap, only meaningful with `start_penetrating`.
    pub penetration_depth: f32,

    pub trace_start: Vec3,

    pub trace_end: Vec3,

    /// What was hit, if anything.
    pub object: Option<ObjectId>,
}

impl Default for HitResult {
    fn default() -> Self {
        Self::no_hit(Vec3::ZERO, Vec3::ZERO)
    }
}

impl HitResult {
    /// Create a hit result indicating no collision occurred.
    pub fn no_hit(start: Vec3, end: Vec3) -> Self {
        Self {
            blocking_hit: false,
            start_penetrating: false,
            time: 1.0,
            distance: (end - start).length(),
            location: end,
            impact_point: end,
            normal: Vec3::ZERO,
            impact_normal: Vec3::ZERO,
            penetration_depth: 0.0,
            trace_start: start,
            trace_end: end,
            object: None,
        }
    }

    /// Create a clean blocking hit at `time` along `start..end`.
    pub fn hit(start: Vec3, end: Vec3, time: f32, normal: Vec3, object: ObjectId) -> Self {
        let location = start + (end - start) * time;
        Self {
            blocking_hit: true,
            start_penetrating: false,
            time,
            distance: (end - start).length() * time,
            location,
            impact_point: location,
            normal,
            impact_normal: normal,
            penetration_depth: 0.0,
            trace_start: start,
            trace_end: end,
            object: Some(object),
        }
    }

    /// A blocking hit that did not start in penetration.
    #[inline]
    pub fn is_valid_blocking_hit(&self) -> bool {
        self.blocking_hit && !self.start_penetrating
    }
}

/// Vertical capsule used for the character.
///
/// `half_height` is measured from the center to the tip of a hemisphere, so
/// it always includes the radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CapsuleShape {
    pub radius: f32,
    pub half_height: f32,
}

impl CapsuleShape {
    pub fn new(radius: f32, half_height: f32) -> Self {
        Self {
            radius,
            half_height,
        }
    }

    /// Same capsule with the radius reduced by `amount`, height unchanged.
    pub fn shrunk(self, amount: f32) -> Self {
        Self {
            radius: (self.radius - amount).max(0.01),
            half_height: self.half_height,
        }
    }

    /// Half-length of the straight segment between the hemisphere centers.
    #[inline]
    pub fn segment_half_height(&self) -> f32 {
        (self.half_height - self.radius).max(0.0)
    }
}

/// Which geometry a query may hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryFilter {
    /// Content flags to collide with.
    pub mask: ContentFlags,
    /// Geometry to skip, usually the querying character's own body.
    pub ignored: Option<ObjectId>,
}

impl Default for QueryFilter {
    fn default() -> Self {
        Self {
            mask: ContentFlags::MASK_PAWN_SOLID,
            ignored: None,
        }
    }
}

impl QueryFilter {
    /// Filter for a pawn that ignores its own body.
    pub fn ignoring(owner: Option<ObjectId>) -> Self {
        Self {
            ignored: owner,
            ..Default::default()
        }
    }

    /// Whether a brush passes this filter.
    #[inline]
    pub fn accepts(&self, object: ObjectId, contents: ContentFlags) -> bool {
        self.mask.intersects(contents) && self.ignored != Some(object)
    }
}
