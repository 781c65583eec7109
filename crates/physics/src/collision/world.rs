//! Collision world containing all static geometry.
//!
//! The collision world stores collidable brushes and answers capsule sweeps
//! and line traces against them through [`CollisionQuery`].

use glam::{Quat, Vec3};
use parry3d::math::{Isometry, Point, Real, Vector};
use parry3d::na::{Quaternion, Translation3, UnitQuaternion};
use parry3d::query::{
    cast_shapes, closest_points, contact, ClosestPoints, Ray, ShapeCastOptions, ShapeCastStatus,
};
use parry3d::shape::{Segment, SharedShape};

use crate::error::WorldError;

use super::flags::{ContentFlags, SurfaceFlags};
use super::hit::{CapsuleShape, HitResult, ObjectId, QueryFilter};
use super::query::CollisionQuery;

/// Distance a sweep backs off from the first blocking contact.
const SWEEP_SKIN: f32 = 0.05;

/// Overlap tolerated before a position counts as blocked.
const CONTACT_SLOP: f32 = 0.005;

/// Below this core distance the closest-point direction is unreliable.
const MIN_CORE_DISTANCE: f32 = 1.0e-3;

/// Sweeps shorter than this are treated as overlap tests.
const MIN_SWEEP_LENGTH: f32 = 1.0e-4;

/// How far back from the impact point the surface-normal probe starts.
const NORMAL_PROBE_DISTANCE: f32 = 1.0;

/// Contact normals this close to the probed face normal are replaced by it.
const NORMAL_SNAP_COS: f32 = 0.9999;

/// A piece of collision geometry in the world.
#[derive(Debug, Clone)]
pub struct CollisionBrush {
    /// Unique identifier for this brush.
    pub id: ObjectId,
    /// The collision shape.
    pub shape: SharedShape,
    /// Position and orientation in world space.
    pub transform: Isometry<Real>,
    /// Content flags for query filtering.
    pub contents: ContentFlags,
    /// Step-up and base rules for characters.
    pub surface: SurfaceFlags,
}

/// The collision world containing all geometry.
///
/// Supports:
/// - Box brushes (axis-aligned and oriented)
/// - Convex hull brushes
/// - Triangle mesh collision
///
/// Z is up. Capsule positions passed to queries are capsule centers.
#[derive(Debug, Default)]
pub struct CollisionWorld {
    brushes: Vec<CollisionBrush>,
    next_id: u32,
}

impl CollisionWorld {
    /// Create an empty collision world.
    pub fn new() -> Self {
        Self {
            brushes: Vec::new(),
            next_id: 0,
        }
    }

    /// Add an axis-aligned box to the world.
    ///
    /// # Arguments
    ///
    /// * `center` - Center position of the box in world space
    /// * `half_extents` - Half-size in each axis (x, y, z)
    /// * `contents` - Content flags for collision filtering
    pub fn add_box(&mut self, center: Vec3, half_extents: Vec3, contents: ContentFlags) -> ObjectId {
        self.add_oriented_box(center, half_extents, Quat::IDENTITY, contents)
    }

    /// Add a rotated box to the world, e.g. a ramp.
    pub fn add_oriented_box(
        &mut self,
        center: Vec3,
        half_extents: Vec3,
        rotation: Quat,
        contents: ContentFlags,
    ) -> ObjectId {
        let shape = SharedShape::cuboid(half_extents.x, half_extents.y, half_extents.z);
        self.insert(shape, isometry(center, rotation), contents)
    }

    /// Add a convex hull to the world.
    ///
    /// Fails when the points are degenerate (fewer than four, or coplanar).
    pub fn add_convex_hull(
        &mut self,
        points: &[Vec3],
        contents: ContentFlags,
    ) -> Result<ObjectId, WorldError> {
        if points.len() < 4 {
            return Err(WorldError::InvalidConvexHull(points.len()));
        }

        let parry_points: Vec<Point<Real>> = points.iter().map(|p| to_point(*p)).collect();

        let shape = SharedShape::convex_hull(&parry_points)
            .ok_or(WorldError::InvalidConvexHull(points.len()))?;

        Ok(self.insert(shape, Isometry::identity(), contents))
    }

    /// Add a triangle mesh to the world.
    ///
    /// # Arguments
    ///
    /// * `vertices` - Mesh vertex positions
    /// * `indices` - Triangle indices (3 per triangle)
    /// * `contents` - Content flags for collision filtering
    pub fn add_triangle_mesh(
        &mut self,
        vertices: &[Vec3],
        indices: &[[u32; 3]],
        contents: ContentFlags,
    ) -> Result<ObjectId, WorldError> {
        let parry_vertices: Vec<Point<Real>> = vertices.iter().map(|v| to_point(*v)).collect();

        let shape = SharedShape::trimesh(parry_vertices, indices.to_vec())
            .map_err(|err| WorldError::InvalidMesh(format!("{err:?}")))?;

        Ok(self.insert(shape, Isometry::identity(), contents))
    }

    /// Replace the surface flags of a brush. Returns false for unknown ids.
    pub fn set_surface(&mut self, id: ObjectId, surface: SurfaceFlags) -> bool {
        match self.brushes.iter_mut().find(|b| b.id == id) {
            Some(brush) => {
                brush.surface = surface;
                true
            }
            None => false,
        }
    }

    /// Look up a brush by id.
    pub fn brush(&self, id: ObjectId) -> Option<&CollisionBrush> {
        self.brushes.iter().find(|b| b.id == id)
    }

    /// Remove all collision geometry.
    pub fn clear(&mut self) {
        self.brushes.clear();
    }

    /// Get the number of collision brushes.
    pub fn brush_count(&self) -> usize {
        self.brushes.len()
    }

    /// Check whether a capsule at `center` overlaps blocking geometry.
    pub fn overlaps(
        &self,
        center: Vec3,
        rotation: Quat,
        shape: CapsuleShape,
        filter: &QueryFilter,
    ) -> bool {
        self.deepest_penetration(isometry(center, rotation), shape, filter)
            .is_some_and(|found| found.depth > CONTACT_SLOP)
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn insert(&mut self, shape: SharedShape, transform: Isometry<Real>, contents: ContentFlags) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;

        self.brushes.push(CollisionBrush {
            id,
            shape,
            transform,
            contents,
            surface: SurfaceFlags::NONE,
        });

        id
    }

    fn accepted(&self, filter: QueryFilter) -> impl Iterator<Item = &CollisionBrush> + '_ {
        self.brushes
            .iter()
            .filter(move |brush| filter.accepts(brush.id, brush.contents))
    }

    /// Deepest overlap between a capsule at `pose` and any accepted brush.
    fn deepest_penetration(
        &self,
        pose: Isometry<Real>,
        shape: CapsuleShape,
        filter: &QueryFilter,
    ) -> Option<Penetration<'_>> {
        self.accepted(*filter)
            .filter_map(|brush| penetration(&pose, shape, brush))
            .max_by(|a, b| a.depth.total_cmp(&b.depth))
    }

    /// Normal of the face struck at `impact_point`, probed with a short ray
    /// along the sweep direction. Falls back to the contact normal.
    fn surface_normal(
        &self,
        brush: &CollisionBrush,
        impact_point: Vec3,
        direction: Vec3,
        fallback: Vec3,
    ) -> Vec3 {
        let origin = impact_point - direction * NORMAL_PROBE_DISTANCE - fallback * 0.01;
        let ray = Ray::new(to_point(origin), to_vector(direction));

        brush
            .shape
            .cast_ray_and_get_normal(&brush.transform, &ray, NORMAL_PROBE_DISTANCE * 2.0, true)
            .map(|intersection| from_vector(&intersection.normal))
            .filter(|n| n.length_squared() > 0.5 && n.dot(direction) < 0.0)
            .map(|n| n.normalize())
            .unwrap_or(fallback)
    }
}

impl CollisionQuery for CollisionWorld {
    /// Shape-cast the capsule against every accepted brush, keep the earliest
    /// impact, then back off by a small skin.
    fn sweep_capsule(
        &self,
        start: Vec3,
        end: Vec3,
        rotation: Quat,
        shape: CapsuleShape,
        filter: &QueryFilter,
    ) -> HitResult {
        let pose = isometry(start, rotation);

        if let Some(found) = self.deepest_penetration(pose, shape, filter) {
            if found.depth > CONTACT_SLOP {
                return HitResult {
                    blocking_hit: true,
                    start_penetrating: true,
                    time: 0.0,
                    distance: 0.0,
                    location: start,
                    impact_point: found.point,
                    normal: found.normal,
                    impact_normal: found.normal,
                    penetration_depth: found.depth,
                    trace_start: start,
                    trace_end: end,
                    object: Some(found.brush.id),
                };
            }
        }

        let delta = end - start;
        let length = delta.length();
        if length < MIN_SWEEP_LENGTH {
            return HitResult::no_hit(start, end);
        }
        let direction = delta / length;

        let parry_shape = capsule(shape);
        let velocity = to_vector(delta);
        let options = ShapeCastOptions {
            max_time_of_impact: 1.0,
            target_distance: 0.0,
            stop_at_penetration: true,
            compute_impact_geometry_on_penetration: true,
        };

        let mut first: Option<(f32, Vec3, Vec3, &CollisionBrush)> = None;
        for brush in self.accepted(*filter) {
            let Ok(Some(hit)) = cast_shapes(
                &pose,
                &velocity,
                &*parry_shape,
                &brush.transform,
                &Vector::zeros(),
                &*brush.shape,
                options,
            ) else {
                continue;
            };

            let (normal, point) = if matches!(hit.status, ShapeCastStatus::PenetratingOrWithinTargetDist) {
                // Resting contact within the slop only blocks motion into it.
                let Some(touch) = penetration(&pose, shape, brush) else {
                    continue;
                };
                if touch.normal.dot(direction) >= 0.0 {
                    continue;
                }
                (touch.normal, touch.point)
            } else {
                (
                    from_vector(&(brush.transform.rotation * *hit.normal2)),
                    from_point(&(brush.transform * hit.witness2)),
                )
            };

            let is_earlier = first
                .as_ref()
                .map_or(true, |(toi, ..)| hit.time_of_impact < *toi);
            if is_earlier {
                first = Some((hit.time_of_impact, normal, point, brush));
            }
        }

        let Some((toi, contact_normal, impact_point, brush)) = first else {
            return HitResult::no_hit(start, end);
        };

        // Re-sweeping from a backed-off position must report an immediate hit.
        let mut travel = toi.clamp(0.0, 1.0) * length - SWEEP_SKIN;
        if travel < SWEEP_SKIN {
            travel = 0.0;
        }

        let contact_normal = contact_normal.try_normalize().unwrap_or(-direction);
        let impact_normal = self.surface_normal(brush, impact_point, direction, contact_normal);
        let normal = if contact_normal.dot(impact_normal) > NORMAL_SNAP_COS {
            impact_normal
        } else {
            contact_normal
        };

        HitResult {
            blocking_hit: true,
            start_penetrating: false,
            time: travel / length,
            distance: travel,
            location: start + direction * travel,
            impact_point,
            normal,
            impact_normal,
            penetration_depth: 0.0,
            trace_start: start,
            trace_end: end,
            object: Some(brush.id),
        }
    }

    fn line_trace(&self, start: Vec3, end: Vec3, filter: &QueryFilter) -> HitResult {
        let delta = end - start;
        let length = delta.length();
        if length < MIN_SWEEP_LENGTH {
            return HitResult::no_hit(start, end);
        }
        let direction = delta / length;

        let ray = Ray::new(to_point(start), to_vector(direction));

        let mut closest: Option<(f32, &CollisionBrush)> = None;
        for brush in self.accepted(*filter) {
            if let Some(toi) = brush.shape.cast_ray(&brush.transform, &ray, length, true) {
                let is_closer = closest.as_ref().map_or(true, |(dist, _)| toi < *dist);
                if is_closer {
                    closest = Some((toi, brush));
                }
            }
        }

        let Some((toi, brush)) = closest else {
            return HitResult::no_hit(start, end);
        };

        let normal = brush
            .shape
            .cast_ray_and_get_normal(&brush.transform, &ray, length, true)
            .map(|intersection| from_vector(&intersection.normal))
            .filter(|n| n.length_squared() > 0.5)
            .map(|n| n.normalize())
            .unwrap_or(-direction);

        let point = start + direction * toi;
        HitResult {
            blocking_hit: true,
            start_penetrating: toi <= 0.0,
            time: toi / length,
            distance: toi,
            location: point,
            impact_point: point,
            normal,
            impact_normal: normal,
            penetration_depth: 0.0,
            trace_start: start,
            trace_end: end,
            object: Some(brush.id),
        }
    }

    fn can_step_up_on(&self, object: ObjectId) -> bool {
        self.brush(object)
            .map_or(true, |b| !b.surface.contains(SurfaceFlags::NO_STEP_UP))
    }

    fn can_be_base(&self, object: ObjectId) -> bool {
        self.brush(object)
            .map_or(true, |b| !b.surface.contains(SurfaceFlags::NO_BASE))
    }
}

/// Overlap of a capsule with one brush.
struct Penetration<'a> {
    brush: &'a CollisionBrush,
    /// How far the capsule surface reaches into the brush. Negative when the
    /// capsule is separated but within the query margin.
    depth: f32,
    /// Push-out direction, from the brush toward the capsule.
    normal: Vec3,
    point: Vec3,
}

/// Measure capsule overlap as the distance from its core segment to the
/// brush, compared against the radius. Only a buried core segment needs a
/// penetration-depth query.
fn penetration<'a>(
    pose: &Isometry<Real>,
    shape: CapsuleShape,
    brush: &'a CollisionBrush,
) -> Option<Penetration<'a>> {
    let h = shape.segment_half_height();
    let core = Segment::new(Point::new(0.0, 0.0, -h), Point::new(0.0, 0.0, h));

    let found = closest_points(pose, &core, &brush.transform, &*brush.shape, shape.radius).ok()?;
    if let ClosestPoints::WithinMargin(on_core, on_brush) = found {
        let offset = from_point(&on_core) - from_point(&on_brush);
        let dist = offset.length();
        if dist > MIN_CORE_DISTANCE {
            return Some(Penetration {
                brush,
                depth: shape.radius - dist,
                normal: offset / dist,
                point: from_point(&on_brush),
            });
        }
    } else if matches!(found, ClosestPoints::Disjoint) {
        return None;
    }

    let buried = contact(pose, &core, &brush.transform, &*brush.shape, 0.0).ok()??;
    Some(Penetration {
        brush,
        depth: shape.radius - buried.dist,
        normal: (-from_vector(&buried.normal1)).try_normalize().unwrap_or(Vec3::Z),
        point: from_point(&buried.point2),
    })
}

fn capsule(shape: CapsuleShape) -> SharedShape {
    SharedShape::capsule_z(shape.segment_half_height(), shape.radius)
}

fn isometry(position: Vec3, rotation: Quat) -> Isometry<Real> {
    let rotation = UnitQuaternion::from_quaternion(Quaternion::new(
        rotation.w, rotation.x, rotation.y, rotation.z,
    ));
    Isometry::from_parts(Translation3::new(position.x, position.y, position.z), rotation)
}

#[inline]
fn to_point(v: Vec3) -> Point<Real> {
    Point::new(v.x, v.y, v.z)
}

#[inline]
fn to_vector(v: Vec3) -> Vector<Real> {
    Vector::new(v.x, v.y, v.z)
}

#[inline]
fn from_point(p: &Point<Real>) -> Vec3 {
    Vec3::new(p.x, p.y, p.z)
}

#[inline]
fn from_vector(v: &Vector<Real>) -> Vec3 {
    Vec3::new(v.x, v.y, v.z)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CAPSULE: CapsuleShape = CapsuleShape {
        radius: 34.0,
        half_height: 88.0,
    };

    fn create_test_world() -> CollisionWorld {
        let mut world = CollisionWorld::new();

        // Floor with its top at z=0
        world.add_box(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(2000.0, 2000.0, 10.0),
            ContentFlags::SOLID,
        );

        // Wall with its face at x=500
        world.add_box(
            Vec3::new(510.0, 0.0, 200.0),
            Vec3::new(10.0, 1000.0, 200.0),
            ContentFlags::SOLID,
        );

        world
    }

    fn sweep(world: &CollisionWorld, start: Vec3, end: Vec3) -> HitResult {
        world.sweep_capsule(start, end, Quat::IDENTITY, CAPSULE, &QueryFilter::default())
    }

    #[test]
    fn test_line_trace_hit() {
        let world = create_test_world();

        let result = world.line_trace(
            Vec3::new(0.0, 0.0, 100.0),
            Vec3::new(1000.0, 0.0, 100.0),
            &QueryFilter::default(),
        );

        assert!(result.is_valid_blocking_hit());
        assert!((result.impact_point.x - 500.0).abs() < 0.01);
        assert!((result.impact_normal - Vec3::NEG_X).length() < 1e-3);
        assert!((result.time - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_line_trace_miss() {
        let world = create_test_world();

        let result = world.line_trace(
            Vec3::new(0.0, 0.0, 100.0),
            Vec3::new(-1000.0, 0.0, 100.0),
            &QueryFilter::default(),
        );

        assert!(!result.blocking_hit);
        assert_eq!(result.time, 1.0);
    }

    #[test]
    fn test_line_trace_from_inside_solid() {
        let world = create_test_world();

        let result = world.line_trace(
            Vec3::new(0.0, 0.0, -5.0),
            Vec3::new(0.0, 0.0, -50.0),
            &QueryFilter::default(),
        );

        assert!(result.blocking_hit);
        assert!(result.start_penetrating);
        assert_eq!(result.time, 0.0);
    }

    #[test]
    fn test_sweep_stops_before_wall() {
        let world = create_test_world();

        let result = sweep(&world, Vec3::new(0.0, 0.0, 100.0), Vec3::new(1000.0, 0.0, 100.0));

        assert!(result.is_valid_blocking_hit());
        assert!(result.time < 1.0);
        // Capsule surface ends up just short of the wall face
        let gap = 500.0 - (result.location.x + CAPSULE.radius);
        assert!(gap > 0.0 && gap < 0.2, "gap was {gap}");
        assert!((result.normal - Vec3::NEG_X).length() < 1e-2);
        assert!((result.impact_normal - Vec3::NEG_X).length() < 1e-2);
    }

    #[test]
    fn test_sweep_down_onto_floor() {
        let world = create_test_world();

        let result = sweep(&world, Vec3::new(0.0, 0.0, 200.0), Vec3::new(0.0, 0.0, 0.0));

        assert!(result.is_valid_blocking_hit());
        let bottom = result.location.z - CAPSULE.half_height;
        assert!(bottom > 0.0 && bottom < 0.2, "bottom was {bottom}");
        assert!(result.normal.z > 0.999);
        assert!(result.impact_normal.z > 0.999);
        assert!(result.impact_point.z.abs() < 0.05);
    }

    #[test]
    fn test_sweep_clear_path() {
        let world = create_test_world();

        let start = Vec3::new(0.0, 0.0, 100.0);
        let end = Vec3::new(200.0, 50.0, 100.0);
        let result = sweep(&world, start, end);

        assert!(!result.blocking_hit);
        assert_eq!(result.time, 1.0);
        assert_eq!(result.location, end);
    }

    #[test]
    fn test_resweep_from_contact_is_immediate() {
        let world = create_test_world();

        let first = sweep(&world, Vec3::new(0.0, 0.0, 100.0), Vec3::new(1000.0, 0.0, 100.0));
        let second = sweep(&world, first.location, first.location + Vec3::new(50.0, 0.0, 0.0));

        assert!(second.is_valid_blocking_hit());
        assert_eq!(second.time, 0.0);
        assert_eq!(second.location, first.location);
    }

    #[test]
    fn test_sweep_starting_in_penetration() {
        let world = create_test_world();

        // Bottom of the capsule 10 units into the floor
        let start = Vec3::new(0.0, 0.0, CAPSULE.half_height - 10.0);
        let result = sweep(&world, start, start + Vec3::new(100.0, 0.0, 0.0));

        assert!(result.blocking_hit);
        assert!(result.start_penetrating);
        assert!(!result.is_valid_blocking_hit());
        assert!(result.normal.z > 0.99);
        assert!((result.penetration_depth - 10.0).abs() < 0.1);
    }

    #[test]
    fn test_deep_overlap_reports_full_depth() {
        let world = create_test_world();

        // Bottom of the capsule 28 units into the floor
        let start = Vec3::new(0.0, 0.0, 60.0);
        let result = sweep(&world, start, start + Vec3::new(0.0, 0.0, -100.0));

        assert!(result.start_penetrating);
        assert_eq!(result.location, start);
        assert!((result.penetration_depth - 28.0).abs() < 0.1, "depth was {}", result.penetration_depth);
        assert!(result.normal.z > 0.99);
    }

    #[test]
    fn test_long_sweep_does_not_pass_through_thin_slab() {
        let mut world = CollisionWorld::new();
        world.add_box(Vec3::new(0.0, 0.0, -1.0), Vec3::new(500.0, 500.0, 1.0), ContentFlags::SOLID);

        let result = sweep(&world, Vec3::new(0.0, 0.0, 400.0), Vec3::new(0.0, 0.0, -400.0));

        assert!(result.is_valid_blocking_hit());
        let bottom = result.location.z - CAPSULE.half_height;
        assert!(bottom > 0.0 && bottom < 0.2, "bottom was {bottom}");
    }

    #[test]
    fn test_resting_contact_blocks_only_inward_motion() {
        let world = create_test_world();

        // Within the contact slop of the floor
        let start = Vec3::new(0.0, 0.0, CAPSULE.half_height - 0.002);

        let down = sweep(&world, start, start + Vec3::new(0.0, 0.0, -10.0));
        assert!(down.is_valid_blocking_hit());
        assert_eq!(down.time, 0.0);

        let up = sweep(&world, start, start + Vec3::new(0.0, 0.0, 10.0));
        assert!(!up.blocking_hit);

        let along = sweep(&world, start, start + Vec3::new(50.0, 0.0, 0.0));
        assert!(!along.blocking_hit);
    }

    #[test]
    fn test_zero_length_sweep_is_overlap_test() {
        let world = create_test_world();

        let free = Vec3::new(0.0, 0.0, 100.0);
        let result = sweep(&world, free, free);
        assert!(!result.blocking_hit);
        assert!(!world.overlaps(free, Quat::IDENTITY, CAPSULE, &QueryFilter::default()));

        let buried = Vec3::new(0.0, 0.0, 50.0);
        let result = sweep(&world, buried, buried);
        assert!(result.start_penetrating);
        assert!(world.overlaps(buried, Quat::IDENTITY, CAPSULE, &QueryFilter::default()));
    }

    #[test]
    fn test_edge_hit_reports_face_normal() {
        let mut world = CollisionWorld::new();
        // Block with its top at z=0 and an edge along x=50
        world.add_box(
            Vec3::new(0.0, 0.0, -10.0),
            Vec3::new(50.0, 50.0, 10.0),
            ContentFlags::SOLID,
        );

        let result = sweep(&world, Vec3::new(70.0, 0.0, 200.0), Vec3::new(70.0, 0.0, 0.0));

        assert!(result.is_valid_blocking_hit());
        // Rounded bottom rests on the edge: the sweep normal tilts outward
        assert!(result.normal.z < 0.95);
        assert!(result.normal.x > 0.3);
        // while the struck face is the flat top
        assert!(result.impact_normal.z > 0.99);
        assert!((result.impact_point.x - 50.0).abs() < 0.5);
        assert!((result.location.z - 81.5).abs() < 0.5);
    }

    #[test]
    fn test_content_mask_filtering() {
        let mut world = CollisionWorld::new();

        world.add_box(
            Vec3::new(300.0, 0.0, 100.0),
            Vec3::new(10.0, 500.0, 100.0),
            ContentFlags::SOLID,
        );
        world.add_box(
            Vec3::new(150.0, 0.0, 100.0),
            Vec3::new(10.0, 500.0, 100.0),
            ContentFlags::TRIGGER,
        );

        let result = world.line_trace(
            Vec3::new(0.0, 0.0, 100.0),
            Vec3::new(1000.0, 0.0, 100.0),
            &QueryFilter::default(),
        );

        // Hits the wall at x=290, not the trigger at x=140
        assert!((result.impact_point.x - 290.0).abs() < 0.01);
    }

    #[test]
    fn test_ignored_object_is_skipped() {
        let mut world = CollisionWorld::new();
        let body = world.add_box(Vec3::new(0.0, 0.0, 100.0), Vec3::splat(40.0), ContentFlags::PAWN_BODY);

        let filter = QueryFilter::ignoring(Some(body));
        let result = world.line_trace(Vec3::new(-200.0, 0.0, 100.0), Vec3::new(200.0, 0.0, 100.0), &filter);
        assert!(!result.blocking_hit);

        let result = world.line_trace(
            Vec3::new(-200.0, 0.0, 100.0),
            Vec3::new(200.0, 0.0, 100.0),
            &QueryFilter::default(),
        );
        assert_eq!(result.object, Some(body));
    }

    #[test]
    fn test_surface_flags_drive_step_and_base_rules() {
        let mut world = create_test_world();
        let crate_id = world.add_box(Vec3::new(100.0, 0.0, 10.0), Vec3::splat(10.0), ContentFlags::SOLID);

        assert!(world.can_step_up_on(crate_id));
        assert!(world.set_surface(crate_id, SurfaceFlags::NO_STEP_UP));
        assert!(!world.can_step_up_on(crate_id));
        assert!(world.can_be_base(crate_id));
        assert!(!world.set_surface(ObjectId(999), SurfaceFlags::NO_BASE));
    }

    #[test]
    fn test_invalid_geometry_is_an_error() {
        let mut world = CollisionWorld::new();

        let result = world.add_convex_hull(&[Vec3::ZERO, Vec3::X], ContentFlags::SOLID);
        assert_eq!(result, Err(WorldError::InvalidConvexHull(2)));

        let hull = world.add_convex_hull(
            &[
                Vec3::ZERO,
                Vec3::new(100.0, 0.0, 0.0),
                Vec3::new(0.0, 100.0, 0.0),
                Vec3::new(0.0, 0.0, 100.0),
            ],
            ContentFlags::SOLID,
        );
        assert!(hull.is_ok());

        let mesh = world.add_triangle_mesh(
            &[
                Vec3::new(-100.0, -100.0, 0.0),
                Vec3::new(100.0, -100.0, 0.0),
                Vec3::new(100.0, 100.0, 0.0),
                Vec3::new(-100.0, 100.0, 0.0),
            ],
            &[[0, 1, 2], [0, 2, 3]],
            ContentFlags::SOLID,
        );
        assert!(mesh.is_ok());
        assert_eq!(world.brush_count(), 2);
    }
}
