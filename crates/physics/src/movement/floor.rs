//! Floor detection under the character capsule.
//!
//! A floor query first sweeps a slightly thinner capsule straight down. If
//! that sweep starts in penetration or lands on something unwalkable, a
//! line trace from the capsule center gets a second opinion. The result is
//! always built fresh; callers replace their stored floor wholesale.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::{CapsuleShape, CollisionQuery, HitResult, QueryFilter};

use super::config::{
    MovementConfig, CAPSULE_RADIUS_SHRINK, KINDA_SMALL_NUMBER, MAX_FLOOR_DIST, MIN_FLOOR_DIST,
    SWEEP_EDGE_REJECT_DISTANCE,
};
use super::mode::MoveContext;

/// What is under the character.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FloorResult {
    /// Something blocking was found below.
    pub blocking_hit: bool,

    /// That something is walkable.
    pub walkable: bool,

    /// The line trace, not the sweep, decided this result.
    pub line_trace: bool,

    /// Gap between the capsule bottom and the floor, from the sweep.
    pub floor_dist: f32,

    /// Gap measured by the line trace, if one was used.
    pub line_dist: f32,

    /// The hit the result was built from.
    pub hit: HitResult,
}

impl FloorResult {
    /// Build a result from a downward capsule sweep.
    pub fn from_sweep(hit: HitResult, floor_dist: f32, walkable: bool) -> Self {
        Self {
            blocking_hit: hit.is_valid_blocking_hit(),
            walkable,
            line_trace: false,
            floor_dist,
            line_dist: 0.0,
            hit,
        }
    }

    /// Override a sweep result with a line trace's normals and object,
    /// keeping the sweep's timing and contact point.
    pub fn with_line_trace(self, line_hit: HitResult, line_dist: f32, walkable: bool) -> Self {
        if !(self.hit.blocking_hit && line_hit.blocking_hit) {
            return self;
        }

        let hit = HitResult {
            time: self.hit.time,
            impact_point: self.hit.impact_point,
            location: self.hit.location,
            trace_start: self.hit.trace_start,
            trace_end: self.hit.trace_end,
            ..line_hit
        };

        Self {
            blocking_hit: self.blocking_hit,
            walkable,
            line_trace: true,
            floor_dist: self.floor_dist,
            line_dist,
            hit,
        }
    }

    /// Blocking and walkable.
    #[inline]
    pub fn is_walkable_floor(&self) -> bool {
        self.blocking_hit && self.walkable
    }

    /// Gap to the floor from whichever query decided the result.
    #[inline]
    pub fn distance_to_floor(&self) -> f32 {
        if self.line_trace {
            self.line_dist
        } else {
            self.floor_dist
        }
    }

    /// Sweep normal of the floor hit.
    #[inline]
    pub fn normal(&self) -> Vec3 {
        self.hit.normal
    }
}

/// Whether `impact_point` is far enough inside the capsule's footprint to
/// count as support rather than a grazing edge contact.
pub fn is_within_edge_tolerance(capsule_location: Vec3, impact_point: Vec3, radius: f32) -> bool {
    let dist_sq = (impact_point - capsule_location).truncate().length_squared();
    let reduced = (SWEEP_EDGE_REJECT_DISTANCE + KINDA_SMALL_NUMBER).max(radius - SWEEP_EDGE_REJECT_DISTANCE);
    dist_sq < reduced * reduced
}

/// A valid blocking hit on a surface no steeper than `walkable_floor_z`.
pub fn is_walkable_surface(hit: &HitResult, walkable_floor_z: f32) -> bool {
    hit.is_valid_blocking_hit() && hit.object.is_some() && hit.impact_normal.z >= walkable_floor_z
}

/// Runs floor queries for one character configuration.
pub struct FloorFinder<'a> {
    config: &'a MovementConfig,
    world: &'a dyn CollisionQuery,
    filter: QueryFilter,
}

impl<'a> FloorFinder<'a> {
    pub fn new(config: &'a MovementConfig, world: &'a dyn CollisionQuery, filter: QueryFilter) -> Self {
        Self { config, world, filter }
    }

    /// Find the floor under a capsule centered at `location`.
    ///
    /// `on_ground` lengthens the line trace so a walking character keeps
    /// its floor over small dips.
    pub fn find_floor(
        &self,
        location: Vec3,
        rotation: Quat,
        capsule: CapsuleShape,
        on_ground: bool,
    ) -> FloorResult {
        let walkable_z = self.config.walkable_floor_z;

        // Sweep a thinner capsule so walls beside us don't count as floor
        let trace_height = self.config.max_step_height + MAX_FLOOR_DIST;
        let sweep_hit = self.world.sweep_capsule(
            location,
            location - Vec3::Z * trace_height,
            rotation,
            capsule.shrunk(CAPSULE_RADIUS_SHRINK),
            &self.filter,
        );

        let sweep_dist = (sweep_hit.time * trace_height).max(-MAX_FLOOR_DIST);
        let penetrating = sweep_hit.start_penetrating;
        let sweep_blocked = sweep_hit.blocking_hit;
        let sweep_walkable = is_walkable_surface(&sweep_hit, walkable_z);

        let floor = if sweep_blocked {
            FloorResult::from_sweep(sweep_hit, sweep_dist, sweep_walkable)
        } else {
            FloorResult {
                floor_dist: sweep_dist,
                hit: sweep_hit,
                ..FloorResult::default()
            }
        };

        if floor.is_walkable_floor() {
            return floor;
        }
        if !floor.blocking_hit && !penetrating {
            return floor;
        }

        // The sweep was inconclusive: ask a line trace from the center
        let height_check_adjust = if on_ground {
            MAX_FLOOR_DIST + KINDA_SMALL_NUMBER
        } else {
            -MAX_FLOOR_DIST
        };
        let line_trace_dist = MAX_FLOOR_DIST.max(self.config.max_step_height + height_check_adjust);
        let trace_dist = line_trace_dist + capsule.half_height;

        let line_hit = self
            .world
            .line_trace(location, location - Vec3::Z * trace_dist, &self.filter);

        let mut floor = floor;
        if line_hit.blocking_hit && line_hit.time > 0.0 {
            let max_penetration_adjust = MAX_FLOOR_DIST.max(capsule.radius);
            let line_result =
                (line_hit.time * trace_dist - capsule.half_height).max(-max_penetration_adjust);

            floor.blocking_hit = true;
            if line_result <= line_trace_dist && is_walkable_surface(&line_hit, walkable_z) {
                return floor.with_line_trace(line_hit, line_result, true);
            }
        }

        floor.walkable = false;
        floor
    }
}

impl MoveContext<'_> {
    /// Floor under a capsule of the current size at `location`.
    pub fn find_floor(&self, location: Vec3) -> FloorResult {
        FloorFinder::new(self.config, self.world, self.filter).find_floor(
            location,
            self.state.orientation,
            self.state.capsule,
            self.state.is_on_ground(),
        )
    }

    pub fn is_walkable(&self, hit: &HitResult) -> bool {
        is_walkable_surface(hit, self.config.walkable_floor_z)
    }

    /// A hit on an edge whose underlying face may still be a usable floor.
    pub fn should_check_for_valid_landing_spot(&self, hit: &HitResult) -> bool {
        hit.normal.z > KINDA_SMALL_NUMBER
            && !hit.normal.abs_diff_eq(hit.impact_normal, KINDA_SMALL_NUMBER)
            && is_within_edge_tolerance(self.state.position, hit.impact_point, self.state.capsule.radius)
    }

    /// Nudge the capsule vertically so it hovers within the floor band.
    pub fn adjust_floor_height(&mut self) {
        let floor = &self.state.current_floor;
        if !floor.is_walkable_floor() {
            return;
        }

        let mut old_floor_dist = floor.floor_dist;
        if floor.line_trace {
            // The sweep was penetrating but the center trace is happy
            if old_floor_dist < MIN_FLOOR_DIST && floor.line_dist >= MIN_FLOOR_DIST {
                return;
            }
            old_floor_dist = floor.line_dist;
        }

        if (MIN_FLOOR_DIST..=MAX_FLOOR_DIST).contains(&old_floor_dist) {
            return;
        }

        let initial_z = self.state.position.z;
        let avg_floor_dist = (MIN_FLOOR_DIST + MAX_FLOOR_DIST) * 0.5;
        let move_dist = avg_floor_dist - old_floor_dist;
        let hit = self.safe_move(Vec3::Z * move_dist);
        let moved = self.state.position.z - initial_z;

        let mut adjusted = self.state.current_floor.clone();
        if !hit.is_valid_blocking_hit() {
            adjusted.floor_dist += move_dist;
            adjusted.line_dist += move_dist;
        } else if move_dist > 0.0 {
            adjusted.floor_dist += moved;
            adjusted.line_dist += moved;
        } else {
            adjusted.floor_dist = self.state.position.z - hit.location.z;
            if self.is_walkable(&hit) {
                let dist = adjusted.floor_dist;
                adjusted = FloorResult::from_sweep(hit, dist, true);
            }
        }

        self.state.current_floor = adjusted;
    }
}
