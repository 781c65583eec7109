//! Movement-mode state machine.
//!
//! A [`MoveContext`] borrows everything one update needs (config, world,
//! gravity, the character state and the event sink) and dispatches to the
//! per-mode movement functions. Mode changes always go through
//! [`MoveContext::set_movement_mode`], which runs exactly one exit hook and
//! one entry hook.

use glam::Vec3;
use log::{debug, warn};

use crate::collision::{CollisionQuery, HitResult, QueryFilter};

use super::config::MovementConfig;
use super::events::MovementEvent;
use super::floor::FloorResult;
use super::state::{MovementMode, MovementState};
use super::vector::flatten;
use super::volume::GravitySource;

/// Mode handoffs allowed within one update (walk -> slide -> walk, ...).
const MAX_MODE_HANDOFFS: u32 = 4;

/// Everything a single movement update reads and writes.
pub(crate) struct MoveContext<'a> {
    pub config: &'a MovementConfig,
    pub world: &'a dyn CollisionQuery,
    pub volume: &'a dyn GravitySource,
    pub filter: QueryFilter,
    pub state: &'a mut MovementState,
    pub events: &'a mut Vec<MovementEvent>,
    /// World-space movement intent, length <= 1.
    pub input: Vec3,
    handoffs: u32,
}

impl<'a> MoveContext<'a> {
    pub fn new(
        config: &'a MovementConfig,
        world: &'a dyn CollisionQuery,
        volume: &'a dyn GravitySource,
        filter: QueryFilter,
        state: &'a mut MovementState,
        events: &'a mut Vec<MovementEvent>,
        input: Vec3,
    ) -> Self {
        Self {
            config,
            world,
            volume,
            filter,
            state,
            events,
            input,
            handoffs: 0,
        }
    }

    /// Scaled gravity along Z.
    pub fn gravity_z(&self) -> f32 {
        self.volume.gravity_z() * self.config.gravity_scale
    }

    /// Run the active mode for `delta_time` seconds.
    pub fn perform_movement(&mut self, delta_time: f32) {
        match self.state.mode {
            MovementMode::Falling => self.perform_fall(delta_time),
            MovementMode::Walking => self.perform_walk(delta_time),
            MovementMode::Sliding => self.perform_slide(delta_time),
        }
    }

    /// Hand the rest of the tick to whatever mode is now active.
    ///
    /// Bounded so a pathological floor can't bounce between modes forever.
    pub fn continue_movement(&mut self, remaining_time: f32) {
        if remaining_time <= 0.0 {
            return;
        }
        if self.handoffs >= MAX_MODE_HANDOFFS {
            warn!(
                "dropping {remaining_time:.4}s of movement after {} mode handoffs",
                self.handoffs
            );
            return;
        }
        self.handoffs += 1;
        self.perform_movement(remaining_time);
    }

    // ========================================================================
    // Transitions
    // ========================================================================

    pub fn set_movement_mode(&mut self, mode: MovementMode) {
        let previous = self.state.mode;
        if previous == mode {
            return;
        }

        self.exit_mode(previous);
        self.state.mode = mode;
        self.enter_mode(mode);

        debug!("movement mode {previous:?} -> {mode:?}");
        self.events.push(MovementEvent::ModeChanged {
            from: previous,
            to: mode,
        });
    }

    fn exit_mode(&mut self, mode: MovementMode) {
        match mode {
            MovementMode::Walking => {
                // Sprinting only makes sense on the ground
                if self.state.is_sprinting {
                    self.set_sprinting(false);
                }
            }
            MovementMode::Falling => {
                self.state.time_in_air = 0.0;
                self.state.initial_jump_velocity = Vec3::ZERO;
            }
            MovementMode::Sliding => {}
        }
    }

    fn enter_mode(&mut self, mode: MovementMode) {
        match mode {
            MovementMode::Falling => {
                self.state.current_floor = FloorResult::default();
                self.state.time_in_air = 0.0;
                self.state.initial_jump_velocity = flatten(self.state.velocity);
            }
            MovementMode::Walking => {
                self.state.velocity.z = 0.0;
                self.adjust_floor_height();
            }
            MovementMode::Sliding => {}
        }
    }

    /// Leave the ground. No-op when already falling.
    pub fn start_falling(&mut self) {
        if !self.state.is_falling() {
            self.set_movement_mode(MovementMode::Falling);
        }
    }

    /// Switch to walking on the current floor. Landing from a fall resets
    /// jump charges and emits [`MovementEvent::Landed`].
    pub fn start_ground_movement(&mut self) {
        if !self.state.current_floor.is_walkable_floor() {
            return;
        }

        if self.state.is_falling() {
            let hit = self.state.current_floor.hit.clone();
            self.notify_landed(hit);
        }

        self.set_movement_mode(MovementMode::Walking);
        self.state.velocity.z = 0.0;
    }

    /// Start sliding on `floor`.
    pub fn start_sliding(&mut self, floor: FloorResult) {
        self.state.slide_floor = floor;
        self.set_movement_mode(MovementMode::Sliding);
    }

    pub fn notify_landed(&mut self, hit: HitResult) {
        debug!("landed after {:.3}s in the air", self.state.time_in_air);
        self.state.jumps_remaining = 1;
        self.events.push(MovementEvent::Landed { hit });
    }

    pub fn set_sprinting(&mut self, sprinting: bool) {
        if sprinting == self.state.is_sprinting {
            return;
        }
        // Sprinting cancels a crouch request
        if sprinting {
            self.state.crouch.wants_to_crouch = false;
        }
        self.state.is_sprinting = sprinting;
        debug!("sprinting: {sprinting}");
    }

    pub fn handle_impact(&mut self, hit: &HitResult) {
        self.events.push(MovementEvent::Impact { hit: hit.clone() });
    }
}
