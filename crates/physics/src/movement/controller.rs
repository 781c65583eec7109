//! Character movement controller.
//!
//! This is the main entry point for character movement. It takes input
//! commands and advances the movement state through a collision world.

use glam::Vec3;
use log::warn;

use crate::collision::{CollisionQuery, HitResult, ObjectId, QueryFilter};
use crate::error::ConfigError;

use super::config::MovementConfig;
use super::events::MovementEvent;
use super::floor::{FloorFinder, FloorResult};
use super::mode::MoveContext;
use super::state::{CommandButtons, MovementState, PlayerCommand};
use super::step_up::StepDownResult;
use super::volume::{GravitySource, PhysicsVolume};

/// Character movement controller.
///
/// Handles all character movement including:
/// - Walking with ramps and step-ups
/// - Falling with air control
/// - Crouch-sliding down slopes
/// - Jumping, sprinting and crouching
///
/// The controller holds no per-character data; everything it changes lives
/// in [`MovementState`].
///
/// # Example
///
/// ```ignore
/// let controller = CharacterController::new(MovementConfig::default());
/// let mut state = controller.new_state(spawn_position);
/// controller.spawn_at(&mut state, &world, spawn_position);
///
/// // Each frame:
/// let events = controller.update(&mut state, &command, &world, &volume, delta_time);
/// ```
#[derive(Debug, Clone)]
pub struct CharacterController {
    /// Movement configuration.
    pub config: MovementConfig,

    /// The character's own collision body, skipped by every query.
    owner: Option<ObjectId>,
}

impl CharacterController {
    /// Create a new controller with the given configuration.
    pub fn new(config: MovementConfig) -> Self {
        Self { config, owner: None }
    }

    /// Create a controller after checking the configuration.
    pub fn try_new(config: MovementConfig) -> Result<Self, ConfigError> {
        if let Err(err) = config.validate() {
            warn!("rejecting movement config: {err}");
            return Err(err);
        }
        Ok(Self::new(config))
    }

    /// Create a controller with default configuration.
    pub fn with_default_config() -> Self {
        Self::new(MovementConfig::default())
    }

    /// Ignore `owner` in all collision queries.
    pub fn with_owner(mut self, owner: ObjectId) -> Self {
        self.owner = Some(owner);
        self
    }

    pub fn owner(&self) -> Option<ObjectId> {
        self.owner
    }

    /// A fresh, falling state with a standing capsule at `position`.
    pub fn new_state(&self, position: Vec3) -> MovementState {
        MovementState::new(position, &self.config)
    }

    /// Place the character at `location` and settle it onto the floor
    /// beneath, if there is a walkable one.
    pub fn spawn_at(
        &self,
        state: &mut MovementState,
        world: &dyn CollisionQuery,
        location: Vec3,
    ) -> Vec<MovementEvent> {
        state.position = location;
        state.velocity = Vec3::ZERO;

        let volume = PhysicsVolume::default();
        let mut events = Vec::new();
        let mut ctx = self.context(state, world, &volume, &mut events, Vec3::ZERO);

        let floor = ctx.find_floor(location);
        if floor.is_walkable_floor() {
            ctx.state.current_floor = floor;
            ctx.start_ground_movement();
        }

        events
    }

    /// Update character movement for one tick.
    ///
    /// This is the main entry point that should be called each simulation tick.
    /// Returns what happened during the tick, in order.
    ///
    /// # Arguments
    ///
    /// * `state` - The character's movement state (will be modified)
    /// * `command` - The player's input command for this tick
    /// * `world` - Collision queries
    /// * `volume` - Gravity for this character's location
    /// * `delta_time` - Time step in seconds
    pub fn update(
        &self,
        state: &mut MovementState,
        command: &PlayerCommand,
        world: &dyn CollisionQuery,
        volume: &dyn GravitySource,
        delta_time: f32,
    ) -> Vec<MovementEvent> {
        let mut events = Vec::new();
        if delta_time <= 0.0 {
            return events;
        }

        apply_buttons(state, command.buttons);

        let input = state.world_input(command);
        let mut ctx = self.context(state, world, volume, &mut events, input);
        ctx.perform_movement(delta_time);

        events
    }

    /// Floor under the character's current capsule.
    pub fn find_floor(&self, state: &MovementState, world: &dyn CollisionQuery) -> FloorResult {
        FloorFinder::new(&self.config, world, self.filter()).find_floor(
            state.position,
            state.orientation,
            state.capsule,
            state.is_on_ground(),
        )
    }

    /// Try to climb the obstacle in `hit` while moving by `delta`.
    ///
    /// Returns whether the step succeeded along with the events raised on the
    /// way, such as impacts with geometry met while moving forward. See
    /// [`StepDownResult`] for what a successful step reports. A failed
    /// attempt leaves the transform untouched.
    pub fn step_up(
        &self,
        state: &mut MovementState,
        world: &dyn CollisionQuery,
        gravity_dir: Vec3,
        delta: Vec3,
        hit: &HitResult,
        step_down: Option<&mut StepDownResult>,
    ) -> (bool, Vec<MovementEvent>) {
        let volume = PhysicsVolume::default();
        let mut events = Vec::new();
        let mut ctx = self.context(state, world, &volume, &mut events, Vec3::ZERO);
        let stepped = ctx.step_up(gravity_dir, delta, hit, step_down);
        (stepped, events)
    }

    // ========================================================================
    // Private helpers
    // ========================================================================

    fn filter(&self) -> QueryFilter {
        QueryFilter::ignoring(self.owner)
    }

    fn context<'a>(
        &'a self,
        state: &'a mut MovementState,
        world: &'a dyn CollisionQuery,
        volume: &'a dyn GravitySource,
        events: &'a mut Vec<MovementEvent>,
        input: Vec3,
    ) -> MoveContext<'a> {
        MoveContext::new(&self.config, world, volume, self.filter(), state, events, input)
    }
}

/// Turn button edges into persistent requests.
fn apply_buttons(state: &mut MovementState, buttons: CommandButtons) {
    let previous = state.prev_buttons;

    if buttons.just_pressed(previous, CommandButtons::JUMP) {
        state.pending_jump = true;
    }

    if buttons.just_pressed(previous, CommandButtons::CROUCH) {
        state.crouch.wants_to_crouch = true;
    } else if buttons.just_released(previous, CommandButtons::CROUCH) {
        state.crouch.wants_to_crouch = false;
    }

    if buttons.just_pressed(previous, CommandButtons::SPRINT) {
        state.wants_to_sprint = true;
    } else if buttons.just_released(previous, CommandButtons::SPRINT) {
        state.wants_to_sprint = false;
    }

    state.prev_buttons = buttons;
}
