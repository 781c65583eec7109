//! Movement state and input structures.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

use crate::collision::CapsuleShape;

use super::config::MovementConfig;
use super::floor::FloorResult;

/// The three ways a character can move. Exactly one is active.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MovementMode {
    /// Airborne under gravity, with limited air control.
    #[default]
    Falling,
    /// On a walkable floor.
    Walking,
    /// Crouch-sliding down (or across) a slidable floor.
    Sliding,
}

impl MovementMode {
    /// Walking and sliding both count as being on the ground.
    #[inline]
    pub fn is_on_ground(self) -> bool {
        matches!(self, Self::Walking | Self::Sliding)
    }
}

/// Crouch request and transition progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CrouchState {
    /// Whether the player is asking to crouch.
    pub wants_to_crouch: bool,

    /// Transition progress (0.0 = standing, 1.0 = fully crouched).
    /// The capsule changes size when this crosses 0.5.
    pub crouch_fraction: f32,
}

impl CrouchState {
    /// Past the halfway point of the transition.
    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.crouch_fraction > 0.5
    }
}

/// Complete movement state for a character.
///
/// This contains everything the controller reads and writes each tick:
/// - Transform, velocity and capsule size
/// - Current mode and the floors it was decided from
/// - Crouch, sprint and jump bookkeeping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementState {
    /// Capsule center in world space.
    pub position: Vec3,

    /// Capsule orientation. Forward is local +X.
    pub orientation: Quat,

    /// Velocity in world space (cm/s).
    pub velocity: Vec3,

    pub mode: MovementMode,

    /// Current capsule. The half-height changes while crouching.
    pub capsule: CapsuleShape,

    /// Standing half-height the capsule returns to after a crouch.
    pub default_half_height: f32,

    pub crouch: CrouchState,

    /// Floor under the character while walking.
    pub current_floor: FloorResult,

    /// Floor under the character while sliding.
    pub slide_floor: FloorResult,

    pub wants_to_sprint: bool,

    pub is_sprinting: bool,

    /// Jumps left before landing again.
    pub jumps_remaining: u32,

    /// Seconds since the current fall began.
    pub time_in_air: f32,

    /// Horizontal velocity at the moment the current fall began.
    pub initial_jump_velocity: Vec3,

    /// A jump press waiting to be consumed.
    pub pending_jump: bool,

    /// Buttons held during the previous update, for edge detection.
    pub prev_buttons: CommandButtons,
}

impl MovementState {
    /// Create a falling character with a standing capsule centered at `position`.
    pub fn new(position: Vec3, config: &MovementConfig) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
            velocity: Vec3::ZERO,
            mode: MovementMode::Falling,
            capsule: config.capsule(),
            default_half_height: config.capsule_half_height,
            crouch: CrouchState::default(),
            current_floor: FloorResult::default(),
            slide_floor: FloorResult::default(),
            wants_to_sprint: false,
            is_sprinting: false,
            jumps_remaining: 1,
            time_in_air: 0.0,
            initial_jump_velocity: Vec3::ZERO,
            pending_jump: false,
            prev_buttons: CommandButtons::default(),
        }
    }

    /// Face along `yaw` radians around the up axis.
    pub fn set_yaw(&mut self, yaw: f32) {
        self.orientation = Quat::from_rotation_z(yaw);
    }

    /// Facing direction.
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// Direction to the character's right.
    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Z).normalize_or_zero()
    }

    /// Rotate actor-local intent into a world-space input vector of length <= 1.
    pub fn world_input(&self, command: &PlayerCommand) -> Vec3 {
        let input = self.forward() * command.forward_move + self.right() * command.right_move;
        input.clamp_length_max(1.0)
    }

    #[inline]
    pub fn is_falling(&self) -> bool {
        self.mode == MovementMode::Falling
    }

    #[inline]
    pub fn is_on_ground(&self) -> bool {
        self.mode.is_on_ground()
    }

    #[inline]
    pub fn is_sliding(&self) -> bool {
        self.mode == MovementMode::Sliding
    }

    #[inline]
    pub fn is_crouching(&self) -> bool {
        self.crouch.is_crouching()
    }

    /// Eye height above the capsule center for the current crouch fraction.
    pub fn eye_height(&self, config: &MovementConfig) -> f32 {
        let frac = self.crouch.crouch_fraction;
        config.eye_height + (config.crouched_eye_height - config.eye_height) * frac
    }

    /// Get the eye position (for camera placement).
    pub fn eye_position(&self, config: &MovementConfig) -> Vec3 {
        self.position + Vec3::Z * self.eye_height(config)
    }

    /// Bottom of the capsule.
    pub fn foot_location(&self) -> Vec3 {
        self.position - Vec3::Z * self.capsule.half_height
    }

    /// Get current horizontal speed.
    pub fn horizontal_speed(&self) -> f32 {
        self.velocity.truncate().length()
    }
}

/// Input command from the player for a single tick.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerCommand {
    /// Forward/backward movement (-1.0 to 1.0).
    /// Positive = forward, negative = backward.
    pub forward_move: f32,

    /// Strafe left/right (-1.0 to 1.0).
    /// Positive = right, negative = left.
    pub right_move: f32,

    /// Buttons held this tick.
    pub buttons: CommandButtons,
}

/// Button state flags for player commands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandButtons(pub u16);

impl CommandButtons {
    /// Jump button.
    pub const JUMP: u16 = 1 << 0;

    /// Crouch button.
    pub const CROUCH: u16 = 1 << 1;

    /// Sprint button.
    pub const SPRINT: u16 = 1 << 2;

    /// Check if a button is pressed.
    #[inline]
    pub fn pressed(self, button: u16) -> bool {
        (self.0 & button) != 0
    }

    /// Press a button.
    #[inline]
    pub fn press(&mut self, button: u16) {
        self.0 |= button;
    }

    /// Release a button.
    #[inline]
    pub fn release(&mut self, button: u16) {
        self.0 &= !button;
    }

    /// Buttons held now but not in `previous`.
    #[inline]
    pub fn just_pressed(self, previous: Self, button: u16) -> bool {
        self.pressed(button) && !previous.pressed(button)
    }

    /// Buttons held in `previous` but not now.
    #[inline]
    pub fn just_released(self, previous: Self, button: u16) -> bool {
        !self.pressed(button) && previous.pressed(button)
    }
}

impl PlayerCommand {
    /// Command with movement intent and no buttons.
    pub fn moving(forward_move: f32, right_move: f32) -> Self {
        Self {
            forward_move,
            right_move,
            buttons: CommandButtons::default(),
        }
    }

    /// Same command with `button` held.
    pub fn with_button(mut self, button: u16) -> Self {
        self.buttons.press(button);
        self
    }
}
