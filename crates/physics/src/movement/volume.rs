//! Gravity source for falling and sliding characters.

use serde::{Deserialize, Serialize};

/// Supplies gravity and terminal velocity to the controller.
///
/// The controller scales `gravity_z` by
/// [`MovementConfig::gravity_scale`](super::MovementConfig::gravity_scale).
pub trait GravitySource {
    /// Vertical gravity acceleration (negative pulls down).
    fn gravity_z(&self) -> f32;

    /// Maximum falling speed.
    fn terminal_velocity(&self) -> f32;
}

/// A uniform volume of space with fixed gravity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhysicsVolume {
    pub gravity_z: f32,
    pub terminal_velocity: f32,
}

impl Default for PhysicsVolume {
    fn default() -> Self {
        Self {
            gravity_z: -980.0,
            terminal_velocity: 4000.0,
        }
    }
}

impl GravitySource for PhysicsVolume {
    fn gravity_z(&self) -> f32 {
        self.gravity_z
    }

    fn terminal_velocity(&self) -> f32 {
        self.terminal_velocity
    }
}
