//! Crouch transition.
//!
//! Crouching is a gradual blend: `crouch_fraction` moves toward 1.0 over
//! `time_to_crouch` (faster while sliding) and back toward 0.0 when the
//! request is released. Eye height and max speed follow the fraction, but
//! the capsule only changes size when the fraction crosses 0.5.

use glam::Vec3;
use log::{debug, trace};

use crate::collision::CapsuleShape;

use super::config::CAPSULE_RADIUS_SHRINK;
use super::events::MovementEvent;
use super::mode::MoveContext;

/// The fraction at which the capsule switches size.
const CROUCH_SWITCH_FRACTION: f32 = 0.5;

impl MoveContext<'_> {
    /// Crouching is blocked while sprinting, and while sliding unless the
    /// config allows it.
    pub fn can_crouch(&self) -> bool {
        !self.state.is_sprinting
            && (!self.state.is_sliding() || self.config.allow_crouch_while_sliding)
    }

    /// Whether there is room to grow back to standing height.
    pub fn can_uncrouch(&self) -> bool {
        let standing = self.state.default_half_height;
        let current = self.state.capsule.half_height;
        if current >= standing {
            return true;
        }

        // Test the standing capsule where it would end up: grown upward from
        // the feet on the ground, around the center in the air
        let mut center = self.state.position;
        if self.state.is_on_ground() {
            center.z += standing - current;
        }
        let shape = CapsuleShape::new(self.state.capsule.radius, standing).shrunk(CAPSULE_RADIUS_SHRINK);
        let hit = self
            .world
            .sweep_capsule(center, center, self.state.orientation, shape, &self.filter);
        !hit.start_penetrating
    }

    /// Advance the crouch blend by `delta_time` seconds.
    pub fn tick_crouch(&mut self, delta_time: f32) {
        let crouch = self.state.crouch;

        if crouch.wants_to_crouch && crouch.crouch_fraction < 1.0 && self.can_crouch() {
            let duration = if self.state.is_sliding() {
                self.config.time_to_crouch_sliding
            } else {
                self.config.time_to_crouch
            };

            let fraction = (crouch.crouch_fraction + delta_time / duration).min(1.0);
            self.state.crouch.crouch_fraction = fraction;

            if crouch.crouch_fraction < CROUCH_SWITCH_FRACTION && fraction >= CROUCH_SWITCH_FRACTION {
                self.resize_capsule(self.config.crouched_half_height, true);
            }
            self.notify_eye_height();
        } else if !crouch.wants_to_crouch && crouch.crouch_fraction > 0.0 {
            if !self.can_uncrouch() {
                trace!("uncrouch blocked by geometry above");
                return;
            }

            let fraction = (crouch.crouch_fraction - delta_time / self.config.time_to_crouch).max(0.0);
            self.state.crouch.crouch_fraction = fraction;

            if crouch.crouch_fraction >= CROUCH_SWITCH_FRACTION && fraction < CROUCH_SWITCH_FRACTION {
                let standing = self.state.default_half_height;
                self.resize_capsule(standing, false);
            }
            self.notify_eye_height();
        }
    }

    fn resize_capsule(&mut self, half_height: f32, crouched: bool) {
        let old_half_height = self.state.capsule.half_height;
        self.state.capsule.half_height = half_height;

        // Keep the feet where they were on the ground; in the air the
        // capsule shrinks or grows around its center
        if self.state.is_on_ground() {
            self.state.position.z += half_height - old_half_height;
        }

        debug!("crouched: {crouched} (half height {old_half_height} -> {half_height})");
        self.events.push(MovementEvent::CrouchChanged { crouched });
    }

    fn notify_eye_height(&mut self) {
        let crouch_fraction = self.state.crouch.crouch_fraction;
        let eye_height = self.state.eye_height(self.config);
        self.events.push(MovementEvent::EyeHeightChanged {
            crouch_fraction,
            eye_height,
        });
    }
}
