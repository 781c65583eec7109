//! Jumping.
//!
//! A jump press is latched until the next movement step consumes it. Jumps
//! spend a charge that landing restores; a short grace period after walking
//! off a ledge still allows the jump.

use log::debug;

use super::events::MovementEvent;
use super::mode::MoveContext;
use super::state::MovementMode;

impl MoveContext<'_> {
    /// Take the latched jump press, if any.
    pub fn consume_jump_input(&mut self) -> bool {
        std::mem::take(&mut self.state.pending_jump)
    }

    pub fn can_jump(&self) -> bool {
        let allowed = match self.state.mode {
            MovementMode::Falling => self.state.time_in_air <= self.config.jump_grace_period,
            MovementMode::Walking => !self.state.is_crouching(),
            MovementMode::Sliding => true,
        };
        allowed && self.state.jumps_remaining > 0
    }

    /// Launch upward and start falling.
    pub fn do_jump(&mut self) {
        self.state.velocity.z = self.config.jump_z_velocity;
        self.start_falling();

        self.state.jumps_remaining = self.state.jumps_remaining.saturating_sub(1);
        debug!("jumped, {} jumps remaining", self.state.jumps_remaining);
        self.events.push(MovementEvent::Jumped);
    }
}
