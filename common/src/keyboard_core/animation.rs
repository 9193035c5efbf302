use std::time::Duration;

use crate::keyboard_core::key_slot::KeySlot;

/// seconds a full press or release takes on screen
pub const PRESS_FEEDBACK_DURATION: f32 = 0.15;

/// caps the visual sink at half the nominal depth
pub const MAX_PRESS_PROGRESS: f32 = 0.5;

const PRESS_SPEED: f32 = MAX_PRESS_PROGRESS / PRESS_FEEDBACK_DURATION;

impl KeySlot {
    pub fn target_progress(&self) -> f32 {
        if self.is_pressed {
            MAX_PRESS_PROGRESS
        } else {
            0.0
        }
    }

    /// Moves `press_progress` toward its target at a constant rate, stopping
    /// exactly on the target.
    pub fn advance(&mut self, delta_secs: f32) {
        let target = self.target_progress();
        let step = PRESS_SPEED * delta_secs.max(0.0);
        self.press_progress = if self.press_progress < target {
            (self.press_progress + step).min(target)
        } else {
            (self.press_progress - step).max(target)
        };
    }

    pub fn is_animating(&self) -> bool {
        self.press_progress != self.target_progress()
    }
}

pub fn advance_all(slots: &mut [KeySlot], delta: Duration) {
    let delta_secs = delta.as_secs_f32();
    slots.iter_mut().for_each(|slot| slot.advance(delta_secs));
}
