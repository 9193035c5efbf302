pub mod animation;
pub mod key_handler;
pub mod key_slot;
pub mod layout;
pub mod sound_trigger;

use std::time::Instant;

use log::debug;

use crate::{
    key_message::InputMessage,
    keyboard_core::{
        key_handler::KeyHandler,
        layout::{KeyboardState, Profile},
        sound_trigger::SoundTrigger,
    },
};

/// One frame step: route the buffered input, fire sounds for activations, then
/// advance every slot's animation.
pub struct KeyboardCore {
    input_messages_buffer: Vec<InputMessage>,
    state: KeyboardState,
    key_handler: KeyHandler,
    sound_trigger: SoundTrigger,
    last_instant: Instant,
}

impl KeyboardCore {
    const DEFAULT_BUFFER_CAPACITY: usize = 64;

    pub fn new(
        profile: Profile,
        screen_size: egui::Vec2,
        sound_trigger: SoundTrigger,
        instant_now: Instant,
    ) -> Self {
        Self {
            input_messages_buffer: Vec::with_capacity(Self::DEFAULT_BUFFER_CAPACITY),
            state: KeyboardState::new(profile, screen_size),
            key_handler: KeyHandler::new(),
            sound_trigger,
            last_instant: instant_now,
        }
    }

    #[cfg(test)]
    fn push_message(&mut self, message: InputMessage) {
        self.input_messages_buffer.push(message);
    }

    pub fn extend_messages(&mut self, messages: impl IntoIterator<Item = InputMessage>) {
        self.input_messages_buffer.extend(messages);
    }

    /// Returns the number of activations in this step.
    pub fn update(&mut self, instant_now: Instant) -> usize {
        let mut activations = 0;
        for message in self.input_messages_buffer.drain(..) {
            let Some(index) = self.key_handler.update(&mut self.state, message) else {
                continue;
            };
            debug!("activated slot {index} ({})", state_label(&self.state, index));
            self.sound_trigger.trigger();
            activations += 1;
        }

        let delta = instant_now.saturating_duration_since(self.last_instant);
        self.last_instant = instant_now;
        animation::advance_all(self.state.slots_mut(), delta);
        activations
    }

    pub fn resize(&mut self, screen_size: egui::Vec2) {
        if self.state.resize(screen_size) {
            debug!(
                "layout {} rebuilt for {}x{}",
                self.state.profile(),
                screen_size.x,
                screen_size.y
            );
        }
    }

    pub fn state(&self) -> &KeyboardState {
        &self.state
    }

    pub fn need_repaint(&self) -> bool {
        !self.input_messages_buffer.is_empty() || self.state.need_repaint()
    }
}

fn state_label(state: &KeyboardState, index: usize) -> &str {
    state
        .slots()
        .get(index)
        .map_or("", |slot| &slot.label)
}
