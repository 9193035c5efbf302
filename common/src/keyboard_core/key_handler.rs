use crate::{
    key::Key,
    key_message::{InputMessage, PointerButton},
    keyboard_core::layout::KeyboardState,
};

/// Routes raw input to slot state.
///
/// Every method returns the slot that went from released to pressed, which is
/// the only thing that counts as an activation. Key repeats and presses of an
/// already pressed slot never activate.
#[derive(Debug, Default)]
pub struct KeyHandler {
    primary_held: bool,
}

impl KeyHandler {
    pub fn new() -> Self {
        Self::default()
    }

    #[cfg(test)]
    fn primary_held(&self) -> bool {
        self.primary_held
    }

    pub fn update(&mut self, state: &mut KeyboardState, message: InputMessage) -> Option<usize> {
        match message {
            InputMessage::Key {
                key,
                is_pressed,
                is_repeat,
            } => Self::on_key(state, key, is_pressed, is_repeat),
            InputMessage::PointerButton {
                button: PointerButton::Primary,
                pos,
                is_pressed: true,
            } => self.on_primary_down(state, pos),
            InputMessage::PointerButton {
                button: PointerButton::Primary,
                is_pressed: false,
                ..
            } => {
                self.on_primary_up(state);
                None
            }
            InputMessage::PointerButton {
                button: PointerButton::Secondary,
                pos,
                is_pressed: true,
            } => {
                Self::on_secondary_down(state, pos);
                None
            }
            InputMessage::PointerButton {
                button: PointerButton::Secondary,
                is_pressed: false,
                ..
            } => None,
            InputMessage::PointerMoved { pos } => self.on_pointer_moved(state, pos),
        }
    }

    fn on_key(
        state: &mut KeyboardState,
        key: Key,
        is_pressed: bool,
        is_repeat: bool,
    ) -> Option<usize> {
        let index = state.slot_index(key)?;
        let slot = state.slots_mut().get_mut(index)?;
        let was_pressed = std::mem::replace(&mut slot.is_pressed, is_pressed);
        (is_pressed && !was_pressed && !is_repeat).then_some(index)
    }

    fn on_primary_down(&mut self, state: &mut KeyboardState, pos: egui::Pos2) -> Option<usize> {
        self.primary_held = true;
        let index = state.hit_test(pos)?;
        let slot = state.slots_mut().get_mut(index)?;
        let was_pressed = std::mem::replace(&mut slot.is_pressed, true);
        (!was_pressed).then_some(index)
    }

    /// Releases every slot, not only the one under the pointer.
    fn on_primary_up(&mut self, state: &mut KeyboardState) {
        self.primary_held = false;
        state
            .slots_mut()
            .iter_mut()
            .for_each(|slot| slot.is_pressed = false);
    }

    fn on_secondary_down(state: &mut KeyboardState, pos: egui::Pos2) {
        let Some(index) = state.hit_test(pos) else {
            return;
        };
        state
            .slots_mut()
            .get_mut(index)
            .map(|slot| slot.keycap_removed = !slot.keycap_removed);
    }

    /// While dragging, only the slot under the pointer stays pressed.
    fn on_pointer_moved(&mut self, state: &mut KeyboardState, pos: egui::Pos2) -> Option<usize> {
        if !self.primary_held {
            return None;
        }
        let hit = state.hit_test(pos);
        let mut activated = None;
        state
            .slots_mut()
            .iter_mut()
            .enumerate()
            .for_each(|(index, slot)| {
                let is_hit = hit == Some(index);
                if is_hit && !slot.is_pressed {
                    activated = Some(index);
                }
                slot.is_pressed = is_hit;
            });
        activated
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::keyboard_core::layout::Profile;

    fn compact() -> KeyboardState {
        KeyboardState::new(Profile::Compact, egui::vec2(1280.0, 720.0))
    }

    fn center_of(state: &KeyboardState, key: Key) -> egui::Pos2 {
        state.slots()[state.slot_index(key).unwrap()].rect().center()
    }

    fn pressed(state: &KeyboardState) -> Vec<usize> {
        state
            .slots()
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.is_pressed)
            .map(|(index, _)| index)
            .collect()
    }

    fn primary(pos: egui::Pos2, is_pressed: bool) -> InputMessage {
        InputMessage::PointerButton {
            button: PointerButton::Primary,
            pos,
            is_pressed,
        }
    }

    fn secondary(pos: egui::Pos2) -> InputMessage {
        InputMessage::PointerButton {
            button: PointerButton::Secondary,
            pos,
            is_pressed: true,
        }
    }

    #[test]
    fn key_press_and_release() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        let a = state.slot_index(Key::KeyA).unwrap();

        let activations: Vec<_> = [
            InputMessage::key(Key::KeyA, true),
            InputMessage::key(Key::KeyA, false),
        ]
        .into_iter()
        .map(|message| {
            let activation = handler.update(&mut state, message);
            (activation, pressed(&state))
        })
        .collect();

        assert_eq!(activations[0], (Some(a), vec![a]));
        assert_eq!(activations[1], (None, vec![]));
    }

    #[test]
    fn unmapped_key_is_ignored() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        let before = state.clone();
        assert_eq!(
            handler.update(&mut state, InputMessage::key(Key::Escape, true)),
            None
        );
        assert_eq!(state, before);
    }

    #[test]
    fn key_repeat_does_not_activate() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        assert!(
            handler
                .update(&mut state, InputMessage::key(Key::Space, true))
                .is_none()
        );
        let q = state.slot_index(Key::KeyQ).unwrap();
        assert_eq!(
            handler.update(&mut state, InputMessage::key(Key::KeyQ, true)),
            Some(q)
        );
        let repeat = InputMessage::Key {
            key: Key::KeyQ,
            is_pressed: true,
            is_repeat: true,
        };
        assert_eq!(handler.update(&mut state, repeat), None);
        assert_eq!(handler.update(&mut state, repeat), None);
        assert!(state.slots()[q].is_pressed);
    }

    #[test]
    fn pointer_down_presses_only_the_hit_key() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        let w = state.slot_index(Key::KeyW).unwrap();
        let pos = center_of(&state, Key::KeyW);
        let activation = handler.update(&mut state, primary(pos, true));
        assert_eq!(activation, Some(w));
        assert_eq!(pressed(&state), vec![w]);
    }

    #[test]
    fn pointer_down_outside_presses_nothing() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        let activation = handler.update(&mut state, primary(egui::pos2(1200.0, 700.0), true));
        assert_eq!(activation, None);
        assert!(pressed(&state).is_empty());
        assert!(handler.primary_held());
    }

    #[test]
    fn pointer_up_releases_everything() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        handler.update(&mut state, InputMessage::key(Key::KeyA, true));
        handler.update(&mut state, InputMessage::key(Key::KeyS, true));
        let pos = center_of(&state, Key::F5);
        handler.update(&mut state, primary(pos, true));
        assert_eq!(pressed(&state).len(), 3);

        handler.update(&mut state, primary(egui::pos2(1200.0, 700.0), false));
        assert!(pressed(&state).is_empty());
        assert!(!handler.primary_held());
    }

    #[test]
    fn drag_across_keys_activates_once() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        let x = state.slot_index(Key::KeyX).unwrap();
        let c = state.slot_index(Key::KeyC).unwrap();
        let from = center_of(&state, Key::KeyX);
        let to = center_of(&state, Key::KeyC);

        let mut activations = vec![handler.update(&mut state, primary(from, true))];
        for step in 1..=20 {
            let pos = from.lerp(to, step as f32 / 20.0);
            activations.push(handler.update(&mut state, InputMessage::PointerMoved { pos }));
        }
        for _ in 0..5 {
            activations.push(handler.update(&mut state, InputMessage::PointerMoved { pos: to }));
        }

        let activations: Vec<_> = activations.into_iter().flatten().collect();
        assert_eq!(activations, vec![x, c]);
        assert_eq!(pressed(&state), vec![c]);
    }

    #[test]
    fn move_without_button_does_nothing() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        let pos = center_of(&state, Key::KeyE);
        assert_eq!(
            handler.update(&mut state, InputMessage::PointerMoved { pos }),
            None
        );
        assert!(pressed(&state).is_empty());
    }

    #[test]
    fn secondary_toggles_keycap_twice() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        let r = state.slot_index(Key::KeyR).unwrap();
        let pos = center_of(&state, Key::KeyR);

        assert_eq!(handler.update(&mut state, secondary(pos)), None);
        assert!(state.slots()[r].keycap_removed);
        assert!(!state.slots()[r].is_pressed);

        handler.update(&mut state, secondary(pos));
        assert!(!state.slots()[r].keycap_removed);
    }

    #[test]
    fn keycap_and_press_are_independent() {
        let mut state = compact();
        let mut handler = KeyHandler::new();
        let r = state.slot_index(Key::KeyR).unwrap();
        let pos = center_of(&state, Key::KeyR);
        handler.update(&mut state, secondary(pos));
        assert_eq!(
            handler.update(&mut state, InputMessage::key(Key::KeyR, true)),
            Some(r)
        );
        let slot = &state.slots()[r];
        assert!(slot.keycap_removed && slot.is_pressed);
    }
}
