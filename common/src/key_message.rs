use crate::key::Key;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// presses keys, drags across keys
    Primary,
    /// toggles the keycap
    Secondary,
}

/// One raw input event, already stripped of everything the board ignores.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMessage {
    Key {
        key: Key,
        is_pressed: bool,
        is_repeat: bool,
    },
    PointerButton {
        button: PointerButton,
        pos: egui::Pos2,
        is_pressed: bool,
    },
    PointerMoved {
        pos: egui::Pos2,
    },
}

impl InputMessage {
    pub fn key(key: Key, is_pressed: bool) -> Self {
        Self::Key {
            key,
            is_pressed,
            is_repeat: false,
        }
    }

    pub fn from_egui_event(event: &egui::Event) -> Option<Self> {
        let message = match event {
            egui::Event::Key {
                key,
                physical_key,
                pressed,
                repeat,
                ..
            } => Self::Key {
                key: Key::from_egui_key(physical_key.unwrap_or(*key))?,
                is_pressed: *pressed,
                is_repeat: *repeat,
            },
            egui::Event::PointerButton {
                pos,
                button,
                pressed,
                ..
            } => {
                let button = match button {
                    egui::PointerButton::Primary => PointerButton::Primary,
                    egui::PointerButton::Secondary => PointerButton::Secondary,
                    _ => return None,
                };
                Self::PointerButton {
                    button,
                    pos: *pos,
                    is_pressed: *pressed,
                }
            }
            egui::Event::PointerMoved(pos) => Self::PointerMoved { pos: *pos },
            _ => return None,
        };
        Some(message)
    }

    /// Turns the edges between two modifier snapshots into key messages.
    pub fn from_modifiers_change(
        previous: egui::Modifiers,
        current: egui::Modifiers,
    ) -> impl Iterator<Item = Self> {
        Key::from_modifiers(previous)
            .into_iter()
            .zip(Key::from_modifiers(current))
            .filter(|((_, was_pressed), (_, is_pressed))| was_pressed != is_pressed)
            .map(|(_, (key, is_pressed))| Self::key(key, is_pressed))
    }
}
