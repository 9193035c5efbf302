use serde::{Deserialize, Serialize};

/// Physical keys that can own a slot on the virtual board.
///
/// Identity of a slot comes from this enum, never from its label.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default, Serialize, Deserialize)]
pub enum Key {
    Escape,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    /// ``` `~ ``` key
    BackTick,
    Key1,
    Key2,
    Key3,
    Key4,
    Key5,
    Key6,
    Key7,
    Key8,
    Key9,
    Key0,
    /// `-_` key
    Minus,
    /// `=+` key
    Equal,
    Backspace,
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,
    /// `[{` key
    LeftSquareBracket,
    /// `]}` key
    RightSquareBracket,
    /// `;:` key
    Semicolon,
    /// `'"` key
    Apostrophe,
    Space,
    LeftControl,
    RightControl,
    LeftShift,
    RightShift,
    LeftAlt,
    RightAlt,
    /// `↑` key
    Up,
    /// `↓` key
    Down,
    /// `←` key
    Left,
    /// `→` key
    Right,

    #[default]
    Unknown,
}

impl Key {
    pub const LAST_KEY: Self = Self::Unknown;

    /// number of real keys, `Unknown` excluded
    pub const CAP: usize = Self::LAST_KEY as usize;

    pub fn from_egui_key(key: egui::Key) -> Option<Self> {
        use egui::Key as E;
        use Key::*;
        let key = match key {
            E::Escape => Escape,
            E::F1 => F1,
            E::F2 => F2,
            E::F3 => F3,
            E::F4 => F4,
            E::F5 => F5,
            E::F6 => F6,
            E::F7 => F7,
            E::F8 => F8,
            E::F9 => F9,
            E::F10 => F10,
            E::F11 => F11,
            E::F12 => F12,
            E::Backtick => BackTick,
            E::Num1 => Key1,
            E::Num2 => Key2,
            E::Num3 => Key3,
            E::Num4 => Key4,
            E::Num5 => Key5,
            E::Num6 => Key6,
            E::Num7 => Key7,
            E::Num8 => Key8,
            E::Num9 => Key9,
            E::Num0 => Key0,
            E::Minus => Minus,
            E::Equals | E::Plus => Equal,
            E::Backspace => Backspace,
            E::Insert => Insert,
            E::Delete => Delete,
            E::Home => Home,
            E::End => End,
            E::PageUp => PageUp,
            E::PageDown => PageDown,
            E::A => KeyA,
            E::B => KeyB,
            E::C => KeyC,
            E::D => KeyD,
            E::E => KeyE,
            E::F => KeyF,
            E::G => KeyG,
            E::H => KeyH,
            E::I => KeyI,
            E::J => KeyJ,
            E::K => KeyK,
            E::L => KeyL,
            E::M => KeyM,
            E::N => KeyN,
            E::O => KeyO,
            E::P => KeyP,
            E::Q => KeyQ,
            E::R => KeyR,
            E::S => KeyS,
            E::T => KeyT,
            E::U => KeyU,
            E::V => KeyV,
            E::W => KeyW,
            E::X => KeyX,
            E::Y => KeyY,
            E::Z => KeyZ,
            E::OpenBracket => LeftSquareBracket,
            E::CloseBracket => RightSquareBracket,
            E::Semicolon => Semicolon,
            E::Quote => Apostrophe,
            E::Space => Space,
            E::ArrowUp => Up,
            E::ArrowDown => Down,
            E::ArrowLeft => Left,
            E::ArrowRight => Right,
            _ => return None,
        };
        Some(key)
    }

    /// egui reports modifiers as state only, without a side.
    /// Their edges drive the left-hand slots.
    pub fn from_modifiers(modifiers: egui::Modifiers) -> [(Self, bool); 3] {
        [
            (Self::LeftShift, modifiers.shift),
            (Self::LeftControl, modifiers.ctrl),
            (Self::LeftAlt, modifiers.alt),
        ]
    }
}

impl std::fmt::Display for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}
