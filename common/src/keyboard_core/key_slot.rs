use crate::geometry::Rgb;

/// Base color selector, no behavioral effect except for `Background`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KeyCategory {
    /// letters, digits, punctuation, space
    #[default]
    Alphanumeric,
    Function,
    Modifier,
    Navigation,
    Arrow,
    /// housing plate, never pressed or hit
    Background,
}

impl KeyCategory {
    pub const fn base_color(self) -> Rgb {
        match self {
            Self::Function => Rgb::gray(0.8),
            Self::Modifier => Rgb::new(0.85, 0.85, 0.80),
            Self::Alphanumeric | Self::Navigation | Self::Arrow => Rgb::new(0.93, 0.93, 0.88),
            Self::Background => Rgb::new(0.30, 0.30, 0.32),
        }
    }

    pub const fn is_inert(self) -> bool {
        matches!(self, Self::Background)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct KeySlot {
    pub label: Box<str>,
    /// top-left corner
    pub position: egui::Pos2,
    pub size: egui::Vec2,
    pub category: KeyCategory,
    /// logical state, target of `press_progress`
    pub is_pressed: bool,
    pub keycap_removed: bool,
    /// `0.0` released, `MAX_PRESS_PROGRESS` bottomed out
    pub(crate) press_progress: f32,
}

impl KeySlot {
    pub fn new(
        label: impl Into<Box<str>>,
        position: egui::Pos2,
        size: egui::Vec2,
        category: KeyCategory,
    ) -> Self {
        Self {
            label: label.into(),
            position,
            size,
            category,
            is_pressed: false,
            keycap_removed: false,
            press_progress: 0.0,
        }
    }

    pub fn press_progress(&self) -> f32 {
        self.press_progress
    }

    pub fn rect(&self) -> egui::Rect {
        egui::Rect::from_min_size(self.position, self.size)
    }

    /// closed interval on both axes, shared edges hit both neighbors
    pub fn contains(&self, pos: egui::Pos2) -> bool {
        let min = self.position;
        let max = self.position + self.size;
        min.x <= pos.x && pos.x <= max.x && min.y <= pos.y && pos.y <= max.y
    }

    pub fn translate(&mut self, offset: egui::Vec2) {
        self.position += offset;
    }

    /// Takes over the mutable state of the slot that occupied the same index
    /// before a rebuild.
    pub fn inherit_state(&mut self, old: &KeySlot) {
        self.is_pressed = old.is_pressed;
        self.keycap_removed = old.keycap_removed;
        self.press_progress = old.press_progress;
    }
}
