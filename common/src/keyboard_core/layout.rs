use serde::{Deserialize, Serialize};

use crate::{
    key::Key,
    keyboard_core::key_slot::{KeyCategory, KeySlot},
};

/// Named layout configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// one big key in the middle of the window
    SingleKey,
    /// function row, digits and three letter rows
    #[default]
    Compact,
    /// main block with modifiers, arrows and navigation cluster, fullscreen
    FullSize,
}

impl Profile {
    pub const fn metrics(self) -> KeyMetrics {
        match self {
            Self::SingleKey | Self::FullSize => KeyMetrics {
                key_width: 60.0,
                key_height: 60.0,
                spacing_x: 6.0,
                spacing_y: 6.0,
                depth: 18.0,
            },
            Self::Compact => KeyMetrics {
                key_width: 60.0,
                key_height: 60.0,
                spacing_x: 10.0,
                spacing_y: 10.0,
                depth: 15.0,
            },
        }
    }

    pub const fn is_fullscreen(self) -> bool {
        matches!(self, Self::FullSize)
    }

    const fn is_centered(self) -> bool {
        !matches!(self, Self::Compact)
    }
}

impl std::fmt::Display for Profile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::SingleKey => "single_key",
            Self::Compact => "compact",
            Self::FullSize => "full_size",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyMetrics {
    pub key_width: f32,
    pub key_height: f32,
    pub spacing_x: f32,
    pub spacing_y: f32,
    /// nominal extrusion depth
    pub depth: f32,
}

impl KeyMetrics {
    pub fn pitch_x(&self) -> f32 {
        self.key_width + self.spacing_x
    }

    pub fn pitch_y(&self) -> f32 {
        self.key_height + self.spacing_y
    }
}

/// Physical key to slot index. Every key owns at most one slot and every slot
/// is owned by at most one key.
#[derive(Debug, Clone, PartialEq)]
struct KeyMap {
    map: Box<[Option<usize>; Key::CAP]>,
}

impl KeyMap {
    fn new(bindings: &[(Key, usize)]) -> Self {
        let mut map: Box<[Option<usize>; Key::CAP]> = Box::new([None; Key::CAP]);
        for &(key, index) in bindings {
            let Some(entry) = map.get_mut(key as usize) else {
                continue;
            };
            debug_assert!(entry.is_none(), "{key} bound twice");
            if entry.is_none() {
                *entry = Some(index);
            }
        }
        Self { map }
    }

    fn get(&self, key: Key) -> Option<usize> {
        self.map.get(key as usize).copied().flatten()
    }
}

/// One entry of a row table: label, width in key units, category, bound key.
type RowKey<'a> = (&'a str, f32, KeyCategory, Key);

struct LayoutBuilder {
    metrics: KeyMetrics,
    slots: Vec<KeySlot>,
    bindings: Vec<(Key, usize)>,
}

impl LayoutBuilder {
    fn new(metrics: KeyMetrics) -> Self {
        Self {
            metrics,
            slots: Vec::with_capacity(96),
            bindings: Vec::with_capacity(96),
        }
    }

    fn push_slot(&mut self, slot: KeySlot, key: Key) {
        self.bindings.push((key, self.slots.len()));
        self.slots.push(slot);
    }

    fn add_key(&mut self, (label, units, category, key): RowKey, pos: egui::Pos2) -> f32 {
        let size = egui::vec2(self.metrics.key_width * units, self.metrics.key_height);
        self.push_slot(KeySlot::new(label, pos, size, category), key);
        pos.x + size.x
    }

    /// Lays keys left to right with fixed spacing.
    fn add_row(&mut self, start: egui::Pos2, keys: &[RowKey]) {
        let spacing = self.metrics.spacing_x;
        let mut x = start.x;
        for &key in keys {
            x = self.add_key(key, egui::pos2(x, start.y)) + spacing;
        }
    }

    /// unbound, the key map skips `Unknown`
    fn add_plate(&mut self, rect: egui::Rect) {
        let plate = KeySlot::new("", rect.min, rect.size(), KeyCategory::Background);
        self.push_slot(plate, Key::Unknown);
    }

    /// Bounds of every slot added so far.
    fn bounds(&self) -> egui::Rect {
        self.slots
            .iter()
            .fold(egui::Rect::NOTHING, |bounds, slot| bounds.union(slot.rect()))
    }

    fn translate(&mut self, offset: egui::Vec2) {
        self.slots.iter_mut().for_each(|slot| slot.translate(offset));
    }
}

fn letters(row: &str, category: KeyCategory) -> Vec<RowKey<'_>> {
    row.char_indices()
        .map(|(index, c)| {
            let label = &row[index..index + c.len_utf8()];
            (label, 1.0, category, letter_key(c))
        })
        .collect()
}

fn letter_key(c: char) -> Key {
    use Key::*;
    const LETTERS: [Key; 26] = [
        KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI, KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO,
        KeyP, KeyQ, KeyR, KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,
    ];
    const DIGITS: [Key; 10] = [Key0, Key1, Key2, Key3, Key4, Key5, Key6, Key7, Key8, Key9];
    match c {
        'A'..='Z' => LETTERS[(c as u8 - b'A') as usize],
        '0'..='9' => DIGITS[(c as u8 - b'0') as usize],
        _ => Unknown,
    }
}

const FUNCTION_KEYS: [(&str, Key); 12] = [
    ("F1", Key::F1),
    ("F2", Key::F2),
    ("F3", Key::F3),
    ("F4", Key::F4),
    ("F5", Key::F5),
    ("F6", Key::F6),
    ("F7", Key::F7),
    ("F8", Key::F8),
    ("F9", Key::F9),
    ("F10", Key::F10),
    ("F11", Key::F11),
    ("F12", Key::F12),
];

fn function_row(with_escape: bool) -> Vec<RowKey<'static>> {
    let escape = with_escape.then_some(("Esc", 1.0, KeyCategory::Function, Key::Escape));
    escape
        .into_iter()
        .chain(
            FUNCTION_KEYS
                .iter()
                .map(|&(label, key)| (label, 1.0, KeyCategory::Function, key)),
        )
        .collect()
}

fn build_single_key(builder: &mut LayoutBuilder) {
    let size = egui::vec2(builder.metrics.key_width, builder.metrics.key_height) * 2.0;
    builder.push_slot(
        KeySlot::new("Space", egui::Pos2::ZERO, size, KeyCategory::Alphanumeric),
        Key::Space,
    );
}

fn build_compact(builder: &mut LayoutBuilder) {
    let KeyMetrics {
        spacing_x,
        spacing_y,
        ..
    } = builder.metrics;
    let pitch_x = builder.metrics.pitch_x();
    let pitch_y = builder.metrics.pitch_y();
    let x = spacing_x;
    let mut y = spacing_y;

    builder.add_row(egui::pos2(x, y), &function_row(false));
    y += pitch_y;
    builder.add_row(
        egui::pos2(x, y),
        &letters("1234567890", KeyCategory::Alphanumeric),
    );
    y += pitch_y;
    builder.add_row(
        egui::pos2(x, y),
        &letters("QWERTYUIOP", KeyCategory::Alphanumeric),
    );
    y += pitch_y;
    builder.add_row(
        egui::pos2(x + pitch_x / 2.0, y),
        &letters("ASDFGHJKL", KeyCategory::Alphanumeric),
    );
    y += pitch_y;
    builder.add_row(
        egui::pos2(x + pitch_x, y),
        &letters("ZXCVBNM", KeyCategory::Alphanumeric),
    );
}

/// Returns the bounds of the main block, clusters excluded.
fn build_full_size(builder: &mut LayoutBuilder) -> egui::Rect {
    use KeyCategory::*;
    let metrics = builder.metrics;
    let pitch_y = metrics.pitch_y();
    let mut y = 0.0;

    builder.add_row(egui::pos2(0.0, y), &function_row(true));

    y += pitch_y;
    let mut number_row = vec![("`", 1.0, Alphanumeric, Key::BackTick)];
    number_row.extend(letters("1234567890", Alphanumeric));
    number_row.extend([
        ("-", 1.0, Alphanumeric, Key::Minus),
        ("=", 1.0, Alphanumeric, Key::Equal),
        ("Backspace", 1.5, Modifier, Key::Backspace),
    ]);
    builder.add_row(egui::pos2(0.0, y), &number_row);

    y += pitch_y;
    let mut top_row = letters("QWERTYUIOP", Alphanumeric);
    top_row.extend([
        ("[", 1.0, Alphanumeric, Key::LeftSquareBracket),
        ("]", 1.0, Alphanumeric, Key::RightSquareBracket),
    ]);
    builder.add_row(egui::pos2(0.0, y), &top_row);

    y += pitch_y;
    let mut home_row = letters("ASDFGHJKL", Alphanumeric);
    home_row.extend([
        (";", 1.0, Alphanumeric, Key::Semicolon),
        ("'", 1.0, Alphanumeric, Key::Apostrophe),
    ]);
    builder.add_row(egui::pos2(0.0, y), &home_row);

    y += pitch_y;
    let shift_row_y = y;
    let mut shift_row = vec![("Shift", 1.5, Modifier, Key::LeftShift)];
    shift_row.extend(letters("ZXCVBNM", Alphanumeric));
    shift_row.push(("Shift", 1.5, Modifier, Key::RightShift));
    builder.add_row(egui::pos2(0.0, y), &shift_row);

    y += pitch_y;
    let bottom_row_y = y;
    builder.add_row(
        egui::pos2(0.0, y),
        &[
            ("Ctrl", 1.2, Modifier, Key::LeftControl),
            ("Alt", 1.0, Modifier, Key::LeftAlt),
            ("Space", 6.0, Alphanumeric, Key::Space),
            ("Alt", 1.0, Modifier, Key::RightAlt),
            ("Ctrl", 1.2, Modifier, Key::RightControl),
        ],
    );

    let main_block = builder.bounds();

    // inverted T, its up key sits on the shift row
    let arrow_x = main_block.max.x + metrics.spacing_x * 10.0;
    builder.add_row(
        egui::pos2(arrow_x, bottom_row_y),
        &[
            ("Left", 1.0, Arrow, Key::Left),
            ("Down", 1.0, Arrow, Key::Down),
            ("Right", 1.0, Arrow, Key::Right),
        ],
    );
    builder.add_key(
        ("Up", 1.0, Arrow, Key::Up),
        egui::pos2(arrow_x + metrics.pitch_x(), shift_row_y),
    );

    // 2x3 block, one empty row above the arrow up key
    let nav_lower_y = shift_row_y - 2.0 * pitch_y;
    let nav_upper_y = nav_lower_y - pitch_y;
    builder.add_row(
        egui::pos2(arrow_x, nav_upper_y),
        &[
            ("Ins", 1.0, Navigation, Key::Insert),
            ("Home", 1.0, Navigation, Key::Home),
            ("PgUp", 1.0, Navigation, Key::PageUp),
        ],
    );
    builder.add_row(
        egui::pos2(arrow_x, nav_lower_y),
        &[
            ("Del", 1.0, Navigation, Key::Delete),
            ("End", 1.0, Navigation, Key::End),
            ("PgDn", 1.0, Navigation, Key::PageDown),
        ],
    );

    let plate_margin = metrics.spacing_x * 2.0;
    builder.add_plate(builder.bounds().expand(plate_margin));

    main_block
}

/// Key slots of one profile plus the physical key lookup.
///
/// Geometry is fixed after construction; only the slots' state fields change
/// until the next [`KeyboardState::resize`].
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardState {
    profile: Profile,
    metrics: KeyMetrics,
    screen_size: egui::Vec2,
    slots: Box<[KeySlot]>,
    key_map: KeyMap,
}

impl KeyboardState {
    pub fn new(profile: Profile, screen_size: egui::Vec2) -> Self {
        let metrics = profile.metrics();
        let mut builder = LayoutBuilder::new(metrics);
        let anchor_block = match profile {
            Profile::SingleKey => {
                build_single_key(&mut builder);
                builder.bounds()
            }
            Profile::Compact => {
                build_compact(&mut builder);
                builder.bounds()
            }
            Profile::FullSize => build_full_size(&mut builder),
        };
        if profile.is_centered() {
            let target_min = ((screen_size - anchor_block.size()) / 2.0).to_pos2();
            builder.translate(target_min - anchor_block.min);
        }
        let LayoutBuilder {
            slots, bindings, ..
        } = builder;
        let bindings: Vec<_> = bindings
            .into_iter()
            .filter(|(key, _)| *key != Key::Unknown)
            .collect();
        Self {
            profile,
            metrics,
            screen_size,
            slots: slots.into_boxed_slice(),
            key_map: KeyMap::new(&bindings),
        }
    }

    /// Rebuilds the layout for a new screen size, keeping every slot's state.
    /// Returns `false` when the size did not change.
    pub fn resize(&mut self, screen_size: egui::Vec2) -> bool {
        if self.screen_size == screen_size {
            return false;
        }
        let mut rebuilt = Self::new(self.profile, screen_size);
        rebuilt
            .slots
            .iter_mut()
            .zip(self.slots.iter())
            .for_each(|(new, old)| new.inherit_state(old));
        *self = rebuilt;
        true
    }

    pub fn profile(&self) -> Profile {
        self.profile
    }

    pub fn metrics(&self) -> &KeyMetrics {
        &self.metrics
    }

    pub fn slots(&self) -> &[KeySlot] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [KeySlot] {
        &mut self.slots
    }

    pub fn slot_index(&self, key: Key) -> Option<usize> {
        self.key_map.get(key)
    }

    #[cfg(test)]
    pub(crate) fn slot_mut(&mut self, key: Key) -> Option<&mut KeySlot> {
        let index = self.slot_index(key)?;
        self.slots.get_mut(index)
    }

    /// First slot in iteration order whose closed rectangle contains `pos`.
    pub fn hit_test(&self, pos: egui::Pos2) -> Option<usize> {
        self.slots
            .iter()
            .position(|slot| !slot.category.is_inert() && slot.contains(pos))
    }

    pub fn need_repaint(&self) -> bool {
        self.slots
            .iter()
            .any(|slot| slot.is_pressed || slot.is_animating())
    }
}

#[cfg(test)]
mod tests {

    use super::*;

    const SCREEN: egui::Vec2 = egui::vec2(1920.0, 1080.0);

    fn label_of(state: &KeyboardState, key: Key) -> &str {
        let index = state.slot_index(key).unwrap();
        &state.slots()[index].label
    }

    #[test]
    fn deterministic() {
        for profile in [Profile::SingleKey, Profile::Compact, Profile::FullSize] {
            assert_eq!(
                KeyboardState::new(profile, SCREEN),
                KeyboardState::new(profile, SCREEN)
            );
        }
    }

    #[test]
    fn lookup_is_injective() {
        for profile in [Profile::SingleKey, Profile::Compact, Profile::FullSize] {
            let state = KeyboardState::new(profile, SCREEN);
            let mut seen = std::collections::HashSet::new();
            let bound = (0..Key::CAP)
                .filter_map(|index| state.key_map.map[index])
                .inspect(|slot_index| assert!(seen.insert(*slot_index), "{profile}"))
                .count();
            let live = state
                .slots()
                .iter()
                .filter(|slot| !slot.category.is_inert())
                .count();
            assert_eq!(bound, live, "{profile}");
        }
    }

    #[test]
    fn compact_rows() {
        let state = KeyboardState::new(Profile::Compact, SCREEN);
        assert_eq!(state.slots().len(), 12 + 10 + 10 + 9 + 7);
        let f1 = &state.slots()[state.slot_index(Key::F1).unwrap()];
        assert_eq!(f1.position, egui::pos2(10.0, 10.0));
        assert_eq!(f1.category, KeyCategory::Function);
        let a = &state.slots()[state.slot_index(Key::KeyA).unwrap()];
        assert_eq!(a.position, egui::pos2(10.0 + 35.0, 10.0 + 3.0 * 70.0));
        let z = &state.slots()[state.slot_index(Key::KeyZ).unwrap()];
        assert_eq!(z.position, egui::pos2(10.0 + 70.0, 10.0 + 4.0 * 70.0));
        assert_eq!(label_of(&state, Key::Key0), "0");
        assert_eq!(state.slot_index(Key::Escape), None);
    }

    #[test]
    fn full_size_main_block_is_centered() {
        let state = KeyboardState::new(Profile::FullSize, SCREEN);
        let backspace = &state.slots()[state.slot_index(Key::Backspace).unwrap()];
        let escape = &state.slots()[state.slot_index(Key::Escape).unwrap()];
        // number row: 13 keys of 66 pitch plus a 1.5 wide backspace
        assert_eq!(backspace.rect().max.x - escape.position.x, 948.0);
        assert_eq!(escape.position.x, (1920.0 - 948.0) / 2.0);
        assert_eq!(escape.position.y, (1080.0 - (6.0 * 60.0 + 5.0 * 6.0)) / 2.0);
    }

    #[test]
    fn full_size_clusters() {
        let state = KeyboardState::new(Profile::FullSize, SCREEN);
        let slot = |key| &state.slots()[state.slot_index(key).unwrap()];
        let main_right = slot(Key::Backspace).rect().max.x;
        assert_eq!(slot(Key::Left).position.x, main_right + 60.0);
        assert_eq!(slot(Key::Left).position.y, slot(Key::Space).position.y);
        assert_eq!(slot(Key::Up).position.x, slot(Key::Down).position.x);
        assert_eq!(slot(Key::Up).position.y, slot(Key::KeyZ).position.y);
        assert_eq!(slot(Key::Insert).position.x, slot(Key::Left).position.x);
        assert_eq!(
            slot(Key::Delete).position.y,
            slot(Key::Up).position.y - 2.0 * 66.0
        );
        assert_eq!(
            slot(Key::Home).position.y,
            slot(Key::Delete).position.y - 66.0
        );
        assert_eq!(slot(Key::Space).size.x, 360.0);
        assert_eq!(slot(Key::LeftShift).label, slot(Key::RightShift).label);
    }

    #[test]
    fn full_size_has_inert_plate_last() {
        let state = KeyboardState::new(Profile::FullSize, SCREEN);
        let plate = state.slots().last().unwrap();
        assert_eq!(plate.category, KeyCategory::Background);
        assert!(
            state
                .slots()
                .iter()
                .all(|slot| plate.rect().contains_rect(slot.rect()))
        );
        // plate interior between keys hits nothing
        let gap = egui::pos2(plate.rect().min.x + 1.0, plate.rect().min.y + 1.0);
        assert_eq!(state.hit_test(gap), None);
    }

    #[test]
    fn no_overlap() {
        for profile in [Profile::SingleKey, Profile::Compact, Profile::FullSize] {
            let state = KeyboardState::new(profile, SCREEN);
            let live: Vec<_> = state
                .slots()
                .iter()
                .filter(|slot| !slot.category.is_inert())
                .collect();
            for (i, a) in live.iter().enumerate() {
                for b in &live[i + 1..] {
                    let overlap = a.rect().intersect(b.rect());
                    assert!(overlap.width() <= 0.0 || overlap.height() <= 0.0, "{profile}");
                }
            }
        }
    }

    #[test]
    fn single_key_is_centered() {
        let state = KeyboardState::new(Profile::SingleKey, egui::vec2(400.0, 300.0));
        assert_eq!(state.slots().len(), 1);
        let slot = &state.slots()[0];
        assert_eq!(slot.rect().center(), egui::pos2(200.0, 150.0));
        assert_eq!(slot.size, egui::vec2(120.0, 120.0));
        assert_eq!(state.slot_index(Key::Space), Some(0));
    }

    #[test]
    fn hit_test_first_match_on_shared_edge() {
        let mut builder = LayoutBuilder::new(KeyMetrics {
            spacing_x: 0.0,
            ..Profile::Compact.metrics()
        });
        builder.add_row(
            egui::Pos2::ZERO,
            &[
                ("A", 1.0, KeyCategory::Alphanumeric, Key::KeyA),
                ("B", 1.0, KeyCategory::Alphanumeric, Key::KeyB),
            ],
        );
        let state = KeyboardState {
            profile: Profile::Compact,
            metrics: builder.metrics,
            screen_size: SCREEN,
            key_map: KeyMap::new(&builder.bindings),
            slots: builder.slots.into_boxed_slice(),
        };
        assert_eq!(state.hit_test(egui::pos2(60.0, 30.0)), Some(0));
        assert_eq!(state.hit_test(egui::pos2(60.5, 30.0)), Some(1));
        assert_eq!(state.hit_test(egui::pos2(500.0, 30.0)), None);
    }

    #[test]
    fn resize_keeps_state() {
        let mut state = KeyboardState::new(Profile::FullSize, SCREEN);
        let index = state.slot_index(Key::KeyQ).unwrap();
        state.slots_mut()[index].is_pressed = true;
        state.slots_mut()[index].keycap_removed = true;
        state.slots_mut()[index].advance(1.0);
        let before = state.slots()[index].position;

        assert!(!state.resize(SCREEN));
        assert!(state.resize(egui::vec2(2560.0, 1440.0)));
        let slot = &state.slots()[index];
        assert_ne!(slot.position, before);
        assert!(slot.is_pressed && slot.keycap_removed);
        assert_eq!(slot.press_progress(), 0.5);
    }
}
