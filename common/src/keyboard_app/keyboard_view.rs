use std::time::Instant;

use egui::{Color32, CornerRadius, FontData, FontDefinitions, FontFamily, FontId};
use log::{debug, warn};

use crate::{
    key_message::InputMessage,
    keyboard_app::scene::{DrawItem, Scene},
    keyboard_core::{KeyboardCore, sound_trigger::SoundTrigger},
    setting::{Setting, ThemeSetting},
};

/// Everything drawn inside the window: input in, keyboard core step, picture
/// out.
pub struct KeyboardView {
    core: KeyboardCore,
    scene: Scene,
    previous_modifiers: egui::Modifiers,
    background_color: Color32,
    text_color: Color32,
    font_id: FontId,
}

impl KeyboardView {
    pub const FONT_FAMILY_NAME: &str = "keyboard_font";

    pub fn new(egui_ctx: &egui::Context, setting: &Setting, sound_trigger: SoundTrigger) -> Self {
        let ThemeSetting {
            font_name,
            font_size,
            background_color,
            text_color,
        } = &setting.theme;

        Self::init_fonts(egui_ctx, font_name);

        let screen_size = egui_ctx.screen_rect().size();
        let core = KeyboardCore::new(setting.profile, screen_size, sound_trigger, Instant::now());
        Self {
            core,
            scene: Scene::new(),
            previous_modifiers: egui::Modifiers::NONE,
            background_color: (*background_color).into(),
            text_color: (*text_color).into(),
            font_id: FontId::new(
                *font_size,
                FontFamily::Name(Self::FONT_FAMILY_NAME.into()),
            ),
        }
    }

    fn init_fonts(egui_ctx: &egui::Context, font_family: &str) {
        let sys_fonts = font_kit::source::SystemSource::new();
        let mut font_definitions = FontDefinitions::default();
        let font_list = [font_family, ThemeSetting::DEFAULT_FONT_NAME];
        let font_list_iter = font_list.iter().filter_map(|font_family| {
            let Ok(family_handle) = sys_fonts.select_family_by_name(font_family) else {
                debug!("font family {font_family:?} not installed");
                return None;
            };
            let first_font_handle = family_handle.fonts().first()?;
            let is_ttc = match first_font_handle {
                font_kit::handle::Handle::Path { path, .. } => {
                    matches!(
                        font_kit::font::Font::analyze_path(path).ok()?,
                        font_kit::file_type::FileType::Collection(_)
                    )
                }
                _ => return None,
            };
            let font_data = first_font_handle.load().ok()?.copy_font_data()?;
            let font_data = if is_ttc {
                owned_ttf_parser::OwnedFace::from_vec((*font_data).clone(), 0)
                    .ok()?
                    .into_vec()
            } else {
                (*font_data).clone()
            };
            Some((font_data, font_family.to_string()))
        });

        let default_proportional = font_definitions
            .families
            .get(&FontFamily::Proportional)
            .cloned()
            .unwrap_or_default();

        let mut custom_font_names: Vec<_> = font_list_iter
            .map(|(font_data, font_name)| {
                font_definitions
                    .font_data
                    .insert(font_name.clone(), FontData::from_owned(font_data).into());
                font_name
            })
            .collect();
        if custom_font_names.is_empty() {
            warn!("no system font found for {font_family:?}, using the built-in font");
        }
        custom_font_names.extend(default_proportional);
        font_definitions.families.insert(
            FontFamily::Name(Self::FONT_FAMILY_NAME.into()),
            custom_font_names,
        );

        egui_ctx.set_fonts(font_definitions);
    }

    /// Collects this frame's input, steps the core and rebuilds the scene.
    pub fn update(&mut self, egui_ctx: &egui::Context, instant_now: Instant) {
        self.core.resize(egui_ctx.screen_rect().size());
        egui_ctx.input(|input| {
            self.core.extend_messages(InputMessage::from_modifiers_change(
                self.previous_modifiers,
                input.modifiers,
            ));
            self.previous_modifiers = input.modifiers;
            self.core.extend_messages(
                input
                    .events
                    .iter()
                    .filter_map(InputMessage::from_egui_event),
            );
        });
        self.core.update(instant_now);
        self.scene.compose(self.core.state());
    }

    pub fn show(&self, ui: &mut egui::Ui) {
        let painter = ui.painter();
        painter.rect_filled(
            painter.clip_rect(),
            CornerRadius::ZERO,
            self.background_color,
        );
        for item in self.scene.draw_items() {
            match item {
                DrawItem::Mesh(mesh) => {
                    painter.add(egui::Shape::mesh(mesh));
                }
                DrawItem::Label(label) => {
                    let galley = painter.layout_no_wrap(
                        label.text.to_string(),
                        self.font_id.clone(),
                        self.text_color,
                    );
                    let pos = label.center - galley.size() / 2.0;
                    painter.galley(pos, galley, self.text_color);
                }
            }
        }
    }

    pub fn need_repaint(&self) -> bool {
        self.core.need_repaint()
    }
}
