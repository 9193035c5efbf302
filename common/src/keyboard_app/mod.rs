pub mod keyboard_view;
pub mod scene;

use std::time::Instant;

use egui::ViewportBuilder;
use log::{info, warn};

use crate::{
    error::AppError,
    keyboard_app::keyboard_view::KeyboardView,
    keyboard_core::sound_trigger::{self, SoundTrigger},
    message_dialog,
    setting::{Setting, SoundSetting, WindowSetting},
};

const TITLE: &str = "Mechanical Keyboard";

pub struct KeyboardApp;

impl KeyboardApp {
    pub fn run() -> Result<(), AppError> {
        crate::init_logging();
        let setting = Setting::load_from_local_setting()?;
        let WindowSetting {
            width,
            height,
            enable_vsync,
        } = setting.window_setting;
        let fullscreen = setting.profile.is_fullscreen();
        info!(
            "profile {}, {}",
            setting.profile,
            if fullscreen {
                "fullscreen".to_string()
            } else {
                format!("{width}x{height} window")
            }
        );

        let sound_trigger = Self::prepare_sound(&setting.sound_setting)?;

        let native_options = eframe::NativeOptions {
            viewport: ViewportBuilder::default()
                .with_title(TITLE)
                .with_inner_size([width, height])
                .with_fullscreen(fullscreen),
            ..crate::eframe_native_options(enable_vsync)
        };
        eframe::run_native(
            TITLE,
            native_options,
            Box::new(move |cc| Ok(Box::new(App::new(cc, &setting, sound_trigger)))),
        )?;
        Ok(())
    }

    /// Writes the click script once. A script that cannot be written leaves
    /// the board silent but running.
    fn prepare_sound(sound_setting: &SoundSetting) -> Result<SoundTrigger, AppError> {
        let SoundSetting {
            enabled,
            engine,
            script_file_name,
        } = sound_setting;
        if !enabled {
            info!("sound disabled");
            return Ok(SoundTrigger::disabled());
        }
        let script_path = crate::script_path(script_file_name)?;
        if let Err(err) = sound_trigger::write_script(&script_path) {
            warn!("cannot write {}: {err}", script_path.display());
            message_dialog::warning(format!(
                "Cannot write the sound script {}, key clicks stay silent",
                script_path.display()
            ))
            .show();
            return Ok(SoundTrigger::disabled());
        }
        if let Err(err) = which::which(&**engine) {
            warn!("sound engine {engine:?} not found: {err}");
        }
        Ok(SoundTrigger::new(&**engine, script_path))
    }
}

struct App {
    keyboard_view: KeyboardView,
    started: Instant,
}

impl App {
    fn new(cc: &eframe::CreationContext<'_>, setting: &Setting, sound_trigger: SoundTrigger) -> Self {
        cc.egui_ctx.request_repaint();
        Self {
            keyboard_view: KeyboardView::new(&cc.egui_ctx, setting, sound_trigger),
            started: Instant::now(),
        }
    }
}

impl eframe::App for App {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let instant_now = Instant::now();
        self.keyboard_view.update(ctx, instant_now);
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| self.keyboard_view.show(ui));
        self.keyboard_view
            .need_repaint()
            .then(|| ctx.request_repaint());
    }
}

impl Drop for App {
    fn drop(&mut self) {
        info!("session ended after {:.1?}", self.started.elapsed());
    }
}
