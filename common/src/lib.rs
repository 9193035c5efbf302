pub mod error;
pub mod geometry;
pub mod key;
pub mod key_message;
pub mod keyboard_app;
pub mod keyboard_core;
pub mod setting;
pub mod u_color32;

mod message_dialog;

use std::{path::PathBuf, process::ExitCode};

use log::error;

use crate::error::{AppError, SettingError};

/// oh, blazing fast!
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

const SETTING_FILE_NAME: &str = "keyboard_setting.json";

/// `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}

fn eframe_native_options(vsync: bool) -> eframe::NativeOptions {
    use eframe::egui_wgpu::{WgpuConfiguration, WgpuSetup, WgpuSetupCreateNew};
    use eframe::wgpu::{PowerPreference, PresentMode};
    eframe::NativeOptions {
        renderer: eframe::Renderer::Wgpu,
        vsync,
        wgpu_options: WgpuConfiguration {
            wgpu_setup: WgpuSetup::CreateNew(WgpuSetupCreateNew {
                power_preference: PowerPreference::HighPerformance,
                ..Default::default()
            }),
            present_mode: if vsync {
                PresentMode::AutoVsync
            } else {
                PresentMode::AutoNoVsync
            },
            ..Default::default()
        },
        ..Default::default()
    }
}

fn current_dir() -> Result<PathBuf, SettingError> {
    std::env::current_dir().map_err(SettingError::CurrentDir)
}

fn keyboard_setting_path() -> Result<PathBuf, SettingError> {
    Ok(current_dir()?.join(SETTING_FILE_NAME))
}

fn script_path(file_name: &str) -> Result<PathBuf, SettingError> {
    Ok(current_dir()?.join(file_name))
}

/// Runs `f`, turning an error or a panic into a logged message, an error
/// dialog and a failing exit code.
pub fn graceful_run(f: impl FnOnce() -> Result<(), AppError>) -> ExitCode {
    let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(AppError::Panic(panic_message(payload.as_ref()))));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err}");
            message_dialog::error(err.to_string()).show();
            ExitCode::FAILURE
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
