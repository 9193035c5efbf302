#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::process::ExitCode;

use common::keyboard_app::KeyboardApp;

fn main() -> ExitCode {
    common::graceful_run(KeyboardApp::run)
}
