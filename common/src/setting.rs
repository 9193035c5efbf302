use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    error::SettingError, keyboard_core::layout::Profile, message_dialog, u_color32::UColor32,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowSetting {
    pub width: f32,
    pub height: f32,
    pub enable_vsync: bool,
}

impl WindowSetting {
    pub const DEFAULT_WIDTH: f32 = 1280.;
    pub const DEFAULT_HEIGHT: f32 = 720.;
    pub const DEFAULT_ENABLE_VSYNC: bool = true;
}

impl Default for WindowSetting {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            enable_vsync: Self::DEFAULT_ENABLE_VSYNC,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSetting {
    pub font_name: Box<str>,
    pub font_size: f32,
    pub background_color: UColor32,
    pub text_color: UColor32,
}

impl ThemeSetting {
    pub const DEFAULT_FONT_NAME: &str = "DejaVu Sans";
    pub const DEFAULT_FONT_SIZE: f32 = 16.0;
    pub const DEFAULT_BACKGROUND_COLOR: UColor32 = UColor32::TEAL;
    pub const DEFAULT_TEXT_COLOR: UColor32 = UColor32::BLACK;
}

impl Default for ThemeSetting {
    fn default() -> Self {
        Self {
            font_name: Self::DEFAULT_FONT_NAME.into(),
            font_size: Self::DEFAULT_FONT_SIZE,
            background_color: Self::DEFAULT_BACKGROUND_COLOR,
            text_color: Self::DEFAULT_TEXT_COLOR,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SoundSetting {
    pub enabled: bool,
    /// command looked up on `PATH`
    pub engine: Box<str>,
    /// written next to the settings file
    pub script_file_name: Box<str>,
}

impl SoundSetting {
    pub const DEFAULT_ENGINE: &str = "chuck";
    pub const DEFAULT_SCRIPT_FILE_NAME: &str = "temp_chuck.ck";
}

impl Default for SoundSetting {
    fn default() -> Self {
        Self {
            enabled: true,
            engine: Self::DEFAULT_ENGINE.into(),
            script_file_name: Self::DEFAULT_SCRIPT_FILE_NAME.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Setting {
    pub profile: Profile,
    pub window_setting: WindowSetting,
    pub theme: ThemeSetting,
    pub sound_setting: SoundSetting,
}

impl Setting {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, SettingError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| SettingError::Read {
            path: path.into(),
            source,
        })?;
        let reader = std::io::BufReader::new(file);
        serde_json::de::from_reader(reader).map_err(|source| SettingError::Parse {
            path: path.into(),
            source,
        })
    }

    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<(), SettingError> {
        let path = path.as_ref();
        let write_error = |source| SettingError::Write {
            path: path.into(),
            source,
        };
        let file = std::fs::File::create(path).map_err(write_error)?;
        let writer = std::io::BufWriter::new(file);
        serde_json::ser::to_writer_pretty(writer, self)
            .map_err(|err| write_error(std::io::Error::other(err)))
    }

    /// A missing file is replaced by the defaults, anything else that fails
    /// to load is an error.
    pub fn load_or_create(path: impl AsRef<Path>) -> Result<(Self, bool), SettingError> {
        let path = path.as_ref();
        match Self::from_file(path) {
            Ok(setting) => Ok((setting, false)),
            Err(SettingError::Read { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                let setting = Self::default();
                setting.to_file(path)?;
                Ok((setting, true))
            }
            Err(err) => Err(err),
        }
    }

    pub fn load_from_local_setting() -> Result<Self, SettingError> {
        let path = crate::keyboard_setting_path()?;
        match Self::load_or_create(&path) {
            Ok((setting, created)) => {
                if created {
                    warn!("no setting file, defaults written to {}", path.display());
                    message_dialog::warning("No setting file found, a default one was created")
                        .show();
                } else {
                    info!("setting loaded from {}", path.display());
                }
                Ok(setting)
            }
            Err(SettingError::Write { path, source }) => {
                warn!("cannot write default setting to {}: {source}", path.display());
                message_dialog::warning(
                    "No setting file found and none could be created, using defaults",
                )
                .show();
                Ok(Self::default())
            }
            Err(err) => Err(err),
        }
    }
}
