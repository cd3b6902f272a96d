use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

mod background;
mod display;

pub use background::Background;
pub use display::DisplayConfig;
pub use display::Resolution;

pub const APP_NAME: &str = "kiosk";

const SETTINGS_FILE_NAME: &str = "settings.ini";

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Configuration {
    pub background: Background,
    pub display: DisplayConfig,

    /// General settings file. Defaults to `settings.ini` in the configuration directory.
    pub settings_file: Option<PathBuf>,
    /// Widget presets file. Defaults to the general settings file.
    pub widgets_file: Option<PathBuf>,
}

impl Configuration {
    pub fn new() -> Result<Self, ConfigError> {
        Ok(confy::load(APP_NAME, None)?)
    }

    pub fn settings_paths(&self) -> Result<SettingsPaths, ConfigError> {
        let general = match &self.settings_file {
            Some(path) => path.clone(),
            None => settings_dir()?.join(SETTINGS_FILE_NAME),
        };
        let paths = match &self.widgets_file {
            Some(widgets) => SettingsPaths {
                general,
                widgets: widgets.clone(),
            },
            None => SettingsPaths::shared(general),
        };

        Ok(paths)
    }
}

/// Where the two logical settings records live. Both may point at the same file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsPaths {
    pub general: PathBuf,
    pub widgets: PathBuf,
}

impl SettingsPaths {
    pub fn shared(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            general: path.clone(),
            widgets: path,
        }
    }

    pub fn is_shared(&self) -> bool {
        self.general == self.widgets
    }
}

fn settings_dir() -> Result<PathBuf, ConfigError> {
    let config_file = confy::get_configuration_file_path(APP_NAME, None)?;

    config_file
        .parent()
        .map(|dir| dir.to_path_buf())
        .ok_or(ConfigError::NoSettingsDir)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Confy(#[from] confy::ConfyError),

    #[error("could not resolve the settings directory")]
    NoSettingsDir,
}
