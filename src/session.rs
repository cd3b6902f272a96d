use std::fs;
use std::fs::File;

use crate::config::SettingsPaths;
use crate::settings;
use crate::settings::PresetLoad;
use crate::settings::SettingsError;
use crate::settings::DEFAULT_PRESET;
use crate::widget::CounterMode;
use crate::widget::CounterWidget;
use crate::widget::Position;
use crate::widget::Widget;

pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// The active preset and the widgets shown for it.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub preset: String,
    pub widgets: Vec<Widget>,
}

impl Session {
    /// Restores the last used preset, writing fresh general settings when they
    /// are missing or from another version. Never fails: anything that cannot
    /// be loaded is replaced by defaults.
    pub fn restore(paths: &SettingsPaths, version: &str) -> Self {
        ensure_parent_dirs(paths);

        let preset = match settings::load_general_settings(&paths.general, version) {
            Ok(general) => {
                tracing::debug!(version = ?general.last_used_version, "general settings loaded");
                general.last_used_preset
            }
            Err(err) => {
                tracing::info!("creating new settings file: {err}");
                if let Err(err) = settings::save_general_settings(&paths.general, DEFAULT_PRESET, version) {
                    tracing::error!(path = %paths.general.display(), "failed to save settings file: {err}");
                }
                DEFAULT_PRESET.to_string()
            }
        };

        let widgets = match settings::load_widgets(&paths.widgets, &preset) {
            Ok(PresetLoad::Populated(widgets)) => widgets,
            Ok(PresetLoad::Empty) => {
                tracing::info!(preset = %preset, "preset has no widgets, using default widgets");
                default_widgets()
            }
            Ok(PresetLoad::Missing) => {
                tracing::info!(preset = %preset, "no widgets found for preset, using default widgets");
                default_widgets()
            }
            Err(err) => {
                tracing::info!(preset = %preset, "using default widgets: {err}");
                default_widgets()
            }
        };

        Self { preset, widgets }
    }

    /// Writes the general settings, then the active preset's widgets.
    ///
    /// The general save truncates, so it always goes first. Presets other than
    /// the active one do not survive.
    pub fn persist(&self, paths: &SettingsPaths, version: &str) -> Result<(), SettingsError> {
        settings::save_general_settings(&paths.general, &self.preset, version)?;

        if !paths.is_shared() {
            File::create(&paths.widgets)?;
        }
        settings::save_widgets(&paths.widgets, &self.preset, &self.widgets)?;

        tracing::info!(preset = %self.preset, count = self.widgets.len(), "session saved");
        Ok(())
    }
}

pub fn default_widgets() -> Vec<Widget> {
    vec![CounterWidget::new(
        "DefaultCounter",
        Position::new(0.5, 0.5),
        CounterMode::Seconds,
        0,
    )
    .into()]
}

fn ensure_parent_dirs(paths: &SettingsPaths) {
    for path in [&paths.general, &paths.widgets] {
        let Some(dir) = path.parent() else {
            continue;
        };

        if let Err(err) = fs::create_dir_all(dir) {
            tracing::error!(dir = %dir.display(), "failed to create directory: {err}");
        }
    }
}
