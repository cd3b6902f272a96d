//! Reading and writing `settings.ini`.
//!
//! The file holds two independent records in one INI-like text format:
//!
//! ```ini
//! [LastUsed]
//! Preset=Home
//!
//! [Version]
//! LastUsedVersion=0.1.0
//!
//! [Home]
//! CounterWidget Uptime 0.1 0.2 0 1700000000000
//! ```
//!
//! Every non-reserved section is a preset and every line in it is a widget,
//! introduced by its type tag. Each record is read by its own pass over the
//! file. There is no locking; the last writer wins.

use std::fs::File;
use std::io;
use std::io::BufRead;
use std::io::BufReader;
use std::path::Path;
use std::path::PathBuf;

use thiserror::Error;

mod general;
mod line;
mod preset;

pub use general::load_general_settings;
pub use general::save_general_settings;
pub use general::GeneralSettings;
pub use preset::load_widgets;
pub use preset::save_widgets;
pub use preset::PresetLoad;

use line::Sections;

pub const DEFAULT_PRESET: &str = "Default";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    #[error("version mismatch: expected {expected}, found {found}")]
    VersionMismatch { expected: String, found: String },

    #[error(transparent)]
    Io(#[from] io::Error),
}

fn open(path: &Path) -> Result<BufReader<File>, SettingsError> {
    match File::open(path) {
        Ok(file) => Ok(BufReader::new(file)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "settings file does not exist");
            Err(SettingsError::NotFound(path.to_path_buf()))
        }
        Err(err) => Err(err.into()),
    }
}

/// Lines of the file without their `\n`. Bytes that are not UTF-8 are
/// replaced rather than failing the read, so one bad comment costs one line.
fn lines(reader: impl BufRead) -> impl Iterator<Item = io::Result<String>> {
    reader
        .split(b'\n')
        .map(|line| line.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;
    use tempfile::TempDir;

    use super::*;
    use crate::widget::CounterMode;
    use crate::widget::CounterWidget;
    use crate::widget::Position;
    use crate::widget::Widget;
    use crate::widget::WidgetKind;

    const HOME_FILE: &str = "[LastUsed]\nPreset=Home\n\n[Version]\nLastUsedVersion=1.0.0\n\n[Home]\nCounterWidget Uptime 0.1 0.2 0 1700000000000\n";

    fn settings_file(contents: &str) -> (TempDir, PathBuf) {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        fs::write(&path, contents).unwrap();
        (dir, path)
    }

    fn counter(name: &str, mode: CounterMode, start_time: i64) -> Widget {
        CounterWidget::new(name, Position::new(0.25, 0.75), mode, start_time).into()
    }

    fn names(load: PresetLoad) -> Vec<String> {
        load.into_widgets()
            .unwrap_or_default()
            .iter()
            .map(|widget| widget.name().to_string())
            .collect()
    }

    #[test]
    fn loads_last_used_preset_and_its_widgets() {
        let (_dir, path) = settings_file(HOME_FILE);

        let general = load_general_settings(&path, "1.0.0").unwrap();
        assert_eq!(general.last_used_preset, "Home");
        assert_eq!(general.last_used_version.as_deref(), Some("1.0.0"));

        let widgets = load_widgets(&path, "Home").unwrap().into_widgets().unwrap();
        assert_eq!(widgets.len(), 1);

        let Widget::Counter(uptime) = &widgets[0];
        assert_eq!(uptime.name(), "Uptime");
        assert_eq!(uptime.position(), Position::new(0.1, 0.2));
        assert_eq!(uptime.mode(), CounterMode::Seconds);
        assert_eq!(uptime.start_time(), 1_700_000_000_000);
    }

    #[test]
    fn version_mismatch_fails_the_whole_load() {
        let (_dir, path) = settings_file(HOME_FILE);

        let err = load_general_settings(&path, "2.0.0").unwrap_err();
        assert!(matches!(
            err,
            SettingsError::VersionMismatch { ref expected, ref found }
                if expected == "2.0.0" && found == "1.0.0"
        ));
    }

    #[test]
    fn version_mismatch_wins_over_a_later_preset_entry() {
        let (_dir, path) =
            settings_file("[Version]\nLastUsedVersion=0.9.0\n\n[LastUsed]\nPreset=Home\n");

        assert!(matches!(
            load_general_settings(&path, "1.0.0"),
            Err(SettingsError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn non_utf8_bytes_only_affect_their_own_line() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        fs::write(
            &path,
            b"; caf\xe9 kiosk\n[LastUsed]\nPreset=Home\n\n[Version]\nLastUsedVersion=1.0.0\n\n[Home]\n\
              CounterWidget Caf\xe9 0.5 0.5 1 0\nCounterWidget Uptime 0.1 0.2 0 1700000000000\n",
        )
        .unwrap();

        let general = load_general_settings(&path, "1.0.0").unwrap();
        assert_eq!(general.last_used_preset, "Home");

        assert_eq!(
            names(load_widgets(&path, "Home").unwrap()),
            ["Caf\u{FFFD}", "Uptime"]
        );
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ini");

        assert!(matches!(
            load_general_settings(&path, "1.0.0"),
            Err(SettingsError::NotFound(ref missing)) if *missing == path
        ));
        assert!(matches!(
            load_widgets(&path, "Home"),
            Err(SettingsError::NotFound(_))
        ));
    }

    #[test]
    fn unknown_general_keys_and_comments_are_ignored() {
        let (_dir, path) = settings_file(
            "; kiosk settings\n# edited by hand\n[LastUsed]\nTheme=Dark\nPreset=Lobby\nPreset=\n\n[Display]\nPreset=Other\n",
        );

        let general = load_general_settings(&path, "1.0.0").unwrap();
        assert_eq!(general.last_used_preset, "Lobby");
        assert_eq!(general.last_used_version, None);
    }

    #[test]
    fn preset_defaults_when_not_recorded() {
        let (_dir, path) = settings_file("[Version]\nLastUsedVersion=1.0.0\n");

        let general = load_general_settings(&path, "1.0.0").unwrap();
        assert_eq!(general.last_used_preset, DEFAULT_PRESET);
    }

    #[test]
    fn presets_do_not_leak_into_each_other() {
        let (_dir, path) = settings_file(
            "[A]\nCounterWidget OnlyA 0.1 0.1 0 0\n\n[B]\nCounterWidget OnlyB 0.2 0.2 1 0\n\n[A]\nCounterWidget AlsoA 0.3 0.3 2 0\n",
        );

        assert_eq!(names(load_widgets(&path, "A").unwrap()), ["OnlyA", "AlsoA"]);
        assert_eq!(names(load_widgets(&path, "B").unwrap()), ["OnlyB"]);
    }

    #[test]
    fn bad_lines_are_skipped() {
        let (_dir, path) = settings_file(
            "[Home]\nClockWidget Lobby 0.5 0.5 0 0\nCounterWidget Broken 0.5\nCounterWidget Bad 0.1 0.1 9 0\n\nCounterWidget Uptime 0.1 0.2 0 1700000000000\n",
        );

        assert_eq!(names(load_widgets(&path, "Home").unwrap()), ["Uptime"]);
    }

    #[test]
    fn distinguishes_missing_and_empty_presets() {
        let (_dir, path) = settings_file("[Empty]\n; nothing yet\n\n[Broken]\nGaugeWidget g 0 0 0 0\n");

        assert_eq!(load_widgets(&path, "Empty").unwrap(), PresetLoad::Empty);
        assert_eq!(load_widgets(&path, "Broken").unwrap(), PresetLoad::Empty);
        assert_eq!(load_widgets(&path, "Home").unwrap(), PresetLoad::Missing);
    }

    #[test]
    fn save_general_settings_truncates() {
        let (_dir, path) = settings_file(HOME_FILE);

        save_general_settings(&path, "Lobby", "1.0.0").unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[LastUsed]\nPreset=Lobby\n\n[Version]\nLastUsedVersion=1.0.0\n"
        );
        assert_eq!(load_widgets(&path, "Home").unwrap(), PresetLoad::Missing);
    }

    #[test]
    fn save_widgets_appends_a_section() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("settings.ini");
        let widgets = vec![
            counter("Uptime", CounterMode::Seconds, 1_700_000_000_000),
            counter("Since", CounterMode::Days, -5),
        ];

        save_general_settings(&path, "Home", "1.0.0").unwrap();
        save_widgets(&path, "Home", &widgets).unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "[LastUsed]\nPreset=Home\n\n[Version]\nLastUsedVersion=1.0.0\n\n[Home]\n\
             CounterWidget Uptime 0.25 0.75 0 1700000000000\n\
             CounterWidget Since 0.25 0.75 3 -5\n"
        );
        assert_eq!(
            load_general_settings(&path, "1.0.0").unwrap().last_used_preset,
            "Home"
        );
        assert_eq!(
            load_widgets(&path, "Home").unwrap(),
            PresetLoad::Populated(widgets)
        );
    }

    #[test]
    fn repeated_saves_accumulate_sections() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("widgets.ini");
        let widgets = vec![counter("Uptime", CounterMode::Hours, 0)];

        save_widgets(&path, "Home", &widgets).unwrap();
        save_widgets(&path, "Home", &widgets).unwrap();

        assert_eq!(names(load_widgets(&path, "Home").unwrap()), ["Uptime", "Uptime"]);
    }

    #[test]
    fn saving_into_a_missing_directory_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing").join("settings.ini");

        assert!(matches!(
            save_general_settings(&path, "Home", "1.0.0"),
            Err(SettingsError::Io(_))
        ));
        assert!(matches!(save_widgets(&path, "Home", &[]), Err(SettingsError::Io(_))));
    }
}
