use std::fs::File;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use super::lines;
use super::open;
use super::Sections;
use super::SettingsError;
use super::DEFAULT_PRESET;
use crate::settings::line::Line;

const LAST_USED: &str = "LastUsed";
const PRESET: &str = "Preset";
const VERSION: &str = "Version";
const LAST_USED_VERSION: &str = "LastUsedVersion";

/// Settings stored once per file, independent of any preset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneralSettings {
    pub last_used_preset: String,
    /// `None` when the file has no version entry; such files are accepted.
    pub last_used_version: Option<String>,
}

/// Reads the `[LastUsed]` and `[Version]` records.
///
/// A stored version that differs from `expected_version` fails the whole load.
pub fn load_general_settings(
    path: &Path,
    expected_version: &str,
) -> Result<GeneralSettings, SettingsError> {
    let reader = open(path)?;
    tracing::info!(path = %path.display(), "settings file loaded");

    let mut settings = GeneralSettings {
        last_used_preset: DEFAULT_PRESET.to_string(),
        last_used_version: None,
    };

    let mut sections = Sections::default();
    for line in lines(reader) {
        let line = line?;
        let Some((section, entry)) = sections.feed(&line) else {
            continue;
        };
        let Some((key, value)) = Line::key_value(entry) else {
            continue;
        };

        match (section, key) {
            (LAST_USED, PRESET) => settings.last_used_preset = value.to_string(),
            (VERSION, LAST_USED_VERSION) => {
                if value != expected_version {
                    tracing::warn!(expected = expected_version, found = value, "version mismatch");
                    return Err(SettingsError::VersionMismatch {
                        expected: expected_version.to_string(),
                        found: value.to_string(),
                    });
                }
                settings.last_used_version = Some(value.to_string());
            }
            _ => {}
        }
    }

    Ok(settings)
}

/// Rewrites the file with only the general settings.
///
/// This truncates: preset sections previously stored in the same file are lost.
pub fn save_general_settings(path: &Path, preset: &str, version: &str) -> Result<(), SettingsError> {
    let mut out = BufWriter::new(File::create(path)?);

    write!(out, "[{LAST_USED}]\n{PRESET}={preset}\n")?;
    write!(out, "\n[{VERSION}]\n{LAST_USED_VERSION}={version}\n")?;
    out.flush()?;

    tracing::debug!(path = %path.display(), preset, version, "general settings saved");
    Ok(())
}
