use std::fs::OpenOptions;
use std::io::BufWriter;
use std::io::Write;
use std::path::Path;

use super::lines;
use super::open;
use super::SettingsError;
use crate::settings::line::Line;
use crate::widget::Widget;

/// Outcome of loading one preset's widgets.
#[derive(Debug, Clone, PartialEq)]
pub enum PresetLoad {
    /// No `[preset]` header in the file.
    Missing,
    /// The header exists but no line under it produced a widget.
    Empty,
    Populated(Vec<Widget>),
}

impl PresetLoad {
    #[cfg(test)]
    pub fn into_widgets(self) -> Option<Vec<Widget>> {
        match self {
            PresetLoad::Populated(widgets) => Some(widgets),
            PresetLoad::Missing | PresetLoad::Empty => None,
        }
    }
}

/// Rebuilds the widgets listed under every `[preset]` section, in file order.
///
/// Lines that fail to parse are logged and skipped.
pub fn load_widgets(path: &Path, preset: &str) -> Result<PresetLoad, SettingsError> {
    let reader = open(path)?;

    let mut found = false;
    let mut in_preset = false;
    let mut widgets = Vec::new();

    for (index, line) in lines(reader).enumerate() {
        let line = line?;

        match Line::classify(&line) {
            Line::Skip => {}
            Line::Header(section) => {
                in_preset = section == preset;
                found |= in_preset;
            }
            Line::Entry(entry) if in_preset => {
                let tokens: Vec<&str> = entry.split_whitespace().collect();
                if tokens.is_empty() {
                    continue;
                }

                match Widget::parse(&tokens) {
                    Ok(widget) => {
                        let position = widget.position();
                        tracing::debug!(
                            name = widget.name(),
                            tag = widget.tag(),
                            x = position.x,
                            y = position.y,
                            "widget loaded"
                        );
                        widgets.push(widget);
                    }
                    Err(err) => {
                        tracing::warn!(line = index + 1, preset, "skipping widget line: {err}");
                    }
                }
            }
            Line::Entry(_) => {}
        }
    }

    let load = match (found, widgets.is_empty()) {
        (false, _) => PresetLoad::Missing,
        (true, true) => PresetLoad::Empty,
        (true, false) => PresetLoad::Populated(widgets),
    };

    Ok(load)
}

/// Appends a `[preset]` section holding one line per widget. Never truncates.
pub fn save_widgets(path: &Path, preset: &str, widgets: &[Widget]) -> Result<(), SettingsError> {
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    let mut out = BufWriter::new(file);

    write!(out, "\n[{preset}]\n")?;
    for widget in widgets {
        widget.save(&mut out)?;
    }
    out.flush()?;

    tracing::debug!(path = %path.display(), preset, count = widgets.len(), "widgets saved");
    Ok(())
}
