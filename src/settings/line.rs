/// One line of the settings file, as seen by either load pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Line<'a> {
    /// Empty line, or a `;` / `#` comment.
    Skip,
    Header(&'a str),
    Entry(&'a str),
}

impl<'a> Line<'a> {
    pub fn classify(line: &'a str) -> Self {
        let line = line.strip_suffix('\r').unwrap_or(line);

        match line.as_bytes().first() {
            None | Some(b';') | Some(b'#') => Line::Skip,
            // An unterminated header takes the rest of the line as its name.
            Some(b'[') => Line::Header(line[1..].split(']').next().unwrap_or_default()),
            Some(_) => Line::Entry(line),
        }
    }

    /// Splits an entry at its first `=`. Entries without a value are ignored.
    pub fn key_value(entry: &'a str) -> Option<(&'a str, &'a str)> {
        entry
            .split_once('=')
            .filter(|(_, value)| !value.is_empty())
    }
}

/// Tracks the most recent section header while streaming a file.
#[derive(Debug, Default)]
pub struct Sections {
    current: String,
}

impl Sections {
    /// Returns the entry together with its enclosing section, or `None` for
    /// headers and skipped lines.
    pub fn feed<'a>(&mut self, line: &'a str) -> Option<(&str, &'a str)> {
        match Line::classify(line) {
            Line::Skip => None,
            Line::Header(name) => {
                name.clone_into(&mut self.current);
                None
            }
            Line::Entry(entry) => Some((self.current.as_str(), entry)),
        }
    }
}
