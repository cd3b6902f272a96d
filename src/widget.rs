use std::io;
use std::io::Write;

use thiserror::Error;

use crate::config::Resolution;
use crate::render::Canvas;
use crate::render::Drawable;
use crate::render::Frame;

pub mod counter;

pub use counter::CounterMode;
pub use counter::CounterWidget;

/// Screen position as a fraction of the display width and height.
///
/// Values outside `0.0..=1.0` are kept as-is and simply land off-screen.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_pixels(self, reference: Resolution) -> (i32, i32) {
        (
            (self.x * reference.width as f32) as i32,
            (self.y * reference.height as f32) as i32,
        )
    }
}

/// Behaviour every persisted widget variant provides.
///
/// A persisted line reads `<TAG> <name> <fields...>`. The codec consumes the
/// tag and the name; a variant only ever sees the fields after them.
pub trait WidgetKind: Drawable + Sized {
    const TAG: &'static str;

    fn name(&self) -> &str;

    fn position(&self) -> Position;

    fn from_fields(name: &str, fields: &[&str]) -> Result<Self, ParseError>;

    /// Writes the fields following the name, space separated, without a newline.
    fn write_fields(&self, out: &mut dyn Write) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub enum Widget {
    Counter(CounterWidget),
}

/// How an empty name is written, since whitespace splitting would drop it.
const EMPTY_NAME: &str = "\"\"";

/// Entry of the tag dispatch table.
pub struct Variant {
    pub tag: &'static str,
    pub parse: fn(&str, &[&str]) -> Result<Widget, ParseError>,
}

/// Every widget type the settings file may contain, looked up by tag.
pub const VARIANTS: &[Variant] = &[Variant {
    tag: CounterWidget::TAG,
    parse: parse_counter,
}];

fn parse_counter(name: &str, fields: &[&str]) -> Result<Widget, ParseError> {
    CounterWidget::from_fields(name, fields).map(Widget::Counter)
}

impl Widget {
    pub fn tag(&self) -> &'static str {
        match self {
            Widget::Counter(_) => CounterWidget::TAG,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Widget::Counter(counter) => counter.name(),
        }
    }

    pub fn position(&self) -> Position {
        match self {
            Widget::Counter(counter) => counter.position(),
        }
    }

    /// Rebuilds a widget from the whitespace separated tokens of one line.
    pub fn parse(tokens: &[&str]) -> Result<Self, ParseError> {
        let (tag, rest) = tokens.split_first().ok_or(ParseError::MissingField("type"))?;

        let variant = VARIANTS
            .iter()
            .find(|variant| variant.tag == *tag)
            .ok_or_else(|| ParseError::UnknownTag(tag.to_string()))?;

        let (name, fields) = rest.split_first().ok_or(ParseError::MissingField("name"))?;
        let name = if *name == EMPTY_NAME { "" } else { *name };

        (variant.parse)(name, fields)
    }

    /// Appends the widget as one newline terminated line.
    pub fn save(&self, out: &mut dyn Write) -> io::Result<()> {
        let name = match self.name() {
            "" => EMPTY_NAME,
            name => name,
        };
        write!(out, "{} {} ", self.tag(), name)?;

        match self {
            Widget::Counter(counter) => counter.write_fields(out)?,
        }

        writeln!(out)
    }

    pub fn render(&self, canvas: &mut dyn Canvas, frame: &Frame) {
        self.draw(canvas, frame);
    }
}

impl Drawable for Widget {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &Frame) {
        match self {
            Widget::Counter(counter) => counter.draw(canvas, frame),
        }
    }
}

impl From<CounterWidget> for Widget {
    fn from(counter: CounterWidget) -> Self {
        Widget::Counter(counter)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown widget type: {0}")]
    UnknownTag(String),

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("invalid {field}: {value:?}")]
    InvalidField { field: &'static str, value: String },

    #[error("counter mode {0} is out of range")]
    InvalidMode(i64),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<&str> {
        line.split_whitespace().collect()
    }

    fn saved(widget: &Widget) -> String {
        let mut out = Vec::new();
        widget.save(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn save_writes_tag_name_and_fields() {
        let widget: Widget =
            CounterWidget::new("Uptime", Position::new(0.1, 0.2), CounterMode::Seconds, 1_700_000_000_000)
                .into();

        assert_eq!(saved(&widget), "CounterWidget Uptime 0.1 0.2 0 1700000000000\n");
    }

    #[test]
    fn saved_line_parses_back_to_the_same_widget() {
        let samples = [
            CounterWidget::new("a", Position::new(0.0, 1.0), CounterMode::Seconds, 0),
            CounterWidget::new("Uptime", Position::new(0.33333334, 0.7), CounterMode::Minutes, -1),
            CounterWidget::new("x_y", Position::new(1.0, 0.0), CounterMode::Hours, i64::MAX),
            CounterWidget::new("b2", Position::new(0.125, 0.999), CounterMode::Days, i64::MIN),
        ];

        for counter in samples {
            let widget = Widget::from(counter);
            let line = saved(&widget);
            assert_eq!(Widget::parse(&tokens(&line)), Ok(widget));
        }
    }

    #[test]
    fn empty_name_survives_a_round_trip() {
        let widget = Widget::from(CounterWidget::new("", Position::new(0.1, 0.2), CounterMode::Seconds, 5));

        let line = saved(&widget);
        assert_eq!(line, "CounterWidget \"\" 0.1 0.2 0 5\n");
        assert_eq!(Widget::parse(&tokens(&line)), Ok(widget));
    }

    #[test]
    fn every_widget_tag_is_registered() {
        let widget = Widget::from(CounterWidget::new("a", Position::default(), CounterMode::Hours, 0));

        assert!(VARIANTS.iter().any(|variant| variant.tag == widget.tag()));
    }

    #[test]
    fn unknown_tag_is_reported_by_name() {
        assert_eq!(
            Widget::parse(&tokens("ClockWidget Lobby 0.1 0.1 0 0")),
            Err(ParseError::UnknownTag("ClockWidget".to_string()))
        );
    }

    #[test]
    fn tag_without_name_is_malformed() {
        assert_eq!(
            Widget::parse(&tokens("CounterWidget")),
            Err(ParseError::MissingField("name"))
        );
        assert_eq!(Widget::parse(&[]), Err(ParseError::MissingField("type")));
    }

    #[test]
    fn every_variant_tag_is_unique() {
        for (i, variant) in VARIANTS.iter().enumerate() {
            assert!(VARIANTS[i + 1..].iter().all(|other| other.tag != variant.tag));
        }
    }

    #[test]
    fn positions_scale_to_the_reference_resolution() {
        let reference = Resolution::new(1024, 600);

        assert_eq!(Position::new(0.5, 0.5).to_pixels(reference), (512, 300));
        assert_eq!(Position::new(0.1, 0.2).to_pixels(reference), (102, 120));
        assert_eq!(Position::new(1.5, -0.5).to_pixels(reference), (1536, -300));
        assert_eq!(Position::new(0.5, 0.5).to_pixels(Resolution::new(1920, 1080)), (960, 540));
    }
}
