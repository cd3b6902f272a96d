use std::fmt;
use std::io;
use std::io::Write;
use std::str::FromStr;

use tiny_skia::Color;

use crate::render::Canvas;
use crate::render::Drawable;
use crate::render::Frame;
use crate::render::PixelRect;

use super::ParseError;
use super::Position;
use super::WidgetKind;

const MARKER_WIDTH: u32 = 150;
const MARKER_HEIGHT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CounterMode {
    Seconds,
    Minutes,
    Hours,
    Days,
}

impl CounterMode {
    pub const fn unit_millis(self) -> i64 {
        match self {
            CounterMode::Seconds => 1000,
            CounterMode::Minutes => 1000 * 60,
            CounterMode::Hours => 1000 * 60 * 60,
            CounterMode::Days => 1000 * 60 * 60 * 24,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            CounterMode::Seconds => "Seconds",
            CounterMode::Minutes => "Minutes",
            CounterMode::Hours => "Hours",
            CounterMode::Days => "Days",
        }
    }

    pub const fn as_int(self) -> i64 {
        match self {
            CounterMode::Seconds => 0,
            CounterMode::Minutes => 1,
            CounterMode::Hours => 2,
            CounterMode::Days => 3,
        }
    }
}

impl TryFrom<i64> for CounterMode {
    type Error = ParseError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(CounterMode::Seconds),
            1 => Ok(CounterMode::Minutes),
            2 => Ok(CounterMode::Hours),
            3 => Ok(CounterMode::Days),
            other => Err(ParseError::InvalidMode(other)),
        }
    }
}

impl fmt::Display for CounterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Shows how many whole units have passed since `start_time`.
#[derive(Debug, Clone, PartialEq)]
pub struct CounterWidget {
    name: String,
    position: Position,
    mode: CounterMode,
    /// Epoch milliseconds. May be negative or in the future.
    start_time: i64,
}

impl CounterWidget {
    pub fn new(name: impl Into<String>, position: Position, mode: CounterMode, start_time: i64) -> Self {
        Self {
            name: name.into(),
            position,
            mode,
            start_time,
        }
    }

    pub fn mode(&self) -> CounterMode {
        self.mode
    }

    pub fn start_time(&self) -> i64 {
        self.start_time
    }

    pub fn elapsed_millis(&self, now_ms: i64) -> i128 {
        now_ms as i128 - self.start_time as i128
    }

    /// Whole units elapsed at `now_ms`, rounded toward negative infinity.
    pub fn elapsed_count(&self, now_ms: i64) -> i64 {
        // |elapsed| < 2^64 and the smallest unit is 1000, so the quotient fits.
        self.elapsed_millis(now_ms)
            .div_euclid(self.mode.unit_millis() as i128) as i64
    }

    pub fn status_line(&self, now_ms: i64) -> String {
        format!(
            "{} : {} {} elapsed.",
            self.name,
            self.elapsed_count(now_ms),
            self.mode
        )
    }

    fn marker(&self, frame: &Frame) -> PixelRect {
        let (x, y) = self.position.to_pixels(frame.reference);

        PixelRect {
            x,
            y,
            width: MARKER_WIDTH,
            height: MARKER_HEIGHT,
        }
    }
}

impl Drawable for CounterWidget {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &Frame) {
        canvas.fill_rect(self.marker(frame), Color::from_rgba8(0, 255, 0, 255));
        canvas.report(&self.status_line(frame.now_ms));
    }
}

impl WidgetKind for CounterWidget {
    const TAG: &'static str = "CounterWidget";

    fn name(&self) -> &str {
        &self.name
    }

    fn position(&self) -> Position {
        self.position
    }

    fn from_fields(name: &str, fields: &[&str]) -> Result<Self, ParseError> {
        let mut fields = fields.iter().copied();

        let x: f32 = next_field(&mut fields, "x")?;
        let y: f32 = next_field(&mut fields, "y")?;
        let mode: i64 = next_field(&mut fields, "mode")?;
        let start_time: i64 = next_field(&mut fields, "start time")?;

        Ok(Self::new(
            name,
            Position::new(x, y),
            CounterMode::try_from(mode)?,
            start_time,
        ))
    }

    fn write_fields(&self, out: &mut dyn Write) -> io::Result<()> {
        write!(
            out,
            "{} {} {} {}",
            self.position.x,
            self.position.y,
            self.mode.as_int(),
            self.start_time
        )
    }
}

fn next_field<'a, T: FromStr>(
    fields: &mut impl Iterator<Item = &'a str>,
    field: &'static str,
) -> Result<T, ParseError> {
    let value = fields.next().ok_or(ParseError::MissingField(field))?;

    value.parse().map_err(|_| ParseError::InvalidField {
        field,
        value: value.to_string(),
    })
}
