// SPDX-License-Identifier: MIT
//
// Escape-script interpreter.
//
// A compact notation for structured terminal drawing. A script is a string
// of tokens scanned left to right in one pass. Whitespace between tokens is
// optional.
//
//   'text'        literal text          'text'_N  repeated N times
//   RED           foreground color      RED*      background color
//   -             reset attributes      H         cursor home
//   (R;C)         jump to row R, col C  [BOLD]    palette style
//   tN            flush, pause N ms     bN        erase N cells backwards
//   u d l r       move 1 cell           u5  l*    move 5 / a long way
//
// Any other leading character is read as a motion with no direction, so it
// consumes its magnitude and does nothing.
//
// Parsing and running are separate. `Script::parse` rejects unterminated
// literals, styles and jumps with `MalformedDirective`; `Script::run` checks
// every color and style name against the palette before emitting a single
// byte, so a typo never leaves a half-drawn figure behind.
//
// All output goes through the `Screen`, which keeps the logical cursor and
// colors in step with what the script does.

use std::str::FromStr;

use tracing::debug;

use crate::coord::{Coord, Direction};
use crate::error::{Error, Result};
use crate::palette::Palette;
use crate::screen::Screen;
use crate::timing;

/// Magnitude of a `*` motion: far enough to hit any screen edge.
pub const LONG_MOVE: i32 = 300;

// ─── Directives ──────────────────────────────────────────────────────────────

/// Which color channel a color directive targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    Fg,
    Bg,
}

/// One parsed script token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    Literal { text: String, repeat: u32 },
    Color { name: String, layer: Layer },
    Reset,
    Home,
    Jump(Coord),
    Style(String),
    /// Pause in milliseconds.
    Pause(u64),
    /// Move left N cells and overwrite them with spaces.
    Erase(i32),
    Move { dir: Direction, n: i32 },
}

/// Per-run switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScriptOptions {
    /// Flush after every token and before every pause.
    pub auto_flush: bool,
    /// Treat the first literal as the start of a line (left padding applies).
    pub line_start: bool,
}

impl ScriptOptions {
    #[must_use]
    pub const fn auto_flush(mut self) -> Self {
        self.auto_flush = true;
        self
    }

    #[must_use]
    pub const fn line_start(mut self) -> Self {
        self.line_start = true;
        self
    }
}

// ─── Script ──────────────────────────────────────────────────────────────────

/// A parsed script, ready to run any number of times.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Script {
    directives: Vec<Directive>,
}

impl Script {
    /// Parse a script.
    ///
    /// # Errors
    ///
    /// [`Error::MalformedDirective`] for an unterminated `'literal'`,
    /// `[style]` or `(row;col)`, or a `_` repeat without a count.
    pub fn parse(src: &str) -> Result<Self> {
        let directives = Lexer::new(src).collect::<Result<Vec<_>>>()?;
        Ok(Self { directives })
    }

    #[inline]
    #[must_use]
    pub fn directives(&self) -> &[Directive] {
        &self.directives
    }

    /// Check every color and style name against `palette`.
    ///
    /// # Errors
    ///
    /// The first [`Error::UnknownColorName`] or [`Error::UnknownStyleName`].
    pub fn validate(&self, palette: &Palette) -> Result<()> {
        for directive in &self.directives {
            match directive {
                Directive::Color { name, .. } => {
                    palette.color(name)?;
                }
                Directive::Style(name) => {
                    palette.style(name)?;
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Execute the script on `screen`.
    ///
    /// After each token the output is flushed when `opts.auto_flush` is set,
    /// then the configured inter-token delay (if any) is applied.
    ///
    /// # Errors
    ///
    /// Unknown color/style names (reported before anything is emitted) or
    /// an output failure.
    pub fn run(&self, screen: &mut Screen, opts: ScriptOptions) -> Result<()> {
        self.validate(screen.palette())?;
        debug!(directives = self.directives.len(), ?opts, "run script");

        screen.writer_mut().set_line_start(opts.line_start);
        let delay = screen.config().token_delay;
        let mode = screen.config().delay_mode;

        for directive in &self.directives {
            apply(directive, screen, opts)?;
            if opts.auto_flush {
                screen.flush()?;
            }
            timing::precise_delay(delay, mode);
        }
        Ok(())
    }
}

impl FromStr for Script {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

/// Parse and run `src` in one call.
///
/// # Errors
///
/// Any parse, validation or output error.
pub fn draw(screen: &mut Screen, src: &str, opts: ScriptOptions) -> Result<()> {
    Script::parse(src)?.run(screen, opts)
}

fn apply(directive: &Directive, screen: &mut Screen, opts: ScriptOptions) -> Result<()> {
    match directive {
        Directive::Literal { text, repeat } => {
            for _ in 0..*repeat {
                screen.write(text)?;
            }
            Ok(())
        }
        Directive::Color { name, layer: Layer::Fg } => screen.set_color(Some(name.as_str()), None),
        Directive::Color { name, layer: Layer::Bg } => screen.set_color(None, Some(name.as_str())),
        Directive::Reset => screen.reset_attributes(),
        Directive::Home => screen.home(),
        Directive::Jump(at) => screen.at(*at),
        Directive::Style(name) => screen.set_style(name),
        Directive::Pause(ms) => {
            if opts.auto_flush {
                screen.flush()?;
            }
            timing::precise_delay(timing::millis(*ms), screen.config().delay_mode);
            Ok(())
        }
        Directive::Erase(n) => {
            screen.move_cursor(Direction::LEFT, *n)?;
            screen.write(&" ".repeat(usize::try_from(*n).unwrap_or(0)))
        }
        Directive::Move { dir, n } => screen.move_cursor(*dir, *n),
    }
}

// ─── Lexer ───────────────────────────────────────────────────────────────────

/// Single-pass tokenizer over the script bytes.
///
/// All token delimiters are ASCII, so slicing the source at their byte
/// positions always lands on character boundaries.
struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    #[inline]
    fn bytes(&self) -> &'a [u8] {
        self.src.as_bytes()
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.bytes().get(self.pos).copied()
    }

    fn malformed(offset: usize, reason: &'static str) -> Error {
        Error::MalformedDirective { offset, reason }
    }

    /// Index of the next `close` at or after `from`.
    fn find_byte(&self, from: usize, close: u8) -> Option<usize> {
        self.bytes()[from..]
            .iter()
            .position(|&b| b == close)
            .map(|i| from + i)
    }

    /// Read an optional digit run at the cursor.
    fn number(&mut self) -> u32 {
        let (value, next) = parse_u32_at(self.bytes(), self.pos);
        self.pos = next;
        value
    }

    fn literal(&mut self, start: usize) -> Result<Directive> {
        let close = self
            .find_byte(start + 1, b'\'')
            .ok_or_else(|| Self::malformed(start, "unterminated literal"))?;
        let text = self.src[start + 1..close].to_owned();
        self.pos = close + 1;

        let repeat = if self.peek() == Some(b'_') {
            self.pos += 1;
            if !self.peek().is_some_and(|b| b.is_ascii_digit()) {
                return Err(Self::malformed(self.pos - 1, "repeat count missing"));
            }
            self.number()
        } else {
            1
        };
        Ok(Directive::Literal { text, repeat })
    }

    fn color(&mut self, start: usize) -> Directive {
        let end = self.bytes()[start..]
            .iter()
            .position(|b| !b.is_ascii_uppercase())
            .map_or(self.src.len(), |i| start + i);
        let name = &self.src[start..end];
        self.pos = end;

        let layer = if self.peek() == Some(b'*') {
            self.pos += 1;
            Layer::Bg
        } else if name == "H" {
            return Directive::Home;
        } else {
            Layer::Fg
        };
        Directive::Color {
            name: name.to_owned(),
            layer,
        }
    }

    fn style(&mut self, start: usize) -> Result<Directive> {
        let close = self
            .find_byte(start + 1, b']')
            .ok_or_else(|| Self::malformed(start, "unterminated style"))?;
        let name = self.src[start + 1..close].to_owned();
        self.pos = close + 1;
        Ok(Directive::Style(name))
    }

    /// `(` digits, one separator, digits, `)`.
    fn jump(&mut self, start: usize) -> Result<Directive> {
        const BAD: &str = "expected (row;col)";
        let bytes = self.bytes();

        let (row, sep) = parse_u32_at(bytes, start + 1);
        if sep == start + 1 || sep >= bytes.len() {
            return Err(Self::malformed(start, BAD));
        }
        let (col, close) = parse_u32_at(bytes, sep + 1);
        if close == sep + 1 || bytes.get(close) != Some(&b')') {
            return Err(Self::malformed(start, BAD));
        }
        self.pos = close + 1;

        // The terminal reads 0 as 1; keep the logical cursor honest.
        Ok(Directive::Jump(Coord::new(
            to_i32(row).max(1),
            to_i32(col).max(1),
        )))
    }

    fn motion(&mut self, lead: u8) -> Directive {
        let n = if self.peek() == Some(b'*') {
            self.pos += 1;
            LONG_MOVE
        } else {
            to_i32(self.number())
        };
        let dir = match lead {
            b'u' => Direction::UP,
            b'd' => Direction::DOWN,
            b'r' => Direction::RIGHT,
            b'l' => Direction::LEFT,
            _ => Direction::empty(),
        };
        Directive::Move { dir, n: n.max(1) }
    }
}

impl Iterator for Lexer<'_> {
    type Item = Result<Directive>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.peek()?.is_ascii_whitespace() {
            self.pos += 1;
        }
        let start = self.pos;
        let lead = self.peek()?;
        self.pos += 1;

        let directive = match lead {
            b'\'' => self.literal(start),
            b'[' => self.style(start),
            b'(' => self.jump(start),
            b'-' => Ok(Directive::Reset),
            b't' => Ok(Directive::Pause(u64::from(self.number()))),
            b'b' => Ok(Directive::Erase(to_i32(self.number()))),
            c if c.is_ascii_uppercase() => Ok(self.color(start)),
            c => Ok(self.motion(c)),
        };
        if directive.is_err() {
            // Stop at the first error; the rest of the input is unscannable.
            self.pos = self.src.len();
        }
        Some(directive)
    }
}

/// Parse a u32 from bytes starting at `start`, stopping at non-digit.
/// Returns `(value, next_position)`.
fn parse_u32_at(buf: &[u8], start: usize) -> (u32, usize) {
    let mut val: u32 = 0;
    let mut pos = start;
    while pos < buf.len() && buf[pos].is_ascii_digit() {
        val = val
            .saturating_mul(10)
            .saturating_add(u32::from(buf[pos] - b'0'));
        pos += 1;
    }
    (val, pos)
}

fn to_i32(n: u32) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
