// SPDX-License-Identifier: MIT
//
// The figure capability.
//
// A figure owns its own visual state (origin plus colors), independent of
// the screen's logical state. Drawing routes through the `Screen` and, unless
// the caller passes an empty `Restore`, brackets itself with save/restore so
// the caller's cursor is where it left it.
//
// Every figure exposes its boundary through `next_point`, an external
// iterator with a cursor inside the figure:
//
//   next_point(false) → Some(p0), Some(p1), ..., None, Some(p0), ...
//   next_point(true)  → None, and the next call starts again at p0
//
// Collision detection is written against that protocol only, so it works
// the same for points, lines, blocks and groups. The cursor is per figure:
// two consumers walking the same figure at once see each other's progress.
// `Boundary` wraps one full pass as a Rust iterator and rewinds the figure
// if the pass is abandoned early.

use std::fmt;

use tcanvas_term::{Coord, Direction, Palette, Restore, Result, Screen, VisualState};

use crate::collision::{self, Axis};

// ─── Colors ──────────────────────────────────────────────────────────────────

/// Optional foreground/background color names.
///
/// `None` means "keep what is there": at construction that is the screen's
/// default foreground and current background, on recolor it is the figure's
/// current color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Colors<'a> {
    pub fg: Option<&'a str>,
    pub bg: Option<&'a str>,
}

impl<'a> Colors<'a> {
    /// Keep both defaults.
    pub const DEFAULT: Self = Self { fg: None, bg: None };

    #[must_use]
    pub const fn new(fg: &'a str, bg: &'a str) -> Self {
        Self {
            fg: Some(fg),
            bg: Some(bg),
        }
    }

    #[must_use]
    pub const fn fg(fg: &'a str) -> Self {
        Self { fg: Some(fg), bg: None }
    }

    #[must_use]
    pub const fn bg(bg: &'a str) -> Self {
        Self { fg: None, bg: Some(bg) }
    }

    /// Fail on the first name `palette` does not know.
    ///
    /// # Errors
    ///
    /// [`tcanvas_term::Error::UnknownColorName`].
    pub fn check(self, palette: &Palette) -> Result<()> {
        for name in [self.fg, self.bg].into_iter().flatten() {
            palette.color(name)?;
        }
        Ok(())
    }

    /// Overwrite the color names in `state` that are set here.
    pub fn apply_to(self, state: &mut VisualState) {
        if let Some(fg) = self.fg {
            state.fg = Some(fg.to_owned());
        }
        if let Some(bg) = self.bg {
            state.bg = Some(bg.to_owned());
        }
    }
}

/// Initial state for a new figure: `vertex` with invalid axes taken from
/// the cursor, colors defaulted from the screen.
pub(crate) fn initial_state(screen: &Screen, vertex: Coord, colors: Colors<'_>) -> VisualState {
    VisualState::new(
        vertex.or(screen.cursor()),
        Some(colors.fg.unwrap_or_else(|| screen.foreground())),
        Some(colors.bg.unwrap_or_else(|| screen.background())),
    )
}

/// Switch to the screen background, for erasing.
pub(crate) fn blank(screen: &mut Screen) -> Result<()> {
    let bg = screen.background().to_owned();
    screen.set_color(None, Some(&bg))
}

/// `n` spaces (empty for `n <= 0`).
pub(crate) fn spaces(n: i32) -> String {
    " ".repeat(usize::try_from(n).unwrap_or(0))
}

// ─── Pattern ─────────────────────────────────────────────────────────────────

/// A repeating fill pattern. Cell `i` shows `chars[i % len]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pattern(Vec<char>);

impl Pattern {
    /// An empty pattern fills with spaces.
    #[must_use]
    pub fn new(pattern: &str) -> Self {
        let chars: Vec<char> = pattern.chars().collect();
        if chars.is_empty() {
            Self(vec![' '])
        } else {
            Self(chars)
        }
    }

    /// The character at cell `i`.
    #[must_use]
    pub fn at(&self, i: i32) -> char {
        let len = i32::try_from(self.0.len()).unwrap_or(i32::MAX);
        let idx = usize::try_from(i.rem_euclid(len)).unwrap_or(0);
        self.0[idx]
    }

    /// Cells `start..start + len` as text.
    #[must_use]
    pub fn run(&self, start: i32, len: i32) -> String {
        (start..start + len).map(|i| self.at(i)).collect()
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

// ─── Figure ──────────────────────────────────────────────────────────────────

/// Something drawable with a boundary.
///
/// `restore` on the drawing methods selects what to put back afterwards.
/// Figures default to [`Restore::COORD`]; pass `Restore::empty()` when you
/// bracket a batch of operations yourself.
pub trait Figure: fmt::Debug {
    /// Logical origin (top-left cell, or the anchor member for a group).
    fn position(&self) -> Coord;

    /// Shift the origin without touching the screen.
    fn translate(&mut self, delta: Coord);

    /// Replace color names without touching the screen.
    fn set_colors(&mut self, colors: Colors<'_>);

    /// Render the figure.
    ///
    /// # Errors
    ///
    /// Unknown color names or output failure.
    fn draw(&self, screen: &mut Screen, restore: Restore) -> Result<()>;

    /// Overwrite every cell of the figure with the screen background.
    ///
    /// # Errors
    ///
    /// Output failure.
    fn clear(&self, screen: &mut Screen, restore: Restore) -> Result<()>;

    /// Advance the boundary cursor. See the module docs for the protocol.
    fn next_point(&mut self, reset: bool) -> Option<Coord>;

    /// Remove the figure from the screen for good: clear its cells and
    /// consume it.
    ///
    /// # Errors
    ///
    /// Output failure.
    fn erase(self: Box<Self>, screen: &mut Screen, restore: Restore) -> Result<()> {
        self.clear(screen, restore)
    }

    /// Clear, translate by `delta`, redraw.
    ///
    /// # Errors
    ///
    /// Output failure or unknown colors.
    fn move_by(&mut self, screen: &mut Screen, delta: Coord, restore: Restore) -> Result<()> {
        screen.preserve(restore, |s| {
            self.clear(s, Restore::empty())?;
            self.translate(delta);
            self.draw(s, Restore::empty())
        })
    }

    /// Move so that [`position`](Self::position) becomes `dest`.
    ///
    /// # Errors
    ///
    /// Output failure or unknown colors.
    fn move_to(&mut self, screen: &mut Screen, dest: Coord, restore: Restore) -> Result<()> {
        let delta = dest - self.position();
        self.move_by(screen, delta, restore)
    }

    /// Recolor and redraw. With `optimize` the screen's own state is not
    /// bracketed; otherwise position and background come back afterwards.
    /// Unknown names are rejected before the figure changes.
    ///
    /// # Errors
    ///
    /// Unknown color names or output failure.
    fn change_color(&mut self, screen: &mut Screen, colors: Colors<'_>, optimize: bool) -> Result<()> {
        colors.check(screen.palette())?;
        self.set_colors(colors);
        let restore = if optimize {
            Restore::empty()
        } else {
            Restore::DEFAULT
        };
        screen.preserve(restore, |s| self.draw(s, Restore::COORD))
    }

    /// One full pass over the boundary, starting from the first point.
    fn boundary(&mut self) -> Boundary<'_, Self>
    where
        Self: Sized,
    {
        Boundary::new(self)
    }

    /// Where the boundary comes within `dist` of the line through `query`.
    fn collides_with_point(&mut self, query: Coord, axis: Axis, dist: i32) -> Direction {
        collision::with_point(self, query, axis, dist)
    }

    /// Sides on which `other` is within `dist` of this figure.
    fn collides_with(&mut self, other: &mut dyn Figure, dist: i32) -> Direction {
        collision::with_figure(self, other, dist)
    }
}

// ─── Boundary ────────────────────────────────────────────────────────────────

/// Iterator over one boundary pass of a figure.
///
/// Creating it rewinds the figure; dropping it before the end rewinds it
/// again, so the next consumer always starts from the first point.
#[derive(Debug)]
pub struct Boundary<'a, F: Figure + ?Sized> {
    figure: &'a mut F,
    done: bool,
}

impl<'a, F: Figure + ?Sized> Boundary<'a, F> {
    #[must_use]
    pub fn new(figure: &'a mut F) -> Self {
        figure.next_point(true);
        Self {
            figure,
            done: false,
        }
    }
}

impl<F: Figure + ?Sized> Iterator for Boundary<'_, F> {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.done {
            return None;
        }
        let point = self.figure.next_point(false);
        self.done = point.is_none();
        point
    }
}

impl<F: Figure + ?Sized> Drop for Boundary<'_, F> {
    fn drop(&mut self) {
        if !self.done {
            self.figure.next_point(true);
        }
    }
}

// ─── Join ────────────────────────────────────────────────────────────────────

/// Draw `ch` on every cell from `from` to `to` inclusive, in the screen's
/// current colors.
///
/// The run must be horizontal, vertical or a 45° diagonal. Any other pair
/// only marks `from`. Position and background are restored afterwards.
///
/// # Errors
///
/// Output failure.
pub fn join(screen: &mut Screen, from: Coord, to: Coord, ch: char) -> Result<()> {
    let delta = to - from;
    let mut buf = [0u8; 4];
    let glyph: &str = ch.encode_utf8(&mut buf);

    screen.preserve(Restore::DEFAULT, |s| {
        if delta.row == 0 {
            let start = if delta.col < 0 { to } else { from };
            s.at(start)?;
            return s.write(&glyph.repeat(usize::try_from(delta.col.abs() + 1).unwrap_or(1)));
        }

        s.at(from)?;
        s.write(glyph)?;
        if delta.col != 0 && delta.col.abs() != delta.row.abs() {
            return Ok(());
        }
        let step = Coord::new(delta.row.signum(), delta.col.signum());
        let mut at = from;
        for _ in 0..delta.row.abs() {
            at += step;
            s.at(at)?;
            s.write(glyph)?;
        }
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Grid;
    use pretty_assertions::assert_eq;

    // ── Colors ──────────────────────────────────────────────────────────

    #[test]
    fn colors_apply_only_set_channels() {
        let mut state = VisualState::new(Coord::HOME, Some("WHITE"), Some("BLACK"));
        Colors::fg("RED").apply_to(&mut state);
        assert_eq!(state.fg(), Some("RED"));
        assert_eq!(state.bg(), Some("BLACK"));
        Colors::DEFAULT.apply_to(&mut state);
        assert_eq!(state.fg(), Some("RED"));
    }

    #[test]
    fn initial_state_fills_from_screen() {
        let (mut screen, _grid) = Grid::screen();
        screen.at(Coord::new(7, 3)).unwrap();
        let state = initial_state(&screen, Coord::new(-1, 9), Colors::bg("BLUE"));
        assert_eq!(state.coord, Coord::new(7, 9));
        assert_eq!(state.fg(), Some("WHITE"));
        assert_eq!(state.bg(), Some("BLUE"));
    }

    // ── Pattern ─────────────────────────────────────────────────────────

    #[test]
    fn pattern_repeats() {
        let p = Pattern::new("ab");
        assert_eq!(p.run(0, 5), "ababa");
        assert_eq!(p.run(1, 3), "bab");
        assert_eq!(p.at(-1), 'b');
    }

    #[test]
    fn empty_pattern_is_blank() {
        assert_eq!(Pattern::new("").run(0, 3), "   ");
        assert_eq!(Pattern::from("#=").to_string(), "#=");
    }

    // ── Join ────────────────────────────────────────────────────────────

    #[test]
    fn join_horizontal_either_direction() {
        let (mut screen, grid) = Grid::screen();
        join(&mut screen, Coord::new(2, 5), Coord::new(2, 8), '#').unwrap();
        join(&mut screen, Coord::new(4, 8), Coord::new(4, 6), '=').unwrap();
        screen.flush().unwrap();
        assert_eq!(grid.row(2), "    ####");
        assert_eq!(grid.row(4), "     ===");
        assert_eq!(screen.cursor(), Coord::HOME);
    }

    #[test]
    fn join_vertical_and_diagonal() {
        let (mut screen, grid) = Grid::screen();
        join(&mut screen, Coord::new(1, 1), Coord::new(3, 1), '|').unwrap();
        join(&mut screen, Coord::new(1, 3), Coord::new(3, 5), '\\').unwrap();
        join(&mut screen, Coord::new(3, 9), Coord::new(1, 7), '/').unwrap();
        screen.flush().unwrap();
        assert_eq!(grid.row(1), "| \\   /");
        assert_eq!(grid.row(2), "|  \\   /");
        assert_eq!(grid.row(3), "|   \\   /");
    }

    #[test]
    fn join_unaligned_marks_start_only() {
        let (mut screen, grid) = Grid::screen();
        join(&mut screen, Coord::new(1, 1), Coord::new(2, 5), '*').unwrap();
        screen.flush().unwrap();
        assert_eq!(grid.marked(), vec![Coord::new(1, 1)]);
    }
}
