// SPDX-License-Identifier: MIT
//
// Straight lines of fixed length with a repeating character pattern.
//
// Horizontal lines are one write. Vertical lines step down one row and back
// one column after every cell except the last, so the cursor never has to
// move below the line's own extent.

use tcanvas_term::{Coord, Direction, Restore, Result, Screen, VisualState};

use crate::figure::{self, Colors, Figure, Pattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
}

impl Orientation {
    /// Offset of cell `i` from the origin.
    const fn offset(self, i: i32) -> Coord {
        match self {
            Self::Horizontal => Coord::new(0, i),
            Self::Vertical => Coord::new(i, 0),
        }
    }
}

/// A horizontal or vertical line. Its boundary is every cell, origin first.
#[derive(Debug, Clone)]
pub struct Line {
    state: VisualState,
    pattern: Pattern,
    length: i32,
    orientation: Orientation,
    cursor: i32,
}

impl Line {
    /// Create and draw a line. A negative `length` is treated as zero.
    ///
    /// # Errors
    ///
    /// Unknown color names or output failure.
    pub fn new(
        screen: &mut Screen,
        orientation: Orientation,
        pattern: &str,
        length: i32,
        at: Coord,
        colors: Colors<'_>,
    ) -> Result<Self> {
        let line = Self {
            state: figure::initial_state(screen, at, colors),
            pattern: Pattern::new(pattern),
            length: length.max(0),
            orientation,
            cursor: 0,
        };
        line.draw(screen, Restore::COORD)?;
        Ok(line)
    }

    /// Shorthand for a horizontal [`Line::new`].
    ///
    /// # Errors
    ///
    /// Unknown color names or output failure.
    pub fn horizontal(
        screen: &mut Screen,
        pattern: &str,
        length: i32,
        at: Coord,
        colors: Colors<'_>,
    ) -> Result<Self> {
        Self::new(screen, Orientation::Horizontal, pattern, length, at, colors)
    }

    /// Shorthand for a vertical [`Line::new`].
    ///
    /// # Errors
    ///
    /// Unknown color names or output failure.
    pub fn vertical(
        screen: &mut Screen,
        pattern: &str,
        length: i32,
        at: Coord,
        colors: Colors<'_>,
    ) -> Result<Self> {
        Self::new(screen, Orientation::Vertical, pattern, length, at, colors)
    }

    #[inline]
    #[must_use]
    pub const fn len(&self) -> i32 {
        self.length
    }

    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    #[must_use]
    pub const fn orientation(&self) -> Orientation {
        self.orientation
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> &VisualState {
        &self.state
    }

    /// Replace the pattern and redraw.
    ///
    /// # Errors
    ///
    /// Output failure.
    pub fn change_pattern(&mut self, screen: &mut Screen, pattern: &str, restore: Restore) -> Result<()> {
        self.pattern = Pattern::new(pattern);
        self.draw(screen, restore)
    }

    /// Write `text(i)` into each cell, starting at the cursor on the origin.
    fn paint<F>(&self, s: &mut Screen, text: F) -> Result<()>
    where
        F: Fn(i32) -> String,
    {
        match self.orientation {
            Orientation::Horizontal => s.write(&(0..self.length).map(&text).collect::<String>()),
            Orientation::Vertical => {
                for i in 0..self.length {
                    if i > 0 {
                        s.move_cursor(Direction::DOWN, 1)?;
                        s.move_cursor(Direction::LEFT, 1)?;
                    }
                    s.write(&text(i))?;
                }
                Ok(())
            }
        }
    }
}

impl Figure for Line {
    fn position(&self) -> Coord {
        self.state.coord
    }

    fn translate(&mut self, delta: Coord) {
        self.state.coord += delta;
    }

    fn set_colors(&mut self, colors: Colors<'_>) {
        colors.apply_to(&mut self.state);
    }

    fn draw(&self, screen: &mut Screen, restore: Restore) -> Result<()> {
        screen.preserve(restore, |s| {
            s.update_state(&self.state)?;
            self.paint(s, |i| self.pattern.at(i).to_string())
        })
    }

    fn clear(&self, screen: &mut Screen, restore: Restore) -> Result<()> {
        screen.preserve(restore, |s| {
            figure::blank(s)?;
            s.at(self.state.coord)?;
            self.paint(s, |_| " ".to_owned())
        })
    }

    fn next_point(&mut self, reset: bool) -> Option<Coord> {
        if reset || self.cursor >= self.length {
            self.cursor = 0;
            return None;
        }
        let point = self.state.coord + self.orientation.offset(self.cursor);
        self.cursor += 1;
        Some(point)
    }
}
