// SPDX-License-Identifier: MIT
//
// Filled rectangles.
//
// A block is `width × height` cells of a repeating pattern, indexed by
// column so every row reads the same. Its boundary is the perimeter only,
// clockwise from the top-left corner:
//
//   0 1 2 3        top edge, left to right
//   9     4        right edge, top to bottom
//   8 7 6 5        bottom edge right to left, then left edge upwards
//
// That is `2 * (w + h) - 4` cells for `w, h >= 2`. A block one cell thick
// has no interior, so every cell is on the boundary.
//
// `reframe` resizes in place and repaints only the strip that changed. It
// checks the new size first and leaves the block untouched on failure.

use tcanvas_term::{Coord, Direction, Error, Restore, Result, Screen, VisualState};
use tracing::trace;

use crate::figure::{self, Colors, Figure, Pattern};

/// A resizable filled rectangle.
#[derive(Debug, Clone)]
pub struct Block {
    state: VisualState,
    pattern: Pattern,
    width: i32,
    height: i32,
    cursor: i32,
}

impl Block {
    /// Create and draw a block. `height: None` makes it square.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidResize`] for a non-positive size, unknown color
    /// names, or output failure.
    pub fn new(
        screen: &mut Screen,
        pattern: &str,
        width: i32,
        height: Option<i32>,
        at: Coord,
        colors: Colors<'_>,
    ) -> Result<Self> {
        let height = height.unwrap_or(width);
        if width <= 0 || height <= 0 {
            return Err(Error::InvalidResize { width, height });
        }
        let block = Self {
            state: figure::initial_state(screen, at, colors),
            pattern: Pattern::new(pattern),
            width,
            height,
            cursor: 0,
        };
        block.draw(screen, Restore::COORD)?;
        Ok(block)
    }

    #[inline]
    #[must_use]
    pub const fn width(&self) -> i32 {
        self.width
    }

    #[inline]
    #[must_use]
    pub const fn height(&self) -> i32 {
        self.height
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> &VisualState {
        &self.state
    }

    /// Number of boundary points in one pass.
    #[must_use]
    pub const fn perimeter(&self) -> i32 {
        if self.width >= 2 && self.height >= 2 {
            2 * (self.width + self.height) - 4
        } else {
            self.width * self.height
        }
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

    /// Grow or shrink by `delta` (rows, columns), repainting only the
    /// changed strip.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidResize`] if the new size would be non-positive or
    /// larger than the screen. The block is left as it was.
    pub fn reframe(&mut self, screen: &mut Screen, delta: Coord, restore: Restore) -> Result<()> {
        let (old_w, old_h) = (self.width, self.height);
        let (new_w, new_h) = (old_w + delta.col, old_h + delta.row);
        let (max_w, max_h) = screen.bounds();
        if new_w <= 0 || new_h <= 0 || new_w > max_w || new_h > max_h {
            return Err(Error::InvalidResize {
                width: new_w,
                height: new_h,
            });
        }
        trace!(old_w, old_h, new_w, new_h, "reframe");

        let origin = self.state.coord;
        let min_w = old_w.min(new_w);
        let min_h = old_h.min(new_h);

        screen.preserve(restore, |s| {
            // Column strip beside the rows both sizes share.
            if delta.col != 0 {
                if delta.col > 0 {
                    s.set_color(self.state.fg(), self.state.bg())?;
                } else {
                    figure::blank(s)?;
                }
                let strip = if delta.col > 0 {
                    self.pattern.run(min_w, delta.col)
                } else {
                    figure::spaces(-delta.col)
                };
                for r in 0..min_h {
                    s.at(origin + Coord::new(r, min_w))?;
                    s.write(&strip)?;
                }
            }

            // Whole rows gained or lost at the bottom.
            if delta.row > 0 {
                s.set_color(self.state.fg(), self.state.bg())?;
                let row = self.pattern.run(0, new_w);
                for r in min_h..new_h {
                    s.at(origin + Coord::new(r, 0))?;
                    s.write(&row)?;
                }
            } else if delta.row < 0 {
                figure::blank(s)?;
                let row = figure::spaces(old_w);
                for r in min_h..old_h {
                    s.at(origin + Coord::new(r, 0))?;
                    s.write(&row)?;
                }
            }
            Ok(())
        })?;

        self.width = new_w;
        self.height = new_h;
        self.cursor = 0;
        Ok(())
    }

    /// Fill every row with `row`, starting with the cursor on the origin.
    fn fill(&self, s: &mut Screen, row: &str) -> Result<()> {
        for r in 0..self.height {
            if r > 0 {
                s.move_cursor(Direction::DOWN, 1)?;
                s.move_cursor(Direction::LEFT, self.width)?;
            }
            s.write(row)?;
        }
        Ok(())
    }

    /// Offset of perimeter point `i` from the origin (`w, h >= 2`).
    const fn perimeter_offset(&self, i: i32) -> Coord {
        let (w, h) = (self.width, self.height);
        if i < w {
            Coord::new(0, i)
        } else if i < w + h - 1 {
            Coord::new(i - w + 1, w - 1)
        } else if i < 2 * (w - 1) + h {
            Coord::new(h - 1, 2 * w + h - i - 3)
        } else {
            Coord::new(2 * (w + h) - i - 4, 0)
        }
    }
}

impl Figure for Block {
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
            self.fill(s, &self.pattern.run(0, self.width))
        })
    }

    fn clear(&self, screen: &mut Screen, restore: Restore) -> Result<()> {
        screen.preserve(restore, |s| {
            figure::blank(s)?;
            s.at(self.state.coord)?;
            self.fill(s, &figure::spaces(self.width))
        })
    }

    fn next_point(&mut self, reset: bool) -> Option<Coord> {
        if reset || self.cursor >= self.perimeter() {
            self.cursor = 0;
            return None;
        }
        let i = self.cursor;
        self.cursor += 1;

        let offset = if self.width >= 2 && self.height >= 2 {
            self.perimeter_offset(i)
        } else {
            Coord::new(i / self.width, i % self.width)
        };
        Some(self.state.coord + offset)
    }
}
