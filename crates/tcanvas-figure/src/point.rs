// SPDX-License-Identifier: MIT
//
// A single-cell figure.

use tcanvas_term::{Coord, Restore, Result, Screen, VisualState};

use crate::figure::{self, Colors, Figure};

/// One character at one cell. Its boundary is that cell, once per pass.
#[derive(Debug, Clone)]
pub struct Point {
    state: VisualState,
    ch: char,
    done: bool,
}

impl Point {
    /// Create and draw a point. An invalid `at` (or axis) means "at the
    /// cursor".
    ///
    /// # Errors
    ///
    /// Unknown color names or output failure.
    pub fn new(screen: &mut Screen, at: Coord, colors: Colors<'_>, ch: char) -> Result<Self> {
        let point = Self {
            state: figure::initial_state(screen, at, colors),
            ch,
            done: false,
        };
        point.draw(screen, Restore::COORD)?;
        Ok(point)
    }

    #[inline]
    #[must_use]
    pub const fn glyph(&self) -> char {
        self.ch
    }

    #[inline]
    #[must_use]
    pub const fn state(&self) -> &VisualState {
        &self.state
    }

    /// Swap the character and redraw it in place.
    ///
    /// # Errors
    ///
    /// Output failure.
    pub fn change_char(&mut self, screen: &mut Screen, ch: char, optimize: bool) -> Result<()> {
        self.ch = ch;
        let restore = if optimize {
            Restore::empty()
        } else {
            Restore::DEFAULT
        };
        self.draw(screen, restore)
    }

    fn put(&self, screen: &mut Screen, ch: char) -> Result<()> {
        let mut buf = [0u8; 4];
        screen.write(ch.encode_utf8(&mut buf))
    }
}

impl Figure for Point {
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
            self.put(s, self.ch)
        })
    }

    fn clear(&self, screen: &mut Screen, restore: Restore) -> Result<()> {
        screen.preserve(restore, |s| {
            figure::blank(s)?;
            s.at(self.state.coord)?;
            self.put(s, ' ')
        })
    }

    fn next_point(&mut self, reset: bool) -> Option<Coord> {
        if reset || self.done {
            self.done = false;
            return None;
        }
        self.done = true;
        Some(self.state.coord)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Grid;
    use pretty_assertions::assert_eq;

    #[test]
    fn draws_on_creation_and_keeps_cursor() {
        let (mut screen, grid) = Grid::screen();
        screen.at(Coord::new(9, 9)).unwrap();
        let p = Point::new(&mut screen, Coord::new(3, 4), Colors::fg("RED"), '@').unwrap();
        screen.flush().unwrap();
        assert_eq!(grid.cell(Coord::new(3, 4)), '@');
        assert_eq!(screen.cursor(), Coord::new(9, 9));
        assert_eq!(p.state().fg(), Some("RED"));
        assert_eq!(p.state().bg(), Some("CONSOLE"));
    }

    #[test]
    fn invalid_vertex_uses_cursor() {
        let (mut screen, _grid) = Grid::screen();
        screen.at(Coord::new(5, 6)).unwrap();
        let p = Point::new(&mut screen, Coord::INVALID, Colors::DEFAULT, '*').unwrap();
        assert_eq!(p.position(), Coord::new(5, 6));
    }

    #[test]
    fn unknown_color_fails_construction() {
        let (mut screen, _grid) = Grid::screen();
        assert!(Point::new(&mut screen, Coord::HOME, Colors::fg("NOPE"), '*').is_err());
        assert_eq!(screen.depth(), 0);
    }

    #[test]
    fn boundary_is_one_cell_per_pass() {
        let (mut screen, _grid) = Grid::screen();
        let mut p = Point::new(&mut screen, Coord::new(2, 2), Colors::DEFAULT, '*').unwrap();
        assert_eq!(p.next_point(false), Some(Coord::new(2, 2)));
        assert_eq!(p.next_point(false), None);
        assert_eq!(p.next_point(false), Some(Coord::new(2, 2)));
        assert_eq!(p.next_point(true), None);
        assert_eq!(p.next_point(false), Some(Coord::new(2, 2)));
    }

    #[test]
    fn move_round_trip() {
        let (mut screen, grid) = Grid::screen();
        let mut p = Point::new(&mut screen, Coord::new(4, 4), Colors::DEFAULT, 'o').unwrap();
        screen.flush().unwrap();
        let before = grid.marked();

        p.move_by(&mut screen, Coord::new(1, 3), Restore::COORD).unwrap();
        screen.flush().unwrap();
        assert_eq!(grid.marked(), vec![Coord::new(5, 7)]);

        p.move_by(&mut screen, Coord::new(-1, -3), Restore::COORD).unwrap();
        screen.flush().unwrap();
        assert_eq!(grid.marked(), before);
        assert_eq!(p.position(), Coord::new(4, 4));
    }

    #[test]
    fn change_char_redraws() {
        let (mut screen, grid) = Grid::screen();
        let mut p = Point::new(&mut screen, Coord::new(1, 2), Colors::DEFAULT, 'a').unwrap();
        p.change_char(&mut screen, 'b', false).unwrap();
        screen.flush().unwrap();
        assert_eq!(grid.cell(Coord::new(1, 2)), 'b');
        assert_eq!(p.glyph(), 'b');
    }

    #[test]
    fn change_color_keeps_screen_state() {
        let (mut screen, _grid) = Grid::screen();
        let mut p = Point::new(&mut screen, Coord::new(1, 2), Colors::DEFAULT, 'a').unwrap();
        screen.at(Coord::new(8, 8)).unwrap();
        p.change_color(&mut screen, Colors::new("GREEN", "BLACK"), false)
            .unwrap();
        assert_eq!(screen.cursor(), Coord::new(8, 8));
        assert_eq!(screen.state().bg(), Some("CONSOLE"));
        assert_eq!(p.state().bg(), Some("BLACK"));
    }
}
