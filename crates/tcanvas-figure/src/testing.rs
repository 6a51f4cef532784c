// SPDX-License-Identifier: MIT
//
// Test-only terminal model.
//
// `Grid` is a sink that understands the handful of sequences the canvas
// emits (CUP, CUU/CUD/CUF/CUB, ED) and records which character sits in
// each cell. SGR and private modes are accepted and ignored. That is enough
// to assert on what a figure actually looks like instead of on raw bytes.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::io::{self, Write};
use std::rc::Rc;

use tcanvas_term::{Coord, Screen, ScreenConfig};

#[derive(Debug, Default)]
struct Model {
    cells: BTreeMap<(i32, i32), char>,
    row: i32,
    col: i32,
}

impl Model {
    fn csi(&mut self, params: &str, fin: char) {
        let n = || params.parse::<i32>().unwrap_or(1).max(1);
        match fin {
            'H' => {
                let mut it = params.split(';').map(|p| p.parse::<i32>().unwrap_or(1));
                self.row = it.next().unwrap_or(1).max(1);
                self.col = it.next().unwrap_or(1).max(1);
            }
            'A' => self.row = (self.row - n()).max(1),
            'B' => self.row += n(),
            'C' => self.col += n(),
            'D' => self.col = (self.col - n()).max(1),
            'J' => self.cells.clear(),
            _ => {}
        }
    }

    fn feed(&mut self, text: &str) {
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\x1b' if chars.peek() == Some(&'[') => {
                    chars.next();
                    let mut params = String::new();
                    for p in chars.by_ref() {
                        if ('@'..='~').contains(&p) {
                            self.csi(&params, p);
                            break;
                        }
                        params.push(p);
                    }
                }
                '\n' => {
                    self.row += 1;
                    self.col = 1;
                }
                _ => {
                    self.cells.insert((self.row, self.col), c);
                    self.col += 1;
                }
            }
        }
    }
}

/// Shared handle to a terminal model; clone it into a `Screen`.
#[derive(Debug, Clone)]
pub struct Grid(Rc<RefCell<Model>>);

impl Default for Grid {
    fn default() -> Self {
        Self(Rc::new(RefCell::new(Model {
            row: 1,
            col: 1,
            ..Model::default()
        })))
    }
}

impl Grid {
    /// A default-sized screen that never auto-flushes, drawing into a grid.
    pub fn screen() -> (Screen, Self) {
        Self::screen_with(ScreenConfig::default())
    }

    pub fn screen_with(config: ScreenConfig) -> (Screen, Self) {
        let grid = Self::default();
        let screen = Screen::with_sink(
            config.with_flush_threshold(usize::MAX),
            Box::new(grid.clone()),
        );
        (screen, grid)
    }

    /// Character at `at` (space when never written).
    pub fn cell(&self, at: Coord) -> char {
        self.0
            .borrow()
            .cells
            .get(&(at.row, at.col))
            .copied()
            .unwrap_or(' ')
    }

    /// Row `r` from column 1 up to its last non-blank cell.
    pub fn row(&self, r: i32) -> String {
        let model = self.0.borrow();
        let last = model
            .cells
            .iter()
            .filter(|&(&(row, _), &c)| row == r && c != ' ')
            .map(|(&(_, col), _)| col)
            .max()
            .unwrap_or(0);
        drop(model);
        (1..=last).map(|c| self.cell(Coord::new(r, c))).collect()
    }

    /// Every non-blank cell in row-major order.
    pub fn marked(&self) -> Vec<Coord> {
        self.0
            .borrow()
            .cells
            .iter()
            .filter(|&(_, &c)| c != ' ')
            .map(|(&(row, col), _)| Coord::new(row, col))
            .collect()
    }
}

impl Write for Grid {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.borrow_mut().feed(&String::from_utf8_lossy(buf));
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_follows_motion_and_text() {
        let mut grid = Grid::default();
        grid.write_all(b"\x1b[2;3Hab\x1b[1B\x1b[2D\x1b[38;2;1;2;3mc\x1b[H!")
            .unwrap();
        assert_eq!(grid.row(1), "!");
        assert_eq!(grid.row(2), "  ab");
        assert_eq!(grid.row(3), "  c");
    }

    #[test]
    fn spaces_unmark() {
        let mut grid = Grid::default();
        grid.write_all(b"xy\x1b[1;1H ").unwrap();
        assert_eq!(grid.marked(), vec![Coord::new(1, 2)]);
    }
}
