// SPDX-License-Identifier: MIT
//
// ANSI escape sequence generation.
//
// Pure functions that write escape sequences to any `impl Write`. No state,
// no decisions about when to emit. Deduplication belongs to the `Screen`.
// This module only knows the byte-level encoding.
//
// Coordinates here are already 1-indexed, exactly as the terminal expects.

use std::io::{self, Write};

use crate::coord::Coord;
use crate::palette::Rgb;

// ─── Cursor ──────────────────────────────────────────────────────────────────

/// Move the cursor to an absolute cell (CUP).
#[inline]
pub fn cursor_to(w: &mut impl Write, at: Coord) -> io::Result<()> {
    write!(w, "\x1b[{};{}H", at.row, at.col)
}

/// Move the cursor to the top-left cell.
#[inline]
pub fn cursor_home(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[H")
}

/// Relative cursor motion: `A` up, `B` down, `C` right, `D` left.
#[inline]
pub fn cursor_move(w: &mut impl Write, n: i32, code: u8) -> io::Result<()> {
    write!(w, "\x1b[{n}{}", char::from(code))
}

/// Hide the cursor (DECTCEM reset).
#[inline]
pub fn cursor_hide(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25l")
}

/// Show the cursor (DECTCEM set).
#[inline]
pub fn cursor_show(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?25h")
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Clear the entire screen (ED 2).
#[inline]
pub fn clear_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[2J")
}

/// Reset all SGR attributes (SGR 0).
///
/// Clears colors too. Whoever tracks color state must forget it afterwards.
#[inline]
pub fn reset(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[0m")
}

/// Enter the alternate screen buffer (DEC Private Mode 1049).
#[inline]
pub fn enter_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049h")
}

/// Exit the alternate screen buffer and restore original content.
#[inline]
pub fn exit_alt_screen(w: &mut impl Write) -> io::Result<()> {
    w.write_all(b"\x1b[?1049l")
}

// ─── Color & Style ───────────────────────────────────────────────────────────

/// 24-bit foreground color.
#[inline]
pub fn fg(w: &mut impl Write, rgb: Rgb) -> io::Result<()> {
    write!(w, "\x1b[38;2;{rgb}m")
}

/// 24-bit background color.
#[inline]
pub fn bg(w: &mut impl Write, rgb: Rgb) -> io::Result<()> {
    write!(w, "\x1b[48;2;{rgb}m")
}

/// A palette style: `ESC[` followed by the registered suffix.
#[inline]
pub fn style(w: &mut impl Write, suffix: &str) -> io::Result<()> {
    write!(w, "\x1b[{suffix}")
}
