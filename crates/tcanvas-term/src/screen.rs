// SPDX-License-Identifier: MIT
//
// Screen: the process's single view of terminal state.
//
// A `Screen` owns the output buffer, the logical state (where we believe the
// cursor is and which colors are active), a LIFO save stack, tagged
// checkpoints, and the palette. Nothing here ever queries the terminal; the
// logical state is kept true by construction:
//
//   - escape sequences go through the untracked write path and update the
//     logical state explicitly (cursor motion, colors, style)
//   - printable text goes through the tracked path and advances the cursor
//
// Color and style requests are deduplicated against the logical state. If
// the foreground is already RED, asking for RED again emits nothing.
//
// Save/restore is strictly nested: every `save_state` is matched by one
// `retrieve_state` before the enclosing operation returns. `preserve` wraps
// that pairing in a closure so the restore also runs on the error path.
//
// Single-threaded by design: one `Screen`, one owner, no locking.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;

use tracing::{debug, trace, warn};

use crate::ansi;
use crate::config::ScreenConfig;
use crate::coord::{Coord, Direction};
use crate::error::Result;
use crate::output::OutBuffer;
use crate::palette::{Palette, StyleKind};
use crate::state::VisualState;
use crate::timing;

// ─── Restore ─────────────────────────────────────────────────────────────────

bitflags::bitflags! {
    /// Which parts of a saved state to apply on restore.
    ///
    /// Partial restoration is intentional: a figure usually only needs the
    /// cursor back, while a flash animation wants the colors too. An empty
    /// set means "do not bracket at all"; the caller batches several
    /// operations between one save/restore of its own.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
    pub struct Restore: u8 {
        const COORD = 1 << 0;
        const BG    = 1 << 1;
        const FG    = 1 << 2;
        const STYLE = 1 << 3;
    }
}

impl Restore {
    /// Position and background: the stock restore.
    pub const DEFAULT: Self = Self::COORD.union(Self::BG);
}

// ─── Screen ──────────────────────────────────────────────────────────────────

/// Terminal state manager.
#[derive(Debug)]
pub struct Screen {
    out: OutBuffer,
    now: VisualState,
    lifo: Vec<VisualState>,
    tagged: HashMap<String, VisualState>,
    palette: Palette,
    config: ScreenConfig,
    background: String,
}

impl Screen {
    /// A screen writing to stdout with the builtin palette.
    #[must_use]
    pub fn new(config: ScreenConfig) -> Self {
        Self::with_sink(config, Box::new(io::stdout()))
    }

    /// A screen writing to an arbitrary sink with the builtin palette.
    #[must_use]
    pub fn with_sink(config: ScreenConfig, sink: Box<dyn Write>) -> Self {
        let mut out = OutBuffer::new(sink, config.flush_threshold);
        out.set_padding(config.left_padding);
        let now = VisualState::new(
            Coord::HOME,
            Some(&config.foreground),
            Some(&config.background),
        );
        Self {
            out,
            now,
            lifo: Vec::new(),
            tagged: HashMap::new(),
            palette: Palette::builtin(),
            background: config.background.clone(),
            config,
        }
    }

    /// Builder: replace the palette.
    #[must_use]
    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    // ── Accessors ───────────────────────────────────────────────────────

    /// The logical cursor position.
    #[inline]
    #[must_use]
    pub const fn cursor(&self) -> Coord {
        self.now.coord
    }

    /// The full logical state.
    #[inline]
    #[must_use]
    pub const fn state(&self) -> &VisualState {
        &self.now
    }

    #[inline]
    #[must_use]
    pub const fn palette(&self) -> &Palette {
        &self.palette
    }

    #[inline]
    pub const fn palette_mut(&mut self) -> &mut Palette {
        &mut self.palette
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &ScreenConfig {
        &self.config
    }

    /// Current screen background color name (set by [`paint`](Self::paint)).
    #[inline]
    #[must_use]
    pub fn background(&self) -> &str {
        &self.background
    }

    /// Default figure foreground.
    #[inline]
    #[must_use]
    pub fn foreground(&self) -> &str {
        &self.config.foreground
    }

    /// Fixed bounds as `(width, height)`.
    #[inline]
    #[must_use]
    pub const fn bounds(&self) -> (i32, i32) {
        (self.config.width, self.config.height)
    }

    /// Number of snapshots on the LIFO stack.
    #[inline]
    #[must_use]
    pub fn depth(&self) -> usize {
        self.lifo.len()
    }

    /// Pending (unflushed) output.
    #[must_use]
    pub fn pending(&self) -> std::borrow::Cow<'_, str> {
        self.out.pending()
    }

    /// Direct access to the writer (padding, line start, tracking gate).
    #[inline]
    pub const fn writer_mut(&mut self) -> &mut OutBuffer {
        &mut self.out
    }

    // ── Output ──────────────────────────────────────────────────────────

    /// Write printable text at the cursor, advancing the logical cursor.
    ///
    /// # Errors
    ///
    /// Returns an error if an auto-flush fails.
    pub fn write(&mut self, text: &str) -> Result<()> {
        self.out.append(text, &mut self.now.coord)?;
        Ok(())
    }

    /// Emit an escape sequence through the untracked path.
    fn emit<F>(&mut self, encode: F) -> Result<()>
    where
        F: FnOnce(&mut OutBuffer) -> io::Result<()>,
    {
        encode(&mut self.out)?;
        self.out.flush_if_full()?;
        Ok(())
    }

    /// Flush pending output to the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the sink rejects the write.
    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    /// Flush, then wait precisely for `duration`.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush fails.
    pub fn pause(&mut self, duration: Duration) -> Result<()> {
        self.flush()?;
        timing::precise_delay(duration, self.config.delay_mode);
        Ok(())
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    /// Jump to an absolute cell.
    ///
    /// # Errors
    ///
    /// Returns an error if an auto-flush fails.
    pub fn at(&mut self, dest: Coord) -> Result<()> {
        self.emit(|w| ansi::cursor_to(w, dest))?;
        self.now.coord = dest;
        Ok(())
    }

    /// Jump to the top-left cell.
    ///
    /// # Errors
    ///
    /// Returns an error if an auto-flush fails.
    pub fn home(&mut self) -> Result<()> {
        self.emit(|w| ansi::cursor_home(w))?;
        self.now.coord = Coord::HOME;
        Ok(())
    }

    /// Move the cursor `n` cells in `dir`.
    ///
    /// Diagonals (`RIGHT | UP`, ...) run as two single-axis moves,
    /// horizontal first. `n <= 0` is a no-op: the terminal would read a
    /// zero count as one.
    ///
    /// # Errors
    ///
    /// Returns an error if an auto-flush fails.
    pub fn move_cursor(&mut self, dir: Direction, n: i32) -> Result<()> {
        if n <= 0 {
            return Ok(());
        }
        const AXES: [(Direction, u8); 4] = [
            (Direction::RIGHT, b'C'),
            (Direction::LEFT, b'D'),
            (Direction::UP, b'A'),
            (Direction::DOWN, b'B'),
        ];
        for (axis, code) in AXES {
            if dir.contains(axis) {
                self.emit(|w| ansi::cursor_move(w, n, code))?;
                let step = axis.step();
                self.now.coord += Coord::new(step.row * n, step.col * n);
            }
        }
        Ok(())
    }

    // ── Attributes ──────────────────────────────────────────────────────

    /// Set foreground and/or background by palette name.
    ///
    /// Each channel is emitted only if it differs from the logical state.
    /// `None` leaves a channel untouched.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColorName`](crate::Error::UnknownColorName) if either
    /// name is missing from the palette. Nothing is emitted in that case.
    pub fn set_color(&mut self, fg: Option<&str>, bg: Option<&str>) -> Result<()> {
        let fg = match fg.filter(|name| self.now.fg() != Some(*name)) {
            Some(name) => Some((name, self.palette.color(name)?)),
            None => None,
        };
        let bg = match bg.filter(|name| self.now.bg() != Some(*name)) {
            Some(name) => Some((name, self.palette.color(name)?)),
            None => None,
        };

        if let Some((name, rgb)) = fg {
            trace!(fg = name, "set color");
            self.emit(|w| ansi::fg(w, rgb))?;
            self.now.fg = Some(name.to_owned());
        }
        if let Some((name, rgb)) = bg {
            trace!(bg = name, "set color");
            self.emit(|w| ansi::bg(w, rgb))?;
            self.now.bg = Some(name.to_owned());
        }
        Ok(())
    }

    /// Apply a palette style.
    ///
    /// Attribute styles are deduplicated against the tracked style and
    /// recorded. Visibility toggles (`HIDE`, `UHIDE`) are always emitted and
    /// never recorded.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownStyleName`](crate::Error::UnknownStyleName) if the
    /// name is missing from the palette.
    pub fn set_style(&mut self, name: &str) -> Result<()> {
        let (suffix, kind) = {
            let style = self.palette.style(name)?;
            (style.suffix.clone(), style.kind)
        };
        if kind == StyleKind::Attribute && self.now.style() == Some(name) {
            return Ok(());
        }
        self.emit(|w| ansi::style(w, &suffix))?;
        if kind == StyleKind::Attribute {
            self.now.style = Some(name.to_owned());
        }
        Ok(())
    }

    /// Reset every attribute (SGR 0). Colors and style become unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if an auto-flush fails.
    pub fn reset_attributes(&mut self) -> Result<()> {
        self.emit(|w| ansi::reset(w))?;
        self.now.fg = None;
        self.now.bg = None;
        self.now.style = None;
        Ok(())
    }

    /// Erase the whole terminal with the current background.
    ///
    /// # Errors
    ///
    /// Returns an error if an auto-flush fails.
    pub fn clear_screen(&mut self) -> Result<()> {
        self.emit(|w| ansi::clear_screen(w))
    }

    /// Fill the configured screen area with `color` and make it the screen
    /// background. The cursor ends at home and the output is flushed.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColorName`](crate::Error::UnknownColorName) for an
    /// unregistered color, or an output error.
    pub fn paint(&mut self, color: &str) -> Result<()> {
        let (width, height) = self.bounds();
        self.at(Coord::HOME)?;
        self.set_color(None, Some(color))?;
        color.clone_into(&mut self.background);

        let row = " ".repeat(usize::try_from(width).unwrap_or(0));
        for _ in 0..height {
            self.write(&row)?;
            self.move_cursor(Direction::DOWN, 1)?;
            self.move_cursor(Direction::LEFT, width)?;
        }

        self.at(Coord::HOME)?;
        self.flush()
    }

    /// Write `text` at `point` (or at the cursor when `point` is invalid).
    ///
    /// A non-empty `restore` brackets the write with save/restore so the
    /// caller's state does not move.
    ///
    /// # Errors
    ///
    /// Returns an error if an auto-flush fails.
    pub fn puts(&mut self, point: Coord, text: &str, restore: Restore) -> Result<()> {
        self.preserve(restore, |s| {
            if point.is_valid() {
                s.at(point)?;
            }
            s.write(text)
        })
    }

    // ── Save / Restore ──────────────────────────────────────────────────

    /// Push the logical state onto the LIFO stack.
    pub fn save_state(&mut self) {
        self.lifo.push(self.now.clone());
        trace!(depth = self.lifo.len(), "save state");
    }

    /// Pop the last snapshot and apply the parts selected by `restore`.
    ///
    /// Returns `false` (and changes nothing) when the stack is empty.
    ///
    /// # Errors
    ///
    /// Returns an error if re-applying the snapshot fails.
    pub fn retrieve_state(&mut self, restore: Restore) -> Result<bool> {
        let Some(saved) = self.lifo.pop() else {
            warn!("retrieve_state on an empty stack");
            return Ok(false);
        };
        trace!(depth = self.lifo.len(), ?restore, "retrieve state");
        self.apply(&saved, restore)?;
        Ok(true)
    }

    /// Record the current logical state under `tag`.
    pub fn save_tagged(&mut self, tag: &str) {
        debug!(tag, coord = %self.now.coord, "save tagged");
        self.tagged.insert(tag.to_owned(), self.now.clone());
    }

    /// Record an explicit state under `tag`. An invalid coordinate is
    /// replaced by the current cursor.
    pub fn save_tagged_state(&mut self, tag: &str, mut state: VisualState) {
        if !state.coord.is_valid() {
            state.coord = state.coord.or(self.now.coord);
        }
        debug!(tag, coord = %state.coord, "save tagged");
        self.tagged.insert(tag.to_owned(), state);
    }

    /// Apply the checkpoint stored under `tag`. The checkpoint stays.
    ///
    /// Returns `false` when no such tag exists.
    ///
    /// # Errors
    ///
    /// Returns an error if re-applying the checkpoint fails.
    pub fn retrieve_tagged(&mut self, tag: &str, restore: Restore) -> Result<bool> {
        let Some(saved) = self.tagged.get(tag).cloned() else {
            warn!(tag, "retrieve_tagged with unknown tag");
            return Ok(false);
        };
        self.apply(&saved, restore)?;
        Ok(true)
    }

    /// Remove a tagged checkpoint.
    pub fn forget_tagged(&mut self, tag: &str) -> Option<VisualState> {
        self.tagged.remove(tag)
    }

    /// Apply every part of `state`: position, colors, and style if set.
    ///
    /// # Errors
    ///
    /// Returns an error for unknown color/style names or output failure.
    pub fn update_state(&mut self, state: &VisualState) -> Result<()> {
        self.apply(state, Restore::all())
    }

    /// A selected part that is unset in `state` but set now can only be
    /// cleared with SGR 0, which drops every attribute. The parts that
    /// should survive are re-applied after the reset.
    fn apply(&mut self, state: &VisualState, restore: Restore) -> Result<()> {
        if restore.contains(Restore::COORD) {
            self.at(state.coord)?;
        }
        let pick = |part: Restore, saved: Option<&str>, now: Option<&str>| {
            (if restore.contains(part) { saved } else { now }).map(str::to_owned)
        };
        let fg = pick(Restore::FG, state.fg(), self.now.fg());
        let bg = pick(Restore::BG, state.bg(), self.now.bg());
        let style = pick(Restore::STYLE, state.style(), self.now.style());

        let dropped = (fg.is_none() && self.now.fg.is_some())
            || (bg.is_none() && self.now.bg.is_some())
            || (style.is_none() && self.now.style.is_some());
        if dropped {
            self.reset_attributes()?;
        }
        if let Some(style) = &style {
            self.set_style(style)?;
        }
        self.set_color(fg.as_deref(), bg.as_deref())
    }

    /// Run `work` between a save and a restore of the parts in `restore`.
    ///
    /// The restore runs even if `work` fails; the first error wins. With an
    /// empty `restore` no snapshot is taken at all.
    ///
    /// # Errors
    ///
    /// Whatever `work` returns, or a failure while restoring.
    pub fn preserve<T, F>(&mut self, restore: Restore, work: F) -> Result<T>
    where
        F: FnOnce(&mut Self) -> Result<T>,
    {
        if restore.is_empty() {
            return work(self);
        }
        self.save_state();
        let result = work(self);
        let restored = self.retrieve_state(restore);
        let value = result?;
        restored?;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;

    fn screen() -> Screen {
        Screen::with_sink(
            ScreenConfig::default().with_flush_threshold(usize::MAX),
            Box::new(io::sink()),
        )
    }

    /// Pending output since the last call, then clear it.
    fn take(s: &mut Screen) -> String {
        let out = s.pending().into_owned();
        s.writer_mut().discard();
        out
    }

    // ── Cursor ──────────────────────────────────────────────────────────

    #[test]
    fn starts_at_home_with_default_colors() {
        let s = screen();
        assert_eq!(s.cursor(), Coord::HOME);
        assert_eq!(s.state().fg(), Some("WHITE"));
        assert_eq!(s.state().bg(), Some("CONSOLE"));
    }

    #[test]
    fn at_emits_cup_without_tracking_the_escape() {
        let mut s = screen();
        s.at(Coord::new(12, 40)).unwrap();
        assert_eq!(take(&mut s), "\x1b[12;40H");
        assert_eq!(s.cursor(), Coord::new(12, 40));
    }

    #[test]
    fn text_after_jump_advances_from_there() {
        let mut s = screen();
        s.at(Coord::new(3, 3)).unwrap();
        s.write("abcd").unwrap();
        assert_eq!(s.cursor(), Coord::new(3, 7));
    }

    #[test]
    fn move_cursor_each_direction() {
        let mut s = screen();
        s.at(Coord::new(10, 10)).unwrap();
        take(&mut s);
        s.move_cursor(Direction::UP, 2).unwrap();
        s.move_cursor(Direction::DOWN, 5).unwrap();
        s.move_cursor(Direction::RIGHT, 1).unwrap();
        s.move_cursor(Direction::LEFT, 4).unwrap();
        assert_eq!(take(&mut s), "\x1b[2A\x1b[5B\x1b[1C\x1b[4D");
        assert_eq!(s.cursor(), Coord::new(13, 7));
    }

    #[test]
    fn diagonal_is_two_single_axis_moves() {
        let mut s = screen();
        s.at(Coord::new(10, 10)).unwrap();
        take(&mut s);
        s.move_cursor(Direction::RIGHT | Direction::UP, 3).unwrap();
        assert_eq!(take(&mut s), "\x1b[3C\x1b[3A");
        assert_eq!(s.cursor(), Coord::new(7, 13));
    }

    #[test]
    fn zero_magnitude_or_no_direction_is_noop() {
        let mut s = screen();
        s.move_cursor(Direction::DOWN, 0).unwrap();
        s.move_cursor(Direction::empty(), 5).unwrap();
        assert_eq!(take(&mut s), "");
        assert_eq!(s.cursor(), Coord::HOME);
    }

    #[test]
    fn home_resets_cursor() {
        let mut s = screen();
        s.at(Coord::new(4, 4)).unwrap();
        s.home().unwrap();
        assert_eq!(s.cursor(), Coord::HOME);
        assert!(take(&mut s).ends_with("\x1b[H"));
    }

    // ── Attributes ──────────────────────────────────────────────────────

    #[test]
    fn same_foreground_twice_emits_once() {
        let mut s = screen();
        s.set_color(Some("RED"), None).unwrap();
        s.set_color(Some("RED"), None).unwrap();
        let out = take(&mut s);
        assert_eq!(out.matches("\x1b[38;2;255;0;0m").count(), 1);
        assert_eq!(s.state().fg(), Some("RED"));
    }

    #[test]
    fn only_changed_channel_is_emitted() {
        let mut s = screen();
        // WHITE is already the logical foreground.
        s.set_color(Some("WHITE"), Some("BLUE")).unwrap();
        assert_eq!(take(&mut s), "\x1b[48;2;0;0;255m");
    }

    #[test]
    fn unknown_color_fails_without_output() {
        let mut s = screen();
        let err = s.set_color(Some("RED"), Some("MAUVE")).unwrap_err();
        assert!(matches!(err, Error::UnknownColorName(ref n) if n == "MAUVE"));
        assert_eq!(take(&mut s), "");
        assert_eq!(s.state().fg(), Some("WHITE"));
    }

    #[test]
    fn style_is_deduplicated_and_tracked() {
        let mut s = screen();
        s.set_style("BOLD").unwrap();
        s.set_style("BOLD").unwrap();
        assert_eq!(take(&mut s), "\x1b[1m");
        assert_eq!(s.state().style(), Some("BOLD"));
    }

    #[test]
    fn visibility_toggles_are_not_tracked() {
        let mut s = screen();
        s.set_style("ITALIC").unwrap();
        s.set_style("HIDE").unwrap();
        s.set_style("HIDE").unwrap();
        assert_eq!(take(&mut s), "\x1b[3m\x1b[?25l\x1b[?25l");
        assert_eq!(s.state().style(), Some("ITALIC"));
    }

    #[test]
    fn unknown_style_fails() {
        let mut s = screen();
        assert!(matches!(
            s.set_style("BLINK"),
            Err(Error::UnknownStyleName(_))
        ));
    }

    #[test]
    fn reset_forgets_colors_so_next_request_emits() {
        let mut s = screen();
        s.reset_attributes().unwrap();
        s.set_color(Some("WHITE"), None).unwrap();
        assert_eq!(take(&mut s), "\x1b[0m\x1b[38;2;255;255;255m");
    }

    // ── Paint / puts ────────────────────────────────────────────────────

    #[test]
    fn paint_fills_every_row_and_returns_home() {
        let mut s = Screen::with_sink(
            ScreenConfig::default()
                .with_size(4, 2)
                .with_flush_threshold(usize::MAX),
            Box::new(io::sink()),
        );
        s.paint("BLACK").unwrap();
        // paint flushes; the sink swallowed it, state tells the story.
        assert_eq!(s.cursor(), Coord::HOME);
        assert_eq!(s.background(), "BLACK");
        assert_eq!(s.state().bg(), Some("BLACK"));
        assert!(s.pending().is_empty());
    }

    #[test]
    fn paint_output_shape() {
        let cap = crate::output::tests::Capture::default();
        let mut s = Screen::with_sink(
            ScreenConfig::default()
                .with_size(3, 2)
                .with_flush_threshold(usize::MAX),
            Box::new(cap.clone()),
        );
        s.paint("BLACK").unwrap();
        assert_eq!(
            cap.text(),
            "\x1b[1;1H\x1b[48;2;0;0;0m   \x1b[1B\x1b[3D   \x1b[1B\x1b[3D\x1b[1;1H"
        );
    }

    #[test]
    fn puts_with_restore_keeps_cursor() {
        let mut s = screen();
        s.at(Coord::new(5, 5)).unwrap();
        s.puts(Coord::new(2, 2), "+", Restore::COORD).unwrap();
        assert_eq!(s.cursor(), Coord::new(5, 5));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn puts_without_restore_leaves_cursor_after_text() {
        let mut s = screen();
        s.puts(Coord::new(2, 2), "++", Restore::empty()).unwrap();
        assert_eq!(s.cursor(), Coord::new(2, 4));
    }

    #[test]
    fn puts_at_invalid_point_writes_at_cursor() {
        let mut s = screen();
        s.at(Coord::new(3, 1)).unwrap();
        take(&mut s);
        s.puts(Coord::INVALID, "x", Restore::empty()).unwrap();
        assert_eq!(take(&mut s), "x");
    }

    // ── Save / Restore ──────────────────────────────────────────────────

    #[test]
    fn lifo_restore_pops_in_reverse() {
        let mut s = screen();
        s.at(Coord::new(1, 5)).unwrap();
        s.save_state();
        s.at(Coord::new(2, 5)).unwrap();
        s.save_state();
        s.at(Coord::new(3, 5)).unwrap();

        assert!(s.retrieve_state(Restore::COORD).unwrap());
        assert_eq!(s.cursor(), Coord::new(2, 5));
        assert!(s.retrieve_state(Restore::COORD).unwrap());
        assert_eq!(s.cursor(), Coord::new(1, 5));
        assert!(!s.retrieve_state(Restore::COORD).unwrap());
    }

    #[test]
    fn nested_saves_unwind_to_original_state() {
        let mut s = screen();
        s.at(Coord::new(4, 9)).unwrap();
        let before = s.state().clone();

        for i in 1..=5 {
            s.save_state();
            s.at(Coord::new(i, i * 3)).unwrap();
            s.set_color(Some("RED"), Some("BLUE")).unwrap();
        }
        for _ in 1..=5 {
            s.retrieve_state(Restore::all()).unwrap();
        }
        assert_eq!(*s.state(), before);
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn unwind_after_reset_clears_colors_set_inside() {
        let mut s = screen();
        s.at(Coord::new(2, 2)).unwrap();
        s.reset_attributes().unwrap();
        let before = s.state().clone();
        take(&mut s);

        s.save_state();
        s.set_color(Some("RED"), Some("BLUE")).unwrap();
        s.set_style("BOLD").unwrap();
        take(&mut s);
        s.retrieve_state(Restore::all()).unwrap();

        assert_eq!(*s.state(), before);
        assert_eq!(s.state().style(), None);
        assert_eq!(take(&mut s), "\x1b[2;2H\x1b[0m");
    }

    #[test]
    fn reset_during_partial_restore_keeps_unselected_colors() {
        let mut s = screen();
        s.reset_attributes().unwrap();
        s.save_state();
        s.set_color(Some("RED"), Some("BLUE")).unwrap();
        take(&mut s);
        s.retrieve_state(Restore::BG).unwrap();

        assert_eq!(s.state().fg(), Some("RED"));
        assert_eq!(s.state().bg(), None);
        assert_eq!(take(&mut s), "\x1b[0m\x1b[38;2;255;0;0m");
    }

    #[test]
    fn partial_restore_only_touches_selected_parts() {
        let mut s = screen();
        s.save_state();
        s.at(Coord::new(9, 9)).unwrap();
        s.set_color(Some("RED"), Some("BLUE")).unwrap();
        s.retrieve_state(Restore::BG).unwrap();
        assert_eq!(s.cursor(), Coord::new(9, 9));
        assert_eq!(s.state().fg(), Some("RED"));
        assert_eq!(s.state().bg(), Some("CONSOLE"));
    }

    #[test]
    fn restore_style_reapplies_saved_style() {
        let mut s = screen();
        s.set_style("BOLD").unwrap();
        s.save_state();
        s.set_style("ITALIC").unwrap();
        s.retrieve_state(Restore::STYLE).unwrap();
        assert_eq!(s.state().style(), Some("BOLD"));
    }

    #[test]
    fn tagged_checkpoint_is_reusable() {
        let mut s = screen();
        s.at(Coord::new(40, 10)).unwrap();
        s.save_tagged("shooter");
        s.at(Coord::new(1, 1)).unwrap();

        assert!(s.retrieve_tagged("shooter", Restore::COORD).unwrap());
        assert_eq!(s.cursor(), Coord::new(40, 10));
        s.at(Coord::new(2, 2)).unwrap();
        assert!(s.retrieve_tagged("shooter", Restore::COORD).unwrap());
        assert_eq!(s.cursor(), Coord::new(40, 10));
    }

    #[test]
    fn unknown_tag_is_a_soft_miss() {
        let mut s = screen();
        assert!(!s.retrieve_tagged("nope", Restore::all()).unwrap());
        assert_eq!(take(&mut s), "");
    }

    #[test]
    fn tagged_state_with_invalid_coord_uses_cursor() {
        let mut s = screen();
        s.at(Coord::new(6, 7)).unwrap();
        s.save_tagged_state("flash", VisualState::new(Coord::INVALID, Some("RED"), None));
        let saved = s.forget_tagged("flash").unwrap();
        assert_eq!(saved.coord, Coord::new(6, 7));
        assert_eq!(saved.fg(), Some("RED"));
        assert!(s.forget_tagged("flash").is_none());
    }

    #[test]
    fn update_state_applies_everything() {
        let mut s = screen();
        let target = VisualState::new(Coord::new(3, 4), Some("GREEN"), Some("BLACK"))
            .with_style("BOLD");
        s.update_state(&target).unwrap();
        assert_eq!(*s.state(), target);
        assert_eq!(s.state().style(), Some("BOLD"));
    }

    // ── preserve ────────────────────────────────────────────────────────

    #[test]
    fn preserve_restores_on_success() {
        let mut s = screen();
        s.at(Coord::new(5, 5)).unwrap();
        let v = s
            .preserve(Restore::COORD, |s| {
                s.at(Coord::new(1, 1))?;
                Ok(7)
            })
            .unwrap();
        assert_eq!(v, 7);
        assert_eq!(s.cursor(), Coord::new(5, 5));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn preserve_restores_on_error() {
        let mut s = screen();
        s.at(Coord::new(5, 5)).unwrap();
        let err = s
            .preserve(Restore::COORD, |s| {
                s.at(Coord::new(1, 1))?;
                s.set_color(Some("NOPE"), None)
            })
            .unwrap_err();
        assert!(matches!(err, Error::UnknownColorName(_)));
        assert_eq!(s.cursor(), Coord::new(5, 5));
        assert_eq!(s.depth(), 0);
    }

    #[test]
    fn preserve_with_empty_restore_takes_no_snapshot() {
        let mut s = screen();
        s.preserve(Restore::empty(), |s| {
            assert_eq!(s.depth(), 0);
            s.at(Coord::new(8, 8))
        })
        .unwrap();
        assert_eq!(s.cursor(), Coord::new(8, 8));
    }

    // ── Writer gate ─────────────────────────────────────────────────────

    #[test]
    fn left_padding_from_config() {
        let mut s = Screen::with_sink(
            ScreenConfig::default()
                .with_left_padding(3)
                .with_flush_threshold(usize::MAX),
            Box::new(io::sink()),
        );
        s.writer_mut().set_line_start(true);
        s.write("a\nb").unwrap();
        assert_eq!(take(&mut s), "   a\n   b");
        assert_eq!(s.cursor(), Coord::new(2, 5));
    }
}
