// SPDX-License-Identifier: MIT
//
// Buffered terminal output with logical-cursor tracking.
//
// `OutBuffer` accumulates everything bound for the terminal in memory and
// hands it to the sink in one write, either on request or once the pending
// bytes pass a threshold. It never asks the terminal where the cursor is.
// Instead, printable text advances a caller-owned logical cursor:
//
//   "abc"       → column += 3 (display width, so wide glyphs count double)
//   "ab\ncd"    → row += 1, column = padding + 1 + 2
//
// Escape sequences go through the `io::Write` impl, which appends bytes and
// touches nothing else. Non-printing bytes must never count as cursor
// advance, and keeping the two paths separate makes that impossible to get
// wrong.
//
// Left padding: with `padding > 0`, every line start (the first append after
// `set_line_start(true)`, and every embedded newline) is followed by that many
// spaces, so a multi-line block can be written indented without the caller
// tracking line breaks.

use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};

use tracing::{trace, warn};
use unicode_width::UnicodeWidthStr;

use crate::ansi;
use crate::coord::Coord;

/// Default auto-flush threshold in bytes.
pub const DEFAULT_THRESHOLD: usize = 120;

/// Pending-output accumulator in front of a terminal sink.
///
/// On drop it appends an attribute reset and flushes, so the terminal is
/// never left colored when the process ends.
pub struct OutBuffer {
    buf: Vec<u8>,
    sink: Box<dyn Write>,
    threshold: usize,
    padding: usize,
    line_start: bool,
    tracking: bool,
}

impl OutBuffer {
    /// Buffer in front of an arbitrary sink.
    #[must_use]
    pub fn new(sink: Box<dyn Write>, threshold: usize) -> Self {
        Self {
            buf: Vec::with_capacity(threshold.saturating_add(64).min(16_384)),
            sink,
            threshold,
            padding: 0,
            line_start: false,
            tracking: true,
        }
    }

    // ── Settings ────────────────────────────────────────────────────────

    /// Set the left padding width (0 disables padding).
    pub const fn set_padding(&mut self, padding: usize) {
        self.padding = padding;
    }

    #[inline]
    #[must_use]
    pub const fn padding(&self) -> usize {
        self.padding
    }

    /// Mark whether the next append begins a fresh line (padding applies).
    pub const fn set_line_start(&mut self, line_start: bool) {
        self.line_start = line_start;
    }

    #[inline]
    #[must_use]
    pub const fn is_line_start(&self) -> bool {
        self.line_start
    }

    /// Gate cursor tracking for [`append`](Self::append).
    ///
    /// With tracking off, appended text leaves the logical cursor alone.
    /// Use it for text that does not move the real cursor.
    pub const fn set_tracking(&mut self, tracking: bool) {
        self.tracking = tracking;
    }

    #[inline]
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.tracking
    }

    #[inline]
    #[must_use]
    pub const fn threshold(&self) -> usize {
        self.threshold
    }

    // ── Writing ─────────────────────────────────────────────────────────

    /// Append printable text, advancing `cursor` when tracking is on.
    ///
    /// # Errors
    ///
    /// Returns an error if the append triggers an auto-flush that fails.
    pub fn append(&mut self, text: &str, cursor: &mut Coord) -> io::Result<()> {
        if self.padding > 0 && self.line_start {
            self.push_padding();
            if self.tracking {
                cursor.col += to_i32(self.padding);
            }
            self.line_start = false;
        }

        let mut lines = text.split('\n');
        if let Some(first) = lines.next() {
            self.buf.extend_from_slice(first.as_bytes());
            if self.tracking {
                cursor.col += to_i32(first.width());
            }
        }
        for line in lines {
            self.buf.push(b'\n');
            self.push_padding();
            self.buf.extend_from_slice(line.as_bytes());
            if self.tracking {
                cursor.row += 1;
                cursor.col = to_i32(self.padding) + 1 + to_i32(line.width());
            }
        }

        self.flush_if_full()
    }

    /// Flush if the pending bytes exceed the threshold.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails.
    pub fn flush_if_full(&mut self) -> io::Result<()> {
        if self.buf.len() > self.threshold {
            self.flush()?;
        }
        Ok(())
    }

    /// Hand all pending bytes to the sink and empty the buffer.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to the sink fails. The pending bytes are
    /// kept in that case.
    pub fn flush(&mut self) -> io::Result<()> {
        if !self.buf.is_empty() {
            trace!(bytes = self.buf.len(), "flush");
            self.sink.write_all(&self.buf)?;
            self.sink.flush()?;
            self.buf.clear();
        }
        Ok(())
    }

    fn push_padding(&mut self) {
        self.buf.resize(self.buf.len() + self.padding, b' ');
    }

    // ── Inspection ──────────────────────────────────────────────────────

    /// Number of pending bytes.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Pending output as text (for tests and debugging).
    #[must_use]
    pub fn pending(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.buf)
    }

    /// Drop pending output without writing it.
    pub fn discard(&mut self) {
        self.buf.clear();
    }
}

/// Raw, untracked append. Used for escape sequences.
impl Write for OutBuffer {
    #[inline]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buf.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Self::flush(self)
    }
}

impl Drop for OutBuffer {
    fn drop(&mut self) {
        let _ = ansi::reset(self);
        if let Err(e) = Self::flush(self) {
            warn!(error = %e, "final flush failed");
        }
    }
}

impl fmt::Debug for OutBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutBuffer")
            .field("pending", &self.buf.len())
            .field("threshold", &self.threshold)
            .field("padding", &self.padding)
            .field("line_start", &self.line_start)
            .field("tracking", &self.tracking)
            .finish_non_exhaustive()
    }
}

fn to_i32(n: usize) -> i32 {
    i32::try_from(n).unwrap_or(i32::MAX)
}
