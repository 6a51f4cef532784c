// SPDX-License-Identifier: MIT
//
// Screen configuration.
//
// The canvas works against fixed bounds rather than the live terminal size:
// painting and reframing are limited to these numbers. Absolute jumps are
// not checked; `ScreenConfig::contains` is there for callers that want to.
// Everything here has a default that matches the stock games.

use std::time::Duration;

use crate::output::DEFAULT_THRESHOLD;
use crate::timing::DelayMode;

/// Default screen width in cells.
pub const DEFAULT_WIDTH: i32 = 188;

/// Default screen height in cells.
pub const DEFAULT_HEIGHT: i32 = 50;

/// Settings for a [`Screen`](crate::screen::Screen).
///
/// ```
/// use tcanvas_term::config::ScreenConfig;
///
/// let cfg = ScreenConfig::default().with_size(80, 24).with_background("BLACK");
/// assert_eq!(cfg.width, 80);
/// assert_eq!(cfg.background, "BLACK");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScreenConfig {
    pub width: i32,
    pub height: i32,
    /// Initial screen background color name.
    pub background: String,
    /// Default foreground for figures that do not name one.
    pub foreground: String,
    /// Auto-flush once more than this many bytes are pending.
    pub flush_threshold: usize,
    /// Left padding applied at line starts by the writer.
    pub left_padding: usize,
    /// Pause after every script token.
    pub token_delay: Duration,
    pub delay_mode: DelayMode,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            background: "CONSOLE".to_owned(),
            foreground: "WHITE".to_owned(),
            flush_threshold: DEFAULT_THRESHOLD,
            left_padding: 0,
            token_delay: Duration::ZERO,
            delay_mode: DelayMode::Spin,
        }
    }
}

impl ScreenConfig {
    #[must_use]
    pub const fn with_size(mut self, width: i32, height: i32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn with_background(mut self, name: &str) -> Self {
        name.clone_into(&mut self.background);
        self
    }

    #[must_use]
    pub fn with_foreground(mut self, name: &str) -> Self {
        name.clone_into(&mut self.foreground);
        self
    }

    #[must_use]
    pub const fn with_flush_threshold(mut self, bytes: usize) -> Self {
        self.flush_threshold = bytes;
        self
    }

    #[must_use]
    pub const fn with_left_padding(mut self, cells: usize) -> Self {
        self.left_padding = cells;
        self
    }

    #[must_use]
    pub const fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = delay;
        self
    }

    #[must_use]
    pub const fn with_delay_mode(mut self, mode: DelayMode) -> Self {
        self.delay_mode = mode;
        self
    }

    /// Whether (`row`, `col`) lies inside the configured bounds.
    #[must_use]
    pub const fn contains(&self, row: i32, col: i32) -> bool {
        row >= 1 && col >= 1 && row <= self.height && col <= self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_stock_games() {
        let cfg = ScreenConfig::default();
        assert_eq!((cfg.width, cfg.height), (188, 50));
        assert_eq!(cfg.background, "CONSOLE");
        assert_eq!(cfg.foreground, "WHITE");
        assert_eq!(cfg.flush_threshold, 120);
        assert_eq!(cfg.token_delay, Duration::ZERO);
        assert_eq!(cfg.delay_mode, DelayMode::Spin);
    }

    #[test]
    fn builders_chain() {
        let cfg = ScreenConfig::default()
            .with_size(40, 10)
            .with_foreground("GREEN")
            .with_flush_threshold(4096)
            .with_left_padding(2)
            .with_token_delay(Duration::from_millis(5));
        assert_eq!((cfg.width, cfg.height), (40, 10));
        assert_eq!(cfg.foreground, "GREEN");
        assert_eq!(cfg.flush_threshold, 4096);
        assert_eq!(cfg.left_padding, 2);
        assert_eq!(cfg.token_delay, Duration::from_millis(5));
    }

    #[test]
    fn contains_is_inclusive_one_indexed() {
        let cfg = ScreenConfig::default().with_size(10, 5);
        assert!(cfg.contains(1, 1));
        assert!(cfg.contains(5, 10));
        assert!(!cfg.contains(0, 1));
        assert!(!cfg.contains(6, 1));
        assert!(!cfg.contains(1, 11));
    }
}
