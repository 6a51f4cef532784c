// SPDX-License-Identifier: MIT
//
// Visual state: where the cursor is and which attributes are active.
//
// The same type serves three roles: the screen's logical state (what the
// writer believes the terminal looks like right now), a snapshot on the
// save stack, and a figure's own position and colors.
//
// Colors and style are palette names, not payloads. `None` means "unknown":
// after an attribute reset the terminal is back at its defaults, which we
// cannot name, so the next color request must be emitted unconditionally.

use crate::coord::Coord;

/// Cursor position plus active color and style names.
///
/// Equality deliberately ignores `style`: two states with the same position
/// and colors compare equal even if one is bold. Save/restore comparisons
/// inherit this.
#[derive(Debug, Clone, Default, Eq)]
pub struct VisualState {
    pub coord: Coord,
    pub fg: Option<String>,
    pub bg: Option<String>,
    pub style: Option<String>,
}

impl VisualState {
    /// A state at `coord` with the given colors and no tracked style.
    #[must_use]
    pub fn new(coord: Coord, fg: Option<&str>, bg: Option<&str>) -> Self {
        Self {
            coord,
            fg: fg.map(str::to_owned),
            bg: bg.map(str::to_owned),
            style: None,
        }
    }

    /// Builder: set the style name.
    #[must_use]
    pub fn with_style(mut self, style: &str) -> Self {
        self.style = Some(style.to_owned());
        self
    }

    #[inline]
    #[must_use]
    pub fn fg(&self) -> Option<&str> {
        self.fg.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn bg(&self) -> Option<&str> {
        self.bg.as_deref()
    }

    #[inline]
    #[must_use]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }
}

impl PartialEq for VisualState {
    fn eq(&self, other: &Self) -> bool {
        self.coord == other.coord && self.fg == other.fg && self.bg == other.bg
    }
}
