// SPDX-License-Identifier: MIT
//
// Color and style registries.
//
// Scripts and figures refer to colors by name (`RED`, `OCHRE`) and styles by
// name (`BOLD`, `HIDE`). The palette maps those names to the payloads that go
// on the wire: an RGB triple for 24-bit SGR colors, and the tail of a CSI
// sequence for styles. Lookups are explicit: an unknown name is an error,
// never an empty payload that would produce a corrupt escape sequence.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

// ─── Rgb ─────────────────────────────────────────────────────────────────────

/// A 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

/// Formats as the SGR parameter list `r;g;b`.
impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{};{};{}", self.0, self.1, self.2)
    }
}

// ─── Style ───────────────────────────────────────────────────────────────────

/// What a style toggles.
///
/// Cursor visibility is not a text attribute: it is never recorded as the
/// screen's current style, so hiding the cursor cannot be "restored away".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleKind {
    Attribute,
    Visibility,
}

/// A registered style: the CSI tail (after `ESC[`) and its kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Style {
    pub suffix: String,
    pub kind: StyleKind,
}

// ─── Palette ─────────────────────────────────────────────────────────────────

/// Name → payload registries for colors and styles.
#[derive(Debug, Clone, Default)]
pub struct Palette {
    colors: BTreeMap<String, Rgb>,
    styles: BTreeMap<String, Style>,
}

#[rustfmt::skip]
const BUILTIN_COLORS: &[(&str, Rgb)] = &[
    ("RED",      Rgb(255, 0, 0)),
    ("GREEN",    Rgb(0, 255, 0)),
    ("BLUE",     Rgb(0, 0, 255)),
    ("BLACK",    Rgb(0, 0, 0)),
    ("WHITE",    Rgb(255, 255, 255)),
    ("YELLOW",   Rgb(255, 255, 0)),
    ("PURPLE",   Rgb(205, 65, 225)),
    ("PINK",     Rgb(255, 0, 125)),
    ("CYAN",     Rgb(0, 255, 255)),
    ("ROSE",     Rgb(150, 0, 75)),
    ("EMERALD",  Rgb(0, 200, 105)),
    ("OCHRE",    Rgb(204, 119, 34)),
    ("POOP",     Rgb(101, 67, 33)),
    ("SKY",      Rgb(50, 155, 255)),
    ("LAVENDER", Rgb(180, 100, 255)),
    ("BATHROOM", Rgb(100, 100, 255)),
    ("GRAY",     Rgb(32, 32, 32)),
    ("CONSOLE",  Rgb(12, 12, 12)),
];

#[rustfmt::skip]
const BUILTIN_STYLES: &[(&str, &str, StyleKind)] = &[
    ("HIDE",    "?25l", StyleKind::Visibility),
    ("UHIDE",   "?25h", StyleKind::Visibility),
    ("BOLD",    "1m",   StyleKind::Attribute),
    ("UBOLD",   "22m",  StyleKind::Attribute),
    ("ITALIC",  "3m",   StyleKind::Attribute),
    ("UITALIC", "23m",  StyleKind::Attribute),
    ("LINE",    "4m",   StyleKind::Attribute),
    ("ULINE",   "24m",  StyleKind::Attribute),
    ("STRIKE",  "9m",   StyleKind::Attribute),
    ("USTRIKE", "29m",  StyleKind::Attribute),
];

impl Palette {
    /// An empty palette.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The stock palette: 18 named colors and 10 styles.
    #[must_use]
    pub fn builtin() -> Self {
        let mut palette = Self::new();
        for &(name, rgb) in BUILTIN_COLORS {
            palette.insert_color(name, rgb);
        }
        for &(name, suffix, kind) in BUILTIN_STYLES {
            palette.insert_style(name, suffix, kind);
        }
        palette
    }

    /// Register (or replace) a color.
    pub fn insert_color(&mut self, name: &str, rgb: Rgb) {
        self.colors.insert(name.to_owned(), rgb);
    }

    /// Register (or replace) a style.
    pub fn insert_style(&mut self, name: &str, suffix: &str, kind: StyleKind) {
        self.styles.insert(
            name.to_owned(),
            Style {
                suffix: suffix.to_owned(),
                kind,
            },
        );
    }

    /// Look up a color by name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownColorName`] if the name is not registered.
    pub fn color(&self, name: &str) -> Result<Rgb> {
        self.colors
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownColorName(name.to_owned()))
    }

    /// Look up a style by name.
    ///
    /// # Errors
    ///
    /// [`Error::UnknownStyleName`] if the name is not registered.
    pub fn style(&self, name: &str) -> Result<&Style> {
        self.styles
            .get(name)
            .ok_or_else(|| Error::UnknownStyleName(name.to_owned()))
    }

    /// Color names in sorted order.
    pub fn color_names(&self) -> impl Iterator<Item = &str> {
        self.colors.keys().map(String::as_str)
    }

    /// Style names in sorted order.
    pub fn style_names(&self) -> impl Iterator<Item = &str> {
        self.styles.keys().map(String::as_str)
    }
}
