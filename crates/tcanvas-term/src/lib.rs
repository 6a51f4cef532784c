// SPDX-License-Identifier: MIT
//
// tcanvas-term: terminal output engine for tcanvas.
//
// Everything between "draw this" and the bytes on stdout: a buffered writer
// that tracks the logical cursor without asking the terminal, a `Screen`
// that deduplicates color and style changes and offers save/restore of the
// visual state, and a small escape-script language for drawing outlines.
//
// The terminal is never queried during drawing. The logical state is kept
// correct by construction, which is what makes per-frame output cheap.

pub mod ansi;
pub mod config;
pub mod coord;
pub mod error;
pub mod output;
pub mod palette;
pub mod screen;
pub mod script;
pub mod state;
pub mod terminal;
pub mod timing;

pub use config::ScreenConfig;
pub use coord::{Coord, Direction};
pub use error::{Error, Result};
pub use palette::{Palette, Rgb, StyleKind};
pub use screen::{Restore, Screen};
pub use script::{Script, ScriptOptions};
pub use state::VisualState;
