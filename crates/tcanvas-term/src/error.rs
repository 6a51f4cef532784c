// SPDX-License-Identifier: MIT
//
// Error taxonomy for the canvas engine.
//
// Every failure is local: callers get a `Result` and decide how to react
// (a paddle that cannot grow reverses, a script with a typo is rejected
// before it draws anything). The one exception is `Io`. If stdout is gone
// there is nothing left to draw on, so it is the only fatal kind.

use std::io;

use thiserror::Error;

/// Result alias used throughout the canvas crates.
pub type Result<T> = std::result::Result<T, Error>;

/// Canvas errors.
#[derive(Error, Debug)]
pub enum Error {
    /// A color name that is not in the palette.
    #[error("unknown color name: {0:?}")]
    UnknownColorName(String),

    /// A style name that is not in the palette.
    #[error("unknown style name: {0:?}")]
    UnknownStyleName(String),

    /// The script interpreter hit a token it cannot finish scanning.
    #[error("malformed directive at byte {offset}: {reason}")]
    MalformedDirective { offset: usize, reason: &'static str },

    /// A block resize would leave the screen or collapse the block.
    #[error("invalid resize to {width}x{height}")]
    InvalidResize { width: i32, height: i32 },

    /// Writing to the output stream failed.
    #[error("output stream error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Stable short name for the error kind (useful in logs).
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::UnknownColorName(_) => "unknown_color",
            Self::UnknownStyleName(_) => "unknown_style",
            Self::MalformedDirective { .. } => "malformed_directive",
            Self::InvalidResize { .. } => "invalid_resize",
            Self::Io(_) => "io",
        }
    }

    /// Whether the error means the output stream itself is unusable.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
