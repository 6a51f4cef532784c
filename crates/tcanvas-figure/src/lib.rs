// SPDX-License-Identifier: MIT
//
// tcanvas-figure: shapes and collision for tcanvas.
//
// Points, lines, filled blocks and groups, all drawing through a
// `tcanvas_term::Screen`. Each shape enumerates its boundary through one
// restartable protocol, and collision detection is built on that protocol
// alone, so a group of mixed shapes collides exactly like a single block.

pub mod block;
pub mod collision;
pub mod figure;
pub mod group;
pub mod line;
pub mod point;

#[cfg(test)]
mod testing;

pub use block::Block;
pub use collision::Axis;
pub use figure::{Boundary, Colors, Figure, Pattern, join};
pub use group::Group;
pub use line::{Line, Orientation};
pub use point::Point;
