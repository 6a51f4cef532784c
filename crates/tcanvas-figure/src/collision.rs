// SPDX-License-Identifier: MIT
//
// Collision queries.
//
// Both forms walk boundaries through `Boundary` and never look at concrete
// figure types. Directions name where the figure's boundary lies relative
// to the other party:
//
//   boundary row above the query row   → UP
//   boundary row below                 → DOWN
//   boundary column right of the query → RIGHT
//   boundary column left               → LEFT
//
// A figure with no boundary points never collides.

use tcanvas_term::{Coord, Direction};

use crate::figure::{Boundary, Figure};

/// Which distance a point query measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Rows only: the query is the horizontal line through the point.
    Horizontal,
    /// Columns only: the query is the vertical line through the point.
    Vertical,
    /// Both, reported together.
    Both,
}

/// Test `figure`'s boundary against the line(s) through `query`.
///
/// With a single axis the first boundary point within `dist` decides and
/// the scan stops there. A point exactly on the line counts as `UP` (or
/// `LEFT`). With [`Axis::Both`] the boundary is scanned once per axis and
/// every side that comes within `dist` is reported; points exactly on a
/// line add nothing.
pub fn with_point<F>(figure: &mut F, query: Coord, axis: Axis, dist: i32) -> Direction
where
    F: Figure + ?Sized,
{
    let rows = |p: Coord| p.row - query.row;
    let cols = |p: Coord| p.col - query.col;

    match axis {
        Axis::Horizontal => first_hit(figure, rows, dist, Direction::DOWN, Direction::UP),
        Axis::Vertical => first_hit(figure, cols, dist, Direction::RIGHT, Direction::LEFT),
        Axis::Both => {
            sides_hit(figure, rows, dist, Direction::DOWN, Direction::UP)
                | sides_hit(figure, cols, dist, Direction::RIGHT, Direction::LEFT)
        }
    }
}

/// Test two figures against each other.
///
/// Every boundary point of `a` is paired with every boundary point of `b`.
/// Points sharing a column within `dist` rows report `UP`/`DOWN`; points
/// sharing a row within `dist` columns report `LEFT`/`RIGHT`. The scan stops
/// once all four sides are found.
pub fn with_figure<A, B>(a: &mut A, b: &mut B, dist: i32) -> Direction
where
    A: Figure + ?Sized,
    B: Figure + ?Sized,
{
    let mut hits = Direction::empty();

    'outer: for p in Boundary::new(a) {
        for q in Boundary::new(&mut *b) {
            if p.col == q.col {
                hits |= side(p.row - q.row, dist, Direction::DOWN, Direction::UP);
            }
            if p.row == q.row {
                hits |= side(p.col - q.col, dist, Direction::RIGHT, Direction::LEFT);
            }
            if hits.is_all() {
                break 'outer;
            }
        }
    }
    hits
}

/// `positive`/`negative` for a signed offset within `dist`; nothing for an
/// offset of zero or out of range.
fn side(offset: i32, dist: i32, positive: Direction, negative: Direction) -> Direction {
    if offset.abs() > dist || offset == 0 {
        Direction::empty()
    } else if offset > 0 {
        positive
    } else {
        negative
    }
}

fn first_hit<F, O>(figure: &mut F, offset: O, dist: i32, positive: Direction, negative: Direction) -> Direction
where
    F: Figure + ?Sized,
    O: Fn(Coord) -> i32,
{
    Boundary::new(figure)
        .map(offset)
        .find(|d| d.abs() <= dist)
        .map_or(Direction::empty(), |d| if d > 0 { positive } else { negative })
}

fn sides_hit<F, O>(figure: &mut F, offset: O, dist: i32, positive: Direction, negative: Direction) -> Direction
where
    F: Figure + ?Sized,
    O: Fn(Coord) -> i32,
{
    let both = positive | negative;
    let mut hits = Direction::empty();
    for d in Boundary::new(figure).map(offset) {
        hits |= side(d, dist, positive, negative);
        if hits == both {
            break;
        }
    }
    hits
}
