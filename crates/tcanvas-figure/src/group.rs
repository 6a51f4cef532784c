// SPDX-License-Identifier: MIT
//
// Composite figures.
//
// A group owns its members and acts on them as one: clear all, translate
// all, draw all. Moving member by member would let a later member's clear
// erase an earlier member's fresh cells wherever they touch.
//
// The group's boundary is the members' boundaries back to back. A member
// that runs out has already rewound itself, so the group just moves on to
// the next; a reset rewinds the member currently being walked.

use tcanvas_term::{Coord, Restore, Result, Screen};

use crate::figure::{Colors, Figure};

/// An ordered collection of owned figures.
#[derive(Debug, Default)]
pub struct Group {
    members: Vec<Box<dyn Figure>>,
    anchor: Option<usize>,
    cursor: usize,
}

impl Group {
    /// Group already-drawn figures. `anchor` picks the member whose origin
    /// is the group's position; without one the first member is used.
    #[must_use]
    pub fn new(members: Vec<Box<dyn Figure>>, anchor: Option<usize>) -> Self {
        Self {
            members,
            anchor,
            cursor: 0,
        }
    }

    /// Append a member. Rewinds the boundary cursor.
    pub fn push(&mut self, member: Box<dyn Figure>) {
        self.members.push(member);
        self.rewind();
    }

    /// Take member `index` out of the group, leaving its cells on screen.
    /// An anchor on that member is dropped; later anchors shift down.
    pub fn remove(&mut self, index: usize) -> Option<Box<dyn Figure>> {
        if index >= self.members.len() {
            return None;
        }
        self.rewind();
        self.anchor = match self.anchor {
            Some(a) if a == index => None,
            Some(a) if a > index => Some(a - 1),
            other => other,
        };
        Some(self.members.remove(index))
    }

    #[must_use]
    pub fn members(&self) -> &[Box<dyn Figure>] {
        &self.members
    }

    /// Mutable access to the members. Changing their shape or position
    /// directly bypasses the group's clear-all/draw-all discipline.
    pub fn members_mut(&mut self) -> &mut [Box<dyn Figure>] {
        self.rewind();
        &mut self.members
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    #[must_use]
    pub const fn anchor(&self) -> Option<usize> {
        self.anchor
    }

    fn rewind(&mut self) {
        if let Some(member) = self.members.get_mut(self.cursor) {
            member.next_point(true);
        }
        self.cursor = 0;
    }
}

impl Figure for Group {
    /// The anchor member's origin (first member by default). An empty
    /// group has no position.
    fn position(&self) -> Coord {
        self.anchor
            .and_then(|i| self.members.get(i))
            .or_else(|| self.members.first())
            .map_or(Coord::INVALID, |m| m.position())
    }

    fn translate(&mut self, delta: Coord) {
        for member in &mut self.members {
            member.translate(delta);
        }
    }

    fn set_colors(&mut self, colors: Colors<'_>) {
        for member in &mut self.members {
            member.set_colors(colors);
        }
    }

    fn draw(&self, screen: &mut Screen, restore: Restore) -> Result<()> {
        screen.preserve(restore, |s| {
            self.members
                .iter()
                .try_for_each(|m| m.draw(s, Restore::empty()))
        })
    }

    fn clear(&self, screen: &mut Screen, restore: Restore) -> Result<()> {
        screen.preserve(restore, |s| {
            self.members
                .iter()
                .try_for_each(|m| m.clear(s, Restore::empty()))
        })
    }

    /// Erases every member, then the group itself is gone.
    fn erase(self: Box<Self>, screen: &mut Screen, restore: Restore) -> Result<()> {
        let Self { members, .. } = *self;
        screen.preserve(restore, |s| {
            members
                .into_iter()
                .try_for_each(|m| m.erase(s, Restore::empty()))
        })
    }

    fn next_point(&mut self, reset: bool) -> Option<Coord> {
        if reset {
            self.rewind();
            return None;
        }
        while let Some(member) = self.members.get_mut(self.cursor) {
            if let Some(point) = member.next_point(false) {
                return Some(point);
            }
            self.cursor += 1;
        }
        self.cursor = 0;
        None
    }
}
