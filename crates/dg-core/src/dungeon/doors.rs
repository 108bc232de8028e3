//! Room adjacency and door placement
//!
//! Two rooms are adjacent when they share a stretch of boundary. Rooms that
//! meet at a single corner are not adjacent. Each shared boundary long enough
//! to hold a door with a one-cell margin on both ends gets a 1x1 door node
//! linked to both rooms.

use std::convert::Infallible;
use std::ops::ControlFlow;

use tracing::debug;

use crate::rng::DungeonRng;

use super::node::{NodeGraph, NodeId};
use super::rect::{Axis, DungeonRect, Point};

/// A boundary segment shared by two rectangles
///
/// `line` is the shared coordinate (an x for a vertical wall, a y for a
/// horizontal wall) and `start..end` is the overlap along the wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedBoundary {
    /// Axis a door in this wall opens along
    pub opens_along: Axis,
    pub line: i32,
    pub start: i32,
    pub end: i32,
}

impl SharedBoundary {
    pub fn len(&self) -> i32 {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.len() <= 0
    }

    /// Door cell at position `along` on this wall
    pub fn cell_at(&self, along: i32) -> Point {
        match self.opens_along {
            Axis::X => Point::new(self.line, along),
            Axis::Y => Point::new(along, self.line),
        }
    }
}

/// How two room rectangles meet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Contact {
    /// No shared point at all
    Apart,
    /// Interiors intersect (never happens for partitioned rooms)
    Overlapping,
    /// Only a corner point is shared
    CornerOnly,
    /// One or both walls are shared
    Shared {
        vertical: Option<SharedBoundary>,
        horizontal: Option<SharedBoundary>,
    },
}

/// Classify the contact between two rectangles
pub fn detect_contact(a: &DungeonRect, b: &DungeonRect) -> Contact {
    if !a.touches(b) {
        return Contact::Apart;
    }
    if a.overlaps(b) {
        return Contact::Overlapping;
    }
    if a.touches_only_at_corner(b) {
        return Contact::CornerOnly;
    }

    let vertical = shared_line(a.x, a.x_max(), b.x, b.x_max()).map(|line| SharedBoundary {
        opens_along: Axis::X,
        line,
        start: a.y.max(b.y),
        end: a.y_max().min(b.y_max()),
    });
    let horizontal = shared_line(a.y, a.y_max(), b.y, b.y_max()).map(|line| SharedBoundary {
        opens_along: Axis::Y,
        line,
        start: a.x.max(b.x),
        end: a.x_max().min(b.x_max()),
    });

    if vertical.is_none() && horizontal.is_none() {
        return Contact::Apart;
    }
    Contact::Shared {
        vertical,
        horizontal,
    }
}

/// Shared boundary coordinate when one span ends exactly where the other starts
fn shared_line(a_lo: i32, a_hi: i32, b_lo: i32, b_hi: i32) -> Option<i32> {
    if b_lo == a_hi {
        Some(a_hi)
    } else if a_lo == b_hi {
        Some(b_hi)
    } else {
        None
    }
}

/// A door inserted between two rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoorRecord {
    pub door: NodeId,
    pub rooms: [NodeId; 2],
    pub cell: Point,
    pub opens_along: Axis,
}

/// Places doors on shared room boundaries
#[derive(Debug, Clone, Copy, Default)]
pub struct DoorPlacer;

impl DoorPlacer {
    pub fn new() -> Self {
        Self
    }

    /// Every unordered pair of rooms, in collection order
    pub fn room_pairs(&self, graph: &NodeGraph) -> Vec<(NodeId, NodeId)> {
        let rooms: Vec<NodeId> = graph.rooms().map(|n| n.id()).collect();
        let mut pairs = Vec::with_capacity(rooms.len() * rooms.len().saturating_sub(1) / 2);
        for (i, &a) in rooms.iter().enumerate() {
            for &b in &rooms[i + 1..] {
                pairs.push((a, b));
            }
        }
        pairs
    }

    /// Pick a door position on a wall, keeping one free cell at each end
    ///
    /// Walls of length 1 or less never get a door; walls too short for the
    /// margin (length 2 or 3) get none either.
    pub fn door_cell(&self, wall: &SharedBoundary, rng: &mut DungeonRng) -> Option<Point> {
        if wall.len() <= 1 {
            return None;
        }
        rng.strictly_between(wall.start + 1, wall.end - 1)
            .map(|along| wall.cell_at(along))
    }

    /// Check one pair of rooms and insert a door per usable shared wall
    pub fn connect_pair(
        &self,
        graph: &mut NodeGraph,
        a: NodeId,
        b: NodeId,
        rng: &mut DungeonRng,
    ) -> Vec<DoorRecord> {
        let (Some(node_a), Some(node_b)) = (graph.get(a), graph.get(b)) else {
            return Vec::new();
        };
        if a == b || !node_a.is_room() || !node_b.is_room() {
            return Vec::new();
        }

        let Contact::Shared {
            vertical,
            horizontal,
        } = detect_contact(&node_a.bounds(), &node_b.bounds())
        else {
            return Vec::new();
        };

        let mut placed = Vec::new();
        for wall in [vertical, horizontal].into_iter().flatten() {
            let Some(cell) = self.door_cell(&wall, rng) else {
                continue;
            };
            if let Some(door) = graph.add_door(cell, a, b) {
                debug!(door = %door, a = %a, b = %b, x = cell.x, y = cell.y, "placed door");
                placed.push(DoorRecord {
                    door,
                    rooms: [a, b],
                    cell,
                    opens_along: wall.opens_along,
                });
            }
        }
        placed
    }

    /// Check every room pair, handing each placed door to `on_door`
    ///
    /// Stops early when the hook breaks; otherwise returns the number of
    /// doors placed.
    pub fn connect_all_with<B>(
        &self,
        graph: &mut NodeGraph,
        rng: &mut DungeonRng,
        mut on_door: impl FnMut(&DoorRecord, &NodeGraph) -> ControlFlow<B>,
    ) -> ControlFlow<B, usize> {
        let mut doors = 0;
        for (a, b) in self.room_pairs(graph) {
            for record in self.connect_pair(graph, a, b, rng) {
                doors += 1;
                if let ControlFlow::Break(stop) = on_door(&record, graph) {
                    return ControlFlow::Break(stop);
                }
            }
        }
        ControlFlow::Continue(doors)
    }

    /// Check every room pair, returning the number of doors placed
    pub fn connect_all(&self, graph: &mut NodeGraph, rng: &mut DungeonRng) -> usize {
        match self.connect_all_with(graph, rng, |_, _| ControlFlow::<Infallible>::Continue(())) {
            ControlFlow::Continue(doors) => doors,
            ControlFlow::Break(never) => match never {},
        }
    }
}
