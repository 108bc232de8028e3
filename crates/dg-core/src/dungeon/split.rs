//! Recursive binary partitioning of the start room
//!
//! One step finds the first room (in collection order) that can still be
//! halved and replaces it with two rooms. Stepping until nothing is eligible
//! partitions the start rectangle into rooms no wider than twice the
//! minimum room size on either axis.

use std::convert::Infallible;
use std::ops::ControlFlow;

use tracing::debug;

use crate::config::MinRoomSize;
use crate::rng::DungeonRng;

use super::node::{NodeGraph, NodeId};
use super::rect::{Axis, DungeonRect};

/// Result of one split
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitRecord {
    pub parent: NodeId,
    pub parent_bounds: DungeonRect,
    pub axis: Axis,
    pub offset: i32,
    pub children: [NodeId; 2],
}

/// Partitions rooms until every room is below the split threshold
#[derive(Debug, Clone, Copy)]
pub struct RectSplitter {
    min_room_size: MinRoomSize,
}

impl RectSplitter {
    pub fn new(min_room_size: MinRoomSize) -> Self {
        Self { min_room_size }
    }

    fn min_along(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.min_room_size.x,
            Axis::Y => self.min_room_size.y,
        }
    }

    /// Check if `rect` can be cut in two along `axis`
    ///
    /// Widened to i64 so a huge minimum cannot wrap the doubled threshold.
    fn fits_on(&self, rect: &DungeonRect, axis: Axis) -> bool {
        i64::from(rect.extent(axis)) >= 2 * i64::from(self.min_along(axis))
    }

    /// `width >= 2 * min.x` or `height >= 2 * min.y`
    pub fn is_eligible(&self, rect: &DungeonRect) -> bool {
        self.fits_on(rect, Axis::X) || self.fits_on(rect, Axis::Y)
    }

    /// Axis a rect is cut along
    ///
    /// Wider-than-tall rects split on X, everything else (square included)
    /// on Y. If the preferred axis cannot hold two minimum-size halves the
    /// other axis is used.
    pub fn split_axis(&self, rect: &DungeonRect) -> Option<Axis> {
        let preferred = if rect.width > rect.height {
            Axis::X
        } else {
            Axis::Y
        };
        [preferred, preferred.other()]
            .into_iter()
            .find(|&axis| self.fits_on(rect, axis))
    }

    /// First room in collection order that is still eligible
    pub fn next_candidate(&self, graph: &NodeGraph) -> Option<NodeId> {
        graph
            .rooms()
            .find(|node| self.is_eligible(&node.bounds()))
            .map(|node| node.id())
    }

    /// Perform a single split, or return `None` when no room is eligible
    pub fn step(&self, graph: &mut NodeGraph, rng: &mut DungeonRng) -> Option<SplitRecord> {
        let parent = self.next_candidate(graph)?;
        let parent_bounds = graph.get(parent)?.bounds();
        let axis = self.split_axis(&parent_bounds)?;

        let min = self.min_along(axis);
        let offset = rng.range_inclusive(min, parent_bounds.extent(axis) - min);
        let (lo, hi) = parent_bounds.split_at(axis, offset);
        let children = graph.replace_room(parent, [lo, hi])?;

        debug!(
            parent = %parent,
            bounds = %parent_bounds,
            axis = %axis,
            offset,
            "split room"
        );

        Some(SplitRecord {
            parent,
            parent_bounds,
            axis,
            offset,
            children,
        })
    }

    /// Split until exhaustion, handing every split to `on_split`
    ///
    /// Stops early when the hook breaks; otherwise returns the number of
    /// splits performed.
    pub fn split_all_with<B>(
        &self,
        graph: &mut NodeGraph,
        rng: &mut DungeonRng,
        mut on_split: impl FnMut(&SplitRecord, &NodeGraph) -> ControlFlow<B>,
    ) -> ControlFlow<B, usize> {
        let mut splits = 0;
        while let Some(record) = self.step(graph, rng) {
            splits += 1;
            if let ControlFlow::Break(stop) = on_split(&record, graph) {
                return ControlFlow::Break(stop);
            }
        }
        ControlFlow::Continue(splits)
    }

    /// Split until exhaustion, returning the number of splits performed
    pub fn split_all(&self, graph: &mut NodeGraph, rng: &mut DungeonRng) -> usize {
        match self.split_all_with(graph, rng, |_, _| ControlFlow::<Infallible>::Continue(())) {
            ControlFlow::Continue(splits) => splits,
            ControlFlow::Break(never) => match never {},
        }
    }
}
