//! Density pruning
//!
//! Removes the smallest rooms (with their doors) one at a time, checking
//! connectivity after every removal. The first removal that splits the graph
//! stops pruning; it is kept and reported, not rolled back.

use std::convert::Infallible;
use std::ops::ControlFlow;

use tracing::{debug, warn};

use super::connectivity::ConnectivityValidator;
use super::node::{NodeGraph, NodeId};
use super::rect::DungeonRect;

/// Default share of the node count that may be pruned
pub const DEFAULT_PRUNE_FRACTION: f64 = 0.1;

/// One pruned room
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrunedRoom {
    pub room: NodeId,
    pub bounds: DungeonRect,
    pub doors_removed: usize,
}

/// Outcome of a single pruning step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PruneStep {
    /// Room removed, graph still connected
    Removed(PrunedRoom),
    /// Room removed and the graph fell apart
    Disconnected(PrunedRoom),
}

impl PruneStep {
    pub fn pruned(&self) -> &PrunedRoom {
        match self {
            PruneStep::Removed(p) | PruneStep::Disconnected(p) => p,
        }
    }
}

/// Summary of a full pruning pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PruneOutcome {
    pub budget: usize,
    pub removed: Vec<PrunedRoom>,
    pub disconnected: bool,
}

impl PruneOutcome {
    /// The room whose removal split the graph, if any
    pub fn disconnected_by(&self) -> Option<NodeId> {
        if !self.disconnected {
            return None;
        }
        self.removed.last().map(|p| p.room)
    }
}

/// Removes small rooms without breaking connectivity
#[derive(Debug, Clone, Copy)]
pub struct RoomPruner {
    fraction: f64,
    validator: ConnectivityValidator,
}

impl Default for RoomPruner {
    fn default() -> Self {
        Self::new(DEFAULT_PRUNE_FRACTION)
    }
}

impl RoomPruner {
    pub fn new(fraction: f64) -> Self {
        Self {
            fraction: fraction.clamp(0.0, 1.0),
            validator: ConnectivityValidator::new(),
        }
    }

    /// `floor(fraction * node_count)`
    pub fn budget(&self, node_count: usize) -> usize {
        (self.fraction * node_count as f64).floor() as usize
    }

    /// Rooms to prune, smallest area first, cut to the budget
    ///
    /// Rooms of equal area keep their collection order.
    pub fn plan(&self, graph: &NodeGraph) -> Vec<NodeId> {
        let mut rooms: Vec<(i64, NodeId)> = graph
            .rooms()
            .map(|n| (n.bounds().area(), n.id()))
            .collect();
        rooms.sort_by_key(|&(area, _)| area);
        rooms
            .into_iter()
            .take(self.budget(graph.len()))
            .map(|(_, id)| id)
            .collect()
    }

    /// Remove one room with its doors, then re-check connectivity
    pub fn prune_room(&self, graph: &mut NodeGraph, room: NodeId) -> Option<PruneStep> {
        let removed = graph.remove_room(room)?;
        let pruned = PrunedRoom {
            room,
            bounds: removed.room.bounds(),
            doors_removed: removed.doors.len(),
        };
        debug!(
            room = %room,
            bounds = %pruned.bounds,
            doors = pruned.doors_removed,
            "pruned room"
        );

        if self.validator.validate(graph) {
            Some(PruneStep::Removed(pruned))
        } else {
            warn!(room = %room, "pruning disconnected the layout, stopping");
            Some(PruneStep::Disconnected(pruned))
        }
    }

    /// Run a full pass over the plan, handing every removal to `on_prune`
    ///
    /// The first removal that disconnects the graph ends the pass; it is
    /// kept and recorded on the outcome. A breaking hook stops the pass
    /// right after the step it was shown.
    pub fn prune_with<B>(
        &self,
        graph: &mut NodeGraph,
        mut on_prune: impl FnMut(&PruneStep, &NodeGraph) -> ControlFlow<B>,
    ) -> ControlFlow<B, PruneOutcome> {
        let plan = self.plan(graph);
        let mut outcome = PruneOutcome {
            budget: self.budget(graph.len()),
            ..PruneOutcome::default()
        };
        for room in plan {
            let Some(step) = self.prune_room(graph, room) else {
                continue;
            };
            outcome.removed.push(*step.pruned());
            outcome.disconnected = matches!(step, PruneStep::Disconnected(_));

            if let ControlFlow::Break(stop) = on_prune(&step, graph) {
                return ControlFlow::Break(stop);
            }
            if outcome.disconnected {
                break;
            }
        }
        ControlFlow::Continue(outcome)
    }

    /// Run a full pass over the plan
    pub fn prune(&self, graph: &mut NodeGraph) -> PruneOutcome {
        match self.prune_with(graph, |_, _| ControlFlow::<Infallible>::Continue(())) {
            ControlFlow::Continue(outcome) => outcome,
            ControlFlow::Break(never) => match never {},
        }
    }
}
