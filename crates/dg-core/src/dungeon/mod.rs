//! Dungeon layout system
//!
//! Rectangles, the node graph, and the generation stages that operate on it.

mod connectivity;
mod doors;
mod node;
mod prune;
mod rect;
mod split;
mod stats;

pub use connectivity::{ConnectivityValidator, count_components, is_connected, reachable_from};
pub use doors::{Contact, DoorPlacer, DoorRecord, SharedBoundary, detect_contact};
pub use node::{Node, NodeGraph, NodeId, NodeKind, RemovedRoom};
pub use prune::{DEFAULT_PRUNE_FRACTION, PruneOutcome, PruneStep, PrunedRoom, RoomPruner};
pub use rect::{Axis, DungeonRect, Point};
pub use split::{RectSplitter, SplitRecord};
pub use stats::LayoutStats;
