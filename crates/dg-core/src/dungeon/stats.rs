//! Summary numbers for a generated layout

use serde::Serialize;

use super::connectivity::count_components;
use super::node::NodeGraph;

/// Counts and sizes describing a node graph
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct LayoutStats {
    pub rooms: usize,
    pub doors: usize,
    pub total_room_area: i64,
    pub smallest_room_area: i64,
    pub largest_room_area: i64,
    /// Mean number of doors per room
    pub average_room_degree: f64,
    pub components: usize,
}

impl LayoutStats {
    pub fn of(graph: &NodeGraph) -> Self {
        let areas: Vec<i64> = graph.rooms().map(|n| n.bounds().area()).collect();
        let rooms = areas.len();
        let door_links: usize = graph.rooms().map(|n| n.neighbors().len()).sum();

        Self {
            rooms,
            doors: graph.door_count(),
            total_room_area: areas.iter().sum(),
            smallest_room_area: areas.iter().copied().min().unwrap_or(0),
            largest_room_area: areas.iter().copied().max().unwrap_or(0),
            average_room_degree: if rooms == 0 {
                0.0
            } else {
                door_links as f64 / rooms as f64
            },
            components: count_components(graph),
        }
    }
}
