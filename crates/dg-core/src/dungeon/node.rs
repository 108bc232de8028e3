//! Dungeon nodes and the ordered node collection
//!
//! Rooms and doors are both nodes. Edges are stored on both endpoints: a door
//! lists its two rooms, and each room lists the doors that open into it.

use hashbrown::HashMap;

use super::rect::{DungeonRect, Point};

/// Stable handle to a node
///
/// Ids are handed out in creation order and are not reused until the graph
/// is cleared, so a handle stays valid while other nodes are removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Node category
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::EnumIter,
    strum::IntoStaticStr,
)]
pub enum NodeKind {
    Room,
    Door,
}

/// A room or a door
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    id: NodeId,
    kind: NodeKind,
    bounds: DungeonRect,
    neighbors: Vec<NodeId>,
}

impl Node {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn bounds(&self) -> DungeonRect {
        self.bounds
    }

    pub fn center(&self) -> Point {
        self.bounds.center()
    }

    /// Adjacent nodes, in the order the edges were created
    pub fn neighbors(&self) -> &[NodeId] {
        &self.neighbors
    }

    pub fn is_room(&self) -> bool {
        self.kind == NodeKind::Room
    }

    pub fn is_door(&self) -> bool {
        self.kind == NodeKind::Door
    }

    fn add_neighbor(&mut self, other: NodeId) {
        if !self.neighbors.contains(&other) {
            self.neighbors.push(other);
        }
    }

    fn remove_neighbor(&mut self, other: NodeId) {
        self.neighbors.retain(|&n| n != other);
    }
}

/// A room removed from the graph together with the doors that went with it
#[derive(Debug, Clone)]
pub struct RemovedRoom {
    pub room: Node,
    pub doors: Vec<Node>,
}

/// Ordered collection of dungeon nodes
///
/// Every mutation here is atomic with respect to the edge invariants: after
/// any public method returns, the neighbor relation is symmetric and doors
/// only ever point at rooms.
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    /// Position of every node in `nodes`
    index: HashMap<NodeId, usize>,
    next_id: u32,
}

impl NodeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a graph holding a single room
    pub fn with_room(bounds: DungeonRect) -> Self {
        let mut graph = Self::new();
        graph.add_room(bounds);
        graph
    }

    /// Drop every node and restart id allocation
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.index.clear();
        self.next_id = 0;
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Nodes in collection order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn rooms(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_room())
    }

    pub fn doors(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| n.is_door())
    }

    pub fn room_count(&self) -> usize {
        self.rooms().count()
    }

    pub fn door_count(&self) -> usize {
        self.doors().count()
    }

    /// Position of a node in collection order
    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get(&id).copied()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|idx| &self.nodes[idx])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index_of(id).is_some()
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        let idx = self.index_of(id)?;
        self.nodes.get_mut(idx)
    }

    /// Remove the node at `idx` and shift the positions behind it
    fn remove_at(&mut self, idx: usize) -> Node {
        let node = self.nodes.remove(idx);
        self.index.remove(&node.id);
        for (pos, later) in self.nodes.iter().enumerate().skip(idx) {
            self.index.insert(later.id, pos);
        }
        node
    }

    fn alloc_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn push(&mut self, kind: NodeKind, bounds: DungeonRect) -> NodeId {
        let id = self.alloc_id();
        self.index.insert(id, self.nodes.len());
        self.nodes.push(Node {
            id,
            kind,
            bounds,
            neighbors: Vec::new(),
        });
        id
    }

    /// Append a room with no edges
    pub fn add_room(&mut self, bounds: DungeonRect) -> NodeId {
        self.push(NodeKind::Room, bounds)
    }

    /// Append a 1x1 door at `cell` and link it to both rooms
    ///
    /// Returns `None` (and changes nothing) unless `a` and `b` are two
    /// distinct rooms in this graph.
    pub fn add_door(&mut self, cell: Point, a: NodeId, b: NodeId) -> Option<NodeId> {
        if a == b {
            return None;
        }
        let both_rooms = [a, b]
            .iter()
            .all(|&id| self.get(id).is_some_and(Node::is_room));
        if !both_rooms {
            return None;
        }

        let door = self.push(NodeKind::Door, DungeonRect::cell(cell.x, cell.y));
        for room in [a, b] {
            if let Some(node) = self.get_mut(room) {
                node.add_neighbor(door);
            }
            if let Some(node) = self.get_mut(door) {
                node.add_neighbor(room);
            }
        }
        Some(door)
    }

    /// Replace an edge-free room with two rooms appended at the end
    ///
    /// Returns `None` if `id` is not a room or still has doors.
    pub fn replace_room(&mut self, id: NodeId, parts: [DungeonRect; 2]) -> Option<[NodeId; 2]> {
        let idx = self.index_of(id)?;
        let node = &self.nodes[idx];
        if !node.is_room() || !node.neighbors.is_empty() {
            return None;
        }
        self.remove_at(idx);
        let first = self.add_room(parts[0]);
        let second = self.add_room(parts[1]);
        Some([first, second])
    }

    /// Remove a room and every door attached to it
    ///
    /// Each removed door is also stripped from the neighbor list of the room
    /// on its far side.
    pub fn remove_room(&mut self, id: NodeId) -> Option<RemovedRoom> {
        let idx = self.index_of(id)?;
        if !self.nodes[idx].is_room() {
            return None;
        }
        let room = self.remove_at(idx);

        let mut doors = Vec::with_capacity(room.neighbors.len());
        for &door_id in &room.neighbors {
            let Some(door_idx) = self.index_of(door_id) else {
                continue;
            };
            let door = self.remove_at(door_idx);
            for &far in door.neighbors.iter().filter(|&&n| n != id) {
                if let Some(far_room) = self.get_mut(far) {
                    far_room.remove_neighbor(door_id);
                }
            }
            doors.push(door);
        }

        Some(RemovedRoom { room, doors })
    }
}

impl<'a> IntoIterator for &'a NodeGraph {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_rooms() -> (NodeGraph, NodeId, NodeId) {
        let mut graph = NodeGraph::new();
        let a = graph.add_room(DungeonRect::new(0, 0, 10, 10));
        let b = graph.add_room(DungeonRect::new(10, 0, 10, 10));
        (graph, a, b)
    }

    #[test]
    fn test_add_door_links_both_sides() {
        let (mut graph, a, b) = two_rooms();
        let door = graph.add_door(Point::new(10, 4), a, b).unwrap();

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.get(door).unwrap().neighbors(), &[a, b]);
        assert_eq!(graph.get(a).unwrap().neighbors(), &[door]);
        assert_eq!(graph.get(b).unwrap().neighbors(), &[door]);
        assert_eq!(graph.get(door).unwrap().bounds(), DungeonRect::cell(10, 4));
        assert_eq!(graph.get(door).unwrap().kind(), NodeKind::Door);
    }

    #[test]
    fn test_add_door_rejects_bad_endpoints() {
        let (mut graph, a, b) = two_rooms();
        assert!(graph.add_door(Point::new(0, 0), a, a).is_none());
        assert!(graph.add_door(Point::new(0, 0), a, NodeId(99)).is_none());

        let door = graph.add_door(Point::new(10, 4), a, b).unwrap();
        assert!(graph.add_door(Point::new(0, 0), a, door).is_none());
        assert_eq!(graph.door_count(), 1);
    }

    #[test]
    fn test_replace_room_appends_children() {
        let mut graph = NodeGraph::new();
        let first = graph.add_room(DungeonRect::new(0, 0, 20, 20));
        let other = graph.add_room(DungeonRect::new(20, 0, 5, 20));

        let [lo, hi] = graph
            .replace_room(
                first,
                [DungeonRect::new(0, 0, 20, 8), DungeonRect::new(0, 8, 20, 12)],
            )
            .unwrap();

        let order: Vec<NodeId> = graph.iter().map(Node::id).collect();
        assert_eq!(order, vec![other, lo, hi]);
        assert!(!graph.contains(first));
    }

    #[test]
    fn test_replace_room_refuses_connected_room() {
        let (mut graph, a, b) = two_rooms();
        graph.add_door(Point::new(10, 4), a, b).unwrap();
        let parts = [DungeonRect::new(0, 0, 5, 10), DungeonRect::new(5, 0, 5, 10)];
        assert!(graph.replace_room(a, parts).is_none());
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_remove_room_strips_far_side() {
        let mut graph = NodeGraph::new();
        let a = graph.add_room(DungeonRect::new(0, 0, 10, 10));
        let b = graph.add_room(DungeonRect::new(10, 0, 10, 10));
        let c = graph.add_room(DungeonRect::new(20, 0, 10, 10));
        let ab = graph.add_door(Point::new(10, 5), a, b).unwrap();
        let bc = graph.add_door(Point::new(20, 5), b, c).unwrap();

        let removed = graph.remove_room(b).unwrap();
        assert_eq!(removed.room.id(), b);
        assert_eq!(removed.doors.len(), 2);

        assert_eq!(graph.len(), 2);
        assert!(!graph.contains(ab));
        assert!(!graph.contains(bc));
        assert!(graph.get(a).unwrap().neighbors().is_empty());
        assert!(graph.get(c).unwrap().neighbors().is_empty());
    }

    #[test]
    fn test_remove_room_ignores_doors() {
        let (mut graph, a, b) = two_rooms();
        let door = graph.add_door(Point::new(10, 4), a, b).unwrap();
        assert!(graph.remove_room(door).is_none());
        assert!(graph.remove_room(NodeId(42)).is_none());
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_lookup_survives_removals() {
        let mut graph = NodeGraph::new();
        let ids: Vec<NodeId> = (0..6)
            .map(|i| graph.add_room(DungeonRect::new(i * 10, 0, 10, 10)))
            .collect();
        graph.remove_room(ids[1]).unwrap();
        graph.remove_room(ids[3]).unwrap();

        for (pos, node) in graph.iter().enumerate() {
            assert_eq!(graph.index_of(node.id()), Some(pos));
            assert_eq!(graph.get(node.id()), Some(node));
        }
        assert!(!graph.contains(ids[1]));
        assert_eq!(graph.get(ids[5]).unwrap().bounds(), DungeonRect::new(50, 0, 10, 10));

        let [lo, hi] = graph
            .replace_room(
                ids[0],
                [DungeonRect::new(0, 0, 5, 10), DungeonRect::new(5, 0, 5, 10)],
            )
            .unwrap();
        assert_eq!(graph.index_of(lo), Some(graph.len() - 2));
        assert_eq!(graph.index_of(hi), Some(graph.len() - 1));
        assert_eq!(graph.index_of(ids[2]), Some(0));
    }

    #[test]
    fn test_clear_restarts_ids() {
        let (mut graph, _, _) = two_rooms();
        graph.clear();
        assert!(graph.is_empty());
        let id = graph.add_room(DungeonRect::new(0, 0, 1, 1));
        assert_eq!(id, NodeId(0));
    }
}
