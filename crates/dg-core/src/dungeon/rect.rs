//! Integer rectangles for room and door bounds
//!
//! Rectangles are half-open on the grid: a rect at `(x, y)` with size
//! `(width, height)` covers cells `x..x + width` by `y..y + height`, and its
//! boundary lines sit at `x`, `x + width`, `y` and `y + height`.

/// A grid point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis of a split or of a shared boundary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
pub enum Axis {
    X,
    Y,
}

impl Axis {
    /// The other axis
    pub fn other(self) -> Axis {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Axis-aligned integer rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DungeonRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl DungeonRect {
    /// Create a new rectangle
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// A 1x1 cell rectangle
    pub const fn cell(x: i32, y: i32) -> Self {
        Self::new(x, y, 1, 1)
    }

    /// Right boundary (exclusive)
    pub fn x_max(&self) -> i32 {
        self.x + self.width
    }

    /// Bottom boundary (exclusive)
    pub fn y_max(&self) -> i32 {
        self.y + self.height
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// Extent along an axis
    pub fn extent(&self, axis: Axis) -> i32 {
        match axis {
            Axis::X => self.width,
            Axis::Y => self.height,
        }
    }

    /// Area in cells
    pub fn area(&self) -> i64 {
        self.width as i64 * self.height as i64
    }

    /// Check if the rectangle has positive size
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0
    }

    /// `position + size / 2`, integer division
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2, self.y + self.height / 2)
    }

    /// Corners in the order min, (max x, min y), (min x, max y), max
    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.x, self.y),
            Point::new(self.x_max(), self.y),
            Point::new(self.x, self.y_max()),
            Point::new(self.x_max(), self.y_max()),
        ]
    }

    /// Check if the rectangles overlap or share any boundary point
    pub fn touches(&self, other: &DungeonRect) -> bool {
        self.x <= other.x_max()
            && other.x <= self.x_max()
            && self.y <= other.y_max()
            && other.y <= self.y_max()
    }

    /// Check if the interiors overlap (shared edges do not count)
    pub fn overlaps(&self, other: &DungeonRect) -> bool {
        self.x < other.x_max()
            && other.x < self.x_max()
            && self.y < other.y_max()
            && other.y < self.y_max()
    }

    /// Check if the rectangles meet at a single corner point only
    pub fn touches_only_at_corner(&self, other: &DungeonRect) -> bool {
        let a = self.corners();
        let b = other.corners();
        // corner i of one rect against the diagonally opposite corner 3 - i of the other
        (0..4).any(|i| a[i] == b[3 - i])
    }

    /// Check if this rectangle fully contains another
    pub fn contains(&self, other: &DungeonRect) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && self.x_max() >= other.x_max()
            && self.y_max() >= other.y_max()
    }

    /// Cut the rectangle at `offset` along `axis`
    ///
    /// Returns `[0, offset)` and `[offset, extent)`. Callers keep
    /// `0 < offset < extent`.
    pub fn split_at(&self, axis: Axis, offset: i32) -> (DungeonRect, DungeonRect) {
        match axis {
            Axis::X => (
                DungeonRect::new(self.x, self.y, offset, self.height),
                DungeonRect::new(self.x + offset, self.y, self.width - offset, self.height),
            ),
            Axis::Y => (
                DungeonRect::new(self.x, self.y, self.width, offset),
                DungeonRect::new(self.x, self.y + offset, self.width, self.height - offset),
            ),
        }
    }
}

impl std::fmt::Display for DungeonRect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {}) {}x{}", self.x, self.y, self.width, self.height)
    }
}
