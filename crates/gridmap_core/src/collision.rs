//! Per-cell collision edge flags

use serde::{Deserialize, Serialize};

fn default_blocked() -> bool {
    true
}

/// One of the four edges of a grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollisionEdge {
    North,
    South,
    East,
    West,
}

impl CollisionEdge {
    /// All four edges, in the serialized field order
    pub const ALL: [CollisionEdge; 4] = [
        CollisionEdge::North,
        CollisionEdge::South,
        CollisionEdge::East,
        CollisionEdge::West,
    ];

    /// Get the display name of this edge
    pub fn name(&self) -> &'static str {
        match self {
            CollisionEdge::North => "north",
            CollisionEdge::South => "south",
            CollisionEdge::East => "east",
            CollisionEdge::West => "west",
        }
    }
}

/// Collision flags for one grid cell: `true` = movement across that edge
/// is blocked
///
/// A fresh cell blocks all four edges. The collision grid is shared across
/// every layer of a map; there is one cell here per grid coordinate, not
/// per layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollisionTile {
    #[serde(default = "default_blocked")]
    pub north: bool,
    #[serde(default = "default_blocked")]
    pub south: bool,
    #[serde(default = "default_blocked")]
    pub east: bool,
    #[serde(default = "default_blocked")]
    pub west: bool,
}

impl Default for CollisionTile {
    fn default() -> Self {
        Self {
            north: true,
            south: true,
            east: true,
            west: true,
        }
    }
}

impl CollisionTile {
    /// A cell blocking no edges
    pub fn open() -> Self {
        Self {
            north: false,
            south: false,
            east: false,
            west: false,
        }
    }

    /// Get one edge flag
    pub fn edge(&self, edge: CollisionEdge) -> bool {
        match edge {
            CollisionEdge::North => self.north,
            CollisionEdge::South => self.south,
            CollisionEdge::East => self.east,
            CollisionEdge::West => self.west,
        }
    }

    /// Set one edge flag
    pub fn set_edge(&mut self, edge: CollisionEdge, blocked: bool) {
        match edge {
            CollisionEdge::North => self.north = blocked,
            CollisionEdge::South => self.south = blocked,
            CollisionEdge::East => self.east = blocked,
            CollisionEdge::West => self.west = blocked,
        }
    }

    /// Flip one edge flag, leaving the other three untouched
    pub fn toggle(&mut self, edge: CollisionEdge) {
        self.set_edge(edge, !self.edge(edge));
    }

    /// Check if every edge is blocked
    pub fn is_fully_blocked(&self) -> bool {
        self.north && self.south && self.east && self.west
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_blocks_all_edges() {
        let tile = CollisionTile::default();
        assert!(tile.is_fully_blocked());
        for edge in CollisionEdge::ALL {
            assert!(tile.edge(edge));
        }
    }

    #[test]
    fn test_toggle_flips_only_one_edge() {
        let mut tile = CollisionTile::default();
        tile.toggle(CollisionEdge::North);

        assert!(!tile.north);
        assert!(tile.south);
        assert!(tile.east);
        assert!(tile.west);

        tile.toggle(CollisionEdge::North);
        assert!(tile.is_fully_blocked());
    }

    #[test]
    fn test_deserialize_missing_edges_default_blocked() {
        let tile: CollisionTile = serde_json::from_str(r#"{ "north": false }"#).unwrap();
        assert!(!tile.north);
        assert!(tile.south);
        assert!(tile.east);
        assert!(tile.west);
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut tile = CollisionTile::default();
        tile.toggle(CollisionEdge::West);

        let json = serde_json::to_string(&tile).unwrap();
        let parsed: CollisionTile = serde_json::from_str(&json).unwrap();
        assert_eq!(tile, parsed);
    }
}
