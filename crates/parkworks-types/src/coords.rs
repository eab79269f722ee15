//! World and tile coordinate types.
//!
//! World coordinates are measured in units where one tile spans
//! [`COORDS_XY_STEP`] units on each horizontal axis. Heights share the same
//! unit. Directions are the four compass rotations `0..=3`; any larger
//! value is masked with [`DIRECTION_MASK`] when rotating, but compared
//! verbatim when matching elements.
//!
//! All arithmetic saturates so that malformed network input can never
//! overflow; a saturated coordinate simply fails the bounds check.

use serde::{Deserialize, Serialize};

/// World units per tile along x and y.
pub const COORDS_XY_STEP: i32 = 32;

/// Half a tile, used to centre UI feedback on a tile.
pub const COORDS_XY_HALF_TILE: i32 = 16;

/// Height of one land step in world units.
pub const LAND_HEIGHT_STEP: i32 = 16;

/// Mask applied to a direction before rotating.
pub const DIRECTION_MASK: u8 = 3;

/// A horizontal world position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CoordsXY {
    /// East-west position in world units.
    pub x: i32,
    /// North-south position in world units.
    pub y: i32,
}

impl CoordsXY {
    /// Create a new horizontal position.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Rotate this offset by a quarter-turn count.
    ///
    /// Direction 0 is the identity; each further step turns the offset a
    /// further 90 degrees.
    pub const fn rotate(self, direction: u8) -> Self {
        match direction & DIRECTION_MASK {
            0 => self,
            1 => Self {
                x: self.y,
                y: self.x.saturating_neg(),
            },
            2 => Self {
                x: self.x.saturating_neg(),
                y: self.y.saturating_neg(),
            },
            _ => Self {
                x: self.y.saturating_neg(),
                y: self.x,
            },
        }
    }

    /// Translate by another offset.
    pub const fn translated(self, by: Self) -> Self {
        Self {
            x: self.x.saturating_add(by.x),
            y: self.y.saturating_add(by.y),
        }
    }

    /// The tile containing this position.
    pub const fn to_tile(self) -> TileCoordsXY {
        TileCoordsXY {
            x: self.x.div_euclid(COORDS_XY_STEP),
            y: self.y.div_euclid(COORDS_XY_STEP),
        }
    }

    /// The centre of the tile this position names, as used for UI anchors.
    pub const fn to_tile_centre(self) -> Self {
        Self {
            x: self.x.saturating_add(COORDS_XY_HALF_TILE),
            y: self.y.saturating_add(COORDS_XY_HALF_TILE),
        }
    }
}

/// A world position with height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CoordsXYZ {
    /// East-west position in world units.
    pub x: i32,
    /// North-south position in world units.
    pub y: i32,
    /// Height in world units.
    pub z: i32,
}

impl CoordsXYZ {
    /// Create a new 3D position.
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// The horizontal part of this position.
    pub const fn xy(self) -> CoordsXY {
        CoordsXY {
            x: self.x,
            y: self.y,
        }
    }

    /// Rotate the horizontal part by a quarter-turn count; z is unchanged.
    pub const fn rotate(self, direction: u8) -> Self {
        let xy = self.xy().rotate(direction);
        Self {
            x: xy.x,
            y: xy.y,
            z: self.z,
        }
    }

    /// Translate by an offset on all three axes.
    pub const fn translated(self, by: Self) -> Self {
        Self {
            x: self.x.saturating_add(by.x),
            y: self.y.saturating_add(by.y),
            z: self.z.saturating_add(by.z),
        }
    }

    /// Translate by the negation of an offset on all three axes.
    pub const fn minus(self, by: Self) -> Self {
        Self {
            x: self.x.saturating_sub(by.x),
            y: self.y.saturating_sub(by.y),
            z: self.z.saturating_sub(by.z),
        }
    }
}

/// A world position with height and facing direction.
///
/// This is the location descriptor every placement-style command carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct CoordsXYZD {
    /// East-west position in world units.
    pub x: i32,
    /// North-south position in world units.
    pub y: i32,
    /// Height in world units.
    pub z: i32,
    /// Facing direction, `0..=3` for valid input.
    pub direction: u8,
}

impl CoordsXYZD {
    /// Create a new directed position.
    pub const fn new(x: i32, y: i32, z: i32, direction: u8) -> Self {
        Self { x, y, z, direction }
    }

    /// The horizontal part of this position.
    pub const fn xy(self) -> CoordsXY {
        CoordsXY {
            x: self.x,
            y: self.y,
        }
    }

    /// The position without its direction.
    pub const fn xyz(self) -> CoordsXYZ {
        CoordsXYZ {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

/// A tile index pair (world coordinates divided by [`COORDS_XY_STEP`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub struct TileCoordsXY {
    /// Tile column.
    pub x: i32,
    /// Tile row.
    pub y: i32,
}

impl TileCoordsXY {
    /// Create a new tile index pair.
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The world position of this tile's north-west corner.
    pub const fn to_coords(self) -> CoordsXY {
        CoordsXY {
            x: self.x.saturating_mul(COORDS_XY_STEP),
            y: self.y.saturating_mul(COORDS_XY_STEP),
        }
    }
}

/// An axis-aligned rectangle of world positions, inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct MapRange {
    /// Western edge.
    pub left: i32,
    /// Northern edge.
    pub top: i32,
    /// Eastern edge.
    pub right: i32,
    /// Southern edge.
    pub bottom: i32,
}

impl MapRange {
    /// Create a range from two corners.
    pub const fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    /// Return the same range with `left <= right` and `top <= bottom`.
    pub fn normalise(self) -> Self {
        Self {
            left: self.left.min(self.right),
            top: self.top.min(self.bottom),
            right: self.left.max(self.right),
            bottom: self.top.max(self.bottom),
        }
    }

    /// The centre of the range, used as the UI anchor for area tools.
    pub const fn centre(self) -> CoordsXY {
        CoordsXY {
            x: self
                .left
                .saturating_add(self.right.saturating_sub(self.left).div_euclid(2)),
            y: self
                .top
                .saturating_add(self.bottom.saturating_sub(self.top).div_euclid(2)),
        }
    }

    /// World positions of every tile corner inside the range, row by row.
    ///
    /// The range is normalised first; positions step by one tile.
    pub fn tiles(self) -> impl Iterator<Item = CoordsXY> {
        let range = self.normalise();
        let first = CoordsXY::new(range.left, range.top).to_tile();
        let last = CoordsXY::new(range.right, range.bottom).to_tile();
        (first.y..=last.y).flat_map(move |ty| {
            (first.x..=last.x).map(move |tx| TileCoordsXY::new(tx, ty).to_coords())
        })
    }
}
