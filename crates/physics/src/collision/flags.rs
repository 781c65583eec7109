//! Content and surface flags for collision filtering.
//!
//! Content flags decide which brushes a query can hit. Surface flags carry
//! the per-brush rules the character controller asks about (can it be
//! stepped onto, can it act as a base).

use serde::{Deserialize, Serialize};

/// Content flags describe what type of volume something is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ContentFlags(pub u32);

impl ContentFlags {
    /// Empty space - nothing here.
    pub const EMPTY: Self = Self(0);

    /// Solid world geometry - walls, floors, etc.
    pub const SOLID: Self = Self(1 << 0);

    /// Pawn clip - blocks characters but nothing else.
    pub const PAWN_CLIP: Self = Self(1 << 1);

    /// Trigger volume - never blocks movement.
    pub const TRIGGER: Self = Self(1 << 2);

    /// Another pawn's body.
    pub const PAWN_BODY: Self = Self(1 << 3);

    /// Standard mask for character movement queries.
    pub const MASK_PAWN_SOLID: Self = Self(Self::SOLID.0 | Self::PAWN_CLIP.0 | Self::PAWN_BODY.0);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Check if any of the given flags are set.
    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }
}

impl std::ops::BitOr for ContentFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// Surface flags describe how a character may interact with a brush.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct SurfaceFlags(pub u32);

impl SurfaceFlags {
    /// No special properties.
    pub const NONE: Self = Self(0);

    /// Characters may not step up onto this surface.
    pub const NO_STEP_UP: Self = Self(1 << 0);

    /// Characters may not use this surface as a base.
    pub const NO_BASE: Self = Self(1 << 1);

    /// Check if these flags contain a specific flag.
    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }
}

impl std::ops::BitOr for SurfaceFlags {
    type Output = Self;
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}
