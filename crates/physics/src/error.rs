//! Error types for the edges of the physics crate.
//!
//! Movement itself never fails: every geometric edge case is handled by
//! policy inside the controller. Errors only surface when building a
//! collision world or validating a configuration.

use thiserror::Error;

/// A movement configuration that cannot be simulated.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("capsule radius must be positive, got {0}")]
    InvalidRadius(f32),

    #[error("capsule half-height {half_height} must be at least the radius {radius}")]
    InvalidHalfHeight { half_height: f32, radius: f32 },

    #[error("crouched half-height {crouched} must lie between the radius {radius} and the standing half-height {standing}")]
    InvalidCrouchedHalfHeight {
        crouched: f32,
        radius: f32,
        standing: f32,
    },

    #[error("{name} must be within [0, 1], got {value}")]
    FloorZOutOfRange { name: &'static str, value: f32 },

    #[error("slidable floor Z {slidable} must not exceed walkable floor Z {walkable}")]
    SlideSteeperThanWalk { slidable: f32, walkable: f32 },

    #[error("{name} must be positive, got {value}")]
    NonPositiveDuration { name: &'static str, value: f32 },

    #[error("{name} must not be negative, got {value}")]
    Negative { name: &'static str, value: f32 },
}

/// Geometry that could not be added to a [`CollisionWorld`](crate::collision::CollisionWorld).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WorldError {
    #[error("convex hull could not be computed from {0} points")]
    InvalidConvexHull(usize),

    #[error("invalid triangle mesh: {0}")]
    InvalidMesh(String),
}
