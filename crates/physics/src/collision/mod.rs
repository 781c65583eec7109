//! Collision queries for capsule character movement.
//!
//! The movement code only talks to the world through [`CollisionQuery`]:
//! capsule sweeps and line traces returning a [`HitResult`]. This module also
//! provides [`CollisionWorld`], a parry3d-backed implementation.
//!
//! # Key Types
//!
//! - [`CollisionQuery`]: The call contract the controller runs against
//! - [`CollisionWorld`]: Brushes (boxes, hulls, meshes) answering those queries
//! - [`HitResult`]: Output from a sweep or trace
//! - [`CapsuleShape`]: Radius and half-height of the character capsule
//!
//! # Hit Normals
//!
//! A hit carries two normals:
//! - `normal`: from the impact point back toward the swept shape
//! - `impact_normal`: the face that was actually struck
//!
//! They differ when a capsule's rounded end rests on an edge, which the
//! movement code uses to detect perching and valid landing spots.

mod flags;
mod hit;
mod query;
mod world;

pub use flags::{ContentFlags, SurfaceFlags};
pub use hit::{CapsuleShape, HitResult, ObjectId, QueryFilter};
pub use query::CollisionQuery;
pub use world::{CollisionBrush, CollisionWorld};
