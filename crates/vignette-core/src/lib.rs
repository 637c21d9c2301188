//! Vignette Core - Core types and utilities shared by the Vignette crates
//!
//! This crate provides the foundational types:
//! - Mathematical primitives (re-exported from glam)
//! - Transform and color types for scene nodes
//! - Wall-clock sources and frame time

pub mod time;
pub mod types;

pub use glam::{Quat, Vec2, Vec3};
pub use time::{Clock, GameTime, ManualClock, SystemClock, TimeConfig};
pub use types::{Color, EntityId, Transform};
