//! Core types shared by the terrain and collision crates.
//!
//! This crate provides the foundational types used across all engine systems:
//! - Kinematic state and ECS tag components for characters
//! - The `HeightSource` seam between terrain synthesis and collision
//! - Fixed-step simulation time
//! - Configuration validation errors

pub mod components;
pub mod error;
pub mod height;
pub mod time;

pub use components::*;
pub use error::*;
pub use height::*;
pub use time::*;

// Re-export commonly used types
pub use glam::{Vec2, Vec3};
pub use hecs::{Entity, World};
