//! Deterministic 2D platformer movement core.
//!
//! Bodies move under gravity, jump with a variable charge plus coyote time and
//! input buffering, and resolve collisions against static axis-aligned
//! geometry with a unit-step sweep. The host owns all state and drives it one
//! fixed tick at a time through [`step`]; identical inputs replay to
//! bit-identical positions.
//!
//! Coordinates are y-down. Velocities are in units per 60 Hz frame; timers are
//! in milliseconds. See [`time`] for the two time bases.

#![allow(clippy::many_single_char_names)]

pub mod config;
pub mod dash;
pub mod entity;
pub mod error;
pub mod hitbox;
pub mod jump;
pub mod movement;
pub mod player;
pub mod projectile;
pub mod time;
pub mod vector;
pub mod world;

/// Simulation rate the velocity units are expressed in.
pub const HZ: f64 = 60.0;

pub use config::{DashConfig, JumpConfig, MotionConfig, Params, ProjectileConfig};
pub use dash::{Dash, DashUpdate};
pub use entity::{Entity, Intent, MoveEvents};
pub use error::ConfigError;
pub use hitbox::Hitbox;
pub use jump::{Footing, JumpEvents, JumpPhase, JumpState};
pub use movement::{probe_ground, resolve_movement, Blocked, Sweep};
pub use player::{step, Buttons, Facing, Player};
pub use projectile::{Projectile, ProjectileOutcome};
pub use time::{Countdown, FixedTimestep, Frames, Millis, Tick};
pub use vector::Vector;
pub use world::Room;
