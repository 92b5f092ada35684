//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (pool creation order)
//! - No rendering, audio or platform dependencies

pub mod contact;
pub mod entity;
pub mod obstacle;
pub mod plane;
pub mod pool;
pub mod round;

pub use contact::{Contacts, detect};
pub use entity::{EntityId, IdAllocator};
pub use obstacle::{Obstacle, ObstacleSpawner, SpawnError};
pub use plane::{Plane, PlaneState};
pub use pool::{Pool, PoolError, PoolLifecycle, Poolable};
pub use round::{RoundController, RoundEvent, RoundPhase, SceneCommand, SpawnSchedule, TickInput};
