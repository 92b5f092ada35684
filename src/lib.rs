//! Pux Plane - an obstacle-dodging arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (obstacle pool, actors, round state machine)
//! - `session`: Session data and round lifecycle (reload / main menu)
//! - `settings`: Audio preferences and gameplay tuning

pub mod session;
pub mod settings;
pub mod sim;

pub use session::{Session, SessionData, SessionError};
pub use settings::{ObstacleTuning, PlaneTuning, RoundTuning, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Fixed simulation timestep (50 Hz)
    pub const SIM_DT: f32 = 1.0 / 50.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Horizontal position of the plane (the world scrolls past it)
    pub const PLANE_X: f32 = -3.0;
    /// Collision radius of the plane
    pub const PLANE_RADIUS: f32 = 0.3;

    /// Ground and ceiling heights
    pub const WORLD_FLOOR: f32 = -4.5;
    pub const WORLD_CEILING: f32 = 4.5;

    /// Obstacle body half width
    pub const OBSTACLE_HALF_WIDTH: f32 = 0.5;
    /// Half height of the gap the plane flies through
    pub const OBSTACLE_GAP_HALF_HEIGHT: f32 = 1.4;
}

/// Linearly remap `value` from `[in_min, in_max]` to `[out_min, out_max]`
#[inline]
pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
    if (in_max - in_min).abs() <= f32::EPSILON {
        return out_min;
    }
    out_min + (value - in_min) * (out_max - out_min) / (in_max - in_min)
}
