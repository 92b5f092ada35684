//! The player's plane

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::consts::PLANE_X;
use crate::remap;
use crate::settings::PlaneTuning;

/// Plane control state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaneState {
    /// Bobbing in place, waiting for the round to start
    Idle,
    /// Under player control
    Playing,
    /// Hit something; frozen in place
    Crashed,
}

/// The controlled actor
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plane {
    pub pos: Vec2,
    pub vel_y: f32,
    pub state: PlaneState,
    tuning: PlaneTuning,
    start_y: f32,
    /// Seconds spent idling (drives the bob)
    idle_time: f32,
}

impl Plane {
    pub fn new(tuning: PlaneTuning) -> Self {
        Self {
            pos: Vec2::new(PLANE_X, 0.0),
            vel_y: 0.0,
            state: PlaneState::Idle,
            tuning,
            start_y: 0.0,
            idle_time: 0.0,
        }
    }

    pub fn set_state(&mut self, state: PlaneState) {
        if state == PlaneState::Crashed {
            self.vel_y = 0.0;
        }
        self.state = state;
    }

    /// Vertical speed that lifts the plane exactly `ascend_height`
    pub fn ascend_speed(&self) -> f32 {
        (-2.0 * self.tuning.ascend_height * self.tuning.gravity).sqrt()
    }

    /// Advance one fixed step
    pub fn step(&mut self, dt: f32, ascend: bool) {
        match self.state {
            PlaneState::Idle => {
                self.idle_time += dt;
                let bob = (self.idle_time * self.tuning.bob_speed).sin() * self.tuning.bob_height;
                self.pos.y = self.start_y + bob;
            }
            PlaneState::Playing => {
                self.vel_y += self.tuning.gravity * dt;
                if ascend {
                    self.vel_y = self.ascend_speed();
                }
                self.pos.y += self.vel_y * dt;
            }
            PlaneState::Crashed => {}
        }
    }

    /// Nose tilt in degrees, clamped to the tilt limit
    pub fn tilt_degrees(&self) -> f32 {
        let limit = self.tuning.tilt_limit;
        (self.vel_y * self.tuning.tilt_modifier).clamp(-limit, limit)
    }

    /// Engine pitch for the audio layer, following the tilt
    pub fn engine_pitch(&self) -> f32 {
        let limit = self.tuning.tilt_limit;
        remap(
            self.tilt_degrees(),
            -limit,
            limit,
            self.tuning.engine_pitch_low,
            self.tuning.engine_pitch_high,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;

    #[test]
    fn test_idle_bob_stays_near_start() {
        let mut plane = Plane::new(PlaneTuning::default());
        for _ in 0..200 {
            plane.step(SIM_DT, false);
            assert!(plane.pos.y.abs() <= 0.15 + 1e-5);
        }
        assert_eq!(plane.vel_y, 0.0);
    }

    #[test]
    fn test_idle_ignores_ascend() {
        let mut plane = Plane::new(PlaneTuning::default());
        plane.step(SIM_DT, true);
        assert_eq!(plane.vel_y, 0.0);
    }

    #[test]
    fn test_ascend_sets_upward_speed() {
        let mut plane = Plane::new(PlaneTuning::default());
        plane.set_state(PlaneState::Playing);
        plane.step(SIM_DT, true);
        // sqrt(2 * 1.5 * 30)
        assert!((plane.vel_y - 90.0f32.sqrt()).abs() < 1e-4);
        assert!(plane.pos.y > 0.0);
    }

    #[test]
    fn test_falls_without_input() {
        let mut plane = Plane::new(PlaneTuning::default());
        plane.set_state(PlaneState::Playing);
        for _ in 0..10 {
            plane.step(SIM_DT, false);
        }
        assert!(plane.vel_y < 0.0);
        assert!(plane.pos.y < 0.0);
    }

    #[test]
    fn test_crash_freezes() {
        let mut plane = Plane::new(PlaneTuning::default());
        plane.set_state(PlaneState::Playing);
        plane.step(SIM_DT, true);
        plane.set_state(PlaneState::Crashed);
        let pos = plane.pos;

        plane.step(SIM_DT, true);
        plane.step(SIM_DT, false);
        assert_eq!(plane.pos, pos);
        assert_eq!(plane.vel_y, 0.0);
    }

    #[test]
    fn test_tilt_and_pitch_follow_velocity() {
        let mut plane = Plane::new(PlaneTuning::default());
        assert!((plane.engine_pitch() - 1.0).abs() < 1e-5);

        plane.vel_y = 100.0;
        assert_eq!(plane.tilt_degrees(), 60.0);
        assert!((plane.engine_pitch() - 1.2).abs() < 1e-5);

        plane.vel_y = -100.0;
        assert_eq!(plane.tilt_degrees(), -60.0);
        assert!((plane.engine_pitch() - 0.8).abs() < 1e-5);
    }
}
