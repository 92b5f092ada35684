//! Contact detection between the plane, obstacles and the world bounds
//!
//! Produces the per-tick collision / pass signals the round consumes.

use super::obstacle::Obstacle;
use super::plane::{Plane, PlaneState};
use crate::consts::*;

/// Signals observed during the last step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contacts {
    pub collided: bool,
    pub passed: u32,
}

/// Check whether the plane touches the rocks of one obstacle
pub fn hits_obstacle(plane: &Plane, obstacle: &Obstacle) -> bool {
    let dx = (plane.pos.x - obstacle.pos.x).abs();
    if dx > OBSTACLE_HALF_WIDTH + PLANE_RADIUS {
        return false;
    }
    let dy = (plane.pos.y - obstacle.pos.y).abs();
    dy + PLANE_RADIUS > OBSTACLE_GAP_HALF_HEIGHT
}

/// Check whether the plane touches the ground or ceiling
pub fn hits_bounds(plane: &Plane) -> bool {
    plane.pos.y - PLANE_RADIUS <= WORLD_FLOOR || plane.pos.y + PLANE_RADIUS >= WORLD_CEILING
}

/// Did the obstacle's center cross the plane during the last `dt`?
pub fn crossed_plane(plane: &Plane, obstacle: &Obstacle, dt: f32) -> bool {
    let prev_x = obstacle.pos.x + obstacle.speed * dt;
    prev_x > plane.pos.x && obstacle.pos.x <= plane.pos.x
}

/// Detect contacts for the current state
///
/// A crashed or idle plane produces no signals.
pub fn detect<'a>(
    plane: &Plane,
    obstacles: impl IntoIterator<Item = &'a Obstacle>,
    dt: f32,
) -> Contacts {
    let mut contacts = Contacts::default();
    if plane.state != PlaneState::Playing {
        return contacts;
    }

    contacts.collided = hits_bounds(plane);
    for obstacle in obstacles {
        if hits_obstacle(plane, obstacle) {
            contacts.collided = true;
        }
        if crossed_plane(plane, obstacle, dt) {
            contacts.passed += 1;
        }
    }
    contacts
}
