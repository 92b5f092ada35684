//! Obstacles and the spawner that recycles them through the pool

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entity::{EntityId, IdAllocator};
use super::pool::{PoolLifecycle, Poolable};
use crate::settings::ObstacleTuning;

/// An obstacle: a pair of rocks with a gap the plane must fly through
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: EntityId,
    /// Center of the gap
    pub pos: Vec2,
    /// Leftward speed (0 while parked or frozen)
    pub speed: f32,
    active: bool,
}

impl Obstacle {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            pos: Vec2::ZERO,
            speed: 0.0,
            active: false,
        }
    }

    /// Scroll left; returns true once the obstacle is past `offscreen_x`
    ///
    /// Parked obstacles never move.
    pub fn advance(&mut self, dt: f32, offscreen_x: f32) -> bool {
        if !self.active {
            return false;
        }
        self.pos.x -= self.speed * dt;
        self.pos.x < offscreen_x
    }

    /// Stop in place without leaving the round
    pub fn freeze(&mut self) {
        self.speed = 0.0;
    }
}

impl Poolable for Obstacle {
    fn id(&self) -> EntityId {
        self.id
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Spawner errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpawnError {
    #[error("obstacle id space exhausted")]
    IdsExhausted,
}

/// Builds, places and parks obstacles
#[derive(Debug, Clone)]
pub struct ObstacleSpawner {
    tuning: ObstacleTuning,
    rng: Pcg32,
    ids: IdAllocator,
    destroyed: u32,
}

impl ObstacleSpawner {
    pub fn new(tuning: ObstacleTuning, seed: u64) -> Self {
        Self::with_ids(tuning, seed, IdAllocator::new())
    }

    /// Continue numbering from `ids` so handles stay unique across rounds
    pub fn with_ids(tuning: ObstacleTuning, seed: u64, ids: IdAllocator) -> Self {
        Self {
            tuning,
            rng: Pcg32::seed_from_u64(seed),
            ids,
            destroyed: 0,
        }
    }

    pub fn tuning(&self) -> &ObstacleTuning {
        &self.tuning
    }

    /// Obstacles built so far
    pub fn created(&self) -> u32 {
        self.ids.allocated()
    }

    /// ID allocator state, for handing on to the next round's spawner
    pub fn ids(&self) -> &IdAllocator {
        &self.ids
    }

    /// Obstacles torn down so far
    pub fn destroyed(&self) -> u32 {
        self.destroyed
    }

    /// X coordinate obstacles enter from (mirror of the off-screen limit)
    pub fn spawn_x(&self) -> f32 {
        -self.tuning.offscreen_x
    }
}

impl PoolLifecycle<Obstacle> for ObstacleSpawner {
    type Error = SpawnError;

    fn create(&mut self) -> Result<Obstacle, SpawnError> {
        let id = self.ids.next_id().ok_or(SpawnError::IdsExhausted)?;
        log::trace!("Created obstacle {}", id);
        Ok(Obstacle::new(id))
    }

    fn activate(&mut self, obstacle: &mut Obstacle) -> Result<(), SpawnError> {
        let limit = self.tuning.y_offset_limit;
        let offset_y = if limit > 0.0 {
            self.rng.random_range(-limit..=limit)
        } else {
            0.0
        };
        obstacle.pos = Vec2::new(self.spawn_x(), offset_y);
        obstacle.speed = self.tuning.speed;
        obstacle.active = true;
        Ok(())
    }

    fn deactivate(&mut self, obstacle: &mut Obstacle) -> Result<(), SpawnError> {
        obstacle.active = false;
        obstacle.speed = 0.0;
        Ok(())
    }

    fn destroy(&mut self, obstacle: Obstacle) -> Result<(), SpawnError> {
        self.destroyed += 1;
        log::trace!("Destroyed obstacle {}", obstacle.id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_activate_places_within_range() {
        let tuning = ObstacleTuning::default();
        let mut spawner = ObstacleSpawner::new(tuning.clone(), 7);
        let mut obstacle = spawner.create().unwrap();

        for _ in 0..50 {
            spawner.activate(&mut obstacle).unwrap();
            assert!(obstacle.is_active());
            assert_eq!(obstacle.pos.x, 12.0);
            assert!(obstacle.pos.y.abs() <= tuning.y_offset_limit);
            assert_eq!(obstacle.speed, tuning.speed);
        }
    }

    #[test]
    fn test_deactivate_stops_motion() {
        let mut spawner = ObstacleSpawner::new(ObstacleTuning::default(), 1);
        let mut obstacle = spawner.create().unwrap();
        spawner.activate(&mut obstacle).unwrap();
        spawner.deactivate(&mut obstacle).unwrap();
        spawner.deactivate(&mut obstacle).unwrap();

        assert!(!obstacle.is_active());
        assert_eq!(obstacle.speed, 0.0);
        let x = obstacle.pos.x;
        assert!(!obstacle.advance(1.0, -12.0));
        assert_eq!(obstacle.pos.x, x);
    }

    #[test]
    fn test_advance_reports_off_screen() {
        let mut spawner = ObstacleSpawner::new(ObstacleTuning::default(), 1);
        let mut obstacle = spawner.create().unwrap();
        spawner.activate(&mut obstacle).unwrap();

        // 24 units to cover at 5 units/sec
        assert!(!obstacle.advance(4.0, -12.0));
        assert!(obstacle.advance(1.0, -12.0));
    }

    #[test]
    fn test_same_seed_same_offsets() {
        let mut a = ObstacleSpawner::new(ObstacleTuning::default(), 42);
        let mut b = ObstacleSpawner::new(ObstacleTuning::default(), 42);
        let mut oa = a.create().unwrap();
        let mut ob = b.create().unwrap();
        for _ in 0..10 {
            a.activate(&mut oa).unwrap();
            b.activate(&mut ob).unwrap();
            assert_eq!(oa.pos, ob.pos);
        }
    }

    #[test]
    fn test_with_ids_continues_numbering() {
        let mut first = ObstacleSpawner::new(ObstacleTuning::default(), 1);
        first.create().unwrap();
        first.create().unwrap();

        let mut second = ObstacleSpawner::with_ids(ObstacleTuning::default(), 2, first.ids().clone());
        assert_eq!(second.create().unwrap().id, EntityId(3));
    }

    #[test]
    fn test_zero_offset_limit_spawns_centered() {
        let tuning = ObstacleTuning {
            y_offset_limit: 0.0,
            ..Default::default()
        };
        let mut spawner = ObstacleSpawner::new(tuning, 3);
        let mut obstacle = spawner.create().unwrap();
        spawner.activate(&mut obstacle).unwrap();
        assert_eq!(obstacle.pos.y, 0.0);
    }
}
