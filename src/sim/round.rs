//! Round state machine
//!
//! One `RoundController` drives one play-through: Setup → Playing → GameOver.
//! It owns the obstacle pool and is the only code that acquires from or
//! releases into it. Transitions are one-directional and each fires at most
//! once; a new round means a new controller.

use serde::{Deserialize, Serialize};

use super::contact::{self, Contacts};
use super::entity::EntityId;
use super::obstacle::{Obstacle, ObstacleSpawner};
use super::plane::{Plane, PlaneState};
use super::pool::{Pool, PoolError, PoolLifecycle};
use crate::settings::{ObstacleTuning, PlaneTuning, RoundTuning};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    /// Plane idling, waiting for the first ascend input
    Setup,
    /// Obstacles spawning, score counting
    Playing,
    /// Crashed; everything frozen
    GameOver,
}

/// Scene-level requests handed to whoever owns the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneCommand {
    /// Throw this round away and start a fresh one
    ReloadRound,
    /// Leave to the main menu
    MainMenu,
}

/// Notifications for UI / audio / scene collaborators
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundEvent {
    /// Setup finished; gameplay revealed
    Started,
    ScoreChanged(u32),
    /// A new best score was recorded
    HighScore(u32),
    RoundEnded { final_score: u32 },
    /// The game-over delay elapsed
    GameOverMenu { final_score: u32 },
    ObstacleSpawned(EntityId),
    ObstacleRecycled(EntityId),
    Scene(SceneCommand),
}

/// Per-tick signals from input and contact detection
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Ascend pressed this tick (also starts the round)
    pub ascend: bool,
    /// The plane hit something
    pub collided: bool,
    /// Obstacles the plane flew through
    pub obstacles_passed: u32,
}

/// Fixed-delay obstacle spawn timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpawnSchedule {
    /// Round clock time of the next spawn
    pub next_at: f32,
    pub enabled: bool,
}

impl SpawnSchedule {
    fn disabled() -> Self {
        Self {
            next_at: f32::INFINITY,
            enabled: false,
        }
    }

    fn is_due(&self, now: f32) -> bool {
        self.enabled && now >= self.next_at
    }
}

/// Drives one round
#[derive(Debug)]
pub struct RoundController<L = ObstacleSpawner> {
    tuning: RoundTuning,
    offscreen_x: f32,
    phase: RoundPhase,
    pool: Pool<Obstacle, L>,
    plane: Plane,
    spawn: SpawnSchedule,
    /// Seconds since the controller was built
    clock: f32,
    score: u32,
    high_score: u32,
    final_score: Option<u32>,
    game_over_at: Option<f32>,
    menu_shown: bool,
    spawned: u32,
    events: Vec<RoundEvent>,
}

impl<L> RoundController<L>
where
    L: PoolLifecycle<Obstacle>,
{
    /// Build a round around an already constructed pool
    ///
    /// `high_score` is the best score so far; it is overwritten if this round beats it.
    pub fn new(
        tuning: RoundTuning,
        obstacle: &ObstacleTuning,
        plane: PlaneTuning,
        pool: Pool<Obstacle, L>,
        high_score: u32,
    ) -> Self {
        Self {
            tuning,
            offscreen_x: obstacle.offscreen_x,
            phase: RoundPhase::Setup,
            pool,
            plane: Plane::new(plane),
            spawn: SpawnSchedule::disabled(),
            clock: 0.0,
            score: 0,
            high_score,
            final_score: None,
            game_over_at: None,
            menu_shown: false,
            spawned: 0,
            events: Vec::new(),
        }
    }

    /// Reset the HUD for a fresh round
    pub fn initialize(&mut self) {
        self.events.push(RoundEvent::ScoreChanged(self.score));
        log::info!(
            "Round ready ({} obstacles pooled, best {})",
            self.pool.len(),
            self.high_score
        );
    }

    /// Advance the round by one fixed step
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Result<(), PoolError<L::Error>> {
        self.clock += dt;

        if self.phase == RoundPhase::Setup && input.ascend {
            self.begin();
        }

        // Collision first: a crash suppresses any pass in the same tick
        if input.collided {
            self.on_plane_hit();
        }
        for _ in 0..input.obstacles_passed {
            self.on_obstacle_passed();
        }

        if self.spawn.is_due(self.clock) {
            // A failed acquire leaves the spawn due for the next tick
            let obstacle = self.pool.acquire()?;
            let id = obstacle.id;
            self.spawn.next_at = self.clock + self.tuning.spawn_delay;
            self.spawned += 1;
            log::debug!("Spawned obstacle {} at y={:.2}", id, obstacle.pos.y);
            self.events.push(RoundEvent::ObstacleSpawned(id));
        }

        self.plane.step(dt, input.ascend);

        let offscreen_x = self.offscreen_x;
        let exited: Vec<EntityId> = self
            .pool
            .active_mut()
            .filter_map(|obstacle| obstacle.advance(dt, offscreen_x).then_some(obstacle.id))
            .collect();
        for id in exited {
            self.on_obstacle_off_screen(id)?;
        }

        if let (Some(at), Some(final_score)) = (self.game_over_at, self.final_score) {
            if !self.menu_shown && self.clock >= at + self.tuning.game_over_delay {
                self.menu_shown = true;
                self.events.push(RoundEvent::GameOverMenu { final_score });
            }
        }

        Ok(())
    }

    fn begin(&mut self) {
        self.phase = RoundPhase::Playing;
        self.plane.set_state(PlaneState::Playing);
        self.spawn = SpawnSchedule {
            next_at: self.clock + self.tuning.start_delay,
            enabled: true,
        };
        self.events.push(RoundEvent::Started);
        log::info!("Round started");
    }

    /// The plane hit something; ends the round the first time only
    pub fn on_plane_hit(&mut self) {
        if self.phase != RoundPhase::Playing {
            return;
        }

        self.phase = RoundPhase::GameOver;
        self.spawn.enabled = false;
        self.plane.set_state(PlaneState::Crashed);
        for obstacle in self.pool.active_mut() {
            obstacle.freeze();
        }

        let final_score = self.score;
        self.final_score = Some(final_score);
        self.game_over_at = Some(self.clock);
        self.events.push(RoundEvent::RoundEnded { final_score });

        if final_score > self.high_score {
            self.high_score = final_score;
            self.events.push(RoundEvent::HighScore(final_score));
            log::info!("Game over: new high score {}", final_score);
        } else {
            log::info!("Game over: score {} (best {})", final_score, self.high_score);
        }
    }

    /// The plane flew through an obstacle; scores only while playing
    pub fn on_obstacle_passed(&mut self) {
        if self.phase != RoundPhase::Playing {
            return;
        }
        self.score += 1;
        self.events.push(RoundEvent::ScoreChanged(self.score));
    }

    /// An obstacle left the screen; recycled in any phase
    pub fn on_obstacle_off_screen(&mut self, id: EntityId) -> Result<(), PoolError<L::Error>> {
        self.pool.release(id)?;
        log::debug!("Recycled obstacle {}", id);
        self.events.push(RoundEvent::ObstacleRecycled(id));
        Ok(())
    }

    pub fn request_restart(&mut self) {
        self.events.push(RoundEvent::Scene(SceneCommand::ReloadRound));
    }

    pub fn request_main_menu(&mut self) {
        self.events.push(RoundEvent::Scene(SceneCommand::MainMenu));
    }

    /// Destroy every pooled obstacle
    pub fn teardown(&mut self) -> Result<(), PoolError<L::Error>> {
        self.pool.clear()
    }
}

impl<L> RoundController<L> {
    /// Take the queued notifications
    pub fn drain_events(&mut self) -> Vec<RoundEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Score frozen at game over
    pub fn final_score(&self) -> Option<u32> {
        self.final_score
    }

    pub fn spawn_schedule(&self) -> SpawnSchedule {
        self.spawn
    }

    /// Obstacles spawned this round
    pub fn spawned(&self) -> u32 {
        self.spawned
    }

    pub fn clock(&self) -> f32 {
        self.clock
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn pool(&self) -> &Pool<Obstacle, L> {
        &self.pool
    }

    /// Collision / pass signals for the state reached by the last step
    pub fn contacts(&self, dt: f32) -> Contacts {
        contact::detect(&self.plane, self.pool.active(), dt)
    }
}
