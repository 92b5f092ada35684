//! Game session: persistent data plus the round currently being played
//!
//! Replaces a global game manager. The session owns the settings, the high
//! score and at most one `RoundController`, and carries out the scene
//! commands a round asks for.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::settings::Settings;
use crate::sim::{
    Contacts, IdAllocator, ObstacleSpawner, Pool, PoolError, RoundController, RoundEvent, SceneCommand,
    SpawnError, TickInput,
};

/// Session errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// Tick requested while no round exists (e.g. at the main menu)
    #[error("no round is active")]
    NoActiveRound,

    /// Obstacle pool failure
    #[error("obstacle pool error: {0}")]
    Pool(#[from] PoolError<SpawnError>),

    /// Session data could not be (de)serialized
    #[error("session data error: {0}")]
    Data(#[from] serde_json::Error),
}

/// Data that outlives rounds (handed to an external save collaborator as JSON)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionData {
    /// Best final score in classic mode
    #[serde(default)]
    pub classic_high_score: u32,
}

impl SessionData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a final score; returns true if it became the new best
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.classic_high_score {
            self.classic_high_score = score;
            return true;
        }
        false
    }

    pub fn to_json(&self) -> Result<String, SessionError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Owns the session data and the current round
#[derive(Debug)]
pub struct Session {
    settings: Settings,
    data: SessionData,
    seed: u64,
    rounds_started: u64,
    /// Obstacle numbering shared by every round of this session
    ids: IdAllocator,
    round: Option<RoundController>,
}

impl Session {
    pub fn new(settings: Settings, data: SessionData, seed: u64) -> Self {
        Self {
            settings,
            data,
            seed,
            rounds_started: 0,
            ids: IdAllocator::new(),
            round: None,
        }
    }

    /// Start a fresh round, tearing down the current one first
    pub fn start_round(&mut self) -> Result<(), SessionError> {
        self.end_round()?;

        let seed = self
            .seed
            .wrapping_add(self.rounds_started.wrapping_mul(0x9E37_79B9_7F4A_7C15));
        self.rounds_started += 1;

        let tuning = &self.settings;
        let spawner = ObstacleSpawner::with_ids(tuning.obstacle.clone(), seed, self.ids.clone());
        let pool = Pool::new(spawner, tuning.round.pool_size)?;
        let mut round = RoundController::new(
            tuning.round.clone(),
            &tuning.obstacle,
            tuning.plane.clone(),
            pool,
            self.data.classic_high_score,
        );
        round.initialize();
        self.round = Some(round);

        log::info!("Round {} loaded (seed {})", self.rounds_started, seed);
        Ok(())
    }

    /// Tear down the current round, if any
    pub fn end_round(&mut self) -> Result<(), SessionError> {
        if let Some(mut round) = self.round.take() {
            self.ids = round.pool().lifecycle().ids().clone();
            round.teardown()?;
        }
        Ok(())
    }

    /// Advance the current round and handle what it reported
    ///
    /// Returns the round's notifications for UI collaborators.
    pub fn tick(&mut self, input: &TickInput, dt: f32) -> Result<Vec<RoundEvent>, SessionError> {
        let round = self.round.as_mut().ok_or(SessionError::NoActiveRound)?;
        round.tick(input, dt)?;
        let mut events = round.drain_events();

        let mut command = None;
        for event in &events {
            match *event {
                RoundEvent::HighScore(score) => {
                    self.data.record(score);
                }
                RoundEvent::Scene(scene) => command = Some(scene),
                _ => {}
            }
        }

        match command {
            Some(SceneCommand::ReloadRound) => {
                self.start_round()?;
                if let Some(round) = self.round.as_mut() {
                    events.extend(round.drain_events());
                }
            }
            Some(SceneCommand::MainMenu) => {
                self.end_round()?;
                log::info!("Returned to main menu");
            }
            None => {}
        }

        Ok(events)
    }

    /// Contact signals for the next tick, empty when no round is active
    pub fn contacts(&self, dt: f32) -> Contacts {
        self.round
            .as_ref()
            .map(|round| round.contacts(dt))
            .unwrap_or_default()
    }

    pub fn round(&self) -> Option<&RoundController> {
        self.round.as_ref()
    }

    pub fn round_mut(&mut self) -> Option<&mut RoundController> {
        self.round.as_mut()
    }

    pub fn data(&self) -> &SessionData {
        &self.data
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn rounds_started(&self) -> u64 {
        self.rounds_started
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::RoundPhase;

    fn quick_settings() -> Settings {
        let mut settings = Settings::default();
        settings.round.start_delay = 0.0;
        settings.round.pool_size = 2;
        settings
    }

    fn start() -> TickInput {
        TickInput {
            ascend: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_record_only_improves() {
        let mut data = SessionData::new();
        assert!(data.record(3));
        assert!(!data.record(2));
        assert!(!data.record(3));
        assert_eq!(data.classic_high_score, 3);
    }

    #[test]
    fn test_data_json() {
        let data = SessionData {
            classic_high_score: 12,
        };
        let json = data.to_json().unwrap();
        assert_eq!(SessionData::from_json(&json).unwrap(), data);
        assert_eq!(SessionData::from_json("{}").unwrap(), SessionData::new());
    }

    #[test]
    fn test_tick_without_round_is_misuse() {
        let mut session = Session::new(Settings::default(), SessionData::new(), 1);
        let err = session.tick(&TickInput::default(), 0.02).unwrap_err();
        assert!(matches!(err, SessionError::NoActiveRound));
    }

    #[test]
    fn test_high_score_carried_into_session() {
        let data = SessionData {
            classic_high_score: 3,
        };
        let mut session = Session::new(quick_settings(), data, 1);
        session.start_round().unwrap();
        session.tick(&start(), 0.02).unwrap();

        let round = session.round_mut().unwrap();
        for _ in 0..5 {
            round.on_obstacle_passed();
        }
        let crash = TickInput {
            collided: true,
            ..Default::default()
        };
        let events = session.tick(&crash, 0.02).unwrap();

        assert!(events.contains(&RoundEvent::HighScore(5)));
        assert_eq!(session.data().classic_high_score, 5);
    }

    #[test]
    fn test_reload_resets_round_and_keeps_best() {
        let mut session = Session::new(quick_settings(), SessionData::new(), 1);
        session.start_round().unwrap();
        session.tick(&start(), 0.02).unwrap();
        session.round_mut().unwrap().on_obstacle_passed();
        session
            .tick(
                &TickInput {
                    collided: true,
                    ..Default::default()
                },
                0.02,
            )
            .unwrap();

        session.round_mut().unwrap().request_restart();
        let events = session.tick(&TickInput::default(), 0.02).unwrap();

        let round = session.round().unwrap();
        assert_eq!(round.phase(), RoundPhase::Setup);
        assert_eq!(round.score(), 0);
        assert_eq!(round.high_score(), 1);
        assert_eq!(session.data().classic_high_score, 1);
        assert_eq!(session.rounds_started(), 2);
        // HUD reset from the new round
        assert_eq!(events.last(), Some(&RoundEvent::ScoreChanged(0)));
    }

    #[test]
    fn test_previous_round_obstacle_not_owned_by_next_round() {
        let mut session = Session::new(quick_settings(), SessionData::new(), 1);
        session.start_round().unwrap();
        session.tick(&start(), 0.02).unwrap();
        let old_id = session.round().unwrap().pool().active().next().unwrap().id;

        session.round_mut().unwrap().request_restart();
        session.tick(&TickInput::default(), 0.02).unwrap();
        session.tick(&start(), 0.02).unwrap();

        let round = session.round_mut().unwrap();
        let live_id = round.pool().active().next().unwrap().id;
        assert_ne!(live_id, old_id);

        let err = round.on_obstacle_off_screen(old_id).unwrap_err();
        assert!(matches!(err, PoolError::NotOwned(id) if id == old_id));
        assert_eq!(round.pool().active_count(), 1);
    }

    #[test]
    fn test_main_menu_drops_round() {
        let mut session = Session::new(quick_settings(), SessionData::new(), 1);
        session.start_round().unwrap();
        session.round_mut().unwrap().request_main_menu();
        session.tick(&TickInput::default(), 0.02).unwrap();

        assert!(session.round().is_none());
        assert_eq!(session.contacts(0.02), Contacts::default());
    }
}
