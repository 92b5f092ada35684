//! Pux Plane headless entry point
//!
//! Runs rounds with an autopilot under a fixed-timestep loop and logs the
//! outcome. Usage: `pux-plane [seed] [settings.json] [rounds]`

use pux_plane::consts::*;
use pux_plane::sim::{PlaneState, RoundEvent, RoundPhase, TickInput};
use pux_plane::{Session, SessionData, SessionError, Settings, SettingsError};

/// Presentation frame time the driver pretends to run at
const FRAME_DT: f32 = 1.0 / 60.0;
/// Seconds the autopilot waits in Setup before pressing ascend
const SETUP_WAIT: f32 = 1.0;
/// Seconds of play before the autopilot lets go of the stick
const AUTOPILOT_LIMIT: f32 = 60.0;

#[derive(Debug, thiserror::Error)]
enum DriverError {
    #[error(transparent)]
    Settings(#[from] SettingsError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error("invalid argument: {0}")]
    Argument(String),
}

/// Game driver holding the session and loop timing
struct Game {
    session: Session,
    accumulator: f32,
    /// Ascend latched by the presentation frame, consumed by the next sim step
    ascend: bool,
    rounds_left: u32,
}

impl Game {
    fn new(session: Session, rounds: u32) -> Self {
        Self {
            session,
            accumulator: 0.0,
            ascend: false,
            rounds_left: rounds,
        }
    }

    /// Decide whether to press ascend this frame
    fn poll_autopilot(&mut self) {
        let Some(round) = self.session.round() else {
            return;
        };
        let plane = round.plane();

        self.ascend |= match round.phase() {
            RoundPhase::Setup => round.clock() >= SETUP_WAIT,
            RoundPhase::Playing if round.clock() < AUTOPILOT_LIMIT => {
                // Aim for the gap of the nearest obstacle still ahead
                let target = round
                    .pool()
                    .active()
                    .filter(|o| o.pos.x + OBSTACLE_HALF_WIDTH >= plane.pos.x - PLANE_RADIUS)
                    .min_by(|a, b| a.pos.x.total_cmp(&b.pos.x))
                    .map(|o| o.pos.y)
                    .unwrap_or(0.0);
                plane.state == PlaneState::Playing && plane.pos.y < target - 0.5 && plane.vel_y < 1.0
            }
            _ => false,
        };
    }

    /// Run simulation ticks for one presentation frame
    ///
    /// Returns false once every requested round has finished.
    fn update(&mut self, dt: f32) -> Result<bool, DriverError> {
        self.poll_autopilot();
        self.accumulator += dt.min(0.1);

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let contacts = self.session.contacts(SIM_DT);
            let input = TickInput {
                ascend: self.ascend,
                collided: contacts.collided,
                obstacles_passed: contacts.passed,
            };
            // Clear one-shot inputs after processing
            self.ascend = false;

            for event in self.session.tick(&input, SIM_DT)? {
                if !self.handle_event(event) {
                    return Ok(false);
                }
            }

            self.accumulator -= SIM_DT;
            substeps += 1;
        }

        Ok(true)
    }

    fn handle_event(&mut self, event: RoundEvent) -> bool {
        match event {
            RoundEvent::ScoreChanged(score) => log::debug!("Score: {}", score),
            RoundEvent::HighScore(score) => log::info!("New best: {}", score),
            RoundEvent::RoundEnded { final_score } => log::info!("Final score: {}", final_score),
            RoundEvent::GameOverMenu { final_score } => {
                println!("Round over - score {}", final_score);
                self.rounds_left = self.rounds_left.saturating_sub(1);
                if let Some(round) = self.session.round_mut() {
                    if self.rounds_left > 0 {
                        round.request_restart();
                    } else {
                        round.request_main_menu();
                    }
                }
            }
            RoundEvent::Scene(_) => {
                if self.session.round().is_none() {
                    return false;
                }
            }
            RoundEvent::ObstacleSpawned(_) | RoundEvent::ObstacleRecycled(_) | RoundEvent::Started => {}
        }
        true
    }
}

fn parse_args() -> Result<(u64, Settings, u32), DriverError> {
    let mut args = std::env::args().skip(1);

    let seed = match args.next() {
        Some(arg) => arg
            .parse()
            .map_err(|_| DriverError::Argument(format!("seed '{}'", arg)))?,
        None => 12345,
    };
    let settings = match args.next() {
        Some(path) if path != "-" => Settings::load(path)?,
        _ => Settings::default(),
    };
    let rounds = match args.next() {
        Some(arg) => arg
            .parse()
            .map_err(|_| DriverError::Argument(format!("rounds '{}'", arg)))?,
        None => 3,
    };

    Ok((seed, settings, rounds))
}

fn run() -> Result<(), DriverError> {
    let (seed, settings, rounds) = parse_args()?;

    let mut session = Session::new(settings, SessionData::new(), seed);
    session.start_round()?;
    let mut game = Game::new(session, rounds.max(1));

    while game.update(FRAME_DT)? {}

    let data = game.session.data();
    println!("Best score: {}", data.classic_high_score);
    log::info!("Session data: {}", data.to_json()?);
    Ok(())
}

fn main() {
    env_logger::init();
    log::info!("Pux Plane (headless) starting...");

    if let Err(e) = run() {
        log::error!("{}", e);
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
