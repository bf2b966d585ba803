//! Top-level simulation driver.
//!
//! One `GameLoop` owns the state, the match flow, and the current input
//! snapshot. The embedder calls `step` once per frame with the fractional
//! tick step and renders from `snapshot`; everything the presentation layer
//! reacts to (sounds, flashes) comes back as events.

use serde::Serialize;

use crate::game::constants::{arena, round, timing};
use crate::game::match_flow::{MatchFlow, MatchPhase};
use crate::game::snapshot::{self, Snapshot};
use crate::game::state::{SimState, Team, View};
use crate::game::systems::controller::{self, ControllerKind};
use crate::game::systems::{collision, motion, weapons};
use crate::input::bindings::Bindings;
use crate::input::snapshot::InputSnapshot;
use crate::util::vec2::Vec2;

#[derive(Debug, Clone)]
pub struct GameLoopConfig {
    /// Score magnitude that ends the match
    pub points_to_win: i32,
    /// Ships per team at even strength
    pub team_size: i32,
    /// Local player seats in use, 0 to 2
    pub human_players: u8,
    /// Propagated to snapshots for the presentation layer
    pub colorblind: bool,
}

impl Default for GameLoopConfig {
    fn default() -> Self {
        Self {
            points_to_win: 3,
            team_size: round::TEAM_SIZE,
            human_players: 0,
            colorblind: false,
        }
    }
}

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum GameLoopEvent {
    ShipDestroyed {
        team: Team,
        position: Vec2,
        in_view: bool,
    },
    BulletFired {
        team: Team,
        position: Vec2,
        in_view: bool,
    },
    BulletDissipated {
        position: Vec2,
        in_view: bool,
    },
    RoundEnded {
        winner: Option<Team>,
        score: i32,
    },
    MatchFinished {
        score: i32,
    },
}

pub struct GameLoop {
    config: GameLoopConfig,
    state: SimState,
    flow: MatchFlow,
    bindings: Bindings,
    input: InputSnapshot,
}

impl GameLoop {
    pub fn new(config: GameLoopConfig, bindings: Bindings) -> Self {
        let flow = MatchFlow::new(config.points_to_win, config.team_size, config.human_players);
        Self {
            config,
            state: SimState::new(),
            flow,
            bindings,
            input: InputSnapshot::new(),
        }
    }

    pub fn start_match(&mut self) {
        self.flow.start_match(&mut self.state);
        self.update_views();
    }

    /// Reset score and counters and begin a fresh match
    pub fn restart(&mut self) {
        self.start_match();
    }

    pub fn set_input(&mut self, input: InputSnapshot) {
        self.input = input;
    }

    pub fn input_mut(&mut self) -> &mut InputSnapshot {
        &mut self.input
    }

    pub fn phase(&self) -> MatchPhase {
        self.flow.phase
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SimState {
        &mut self.state
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }

    /// Advance the simulation by `delta` ticks (1.0 = one 30 Hz frame).
    ///
    /// The step is clamped to the accepted range, so a stalled driving clock
    /// slows the simulation down instead of teleporting everything.
    pub fn step(&mut self, delta: f32) -> Vec<GameLoopEvent> {
        let delta = delta.clamp(timing::DELTA_MIN, timing::DELTA_MAX);
        let mut events = Vec::new();
        controller::update(&mut self.state, &self.bindings, &self.input, delta);
        weapons::update(&mut self.state, delta, &mut events);
        motion::update(&mut self.state, delta);
        collision::update(&mut self.state, &mut events);
        self.flow.update(&mut self.state, delta, &mut events);
        self.update_views();
        self.state.tick += 1;
        self.input.end_tick();
        events
    }

    pub fn snapshot(&self) -> Snapshot {
        snapshot::capture(&self.state, self.flow.phase, self.config.colorblind)
    }

    /// Point one camera at each human ship; with nobody to follow, fall back
    /// to a single camera on the arena center
    fn update_views(&mut self) {
        let mut seats: Vec<(usize, View)> = Vec::new();
        for (_, c) in self.state.controllers.iter() {
            let ControllerKind::Human { player } = &c.kind else {
                continue;
            };
            if let Some(ship) = self.state.ships.get(c.ship) {
                seats.push((player.index(), centered_view(ship.position)));
            }
        }
        seats.sort_by_key(|(index, _)| *index);
        let mut views: Vec<View> = seats.into_iter().map(|(_, view)| view).collect();
        if views.is_empty() {
            views.push(centered_view(Vec2::new(
                arena::WIDTH / 2.0,
                arena::HEIGHT / 2.0,
            )));
        }
        self.state.views = views;
    }
}

/// A view on `center`, shifted so it never shows past the arena edge
fn centered_view(center: Vec2) -> View {
    let x = center.x.clamp(
        arena::VIEW_WIDTH / 2.0,
        arena::WIDTH - arena::VIEW_WIDTH / 2.0,
    );
    let y = center.y.clamp(
        arena::VIEW_HEIGHT / 2.0,
        arena::HEIGHT - arena::VIEW_HEIGHT / 2.0,
    );
    View::new(Vec2::new(x, y), arena::VIEW_WIDTH, arena::VIEW_HEIGHT)
}
