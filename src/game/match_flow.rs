//! Round and match progression.
//!
//! A match is a series of rounds. The win condition is polled on a short
//! timer rather than every tick; a round ends when at most one team has
//! ships left. The score tracks Green's lead (negative means Red leads), and
//! the round counter tracks long-run dominance, shrinking the leading team's
//! next spawn once the lead is large enough.

use rand::Rng;
use serde::Serialize;
use tracing::info;

use crate::game::constants::round;
use crate::game::game_loop::GameLoopEvent;
use crate::game::spawn;
use crate::game::state::{SimState, Team};
use crate::game::systems::controller::{self, PlayerSlot};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchPhase {
    NotStarted,
    InRound,
    RoundTransition,
    Finished,
}

pub struct MatchFlow {
    pub phase: MatchPhase,
    points_to_win: i32,
    team_size: i32,
    human_players: u8,
    check_win_timer: f32,
    round_end_timer: f32,
}

impl MatchFlow {
    pub fn new(points_to_win: i32, team_size: i32, human_players: u8) -> Self {
        Self {
            phase: MatchPhase::NotStarted,
            points_to_win,
            team_size,
            human_players,
            check_win_timer: 0.0,
            round_end_timer: 0.0,
        }
    }

    pub fn start_match(&mut self, state: &mut SimState) {
        state.score = 0;
        state.round_counter = 0;
        state.tick = 0;
        self.start_round(state);
    }

    pub fn start_round(&mut self, state: &mut SimState) {
        state.clear_entities();
        let (red, green) = team_sizes(
            state.score,
            state.round_counter,
            self.points_to_win,
            self.team_size,
        );
        spawn::spawn_team(state, Team::Red, red);
        spawn::spawn_team(state, Team::Green, green);
        self.assign_humans(state);
        self.phase = MatchPhase::InRound;
        self.check_win_timer = round::WIN_POLL;
        info!(red, green, score = state.score, "round started");
    }

    /// Player one flies for Green, player two for Red
    fn assign_humans(&self, state: &mut SimState) {
        let mut rng = rand::thread_rng();
        let seats = [
            (PlayerSlot::One, Team::Green),
            (PlayerSlot::Two, Team::Red),
        ];
        for (slot, team) in seats.into_iter().take(self.human_players as usize) {
            let ships = state.team_ship_handles(team);
            if let Some(&pick) = ships.get(rng.gen_range(0..ships.len())) {
                controller::take_over(state, slot, pick);
            }
        }
    }

    pub fn update(&mut self, state: &mut SimState, delta: f32, events: &mut Vec<GameLoopEvent>) {
        match self.phase {
            MatchPhase::NotStarted | MatchPhase::Finished => {}
            MatchPhase::InRound => {
                self.check_win_timer -= delta;
                if self.check_win_timer > 0.0 {
                    return;
                }
                self.check_win_timer = round::WIN_POLL;
                let red_alive = state.alive_count(Team::Red) > 0;
                let green_alive = state.alive_count(Team::Green) > 0;
                if red_alive && green_alive {
                    return;
                }
                let winner = match (red_alive, green_alive) {
                    (false, true) => Some(Team::Green),
                    (true, false) => Some(Team::Red),
                    _ => None,
                };
                self.end_round(state, winner, events);
            }
            MatchPhase::RoundTransition => {
                self.round_end_timer -= delta;
                if self.round_end_timer <= 0.0 {
                    self.start_round(state);
                }
            }
        }
    }

    fn end_round(
        &mut self,
        state: &mut SimState,
        winner: Option<Team>,
        events: &mut Vec<GameLoopEvent>,
    ) {
        match winner {
            Some(Team::Green) => state.score += 1,
            Some(Team::Red) => state.score -= 1,
            None => {}
        }
        // The counter always drifts against the current leader, even on a
        // mutually destructive round.
        if state.score > 0 {
            state.round_counter -= 1;
        } else if state.score < 0 {
            state.round_counter += 1;
        }
        events.push(GameLoopEvent::RoundEnded {
            winner,
            score: state.score,
        });
        info!(?winner, score = state.score, "round ended");
        if state.score.abs() >= self.points_to_win {
            self.phase = MatchPhase::Finished;
            events.push(GameLoopEvent::MatchFinished { score: state.score });
            info!(score = state.score, "match finished");
        } else {
            self.phase = MatchPhase::RoundTransition;
            self.round_end_timer = round::TRANSITION_DELAY;
        }
    }
}

/// Spawn counts for the next round as (red, green).
///
/// The leading team loses one ship per point of lead; once the round counter
/// passes `points_to_win * 3 / 2` the long-run leader loses more. Both teams
/// always field at least one ship.
pub fn team_sizes(score: i32, round_counter: i32, points_to_win: i32, team_size: i32) -> (i32, i32) {
    let limit = points_to_win * 3 / 2;
    let penalty = if round_counter.abs() >= limit {
        (round_counter - limit * round_counter.signum()) / round::ROUND_TICK
    } else {
        0
    };
    let green = (team_size - score.max(0).max(penalty)).max(1);
    let red = (team_size + score.min(0).min(penalty)).max(1);
    (red, green)
}
