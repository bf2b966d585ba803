//! Render-ready state capture.
//!
//! A `Snapshot` is a plain serializable copy of everything the presentation
//! layer needs for one frame, with entity handles and controller internals
//! stripped out.

use serde::Serialize;

use crate::game::match_flow::MatchPhase;
use crate::game::state::{EffectKind, SimState, Team, View};
use crate::util::vec2::Vec2;

#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub tick: u64,
    pub phase: MatchPhase,
    pub score: i32,
    pub round_counter: i32,
    pub colorblind: bool,
    pub ships: Vec<ShipView>,
    pub bullets: Vec<BulletView>,
    pub explosions: Vec<ExplosionView>,
    pub views: Vec<View>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ShipView {
    pub position: Vec2,
    pub velocity: Vec2,
    pub heading: f32,
    pub team: Team,
    pub variant: u8,
    pub thrusting: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BulletView {
    pub position: Vec2,
    pub velocity: Vec2,
    pub team: Team,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExplosionView {
    pub position: Vec2,
    pub age: f32,
}

pub fn capture(state: &SimState, phase: MatchPhase, colorblind: bool) -> Snapshot {
    Snapshot {
        tick: state.tick,
        phase,
        score: state.score,
        round_counter: state.round_counter,
        colorblind,
        ships: state
            .ships
            .iter()
            .map(|(_, s)| ShipView {
                position: s.position,
                velocity: s.velocity,
                heading: s.heading,
                team: s.team,
                variant: s.variant,
                thrusting: s.intent.thrust,
            })
            .collect(),
        bullets: state
            .bullets
            .iter()
            .map(|(_, b)| BulletView {
                position: b.position,
                velocity: b.velocity,
                team: b.team,
            })
            .collect(),
        explosions: state
            .effects
            .iter()
            .filter_map(|(_, e)| match e.kind {
                EffectKind::Explosion { age } => Some(ExplosionView {
                    position: e.position,
                    age,
                }),
                EffectKind::Exhaust { .. } => None,
            })
            .collect(),
        views: state.views.clone(),
    }
}
