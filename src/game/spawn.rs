//! Entity spawning.
//!
//! Each team spawns in its own corner of the arena, one view-sized zone:
//! Red at the origin corner, Green at the far corner. Every spawned ship
//! starts under an autonomous pilot; player slots take over afterwards.

use rand::Rng;

use crate::game::constants::{arena, ship};
use crate::game::registry::Handle;
use crate::game::state::{Bullet, Ship, SimState, Team};
use crate::game::systems::controller;
use crate::util::vec2::Vec2;

pub fn spawn_team(state: &mut SimState, team: Team, count: i32) {
    for _ in 0..count {
        spawn_ship(state, team);
    }
}

pub fn spawn_ship(state: &mut SimState, team: Team) -> Handle<Ship> {
    let mut rng = rand::thread_rng();
    let position = match team {
        Team::Red => Vec2::new(
            rng.gen_range(0.0..arena::VIEW_WIDTH),
            rng.gen_range(0.0..arena::VIEW_HEIGHT),
        ),
        Team::Green => Vec2::new(
            rng.gen_range(arena::WIDTH - arena::VIEW_WIDTH..arena::WIDTH),
            rng.gen_range(arena::HEIGHT - arena::VIEW_HEIGHT..arena::HEIGHT),
        ),
    };
    let heading = rng.gen_range(0.0..360.0);
    let variant = rng.gen_range(0..ship::VARIANTS);
    let handle = state.ships.insert(Ship::new(team, position, heading, variant));
    controller::attach_ai(state, handle);
    handle
}

pub fn spawn_bullet(
    state: &mut SimState,
    team: Team,
    position: Vec2,
    velocity: Vec2,
) -> Handle<Bullet> {
    state.bullets.insert(Bullet::new(team, position, velocity))
}
