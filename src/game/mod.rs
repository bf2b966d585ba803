pub mod constants;
pub mod game_loop;
pub mod match_flow;
pub mod registry;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod systems;
