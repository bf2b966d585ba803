//! Pulsefire simulation core
//!
//! A real-time two-team arena combat simulation: two fleets of ships fight
//! over a series of rounds, with the leading team fielding fewer ships each
//! round. The crate is presentation-agnostic; embedders drive [`game::game_loop::GameLoop`]
//! once per frame, feed it input snapshots, and render from its serializable
//! snapshots and events.

pub mod config;
pub mod game;
pub mod input;
pub mod util;
