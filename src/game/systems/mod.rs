pub mod ai;
pub mod collision;
pub mod controller;
pub mod motion;
pub mod weapons;
