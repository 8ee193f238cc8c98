/// Game rules with no I/O: tiles, the player, gravity and movement.

pub mod entity;
pub mod physics;
pub mod rules;
pub mod tile;

#[cfg(test)]
pub mod diagram;
