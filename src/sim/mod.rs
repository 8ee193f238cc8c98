/// Simulation: world state, level decoding, the input queue and the tick.

pub mod event;
pub mod level;
pub mod queue;
pub mod step;
pub mod world;
