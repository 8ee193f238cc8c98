/// Terminal I/O: keyboard and gamepad producers, and the renderer.

pub mod gamepad;
pub mod input;
pub mod renderer;
