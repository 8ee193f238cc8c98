/// Gamepad input using gilrs.
///
/// D-pad presses and left-stick flicks queue one move each, the same
/// way a key press does. Holding does not repeat.
/// The quit mapping is loaded from config.toml via `load_button_config()`.
///
/// Without the `gamepad` feature this type is inert.

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};

use crate::config::GamepadConfig;
use crate::domain::entity::MoveDir;
use crate::sim::queue::InputQueue;

#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
const STICK_DEADZONE: f32 = 0.5;

/// Logical face/shoulder buttons, addressable by name from config.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

impl Btn {
    pub fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH"  => Some(Btn::A),
            "B" | "EAST"   => Some(Btn::B),
            "X" | "WEST"   => Some(Btn::X),
            "Y" | "NORTH"  => Some(Btn::Y),
            "L1" | "LB" | "LEFTTRIGGER"  => Some(Btn::L1),
            "R1" | "RB" | "RIGHTTRIGGER" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Digital direction of the stick, if it is pushed past the deadzone.
/// Stick Y is positive upward. The dominant axis wins.
#[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
pub fn stick_direction(x: f32, y: f32) -> Option<MoveDir> {
    if x.abs() < STICK_DEADZONE && y.abs() < STICK_DEADZONE {
        return None;
    }
    if x.abs() >= y.abs() {
        Some(if x < 0.0 { MoveDir::Left } else { MoveDir::Right })
    } else {
        Some(if y > 0.0 { MoveDir::Up } else { MoveDir::Down })
    }
}

pub struct GamepadInput {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_x: f32,
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_y: f32,
    /// Direction the stick was in last poll; a move is queued only on change.
    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    stick_dir: Option<MoveDir>,

    quit_buttons: Vec<Btn>,
    quit_requested: bool,

    pub connected: bool,
}

impl GamepadInput {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                (Some(g), has_pad)
            }
            Err(e) => {
                log::warn!("gamepad support unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        GamepadInput {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            stick_x: 0.0,
            stick_y: 0.0,
            stick_dir: None,
            quit_buttons: vec![Btn::Select],
            quit_requested: false,
            connected,
        }
    }

    /// Load button mapping from config. Unknown names are skipped;
    /// an empty result keeps the default.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        let quit: Vec<Btn> = cfg.quit.iter()
            .filter_map(|s| {
                let btn = Btn::from_name(s);
                if btn.is_none() { log::warn!("unknown gamepad button {s:?} in config"); }
                btn
            })
            .collect();
        if !quit.is_empty() { self.quit_buttons = quit; }
    }

    /// Poll pending gamepad events, queueing moves. Call once per frame.
    pub fn update(&mut self, queue: &mut InputQueue) {
        #[cfg(feature = "gamepad")]
        self.poll_gilrs(queue);
        #[cfg(not(feature = "gamepad"))]
        let _ = queue;
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self, queue: &mut InputQueue) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.press_button(btn, queue);
                }
                EventType::AxisChanged(axis, value, _) => {
                    self.connected = true;
                    match axis {
                        Axis::LeftStickX => self.stick_x = value,
                        Axis::LeftStickY => self.stick_y = value,
                        _ => {}
                    }
                }
                EventType::Connected => {
                    self.connected = true;
                    log::debug!("gamepad connected");
                }
                EventType::Disconnected => {
                    self.connected = false;
                    self.stick_x = 0.0;
                    self.stick_y = 0.0;
                    log::debug!("gamepad disconnected");
                }
                _ => {}
            }
        }

        let dir = stick_direction(self.stick_x, self.stick_y);
        if dir != self.stick_dir {
            if let Some(d) = dir { queue.push(d); }
            self.stick_dir = dir;
        }
    }

    #[cfg(feature = "gamepad")]
    fn press_button(&mut self, gilrs_btn: Button, queue: &mut InputQueue) {
        // D-pad handled separately (not in Btn enum)
        let dir = match gilrs_btn {
            Button::DPadUp => Some(MoveDir::Up),
            Button::DPadDown => Some(MoveDir::Down),
            Button::DPadLeft => Some(MoveDir::Left),
            Button::DPadRight => Some(MoveDir::Right),
            _ => None,
        };
        if let Some(d) = dir {
            queue.push(d);
            return;
        }

        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            if self.quit_buttons.contains(&btn) {
                self.quit_requested = true;
            }
        }
    }
}
