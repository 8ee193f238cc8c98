/// Keyboard input.
///
/// Every Press (and auto-Repeat) of a direction key pushes one command
/// into the world's input queue; the tick drains them. Nothing is held
/// or debounced here, so a burst of presses between two ticks arrives
/// as a burst of queued commands.
///
/// Release events are ignored. Terminals that report them (keyboard
/// enhancement) and terminals that don't behave the same.

use std::io;
use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;
use crate::sim::queue::InputQueue;

// ── Key Constants ──

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

/// What a single key event means to the game.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum KeyAction {
    Move(MoveDir),
    Quit,
    Ignore,
}

/// Map one key event. Pure, so it can be tested without a terminal.
pub fn map_key(key: &KeyEvent) -> KeyAction {
    if key.kind == KeyEventKind::Release {
        return KeyAction::Ignore;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return KeyAction::Quit;
    }

    let code = key.code;
    if KEYS_LEFT.contains(&code) {
        KeyAction::Move(MoveDir::Left)
    } else if KEYS_RIGHT.contains(&code) {
        KeyAction::Move(MoveDir::Right)
    } else if KEYS_UP.contains(&code) {
        KeyAction::Move(MoveDir::Up)
    } else if KEYS_DOWN.contains(&code) {
        KeyAction::Move(MoveDir::Down)
    } else if KEYS_QUIT.contains(&code) {
        KeyAction::Quit
    } else {
        KeyAction::Ignore
    }
}

pub struct KeyboardInput {
    quit_requested: bool,
}

impl KeyboardInput {
    pub fn new() -> Self {
        KeyboardInput { quit_requested: false }
    }

    /// Drain all pending terminal events without blocking, queueing moves.
    /// Call once per frame.
    pub fn drain_events(&mut self, queue: &mut InputQueue) -> io::Result<()> {
        while poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                match map_key(&key) {
                    KeyAction::Move(dir) => queue.push(dir),
                    KeyAction::Quit => self.quit_requested = true,
                    KeyAction::Ignore => {}
                }
            }
        }
        Ok(())
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }
}
