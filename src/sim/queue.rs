/// Pending directional commands between ticks.
///
/// Producers (keyboard, gamepad, replay) push; `step` drains the whole
/// queue once per tick before the gravity sweep.
///
/// Drain order is a product choice:
///   - `Lifo`: stack semantics. The last key pressed before a tick is
///     processed first; a burst of presses is replayed in reverse.
///   - `Fifo`: presses are processed in the order they arrived.

use serde::Deserialize;

use crate::domain::entity::MoveDir;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrainOrder {
    #[default]
    Lifo,
    Fifo,
}

#[derive(Clone, Debug, Default)]
pub struct InputQueue {
    pending: Vec<MoveDir>,
    order: DrainOrder,
}

impl InputQueue {
    pub fn new(order: DrainOrder) -> Self {
        InputQueue { pending: Vec::with_capacity(8), order }
    }

    pub fn push(&mut self, dir: MoveDir) {
        self.pending.push(dir);
    }

    /// Take every pending command, in processing order.
    pub fn drain(&mut self) -> Vec<MoveDir> {
        let mut taken = std::mem::take(&mut self.pending);
        if self.order == DrainOrder::Lifo {
            taken.reverse();
        }
        taken
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn order(&self) -> DrainOrder {
        self.order
    }
}
