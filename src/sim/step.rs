/// The step function: advances the world by one tick.
///
/// Processing order:
///   1. Input resolution: drain the whole queue, apply each move against
///      the grid as left by the previous one (moves chain within a tick)
///   2. Gravity resolution: exactly one sweep, however many inputs ran
///
/// Rendering is the caller's business and happens after `step` returns.

use crate::domain::entity::MoveDir;
use crate::domain::physics;
use crate::domain::rules::{self, MoveOutcome};
use crate::domain::tile::{FallState, Tile};
use super::event::GameEvent;
use super::world::WorldState;

// ══════════════════════════════════════════════════════════════
// Main entry point
// ══════════════════════════════════════════════════════════════

pub fn step(world: &mut WorldState) -> Vec<GameEvent> {
    let mut events: Vec<GameEvent> = Vec::new();
    world.tick += 1;

    resolve_inputs(world, &mut events);
    resolve_gravity(world, &mut events);
    debug_assert_eq!(world.player_marker_count(), 1);

    events
}

// ══════════════════════════════════════════════════════════════
// Inputs
// ══════════════════════════════════════════════════════════════

fn resolve_inputs(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    if world.inputs.is_empty() {
        return;
    }
    for dir in world.inputs.drain() {
        handle_input(world, dir, events);
    }
}

/// Resolve and apply one move. Side effects (lock removal, tile placement)
/// land before the player is relocated.
pub fn handle_input(world: &mut WorldState, dir: MoveDir, events: &mut Vec<GameEvent>) {
    let outcome = rules::resolve_move(&world.view(), world.player, dir);

    match outcome {
        MoveOutcome::Blocked => {
            events.push(GameEvent::MoveBlocked { dir });
        }
        MoveOutcome::Walk { x, y, ate_flux } => {
            if ate_flux {
                events.push(GameEvent::FluxEaten { x, y });
            }
            world.move_player(x, y);
            events.push(GameEvent::PlayerMoved { x, y });
        }
        MoveOutcome::Unlock { x, y, key } => {
            let locks_removed = world.remove(|t| key.removes(t));
            events.push(GameEvent::KeyCollected { first: key.is_first(), locks_removed });
            world.move_player(x, y);
            events.push(GameEvent::PlayerMoved { x, y });
        }
        MoveOutcome::Push { x, y, to_x, tile } => {
            world.set_tile(to_x, y, tile);
            events.push(GameEvent::Pushed { from_x: x, to_x, y });
            world.move_player(x, y);
            events.push(GameEvent::PlayerMoved { x, y });
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Gravity
// ══════════════════════════════════════════════════════════════

/// One gravity sweep: rows bottom to top, columns left to right.
///
/// Bottom-up order means a tile dropped into row y+1 is never visited
/// again in the same sweep, so nothing falls more than one cell per tick.
pub fn resolve_gravity(world: &mut WorldState, events: &mut Vec<GameEvent>) {
    for y in (0..world.height).rev() {
        for x in 0..world.width {
            update_tile(world, x, y, events);
        }
    }
}

/// Per-cell update. Only Stones and Boxes do anything.
fn update_tile(world: &mut WorldState, x: usize, y: usize, events: &mut Vec<GameEvent>) {
    let tile = world.tiles[y][x];
    let previous = match tile.fall_state() {
        Some(state) => state,
        None => return,
    };

    match physics::fall_state_at(&world.view(), x, y) {
        FallState::Falling => {
            world.set_tile(x, y + 1, tile.with_fall_state(FallState::Falling));
            world.set_tile(x, y, Tile::Air);
            events.push(GameEvent::TileFell { x, y: y + 1 });
        }
        FallState::Resting => {
            if previous == FallState::Falling {
                events.push(GameEvent::TileLanded { x, y });
            }
            world.set_tile(x, y, tile.with_fall_state(FallState::Resting));
        }
    }
}

// ══════════════════════════════════════════════════════════════
// Unit tests
// ══════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::diagram::tiles_from;
    use crate::domain::entity::Player;
    use crate::domain::tile::{CYAN_KEY, YELLOW_KEY};
    use crate::sim::level::{self, SAMPLE_LEVEL};
    use crate::sim::queue::{DrainOrder, InputQueue};
    use proptest::prelude::*;

    fn world_from(rows: &[&str], order: DrainOrder) -> WorldState {
        let tiles = tiles_from(rows);
        let mut player = None;
        for (y, row) in tiles.iter().enumerate() {
            for (x, t) in row.iter().enumerate() {
                if t.is_player() { player = Some(Player::new(x, y)); }
            }
        }
        WorldState::new(tiles, player.expect("diagram needs a player"), InputQueue::new(order))
    }

    fn world(rows: &[&str]) -> WorldState {
        world_from(rows, DrainOrder::Lifo)
    }

    fn tick_with(w: &mut WorldState, dirs: &[MoveDir]) -> Vec<GameEvent> {
        for &d in dirs { w.inputs.push(d); }
        step(w)
    }

    // ── No-op moves ──

    #[test]
    fn walking_into_wall_changes_nothing() {
        let mut w = world(&[
            "###",
            "#P#",
            "###",
        ]);
        let before = w.tiles.clone();
        let events = tick_with(&mut w, &[MoveDir::Left, MoveDir::Up, MoveDir::Right, MoveDir::Down]);
        assert_eq!(w.tiles, before);
        assert_eq!(w.player, Player::new(1, 1));
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::MoveBlocked { .. })).count(), 4);
    }

    #[test]
    fn walking_into_lock_changes_nothing() {
        let mut w = world(&[
            "#####",
            "#KPJ#",
            "#####",
        ]);
        let before = w.tiles.clone();
        tick_with(&mut w, &[MoveDir::Left]);
        tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.tiles, before);
        assert_eq!(w.player, Player::new(2, 1));
    }

    // ── Walking / Flux ──

    #[test]
    fn flux_is_eaten() {
        let mut w = world(&[
            "#####",
            "#P..#",
            "#####",
        ]);
        let events = tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.player, Player::new(2, 1));
        assert_eq!(w.tile_at(1, 1), Tile::Air);
        assert_eq!(w.tile_at(2, 1), Tile::Player);
        assert_eq!(w.tile_at(3, 1), Tile::Flux);
        assert!(events.contains(&GameEvent::FluxEaten { x: 2, y: 1 }));
    }

    // ── Gravity ──

    #[test]
    fn stone_falls_one_cell_per_tick() {
        let mut w = world(&[
            "#o#P",
            "# # ",
            "# # ",
            "# # ",
            "####",
        ]);
        step(&mut w);
        assert_eq!(w.tile_at(1, 0), Tile::Air);
        assert_eq!(w.tile_at(1, 1), Tile::Stone(FallState::Falling));
        step(&mut w);
        assert_eq!(w.tile_at(1, 1), Tile::Air);
        assert_eq!(w.tile_at(1, 2), Tile::Stone(FallState::Falling));
        step(&mut w);
        assert_eq!(w.tile_at(1, 3), Tile::Stone(FallState::Falling));
        let events = step(&mut w);
        assert_eq!(w.tile_at(1, 3), Tile::Stone(FallState::Resting));
        assert!(events.contains(&GameEvent::TileLanded { x: 1, y: 3 }));
        step(&mut w);
        assert_eq!(w.tile_at(1, 3), Tile::Stone(FallState::Resting));
    }

    #[test]
    fn stacked_tiles_fall_together() {
        let mut w = world(&[
            "bP",
            "o#",
            " #",
            " #",
            "##",
        ]);
        step(&mut w);
        assert_eq!(w.tile_at(0, 0), Tile::Air);
        assert_eq!(w.tile_at(0, 1), Tile::Box(FallState::Falling));
        assert_eq!(w.tile_at(0, 2), Tile::Stone(FallState::Falling));
    }

    #[test]
    fn falling_tag_clears_on_ground() {
        let mut w = world(&[
            "BOP",
            "###",
        ]);
        step(&mut w);
        assert_eq!(w.tile_at(0, 0), Tile::Box(FallState::Resting));
        assert_eq!(w.tile_at(1, 0), Tile::Stone(FallState::Resting));
    }

    #[test]
    fn stone_lands_on_player() {
        let mut w = world(&[
            "#o#",
            "# #",
            "#P#",
            "###",
        ]);
        step(&mut w);
        assert_eq!(w.tile_at(1, 1), Tile::Stone(FallState::Falling));
        step(&mut w);
        assert_eq!(w.tile_at(1, 1), Tile::Stone(FallState::Resting));
        assert_eq!(w.tile_at(1, 2), Tile::Player);
    }

    #[test]
    fn walking_out_from_under_a_stone_lets_it_fall() {
        let mut w = world(&[
            "#o ",
            "#P ",
            "###",
        ]);
        tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.player, Player::new(2, 1));
        // Moves run before gravity in the same tick.
        assert_eq!(w.tile_at(1, 1), Tile::Stone(FallState::Falling));
        assert_eq!(w.tile_at(1, 0), Tile::Air);
    }

    // ── Keys / Locks ──

    #[test]
    fn key1_removes_lock1_only() {
        let mut w = world(&[
            "#######",
            "#PkKJK#",
            "#J#K###",
            "#######",
        ]);
        let events = tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.player, Player::new(2, 1));
        assert_eq!(w.tile_at(3, 1), Tile::Air);
        assert_eq!(w.tile_at(5, 1), Tile::Air);
        assert_eq!(w.tile_at(3, 2), Tile::Air);
        assert_eq!(w.tile_at(4, 1), Tile::Lock(CYAN_KEY));
        assert_eq!(w.tile_at(1, 2), Tile::Lock(CYAN_KEY));
        assert!(events.contains(&GameEvent::KeyCollected { first: true, locks_removed: 3 }));
    }

    #[test]
    fn key2_removes_lock2_only() {
        let mut w = world(&[
            "######",
            "#PjKJ#",
            "######",
        ]);
        tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.tile_at(3, 1), Tile::Lock(YELLOW_KEY));
        assert_eq!(w.tile_at(4, 1), Tile::Air);
    }

    #[test]
    fn key_without_locks_just_moves() {
        let mut w = world(&[
            "####",
            "#Pk#",
            "####",
        ]);
        let events = tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.player, Player::new(2, 1));
        assert_eq!(w.tile_at(1, 1), Tile::Air);
        assert!(events.contains(&GameEvent::KeyCollected { first: true, locks_removed: 0 }));
    }

    #[test]
    fn key_picked_up_from_below() {
        let mut w = world(&[
            "###",
            "#k#",
            "#P#",
            "#J#",
            "###",
        ]);
        tick_with(&mut w, &[MoveDir::Up]);
        assert_eq!(w.player, Player::new(1, 1));
        assert_eq!(w.tile_at(1, 3), Tile::Lock(CYAN_KEY));
    }

    // ── Push ──

    #[test]
    fn push_stone_onto_ground() {
        let mut w = world(&[
            "#Po #",
            "#####",
        ]);
        let events = tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.player, Player::new(2, 0));
        assert_eq!(w.tile_at(1, 0), Tile::Air);
        assert_eq!(w.tile_at(2, 0), Tile::Player);
        assert_eq!(w.tile_at(3, 0), Tile::Stone(FallState::Resting));
        assert!(events.contains(&GameEvent::Pushed { from_x: 2, to_x: 3, y: 0 }));
    }

    #[test]
    fn push_over_gap_refused() {
        let mut w = world(&[
            "#Po #",
            "### #",
            "#####",
        ]);
        let before = w.tiles.clone();
        tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.tiles, before);
        assert_eq!(w.player, Player::new(1, 0));
    }

    #[test]
    fn stone_is_not_pushed_off_a_ledge() {
        let mut w = world(&[
            "#Po  #",
            "###  #",
        ]);
        let before = w.tiles.clone();
        let events = tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(events, vec![GameEvent::MoveBlocked { dir: MoveDir::Right }]);
        assert_eq!(w.tiles, before);
    }

    #[test]
    fn push_into_obstruction_refused() {
        let mut w = world(&[
            "#bPob#",
            "######",
        ]);
        let before = w.tiles.clone();
        tick_with(&mut w, &[MoveDir::Right]);
        tick_with(&mut w, &[MoveDir::Left]);
        assert_eq!(w.tiles, before);
    }

    #[test]
    fn falling_box_cannot_be_pushed() {
        let mut w = world(&[
            "#PB #",
            "#####",
        ]);
        // Box is tagged Falling until the first sweep reclassifies it.
        w.inputs.push(MoveDir::Right);
        let events = step(&mut w);
        assert_eq!(w.player, Player::new(1, 0));
        assert!(events.contains(&GameEvent::MoveBlocked { dir: MoveDir::Right }));
        assert_eq!(w.tile_at(2, 0), Tile::Box(FallState::Resting));
        tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.tile_at(3, 0), Tile::Box(FallState::Resting));
        assert_eq!(w.player, Player::new(2, 0));
    }

    // ── Input chaining / drain order ──

    #[test]
    fn lifo_processes_last_press_first() {
        // Pressed Right then Down; LIFO runs Down (blocked) then Right.
        let mut w = world(&[
            "#####",
            "#P  #",
            "#####",
        ]);
        tick_with(&mut w, &[MoveDir::Right, MoveDir::Down]);
        assert_eq!(w.player, Player::new(2, 1));
    }

    #[test]
    fn drain_order_changes_the_result() {
        let rows = [
            "####",
            "#P #",
            "## #",
            "####",
        ];
        // Pressed Right, then Down.
        let mut lifo = world_from(&rows, DrainOrder::Lifo);
        tick_with(&mut lifo, &[MoveDir::Right, MoveDir::Down]);
        assert_eq!(lifo.player, Player::new(2, 1));

        let mut fifo = world_from(&rows, DrainOrder::Fifo);
        tick_with(&mut fifo, &[MoveDir::Right, MoveDir::Down]);
        assert_eq!(fifo.player, Player::new(2, 2));
    }

    #[test]
    fn moves_chain_within_one_tick() {
        let mut w = world_from(&[
            "#P.o #",
            "######",
        ], DrainOrder::Fifo);
        let events = tick_with(&mut w, &[MoveDir::Right, MoveDir::Right]);
        assert_eq!(w.player, Player::new(3, 0));
        assert_eq!(w.tile_at(4, 0), Tile::Stone(FallState::Resting));
        assert_eq!(events.iter().filter(|e| matches!(e, GameEvent::PlayerMoved { .. })).count(), 2);
    }

    #[test]
    fn queue_is_empty_after_step() {
        let mut w = world(&["P  "]);
        tick_with(&mut w, &[MoveDir::Right, MoveDir::Left, MoveDir::Right]);
        assert!(w.inputs.is_empty());
        assert_eq!(w.tick, 1);
    }

    #[test]
    fn one_gravity_sweep_regardless_of_input_count() {
        let mut w = world_from(&[
            "#o# P  #",
            "# #    #",
            "# #    #",
            "########",
        ], DrainOrder::Fifo);
        tick_with(&mut w, &[MoveDir::Right, MoveDir::Right, MoveDir::Left]);
        assert_eq!(w.tile_at(1, 1), Tile::Stone(FallState::Falling));
        assert_eq!(w.tile_at(1, 2), Tile::Air);
    }

    // ── Sample level ──

    fn replay(moves: &[Option<MoveDir>]) -> String {
        let mut w = level::load_level(&SAMPLE_LEVEL, DrainOrder::Lifo).unwrap();
        for m in moves {
            if let Some(d) = m { w.inputs.push(*d); }
            step(&mut w);
        }
        w.snapshot()
    }

    #[test]
    fn sample_right_then_down() {
        let mut w = level::load_sample(DrainOrder::Lifo).unwrap();
        tick_with(&mut w, &[MoveDir::Right]);
        assert_eq!(w.player, Player::new(2, 1));
        tick_with(&mut w, &[MoveDir::Down]);
        // (2,2) is a wall.
        assert_eq!(w.player, Player::new(2, 1));
        assert_eq!(w.player_marker_count(), 1);
        assert_eq!(w.tile_at(1, 1), Tile::Air);
        assert_eq!(w.tile_at(1, 2), Tile::Stone(FallState::Resting));
    }

    #[test]
    fn sample_snapshot_after_right_then_down() {
        let snap = replay(&[Some(MoveDir::Right), Some(MoveDir::Down)]);
        assert_eq!(
            snap,
            "2 2 2 2 2 2 2 2\n\
             2 0 3 1 1 2 0 2\n\
             2 4 2 6 1 2 0 2\n\
             2 8 4 1 1 2 0 2\n\
             2 4 1 1 1 9 0 2\n\
             2 2 2 2 2 2 2 2\n"
        );
    }

    #[test]
    fn idle_tick_only_runs_gravity() {
        let mut w = world(&[
            "Po",
            "# ",
            "##",
        ]);
        let events = tick_with(&mut w, &[]);
        assert_eq!(events, vec![GameEvent::TileFell { x: 1, y: 1 }]);
        assert_eq!(w.player, Player::new(0, 0));
    }

    // ── Properties ──

    fn arb_tile_char() -> impl Strategy<Value = char> {
        prop::sample::select(vec![' ', ' ', ' ', '.', '#', 'o', 'O', 'b', 'B', 'k', 'K', 'j', 'J'])
    }

    fn arb_grid() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(
            prop::collection::vec(arb_tile_char(), 6).prop_map(|v| v.into_iter().collect::<String>()),
            5,
        )
    }

    fn arb_dir() -> impl Strategy<Value = MoveDir> {
        prop::sample::select(vec![MoveDir::Left, MoveDir::Right, MoveDir::Up, MoveDir::Down])
    }

    fn world_with_player(rows: &[String], px: usize, py: usize) -> WorldState {
        let refs: Vec<&str> = rows.iter().map(|s| s.as_str()).collect();
        let mut tiles = tiles_from(&refs);
        tiles[py][px] = Tile::Player;
        WorldState::new(tiles, Player::new(px, py), InputQueue::default())
    }

    fn falling_capable_count(w: &WorldState) -> usize {
        w.tiles.iter().flatten().filter(|t| t.is_pushable()).count()
    }

    proptest! {
        #[test]
        fn prop_gravity_moves_at_most_one_cell(rows in arb_grid(), px in 0usize..6, py in 0usize..5) {
            let mut w = world_with_player(&rows, px, py);
            let before = w.tiles.clone();
            let mut events = vec![];
            resolve_gravity(&mut w, &mut events);

            // Every cell that now holds a Stone/Box either held one before,
            // or sits directly below one that left.
            for y in 0..w.height {
                for x in 0..w.width {
                    let now = w.tiles[y][x];
                    if !now.is_pushable() || before[y][x].is_pushable() { continue; }
                    prop_assert!(y > 0);
                    prop_assert!(before[y - 1][x].is_pushable());
                    prop_assert!(before[y][x].is_air());
                }
            }
            prop_assert_eq!(falling_capable_count(&w), rows.iter().flat_map(|r| r.chars())
                .filter(|c| "oObB".contains(*c)).count()
                - if "oObB".contains(rows[py].chars().nth(px).unwrap_or(' ')) { 1 } else { 0 });
        }

        #[test]
        fn prop_player_marker_stays_unique(rows in arb_grid(), px in 0usize..6, py in 0usize..5,
                                           dirs in prop::collection::vec(arb_dir(), 0..12)) {
            let mut w = world_with_player(&rows, px, py);
            for d in dirs {
                w.inputs.push(d);
                step(&mut w);
                prop_assert_eq!(w.player_marker_count(), 1);
                prop_assert!(w.tile_at(w.player.x, w.player.y).is_player());
            }
        }

        #[test]
        fn prop_blocked_move_leaves_grid_untouched(rows in arb_grid(), px in 0usize..6, py in 0usize..5,
                                                   dir in arb_dir()) {
            let mut w = world_with_player(&rows, px, py);
            let before = w.tiles.clone();
            let mut events = vec![];
            handle_input(&mut w, dir, &mut events);
            if events == vec![GameEvent::MoveBlocked { dir }] {
                prop_assert_eq!(&w.tiles, &before);
                prop_assert_eq!(w.player, Player::new(px, py));
            }
        }
    }
}
