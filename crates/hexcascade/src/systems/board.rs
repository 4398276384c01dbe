//! Board-level mutation: initial generation, gravity, refill, and the two
//! rotation topologies (cluster/ring share one data-shift operation; Y
//! rotation reuses it over 3 slots).
//!
//! Grounded on the teacher's `GameBoard::{reset_table,
//! remove_and_shift_connecting_tiles, bomb_table}` — walk the column,
//! compact survivors, fill the remainder with fresh random cells.

use crate::components::{BOMB_INITIAL_TIMER, MULTIPLIER_SPAWN_P_DEN, MULTIPLIER_SPAWN_P_NUM};
use crate::grid::{Board, Cell, Special};
use crate::rng::Rng;
use crate::systems::matchers::find_line_matches;

type Key = (usize, usize);

const MAX_REROLL_PASSES: usize = 100;

/// Allocate a full grid of random colors, re-rolling any cell caught in an
/// initial 3+ line run. Iterated up to 100 passes so turn 1 never starts
/// mid-cascade.
pub fn new_board(rng: &mut Rng, cols: usize, rows: usize, palette_size: u8) -> Board {
    let mut board = Board::empty(cols, rows);
    for col in 0..cols {
        for row in 0..rows {
            let color = rng.next_int(palette_size as u32) as u8;
            board.set(col, row, Some(Cell::regular(color)));
        }
    }

    for _ in 0..MAX_REROLL_PASSES {
        let offenders = find_line_matches(&board);
        if offenders.is_empty() {
            break;
        }
        for (col, row) in offenders {
            let color = rng.next_int(palette_size as u32) as u8;
            board.set(col, row, Some(Cell::regular(color)));
        }
    }

    board
}

/// Rotate the data among an arbitrary-size cycle of slots. CW: slot `i`
/// receives the contents of slot `(i-1) mod n`; CCW reverses.
fn rotate_slots(board: &mut Board, slots: &[Key], clockwise: bool) {
    let n = slots.len();
    let old: Vec<Option<Cell>> = slots.iter().map(|&(c, r)| board.get(c, r)).collect();
    for i in 0..n {
        let src = if clockwise {
            (i + n - 1) % n
        } else {
            (i + 1) % n
        };
        let (c, r) = slots[i];
        board.set(c, r, old[src]);
    }
}

/// Rotate a 3-cluster selection. Positions don't move; only their contents
/// cycle.
pub fn rotate_cluster(board: &mut Board, cluster: [Key; 3], clockwise: bool) {
    rotate_slots(board, &cluster, clockwise);
}

/// Rotate a 6-ring selection (around a fixed starflower center).
pub fn rotate_ring(board: &mut Board, ring: [Key; 6], clockwise: bool) {
    rotate_slots(board, &ring, clockwise);
}

/// Rotate a 3-point Y selection (alternating neighbors of a black pearl).
pub fn rotate_y(board: &mut Board, points: [Key; 3], clockwise: bool) {
    rotate_slots(board, &points, clockwise);
}

/// Collapse every column: non-empty cells drop into the lowest empty slot
/// below them, preserving order within the column. Returns whether
/// anything moved.
pub fn apply_gravity(board: &mut Board) -> bool {
    let mut moved = false;
    for col in 0..board.cols {
        let mut write = board.rows;
        for row in (0..board.rows).rev() {
            if let Some(cell) = board.get(col, row) {
                write -= 1;
                if write != row {
                    board.set(col, row, None);
                    board.set(col, write, Some(cell));
                    moved = true;
                }
            }
        }
    }
    moved
}

/// Fill every empty slot with a fresh random-color cell (independent 5%
/// multiplier chance each). If `spawn_bomb` and at least one cell was
/// filled, promote one uniformly-random filled cell to a bomb. Returns the
/// filled positions.
pub fn fill_empty(
    board: &mut Board,
    rng: &mut Rng,
    palette_size: u8,
    spawn_bomb: bool,
) -> Vec<Key> {
    let mut filled = Vec::new();
    for col in 0..board.cols {
        for row in 0..board.rows {
            if board.is_empty_at(col, row) {
                let color = rng.next_int(palette_size as u32) as u8;
                let mut cell = Cell::regular(color);
                if rng.chance(MULTIPLIER_SPAWN_P_NUM, MULTIPLIER_SPAWN_P_DEN) {
                    cell.special = Special::Multiplier;
                }
                board.set(col, row, Some(cell));
                filled.push((col, row));
            }
        }
    }

    if spawn_bomb && !filled.is_empty() {
        let pick = filled[rng.next_int(filled.len() as u32) as usize];
        if let Some(mut cell) = board.get(pick.0, pick.1) {
            cell.special = Special::Bomb {
                timer: BOMB_INITIAL_TIMER,
            };
            board.set(pick.0, pick.1, Some(cell));
        }
    }

    filled
}
