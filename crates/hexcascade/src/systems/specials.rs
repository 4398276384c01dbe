//! Starflower/black-pearl births, multiplier-cluster detection, and bomb
//! ticking.
//!
//! The multiplier flood-fill is an iterative `VecDeque` BFS, the same
//! technique the teacher's own `expand_connections_bfs` doc comment calls
//! out as a deliberate replacement for recursion.

use std::collections::{HashSet, VecDeque};

use crate::grid::{Board, Cell, Special};
use crate::hex::HexGeometry;

type Key = (usize, usize);

/// A starflower or black-pearl birth: the center and the ring it was born
/// from/consumed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StarflowerBirth {
    pub center: Key,
    pub ring: [Key; 6],
    pub ring_color: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlackPearlBirth {
    pub center: Key,
    pub absorbed_ring: [Key; 6],
}

/// Whole-board starflower detection: every cell whose six in-bounds
/// neighbors are non-blocker, identical, and differ from its own color
/// becomes a starflower. The ring is **not** cleared here.
pub fn detect_starflowers_whole_board(board: &mut Board, geo: &HexGeometry) -> Vec<StarflowerBirth> {
    let mut births = Vec::new();
    for col in 0..board.cols {
        for row in 0..board.rows {
            let Some(center) = board.get(col, row) else {
                continue;
            };
            if center.is_blocker() {
                continue;
            }
            if let Some(birth) = ring_birth_if_uniform(board, geo, (col, row), center.color) {
                births.push(birth);
            }
        }
    }
    for birth in &births {
        board.set(birth.center.0, birth.center.1, Some(Cell::starflower()));
    }
    births
}

/// Starflower births at a just-cleared gap: the gap's six neighbors are
/// all present, non-starflower, outside the cleared set, and share a
/// common non-negative color.
pub fn detect_starflowers_at_gaps(
    board: &mut Board,
    geo: &HexGeometry,
    cleared: &HashSet<Key>,
) -> Vec<StarflowerBirth> {
    let mut births = Vec::new();
    for &(col, row) in cleared {
        if board.get(col, row).is_some() {
            continue;
        }
        let ring = geo.neighbors(col as i32, row as i32);
        if ring.iter().any(|n| n.is_none()) {
            continue;
        }
        let ring: [(usize, usize); 6] =
            std::array::from_fn(|i| (ring[i].unwrap().0 as usize, ring[i].unwrap().1 as usize));

        if ring.iter().any(|k| cleared.contains(k)) {
            continue;
        }

        let mut common: Option<u8> = None;
        let mut uniform = true;
        for &(nc, nr) in &ring {
            match board.get(nc, nr) {
                Some(c) if !c.is_starflower() && c.color >= 0 => {
                    let color = c.color as u8;
                    match common {
                        None => common = Some(color),
                        Some(existing) if existing == color => {}
                        _ => {
                            uniform = false;
                            break;
                        }
                    }
                }
                _ => {
                    uniform = false;
                    break;
                }
            }
        }

        if uniform {
            if let Some(color) = common {
                board.set(col, row, Some(Cell::starflower()));
                births.push(StarflowerBirth {
                    center: (col, row),
                    ring,
                    ring_color: color,
                });
            }
        }
    }
    births
}

/// Check if every neighbor of `center` is non-blocker, identical, and
/// different from the center's own color. Returns the birth descriptor
/// without mutating the board.
fn ring_birth_if_uniform(
    board: &Board,
    geo: &HexGeometry,
    center: Key,
    own_color: i8,
) -> Option<StarflowerBirth> {
    let ring = geo.neighbors(center.0 as i32, center.1 as i32);
    if ring.iter().any(|n| n.is_none()) {
        return None;
    }
    let ring: [(usize, usize); 6] =
        std::array::from_fn(|i| (ring[i].unwrap().0 as usize, ring[i].unwrap().1 as usize));

    let mut common: Option<u8> = None;
    for &(nc, nr) in &ring {
        match board.get(nc, nr) {
            Some(c) if !c.is_blocker() => {
                let color = c.color as u8;
                match common {
                    None => common = Some(color),
                    Some(existing) if existing == color => {}
                    _ => return None,
                }
            }
            _ => return None,
        }
    }

    let ring_color = common?;
    if ring_color as i8 == own_color {
        return None;
    }
    Some(StarflowerBirth {
        center,
        ring,
        ring_color,
    })
}

/// Black-pearl detection: every cell whose six neighbors are all
/// starflowers becomes a black pearl, consuming (clearing) those six
/// starflowers.
pub fn detect_black_pearls(board: &mut Board, geo: &HexGeometry) -> Vec<BlackPearlBirth> {
    let mut births = Vec::new();
    for col in 0..board.cols {
        for row in 0..board.rows {
            if board.get(col, row).map_or(false, |c| c.is_black_pearl()) {
                continue;
            }
            let ring = geo.neighbors(col as i32, row as i32);
            if ring.iter().any(|n| n.is_none()) {
                continue;
            }
            let ring: [(usize, usize); 6] = std::array::from_fn(|i| {
                (ring[i].unwrap().0 as usize, ring[i].unwrap().1 as usize)
            });
            let all_starflowers = ring
                .iter()
                .all(|&(c, r)| board.get(c, r).map_or(false, |cell| cell.is_starflower()));
            if all_starflowers {
                births.push(BlackPearlBirth {
                    center: (col, row),
                    absorbed_ring: ring,
                });
            }
        }
    }

    for birth in &births {
        board.set(birth.center.0, birth.center.1, Some(Cell::black_pearl()));
        for &(c, r) in &birth.absorbed_ring {
            board.set(c, r, None);
        }
    }
    births
}

/// Connected components of `special = multiplier` cells, via an iterative
/// BFS flood-fill over the neighbor graph. Only components of size >= 3
/// are returned.
pub fn find_multiplier_clusters(board: &Board, geo: &HexGeometry) -> Vec<HashSet<Key>> {
    let mut visited: HashSet<Key> = HashSet::new();
    let mut clusters = Vec::new();

    for col in 0..board.cols {
        for row in 0..board.rows {
            let key = (col, row);
            if visited.contains(&key) {
                continue;
            }
            let is_multiplier = board
                .get(col, row)
                .map_or(false, |c| matches!(c.special, Special::Multiplier));
            if !is_multiplier {
                continue;
            }

            let mut component = HashSet::new();
            let mut queue: VecDeque<Key> = VecDeque::new();
            queue.push_back(key);
            visited.insert(key);

            while let Some((cc, cr)) = queue.pop_front() {
                component.insert((cc, cr));
                for n in geo.neighbors(cc as i32, cr as i32).into_iter().flatten() {
                    let nk = (n.0 as usize, n.1 as usize);
                    if visited.contains(&nk) {
                        continue;
                    }
                    let neighbor_is_multiplier = board
                        .get(nk.0, nk.1)
                        .map_or(false, |c| matches!(c.special, Special::Multiplier));
                    if neighbor_is_multiplier {
                        visited.insert(nk);
                        queue.push_back(nk);
                    }
                }
            }

            if component.len() >= 3 {
                clusters.push(component);
            }
        }
    }

    clusters
}

/// Decrement every bomb's timer. Returns `(pos, remaining)` for every
/// bomb ticked; callers filter `remaining == 0` for expiry.
pub fn tick_bombs(board: &mut Board) -> Vec<(Key, u32)> {
    let mut ticked = Vec::new();
    for col in 0..board.cols {
        for row in 0..board.rows {
            if let Some(mut cell) = board.get(col, row) {
                if let Special::Bomb { timer } = cell.special {
                    let next = timer.saturating_sub(1);
                    cell.special = Special::Bomb { timer: next };
                    board.set(col, row, Some(cell));
                    ticked.push(((col, row), next));
                }
            }
        }
    }
    ticked
}
