//! Line and triangle match scanners.
//!
//! Both walk outward from every cell using the fixed clockwise neighbor
//! ordering (line matches via axial stepping, triangle matches via
//! adjacent neighbor-table pairs) and return the union of matched keys as
//! a set — callers don't care which run or triangle a cell came from.

use std::collections::HashSet;

use crate::components::MatchMode;
use crate::grid::Board;
use crate::hex::{axial_to_offset, offset_to_axial, Axial, HexGeometry};

type Key = (usize, usize);

/// The three axial line directions a match can run along.
const LINE_AXES: [(i32, i32); 3] = [(1, 0), (0, 1), (1, -1)];

/// Every cell that belongs to a same-color run of length >= 3 along one of
/// the three axial directions. Starflowers and black pearls never match.
pub fn find_line_matches(board: &Board) -> HashSet<Key> {
    let mut result = HashSet::new();

    for col in 0..board.cols {
        for row in 0..board.rows {
            let cell = match board.get(col, row) {
                Some(c) if !c.is_blocker() => c,
                _ => continue,
            };
            let axial = offset_to_axial(col as i32, row as i32);

            for &(dq, dr) in &LINE_AXES {
                // Only start a run from its first cell, so each run is
                // walked exactly once.
                let prev = Axial {
                    q: axial.q - dq,
                    r: axial.r - dr,
                };
                let (pc, pr) = axial_to_offset(prev);
                if let Some(prev_cell) = board.get_signed(pc, pr) {
                    if !prev_cell.is_blocker() && prev_cell.color == cell.color {
                        continue;
                    }
                }

                let mut run = vec![(col, row)];
                let mut cur = axial;
                loop {
                    cur = Axial {
                        q: cur.q + dq,
                        r: cur.r + dr,
                    };
                    let (nc, nr) = axial_to_offset(cur);
                    match board.get_signed(nc, nr) {
                        Some(next) if !next.is_blocker() && next.color == cell.color => {
                            run.push((nc as usize, nr as usize));
                        }
                        _ => break,
                    }
                }

                if run.len() >= 3 {
                    result.extend(run);
                }
            }
        }
    }

    result
}

/// Every cell that belongs to a mutually-adjacent same-color triple
/// `{C, N_i, N_{i+1 mod 6}}`. The fixed clockwise ordering guarantees
/// `N_i` and `N_{i+1}` are themselves neighbors.
pub fn find_triangle_matches(board: &Board, geo: &HexGeometry) -> HashSet<Key> {
    let mut result = HashSet::new();

    for col in 0..board.cols {
        for row in 0..board.rows {
            let center = match board.get(col, row) {
                Some(c) if !c.is_blocker() => c,
                _ => continue,
            };
            let ring = geo.neighbors(col as i32, row as i32);

            for i in 0..6 {
                let (Some(b), Some(d)) = (ring[i], ring[(i + 1) % 6]) else {
                    continue;
                };
                let bc = match board.get(b.0 as usize, b.1 as usize) {
                    Some(c) if !c.is_blocker() => c,
                    _ => continue,
                };
                let dc = match board.get(d.0 as usize, d.1 as usize) {
                    Some(c) if !c.is_blocker() => c,
                    _ => continue,
                };
                if bc.color == center.color && dc.color == center.color {
                    result.insert((col, row));
                    result.insert((b.0 as usize, b.1 as usize));
                    result.insert((d.0 as usize, d.1 as usize));
                }
            }
        }
    }

    result
}

/// Dispatch to the matcher for the active match mode.
pub fn find_matches_for_mode(board: &Board, geo: &HexGeometry, mode: MatchMode) -> HashSet<Key> {
    match mode {
        MatchMode::Line => find_line_matches(board),
        MatchMode::Triangle => find_triangle_matches(board, geo),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;

    fn filled_board(cols: usize, rows: usize, color_of: impl Fn(usize, usize) -> u8) -> Board {
        let mut b = Board::empty(cols, rows);
        for col in 0..cols {
            for row in 0..rows {
                b.set(col, row, Some(Cell::regular(color_of(col, row))));
            }
        }
        b
    }

    #[test]
    fn line_match_minimal_vertical_run() {
        // (0,1) axis is a vertical run within one column.
        let mut b = filled_board(9, 9, |c, r| ((c + r) % 5) as u8);
        b.set(4, 2, Some(Cell::regular(3)));
        b.set(4, 3, Some(Cell::regular(3)));
        b.set(4, 4, Some(Cell::regular(3)));
        let matches = find_line_matches(&b);
        assert!(matches.contains(&(4, 2)));
        assert!(matches.contains(&(4, 3)));
        assert!(matches.contains(&(4, 4)));
    }

    #[test]
    fn line_match_excludes_blockers() {
        let mut b = filled_board(9, 9, |c, r| ((c + r) % 5) as u8);
        b.set(4, 2, Some(Cell::regular(3)));
        b.set(4, 3, Some(Cell::starflower()));
        b.set(4, 4, Some(Cell::regular(3)));
        let matches = find_line_matches(&b);
        assert!(!matches.contains(&(4, 3)));
    }

    #[test]
    fn no_match_on_pair() {
        let mut b = filled_board(9, 9, |c, r| ((c + r) % 5) as u8);
        b.set(0, 0, Some(Cell::regular(3)));
        b.set(0, 1, Some(Cell::regular(3)));
        let matches = find_line_matches(&b);
        assert!(!matches.contains(&(0, 0)));
        assert!(!matches.contains(&(0, 1)));
    }

    #[test]
    fn triangle_match_requires_mutual_adjacency() {
        let geo = HexGeometry::new(9, 9);
        let mut b = filled_board(9, 9, |c, r| ((c + r) % 5) as u8);
        // center (4,3) even column; neighbor pair ring[0]=(5,3), ring[1]=(5,2)
        b.set(4, 3, Some(Cell::regular(2)));
        b.set(5, 3, Some(Cell::regular(2)));
        b.set(5, 2, Some(Cell::regular(2)));
        let matches = find_triangle_matches(&b, &geo);
        assert!(matches.contains(&(4, 3)));
        assert!(matches.contains(&(5, 3)));
        assert!(matches.contains(&(5, 2)));
    }

    #[test]
    fn triangle_match_rejects_non_adjacent_triple() {
        let geo = HexGeometry::new(9, 9);
        let mut b = filled_board(9, 9, |c, r| ((c + r) % 5) as u8);
        // Same color at non-mutually-adjacent cells should not form a triangle.
        b.set(4, 3, Some(Cell::regular(2)));
        b.set(0, 0, Some(Cell::regular(2)));
        b.set(8, 8, Some(Cell::regular(2)));
        let matches = find_triangle_matches(&b, &geo);
        assert!(!matches.contains(&(0, 0)));
    }

    #[test]
    fn find_matches_for_mode_dispatches() {
        let geo = HexGeometry::new(9, 9);
        let mut b = filled_board(9, 9, |c, r| ((c + r) % 5) as u8);
        b.set(4, 2, Some(Cell::regular(3)));
        b.set(4, 3, Some(Cell::regular(3)));
        b.set(4, 4, Some(Cell::regular(3)));
        let line_matches = find_matches_for_mode(&b, &geo, MatchMode::Line);
        assert!(line_matches.contains(&(4, 3)));
    }
}
