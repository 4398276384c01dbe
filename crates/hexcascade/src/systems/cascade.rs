//! The cascade resolver: one full move's match→score→clear→specials→
//! gravity→refill→specials→chain→recurse pipeline.
//!
//! Grounded on `state.rs::GameState::{check_and_transition, do_zap,
//! finish_falling}` (the same match→freeze→clear→fall→recheck pipeline),
//! restructured as the straight-line recursive function the design notes
//! call for in place of the source's promise chain.

use std::collections::HashSet;

use crate::components::MatchMode;
use crate::events::{Event, FallEntry};
use crate::grid::{Board, Cell};
use crate::hex::HexGeometry;
use crate::rng::Rng;
use crate::systems::board as sysboard;
use crate::systems::matchers;
use crate::systems::scoring::Scoring;
use crate::systems::specials;

type Key = (usize, usize);

/// Resolve a full cascade starting from `initial_matches`. Mutates `board`
/// and `scoring` in place, consumes RNG draws for refill, and returns the
/// ordered event transcript.
pub fn resolve_cascade(
    board: &mut Board,
    geo: &HexGeometry,
    rng: &mut Rng,
    scoring: &mut Scoring,
    match_mode: MatchMode,
    palette_size: u8,
    has_bombs: bool,
    bomb_queued: &mut bool,
    initial_matches: HashSet<Key>,
) -> Vec<Event> {
    let mut events = Vec::new();
    run_cascade_step(
        board,
        geo,
        rng,
        scoring,
        match_mode,
        palette_size,
        has_bombs,
        bomb_queued,
        initial_matches,
        &mut events,
    );
    events
}

#[allow(clippy::too_many_arguments)]
fn run_cascade_step(
    board: &mut Board,
    geo: &HexGeometry,
    rng: &mut Rng,
    scoring: &mut Scoring,
    match_mode: MatchMode,
    palette_size: u8,
    has_bombs: bool,
    bomb_queued: &mut bool,
    pending_matches: HashSet<Key>,
    events: &mut Vec<Event>,
) {
    // 1. Expand pending set by special interactions.
    let (pending, score_bonus) = expand_pending(board, geo, &pending_matches);

    // 2. Award score.
    let points = scoring.award_match(pending.len(), score_bonus);
    let centroid = centroid_of(&pending);
    events.push(Event::Matched {
        cells: pending.iter().copied().collect(),
        points,
        chain_level: scoring.chain_level,
        centroid,
    });
    events.push(Event::ScoreChanged {
        new_score: scoring.score,
    });

    // 3. Clear.
    for &(col, row) in &pending {
        board.set(col, row, None);
    }
    events.push(Event::Cleared {
        cells: pending.iter().copied().collect(),
    });

    // 4. Mid-cascade specials.
    let gap_births = specials::detect_starflowers_at_gaps(board, geo, &pending);
    for b in &gap_births {
        events.push(Event::StarflowerBorn {
            center: b.center,
            ring: b.ring,
            ring_color: b.ring_color,
        });
    }
    let mid_pearls = specials::detect_black_pearls(board, geo);
    for b in &mid_pearls {
        events.push(Event::BlackPearlBorn {
            center: b.center,
            absorbed_ring: b.absorbed_ring,
        });
    }

    // 5. Gravity.
    let fall_map = gravity_with_events(board);
    if !fall_map.is_empty() {
        events.push(Event::Gravity { fall_map });
    }

    // 6. Refill, honoring bomb_queued in bomb-capable modes.
    let spawn_bomb = has_bombs && *bomb_queued;
    let filled = sysboard::fill_empty(board, rng, palette_size, spawn_bomb);
    events.push(Event::Refilled {
        cells: filled.clone(),
    });
    if spawn_bomb {
        if let Some(&pos) = filled
            .iter()
            .find(|&&(c, r)| board.get(c, r).map_or(false, |cell| cell.special.is_bomb()))
        {
            events.push(Event::BombSpawned { pos });
            *bomb_queued = false;
        }
    }

    // 7. Post-settle specials (may chain: a fresh starflower can complete
    // a pearl in the same pass).
    let whole_births = specials::detect_starflowers_whole_board(board, geo);
    for b in &whole_births {
        events.push(Event::StarflowerBorn {
            center: b.center,
            ring: b.ring,
            ring_color: b.ring_color,
        });
    }
    let post_pearls = specials::detect_black_pearls(board, geo);
    for b in &post_pearls {
        events.push(Event::BlackPearlBorn {
            center: b.center,
            absorbed_ring: b.absorbed_ring,
        });
    }

    // 8. Advance chain level.
    scoring.advance_chain();
    events.push(Event::ChainAdvanced {
        level: scoring.chain_level,
    });

    // 9. Recurse on new matches, or terminate.
    let next_matches = matchers::find_matches_for_mode(board, geo, match_mode);
    if !next_matches.is_empty() {
        run_cascade_step(
            board,
            geo,
            rng,
            scoring,
            match_mode,
            palette_size,
            has_bombs,
            bomb_queued,
            next_matches,
            events,
        );
    } else {
        scoring.reset_chain();
    }
}

/// Expand a matched set through multiplier clusters, bomb+multiplier color
/// nukes, and polychrome-cluster explosions. Returns the expanded set and
/// the cumulative score bonus multiplier (starting at 1.0).
fn expand_pending(board: &Board, geo: &HexGeometry, initial: &HashSet<Key>) -> (HashSet<Key>, f64) {
    let mut pending = initial.clone();
    let mut score_bonus = 1.0;
    let mut nuked_colors: HashSet<i8> = HashSet::new();
    let mut explosion_sources: HashSet<Key> = HashSet::new();

    for cluster in specials::find_multiplier_clusters(board, geo) {
        for &k in &cluster {
            pending.insert(k);
        }
        score_bonus += 0.5 * cluster.len() as f64;

        let colors: HashSet<i8> = cluster
            .iter()
            .filter_map(|&(c, r)| board.get(c, r).map(|cell| cell.color))
            .collect();
        if colors.len() == 1 {
            if let Some(&color) = colors.iter().next() {
                if color >= 0 {
                    nuked_colors.insert(color);
                }
            }
        } else {
            explosion_sources.extend(cluster.iter().copied());
        }
    }

    for &(col, row) in &pending {
        if let Some(cell) = board.get(col, row) {
            if matches!(cell.special, crate::grid::Special::Multiplier) {
                score_bonus += 0.5;
            }
        }
    }

    let mut bomb_colors: HashSet<i8> = HashSet::new();
    let mut multiplier_colors: HashSet<i8> = HashSet::new();
    for &(col, row) in &pending {
        if let Some(cell) = board.get(col, row) {
            match cell.special {
                crate::grid::Special::Bomb { .. } => {
                    bomb_colors.insert(cell.color);
                }
                crate::grid::Special::Multiplier => {
                    multiplier_colors.insert(cell.color);
                }
                _ => {}
            }
        }
    }
    for color in bomb_colors.intersection(&multiplier_colors) {
        nuked_colors.insert(*color);
    }

    for &color in &nuked_colors {
        for col in 0..board.cols {
            for row in 0..board.rows {
                if let Some(cell) = board.get(col, row) {
                    if cell.color == color && cell.color >= 0 {
                        pending.insert((col, row));
                    }
                }
            }
        }
    }

    for &(col, row) in &explosion_sources {
        for n in geo.neighbors(col as i32, row as i32).into_iter().flatten() {
            let nk = (n.0 as usize, n.1 as usize);
            if let Some(cell) = board.get(nk.0, nk.1) {
                if !cell.is_black_pearl() {
                    pending.insert(nk);
                }
            }
        }
    }

    (pending, score_bonus)
}

fn centroid_of(cells: &HashSet<Key>) -> (f32, f32) {
    if cells.is_empty() {
        return (0.0, 0.0);
    }
    let (sum_c, sum_r) = cells
        .iter()
        .fold((0i64, 0i64), |acc, &(c, r)| (acc.0 + c as i64, acc.1 + r as i64));
    let n = cells.len() as f32;
    (sum_c as f32 / n, sum_r as f32 / n)
}

/// Run gravity and diff the before/after column contents (order-preserving)
/// into a fall map for the event transcript.
fn gravity_with_events(board: &mut Board) -> Vec<FallEntry> {
    let mut before: Vec<Vec<(usize, Cell)>> = Vec::with_capacity(board.cols);
    for col in 0..board.cols {
        let mut occupied = Vec::new();
        for row in 0..board.rows {
            if let Some(cell) = board.get(col, row) {
                occupied.push((row, cell));
            }
        }
        before.push(occupied);
    }

    sysboard::apply_gravity(board);

    let mut fall_map = Vec::new();
    for (col, before_col) in before.into_iter().enumerate() {
        let mut after_col = Vec::new();
        for row in 0..board.rows {
            if let Some(cell) = board.get(col, row) {
                after_col.push((row, cell));
            }
        }
        for (old, new) in before_col.iter().zip(after_col.iter()) {
            if old.0 != new.0 {
                fall_map.push(FallEntry {
                    col,
                    from_row: old.0,
                    to_row: new.0,
                    color: old.1.color,
                    special: old.1.special,
                });
            }
        }
    }
    fall_map
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
    fn minimal_line_match_awards_five_points_at_chain_zero() {
        let geo = HexGeometry::new(9, 9);
        let mut board = filled_board(9, 9, |c, r| ((c + r) % 5) as u8);
        board.set(4, 2, Some(Cell::regular(3)));
        board.set(4, 3, Some(Cell::regular(3)));
        board.set(4, 4, Some(Cell::regular(3)));
        let mut rng = Rng::new(1);
        let mut scoring = Scoring::new();
        let mut bomb_queued = false;

        let initial = matchers::find_line_matches(&board);
        assert!(initial.contains(&(4, 3)));

        let events = resolve_cascade(
            &mut board,
            &geo,
            &mut rng,
            &mut scoring,
            MatchMode::Line,
            5,
            true,
            &mut bomb_queued,
            initial,
        );

        let first_matched = events.iter().find_map(|e| match e {
            Event::Matched { points, chain_level, .. } => Some((*points, *chain_level)),
            _ => None,
        });
        assert_eq!(first_matched, Some((5, 0)));
        assert!(events.iter().any(|e| matches!(e, Event::Cleared { .. })));
        assert!(events.iter().any(|e| matches!(e, Event::Refilled { .. })));
    }

    #[test]
    fn bomb_defused_by_color_match_does_not_emit_game_over() {
        let geo = HexGeometry::new(9, 9);
        let mut board = filled_board(9, 9, |c, r| ((c + r) % 5) as u8);
        let mut bomb = Cell::regular(2);
        bomb.special = crate::grid::Special::Bomb { timer: 3 };
        board.set(4, 3, Some(bomb));
        board.set(4, 2, Some(Cell::regular(2)));
        board.set(4, 4, Some(Cell::regular(2)));

        let mut rng = Rng::new(2);
        let mut scoring = Scoring::new();
        let mut bomb_queued = false;

        let initial = matchers::find_line_matches(&board);
        assert!(initial.contains(&(4, 3)));

        let events = resolve_cascade(
            &mut board,
            &geo,
            &mut rng,
            &mut scoring,
            MatchMode::Line,
            5,
            true,
            &mut bomb_queued,
            initial,
        );

        assert!(!events.iter().any(|e| matches!(e, Event::GameOver { .. })));
        assert!(board.get(4, 3).is_some(), "cell should have been refilled");
    }

    #[test]
    fn expand_pending_adds_color_nuke_for_monochrome_multiplier_cluster() {
        let geo = HexGeometry::new(9, 9);
        let mut board = filled_board(9, 9, |_, _| 0);
        for &(c, r) in &[(4, 4), (5, 4), (5, 3)] {
            let mut cell = board.get(c, r).unwrap();
            cell.special = crate::grid::Special::Multiplier;
            board.set(c, r, Some(cell));
        }
        board.set(8, 8, Some(Cell::regular(0)));

        let initial: HashSet<Key> = [(4, 4)].into_iter().collect();
        let (pending, bonus) = expand_pending(&board, &geo, &initial);
        assert!(bonus > 1.0);
        // every color-0 cell should now be pending (color nuke).
        assert!(pending.contains(&(8, 8)));
    }
}
