//! Save/restore wire format.
//!
//! Grounded on `AchetaGames-yew-maze-defence/src/model.rs`'s plain
//! `#[derive(Serialize, Deserialize)]` struct/enum style — no custom
//! impls. The wire `Cell` keeps `bomb_timer` as its own optional field
//! (per the external layout in the interface section) even though the
//! internal `Special` tagged union folds the timer into the `Bomb`
//! variant; `WireCell` is the seam where that gets validated back into
//! the closed internal representation.

use serde::{Deserialize, Serialize};

use crate::components::GameMode;
use crate::error::RestoreError;
use crate::grid::{Board, Cell, Special, BLACK_PEARL_COLOR, STARFLOWER_COLOR};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WireCell {
    pub color: i8,
    pub special: String,
    pub bomb_timer: Option<u32>,
}

impl WireCell {
    fn from_cell(cell: Cell) -> Self {
        let (special, bomb_timer) = match cell.special {
            Special::None => ("none", None),
            Special::Starflower => ("starflower", None),
            Special::BlackPearl => ("blackpearl", None),
            Special::Bomb { timer } => ("bomb", Some(timer)),
            Special::Multiplier => ("multiplier", None),
        };
        WireCell {
            color: cell.color,
            special: special.to_string(),
            bomb_timer,
        }
    }

    fn into_cell(self, col: usize, row: usize) -> Result<Cell, RestoreError> {
        match self.special.as_str() {
            "none" => {
                if self.color < 0 {
                    return Err(RestoreError::InvalidColor { col, row, color: self.color });
                }
                Ok(Cell { color: self.color, special: Special::None })
            }
            "starflower" => {
                if self.color != STARFLOWER_COLOR {
                    return Err(RestoreError::InvalidColor { col, row, color: self.color });
                }
                Ok(Cell { color: self.color, special: Special::Starflower })
            }
            "blackpearl" => {
                if self.color != BLACK_PEARL_COLOR {
                    return Err(RestoreError::InvalidColor { col, row, color: self.color });
                }
                Ok(Cell { color: self.color, special: Special::BlackPearl })
            }
            "bomb" => {
                if self.color < 0 {
                    return Err(RestoreError::InvalidColor { col, row, color: self.color });
                }
                match self.bomb_timer {
                    Some(timer) => Ok(Cell { color: self.color, special: Special::Bomb { timer } }),
                    None => Err(RestoreError::BombMissingTimer { col, row }),
                }
            }
            "multiplier" => {
                if self.color < 0 {
                    return Err(RestoreError::InvalidColor { col, row, color: self.color });
                }
                Ok(Cell { color: self.color, special: Special::Multiplier })
            }
            _ => Err(RestoreError::UnknownSpecial { col, row }),
        }
    }
}

/// The full save-state record, one per combined mode id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistentState {
    /// `grid[col][row]`; `None` entries should not normally occur in a
    /// settled save (cascades never pause mid-resolution) but are
    /// accepted for forward compatibility.
    pub grid: Vec<Vec<Option<WireCell>>>,
    pub move_count: u64,
    pub score: i64,
    pub display_score: i64,
    pub chain_level: u32,
    pub combo_count: u32,
    pub rng_seed: u64,
    pub mode_id: String,
}

/// Everything a restored session needs besides the `GameMode`/`MatchMode`
/// pair the host supplies fresh.
pub struct RestoredSession {
    pub board: Board,
    pub move_count: u64,
    pub score: i64,
    pub display_score: i64,
    pub chain_level: u32,
    pub combo_count: u32,
    pub rng_seed: u64,
}

impl PersistentState {
    pub fn from_board(
        board: &Board,
        move_count: u64,
        score: i64,
        display_score: i64,
        chain_level: u32,
        combo_count: u32,
        rng_seed: u64,
        mode_id: String,
    ) -> Self {
        let grid = (0..board.cols)
            .map(|col| {
                (0..board.rows)
                    .map(|row| board.get(col, row).map(WireCell::from_cell))
                    .collect()
            })
            .collect();
        PersistentState {
            grid,
            move_count,
            score,
            display_score,
            chain_level,
            combo_count,
            rng_seed,
            mode_id,
        }
    }
}

/// Validate and materialize a saved state into a fresh `Board`. A bomb
/// restored into a `Chill` session is demoted to a regular cell of the
/// same color, since chill mode neither spawns nor ticks bombs.
pub fn restore(
    state: &PersistentState,
    cols: usize,
    rows: usize,
    mode: GameMode,
) -> Result<RestoredSession, RestoreError> {
    if state.grid.len() != cols || state.grid.iter().any(|col| col.len() != rows) {
        return Err(RestoreError::DimensionMismatch {
            expected_cols: cols,
            expected_rows: rows,
            found_cols: state.grid.len(),
            found_rows: state.grid.first().map_or(0, |c| c.len()),
        });
    }

    let mut board = Board::empty(cols, rows);
    for (col, column) in state.grid.iter().enumerate() {
        for (row, wire_cell) in column.iter().enumerate() {
            let Some(wire_cell) = wire_cell.clone() else {
                continue;
            };
            let mut cell = wire_cell.into_cell(col, row)?;
            if mode == GameMode::Chill {
                if let Special::Bomb { .. } = cell.special {
                    cell.special = Special::None;
                }
            }
            board.set(col, row, Some(cell));
        }
    }

    Ok(RestoredSession {
        board,
        move_count: state.move_count,
        score: state.score,
        display_score: state.display_score,
        chain_level: state.chain_level,
        combo_count: state.combo_count,
        rng_seed: state.rng_seed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::combined_mode_id;
    use crate::components::MatchMode;

    fn sample_board() -> Board {
        let mut b = Board::empty(3, 3);
        for col in 0..3 {
            for row in 0..3 {
                b.set(col, row, Some(Cell::regular(((col + row) % 5) as u8)));
            }
        }
        b
    }

    #[test]
    fn round_trip_preserves_grid_contents() {
        let board = sample_board();
        let state = PersistentState::from_board(
            &board,
            10,
            500,
            480,
            2,
            3,
            42,
            combined_mode_id(GameMode::Arcade, MatchMode::Line),
        );
        let restored = restore(&state, 3, 3, GameMode::Arcade).unwrap();
        for col in 0..3 {
            for row in 0..3 {
                assert_eq!(restored.board.get(col, row), board.get(col, row));
            }
        }
        assert_eq!(restored.move_count, 10);
        assert_eq!(restored.score, 500);
    }

    #[test]
    fn json_round_trip_preserves_grid_contents() {
        let board = sample_board();
        let state = PersistentState::from_board(
            &board,
            10,
            500,
            480,
            2,
            3,
            42,
            combined_mode_id(GameMode::Arcade, MatchMode::Line),
        );
        let json = serde_json::to_string(&state).unwrap();
        let decoded: PersistentState = serde_json::from_str(&json).unwrap();
        let restored = restore(&decoded, 3, 3, GameMode::Arcade).unwrap();
        for col in 0..3 {
            for row in 0..3 {
                assert_eq!(restored.board.get(col, row), board.get(col, row));
            }
        }
        assert_eq!(restored.rng_seed, 42);
        assert_eq!(restored.combo_count, 3);
    }

    #[test]
    fn dimension_mismatch_is_rejected() {
        let board = sample_board();
        let state = PersistentState::from_board(&board, 0, 0, 0, 0, 0, 1, "arcade_line".into());
        let err = restore(&state, 9, 9, GameMode::Arcade).unwrap_err();
        assert!(matches!(err, RestoreError::DimensionMismatch { .. }));
    }

    #[test]
    fn invalid_starflower_color_is_rejected() {
        let mut board = Board::empty(1, 1);
        board.set(0, 0, Some(Cell::regular(1)));
        let mut state = PersistentState::from_board(&board, 0, 0, 0, 0, 0, 1, "arcade_line".into());
        state.grid[0][0].as_mut().unwrap().special = "starflower".to_string();
        let err = restore(&state, 1, 1, GameMode::Arcade).unwrap_err();
        assert!(matches!(err, RestoreError::InvalidColor { .. }));
    }

    #[test]
    fn bomb_missing_timer_is_rejected() {
        let mut board = Board::empty(1, 1);
        board.set(0, 0, Some(Cell::regular(1)));
        let mut state = PersistentState::from_board(&board, 0, 0, 0, 0, 0, 1, "arcade_line".into());
        state.grid[0][0].as_mut().unwrap().special = "bomb".to_string();
        let err = restore(&state, 1, 1, GameMode::Arcade).unwrap_err();
        assert!(matches!(err, RestoreError::BombMissingTimer { .. }));
    }

    #[test]
    fn bomb_restored_into_chill_mode_is_demoted() {
        let mut board = Board::empty(1, 1);
        let mut bomb = Cell::regular(2);
        bomb.special = Special::Bomb { timer: 5 };
        board.set(0, 0, Some(bomb));
        let state = PersistentState::from_board(&board, 0, 0, 0, 0, 0, 1, "chill_line".into());
        let restored = restore(&state, 1, 1, GameMode::Chill).unwrap();
        let cell = restored.board.get(0, 0).unwrap();
        assert_eq!(cell.special, Special::None);
        assert_eq!(cell.color, 2);
    }

    #[test]
    fn unknown_special_tag_is_rejected() {
        let mut board = Board::empty(1, 1);
        board.set(0, 0, Some(Cell::regular(1)));
        let mut state = PersistentState::from_board(&board, 0, 0, 0, 0, 0, 1, "arcade_line".into());
        state.grid[0][0].as_mut().unwrap().special = "ghost".to_string();
        let err = restore(&state, 1, 1, GameMode::Arcade).unwrap_err();
        assert!(matches!(err, RestoreError::UnknownSpecial { .. }));
    }
}
