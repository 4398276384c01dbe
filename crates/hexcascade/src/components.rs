//! Small shared enums and ABI-level constants — mode selection,
//! selections, and board-size/timing constants.

use serde::{Deserialize, Serialize};

/// Board dimensions matching the ABI.
pub const COLS: usize = 9;
pub const ROWS: usize = 9;

/// Default regular-tile palette size; can be widened to 6 with teal enabled.
pub const DEFAULT_PALETTE_SIZE: u8 = 5;
pub const EXTENDED_PALETTE_SIZE: u8 = 6;

pub const BOMB_INITIAL_TIMER: u32 = 15;
pub const MULTIPLIER_SPAWN_P_NUM: u32 = 5;
pub const MULTIPLIER_SPAWN_P_DEN: u32 = 100;
pub const CHAIN_MULTIPLIER_BASE: f64 = 1.5;

/// Base points per match size; sizes above the table extrapolate as `n*10`.
pub fn base_score_for_size(size: usize) -> i64 {
    match size {
        3 => 5,
        4 => 10,
        5 => 20,
        n if n > 5 => (n as i64) * 10,
        _ => 0,
    }
}

/// Orthogonal mode pair: which external collaborators are active, and
/// which matcher the resolver dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameMode {
    /// Bombs on, game-over on.
    Arcade,
    /// Bombs off, game-over off, `EndSession` allowed.
    Chill,
}

impl GameMode {
    pub fn has_bombs(self) -> bool {
        matches!(self, GameMode::Arcade)
    }

    pub fn has_game_over(self) -> bool {
        matches!(self, GameMode::Arcade)
    }

    pub fn allows_end_session(self) -> bool {
        matches!(self, GameMode::Chill)
    }

    fn id_str(self) -> &'static str {
        match self {
            GameMode::Arcade => "arcade",
            GameMode::Chill => "chill",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatchMode {
    Line,
    Triangle,
}

impl MatchMode {
    fn id_str(self) -> &'static str {
        match self {
            MatchMode::Line => "line",
            MatchMode::Triangle => "triangle",
        }
    }
}

/// The `"{game}_{match}"` combined mode id used by the host for high-score
/// bucketing, per §6.
pub fn combined_mode_id(game: GameMode, matchm: MatchMode) -> String {
    format!("{}_{}", game.id_str(), matchm.id_str())
}

/// What the player has picked up. Rotation is always a cycle over the
/// cells named here; positions never move, only their contents do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Three mutually-adjacent cells sharing a vertex. 3-cycle rotation.
    Cluster([(usize, usize); 3]),
    /// A starflower center plus its six neighbors. 6-cycle rotation.
    Ring {
        center: (usize, usize),
        ring: [(usize, usize); 6],
    },
    /// A black-pearl center plus alternating neighbors (indices 0,2,4).
    /// 3-cycle rotation.
    Y {
        center: (usize, usize),
        points: [(usize, usize); 3],
    },
}

impl Selection {
    /// The cells that rotation mutates, in cycle order.
    pub fn cycle_cells(&self) -> Vec<(usize, usize)> {
        match self {
            Selection::Cluster(c) => c.to_vec(),
            Selection::Ring { ring, .. } => ring.to_vec(),
            Selection::Y { points, .. } => points.to_vec(),
        }
    }

    pub fn max_steps(&self) -> usize {
        match self {
            Selection::Cluster(_) => 3,
            Selection::Ring { .. } => 6,
            Selection::Y { .. } => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    CW,
    CCW,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_mode_id_format() {
        assert_eq!(combined_mode_id(GameMode::Arcade, MatchMode::Line), "arcade_line");
        assert_eq!(combined_mode_id(GameMode::Chill, MatchMode::Triangle), "chill_triangle");
    }

    #[test]
    fn base_score_table() {
        assert_eq!(base_score_for_size(3), 5);
        assert_eq!(base_score_for_size(4), 10);
        assert_eq!(base_score_for_size(5), 20);
        assert_eq!(base_score_for_size(6), 60);
        assert_eq!(base_score_for_size(7), 70);
    }

    #[test]
    fn mode_flags() {
        assert!(GameMode::Arcade.has_bombs());
        assert!(GameMode::Arcade.has_game_over());
        assert!(!GameMode::Chill.has_bombs());
        assert!(GameMode::Chill.allows_end_session());
        assert!(!GameMode::Arcade.allows_end_session());
    }

    #[test]
    fn selection_max_steps() {
        let cluster = Selection::Cluster([(0, 0), (1, 0), (1, 1)]);
        assert_eq!(cluster.max_steps(), 3);
        let ring = Selection::Ring {
            center: (4, 4),
            ring: [(5, 4), (5, 3), (4, 3), (3, 3), (3, 4), (4, 5)],
        };
        assert_eq!(ring.max_steps(), 6);
        let y = Selection::Y {
            center: (4, 4),
            points: [(5, 4), (4, 3), (3, 4)],
        };
        assert_eq!(y.max_steps(), 3);
    }
}
