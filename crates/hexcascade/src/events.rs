//! The event transcript a transition emits, and the top-level phase it
//! walks through to produce it.
//!
//! Grounded on the teacher's several small per-tick buffers
//! (`sound_events`, `score_popups`) unified into one enum, since this
//! engine has no separate sound/render channel to split events across.

use crate::grid::Special;

type Key = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Idle,
    Selected,
    Rotating,
    Cascading,
    GameOver,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOverReason {
    BombExpired,
    SessionEnded,
}

/// One tile's fall during gravity: moved from `(col, from_row)` to
/// `(col, to_row)`, carrying its color/special/bomb_timer along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FallEntry {
    pub col: usize,
    pub from_row: usize,
    pub to_row: usize,
    pub color: i8,
    pub special: Special,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Matched {
        cells: Vec<Key>,
        points: i64,
        chain_level: u32,
        centroid: (f32, f32),
    },
    Cleared {
        cells: Vec<Key>,
    },
    StarflowerBorn {
        center: Key,
        ring: [Key; 6],
        ring_color: u8,
    },
    BlackPearlBorn {
        center: Key,
        absorbed_ring: [Key; 6],
    },
    Gravity {
        fall_map: Vec<FallEntry>,
    },
    Refilled {
        cells: Vec<Key>,
    },
    BombSpawned {
        pos: Key,
    },
    BombTicked {
        pos: Key,
        remaining: u32,
    },
    ScoreChanged {
        new_score: i64,
    },
    ChainAdvanced {
        level: u32,
    },
    PhaseChanged {
        new_phase: GamePhase,
    },
    GameOver {
        reason: GameOverReason,
    },
    /// A resolver invariant was violated (e.g. clearing an already-empty
    /// cell). Diagnostic only; the offending operation is a no-op.
    InvariantViolated {
        description: String,
    },
    RestoreFailed {
        description: String,
    },
}
