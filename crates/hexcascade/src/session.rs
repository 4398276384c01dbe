//! `GameSession` — the top-level orchestrator: state machine, mode flags,
//! per-move housekeeping, action dispatch, event emission.
//!
//! Grounded on `state.rs::GameState`/`GamePhase` (phase-driven tick loop,
//! per-tick event buffers cleared and refilled), minus per-frame animation
//! stepping — this engine resolves a move synchronously per the
//! concurrency model rather than animating it frame-by-frame.

use crate::components::{self, GameMode, MatchMode, Selection, COLS, ROWS};
use crate::error::RestoreError;
use crate::events::{Event, GameOverReason, GamePhase};
use crate::grid::Board;
use crate::hex::HexGeometry;
use crate::persist::{self, PersistentState};
use crate::rng::Rng;
use crate::systems::board as sysboard;
use crate::systems::cascade;
use crate::systems::rotation::{self, RotationOutcome};
use crate::systems::scoring::Scoring;
use crate::systems::specials;

/// Player-facing actions. `Select` takes an already-resolved `(col, row)`
/// — pixel hit-testing is a host concern performed with `HexGeometry`
/// before the host calls into the session (geometry's pixel math is
/// documented as "for host hit-testing only").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Select { col: usize, row: usize },
    Rotate { clockwise: bool },
    EndSession,
    NewGame,
}

pub struct GameSession {
    board: Board,
    geo: HexGeometry,
    rng: Rng,
    scoring: Scoring,
    mode: GameMode,
    match_mode: MatchMode,
    phase: GamePhase,
    selection: Option<Selection>,
    move_count: u64,
    bomb_queued: bool,
    palette_size: u8,
}

impl GameSession {
    pub fn new(seed: u64, mode: GameMode, match_mode: MatchMode) -> Self {
        log::info!("hexcascade session start seed={seed} mode={mode:?} match_mode={match_mode:?}");
        let mut rng = Rng::new(seed);
        let palette_size = components::DEFAULT_PALETTE_SIZE;
        let board = sysboard::new_board(&mut rng, COLS, ROWS, palette_size);
        GameSession {
            board,
            geo: HexGeometry::new(COLS, ROWS),
            rng,
            scoring: Scoring::new(),
            mode,
            match_mode,
            phase: GamePhase::Idle,
            selection: None,
            move_count: 0,
            bomb_queued: false,
            palette_size,
        }
    }

    pub fn restore(
        state: &PersistentState,
        mode: GameMode,
        match_mode: MatchMode,
    ) -> Result<Self, RestoreError> {
        log::info!("hexcascade session restore mode={mode:?} match_mode={match_mode:?}");
        let restored = persist::restore(state, COLS, ROWS, mode).map_err(|e| {
            log::warn!("restore rejected: {e}");
            e
        })?;
        let mut scoring = Scoring::new();
        scoring.score = restored.score;
        scoring.chain_level = restored.chain_level;
        scoring.combo_count = restored.combo_count;
        Ok(GameSession {
            board: restored.board,
            geo: HexGeometry::new(COLS, ROWS),
            rng: Rng::new(restored.rng_seed),
            scoring,
            mode,
            match_mode,
            phase: GamePhase::Idle,
            selection: None,
            move_count: restored.move_count,
            bomb_queued: false,
            palette_size: components::DEFAULT_PALETTE_SIZE,
        })
    }

    /// Host-facing wrapper around [`GameSession::restore`]: a corrupt
    /// record surfaces as a single `RestoreFailed` event instead of an
    /// `Err` the caller has to translate itself.
    pub fn restore_or_event(
        state: &PersistentState,
        mode: GameMode,
        match_mode: MatchMode,
    ) -> (Option<Self>, Vec<Event>) {
        match Self::restore(state, mode, match_mode) {
            Ok(session) => {
                let phase = session.phase;
                (Some(session), vec![Event::PhaseChanged { new_phase: phase }])
            }
            Err(e) => (
                None,
                vec![Event::RestoreFailed { description: e.to_string() }],
            ),
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn score(&self) -> i64 {
        self.scoring.score
    }

    pub fn chain_level(&self) -> u32 {
        self.scoring.chain_level
    }

    pub fn move_count(&self) -> u64 {
        self.move_count
    }

    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    pub fn to_persistent_state(&self, display_score: i64) -> PersistentState {
        PersistentState::from_board(
            &self.board,
            self.move_count,
            self.scoring.score,
            display_score,
            self.scoring.chain_level,
            self.scoring.combo_count,
            self.rng.seed(),
            components::combined_mode_id(self.mode, self.match_mode),
        )
    }

    pub fn apply(&mut self, action: Action) -> Vec<Event> {
        match action {
            Action::Select { col, row } => self.handle_select(col, row),
            Action::Rotate { clockwise } => self.handle_rotate(clockwise),
            Action::EndSession => self.handle_end_session(),
            Action::NewGame => self.handle_new_game(),
        }
    }

    fn handle_select(&mut self, col: usize, row: usize) -> Vec<Event> {
        if !matches!(self.phase, GamePhase::Idle | GamePhase::Selected) {
            return Vec::new();
        }
        if !self.board.in_bounds(col as i32, row as i32) {
            return Vec::new();
        }

        match resolve_selection(&self.board, &self.geo, col, row) {
            Some(selection) => {
                if self.selection.as_ref() == Some(&selection) {
                    self.selection = None;
                    self.transition(GamePhase::Idle)
                } else {
                    self.selection = Some(selection);
                    self.transition(GamePhase::Selected)
                }
            }
            None => Vec::new(),
        }
    }

    fn handle_rotate(&mut self, clockwise: bool) -> Vec<Event> {
        if self.phase != GamePhase::Selected {
            return Vec::new();
        }
        let Some(selection) = self.selection.clone() else {
            return Vec::new();
        };

        let mut events = self.transition(GamePhase::Rotating);
        let outcome = rotation::rotate(&mut self.board, &self.geo, &selection, clockwise, self.match_mode);

        events.extend(self.per_move_housekeeping());
        if self.phase == GamePhase::GameOver {
            return events;
        }

        match outcome {
            RotationOutcome::Matched(matches) => {
                self.selection = None;
                events.extend(self.transition(GamePhase::Cascading));
                let cascade_events = cascade::resolve_cascade(
                    &mut self.board,
                    &self.geo,
                    &mut self.rng,
                    &mut self.scoring,
                    self.match_mode,
                    self.palette_size,
                    self.mode.has_bombs(),
                    &mut self.bomb_queued,
                    matches,
                );
                events.extend(cascade_events);
                events.extend(self.transition(GamePhase::Idle));
            }
            RotationOutcome::SpecialsFormed { starflowers, pearls } => {
                for b in starflowers {
                    events.push(Event::StarflowerBorn {
                        center: b.center,
                        ring: b.ring,
                        ring_color: b.ring_color,
                    });
                }
                for b in pearls {
                    events.push(Event::BlackPearlBorn {
                        center: b.center,
                        absorbed_ring: b.absorbed_ring,
                    });
                }
                events.extend(self.transition(GamePhase::Selected));
            }
            RotationOutcome::NoOp => {
                events.extend(self.transition(GamePhase::Selected));
            }
        }
        events
    }

    fn handle_end_session(&mut self) -> Vec<Event> {
        if !self.mode.allows_end_session() {
            return Vec::new();
        }
        let mut events = vec![Event::GameOver { reason: GameOverReason::SessionEnded }];
        events.extend(self.transition(GamePhase::GameOver));
        events
    }

    fn handle_new_game(&mut self) -> Vec<Event> {
        let seed = self.rng.seed();
        *self = GameSession::new(seed, self.mode, self.match_mode);
        vec![Event::PhaseChanged { new_phase: self.phase }]
    }

    /// Fires once per `Rotating -> *` transition: bumps `move_count`,
    /// ticks bombs in bomb-capable modes, and schedules the next bomb
    /// spawn per the dynamic interval.
    fn per_move_housekeeping(&mut self) -> Vec<Event> {
        let mut events = Vec::new();
        self.move_count += 1;

        if !self.mode.has_bombs() {
            return events;
        }

        let ticked = specials::tick_bombs(&mut self.board);
        let mut any_expired = false;
        for (pos, remaining) in ticked {
            events.push(Event::BombTicked { pos, remaining });
            if remaining == 0 {
                any_expired = true;
            }
        }

        if any_expired && self.mode.has_game_over() {
            events.push(Event::GameOver { reason: GameOverReason::BombExpired });
            events.extend(self.transition(GamePhase::GameOver));
            return events;
        }

        let interval = bomb_spawn_interval(self.scoring.score);
        if self.move_count % interval == 0 {
            self.bomb_queued = true;
        }

        events
    }

    fn transition(&mut self, new_phase: GamePhase) -> Vec<Event> {
        self.phase = new_phase;
        vec![Event::PhaseChanged { new_phase }]
    }
}

/// `max(4, 15 - floor(score / 5000))`.
fn bomb_spawn_interval(score: i64) -> u64 {
    (15 - score / 5000).max(4) as u64
}

/// Resolve what a click at `(col, row)` selects: a black pearl's Y first,
/// then a starflower's ring, then the triangle cluster containing that
/// cell (approximated here as the cell plus its first two clockwise
/// neighbors — true pixel-nearest triangle selection is
/// `HexGeometry::find_cluster_at_pixel`, which needs the host's pixel,
/// not just a resolved cell).
fn resolve_selection(board: &Board, geo: &HexGeometry, col: usize, row: usize) -> Option<Selection> {
    let cell = board.get(col, row)?;

    if cell.is_black_pearl() {
        let ring = geo.neighbors(col as i32, row as i32);
        if ring.iter().any(|n| n.is_none()) {
            return None;
        }
        let points: [(usize, usize); 3] = [
            ring[0].map(to_usize)?,
            ring[2].map(to_usize)?,
            ring[4].map(to_usize)?,
        ];
        return Some(Selection::Y { center: (col, row), points });
    }

    if cell.is_starflower() {
        let ring = geo.neighbors(col as i32, row as i32);
        if ring.iter().any(|n| n.is_none()) {
            return None;
        }
        let ring_arr: [(usize, usize); 6] = std::array::from_fn(|i| to_usize(ring[i].unwrap()));
        return Some(Selection::Ring { center: (col, row), ring: ring_arr });
    }

    let neighbors = geo.neighbors(col as i32, row as i32);
    let (a, b) = (neighbors[0]?, neighbors[1]?);
    Some(Selection::Cluster([(col, row), to_usize(a), to_usize(b)]))
}

fn to_usize(p: (i32, i32)) -> (usize, usize) {
    (p.0 as usize, p.1 as usize)
}
