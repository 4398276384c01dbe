//! Score counter, chain level, and combo arithmetic.
//!
//! Grounded on `state.rs::GameState::apply_multiplier_scores` — an
//! accumulator plus a multiplier that bumps on every success, the same
//! shape generalized to the chain-level exponent from spec.

use crate::components::{base_score_for_size, CHAIN_MULTIPLIER_BASE};

#[derive(Debug, Clone, Default)]
pub struct Scoring {
    pub score: i64,
    pub chain_level: u32,
    pub combo_count: u32,
}

impl Scoring {
    pub fn new() -> Self {
        Scoring::default()
    }

    /// `points = round(base_for_size(size) * multiplier_base^chain_level *
    /// bonus_multiplier)`. Increments combo by 1. Returns the points
    /// awarded (also added to `score`).
    pub fn award_match(&mut self, size: usize, bonus_multiplier: f64) -> i64 {
        let base = base_score_for_size(size) as f64;
        let points = (base * CHAIN_MULTIPLIER_BASE.powi(self.chain_level as i32) * bonus_multiplier)
            .round() as i64;
        self.score += points;
        self.combo_count += 1;
        points
    }

    pub fn advance_chain(&mut self) {
        self.chain_level += 1;
    }

    pub fn reset_chain(&mut self) {
        self.chain_level = 0;
        self.combo_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn award_match_at_chain_zero() {
        let mut s = Scoring::new();
        let points = s.award_match(3, 1.0);
        assert_eq!(points, 5);
        assert_eq!(s.score, 5);
        assert_eq!(s.combo_count, 1);
    }

    #[test]
    fn award_match_scales_with_chain_level() {
        let mut s = Scoring::new();
        s.advance_chain();
        s.advance_chain();
        // base 5 * 1.5^2 = 11.25 -> rounds to 11
        let points = s.award_match(3, 1.0);
        assert_eq!(points, 11);
    }

    #[test]
    fn award_match_applies_bonus_multiplier() {
        let mut s = Scoring::new();
        let points = s.award_match(4, 2.0);
        assert_eq!(points, 20);
    }

    #[test]
    fn reset_chain_zeroes_both_counters() {
        let mut s = Scoring::new();
        s.advance_chain();
        s.award_match(3, 1.0);
        s.reset_chain();
        assert_eq!(s.chain_level, 0);
        assert_eq!(s.combo_count, 0);
        assert!(s.score > 0, "score itself is not reset by chain reset");
    }

    #[test]
    fn extrapolated_base_for_large_match() {
        let mut s = Scoring::new();
        let points = s.award_match(7, 1.0);
        assert_eq!(points, 70);
    }
}
