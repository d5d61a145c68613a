//! Move ordering heuristics: killers, history, continuation history,
//! capture history, counter moves, and eval correction history.
//!
//! All "history" style tables use the standard gravity update
//! `h += bonus - h * |bonus| / MAX`, which keeps values bounded without an
//! explicit clamp and decays stale entries automatically as new bonuses of
//! the opposite sign arrive.

use super::super::{Move, Piece, EMPTY_MOVE, MAX_PLY};

/// Maximum magnitude a history-style score can reach.
const HISTORY_MAX: i32 = 16_384;

/// Bonus for a move at a given depth, clamped to `HISTORY_MAX`.
#[inline]
fn history_bonus(depth: u32) -> i32 {
    (depth as i32 * depth as i32 * 8).min(HISTORY_MAX)
}

#[inline]
fn gravity_update(entry: &mut i32, bonus: i32) {
    let clamped = bonus.clamp(-HISTORY_MAX, HISTORY_MAX);
    *entry += clamped - *entry * clamped.abs() / HISTORY_MAX;
}

/// Three killer-move slots per ply.
pub struct KillerTable {
    slots: [[Move; 3]; MAX_PLY],
}

impl KillerTable {
    pub fn new() -> Self {
        KillerTable {
            slots: [[EMPTY_MOVE; 3]; MAX_PLY],
        }
    }

    #[must_use]
    pub fn primary(&self, ply: usize) -> Move {
        self.slots[ply][0]
    }

    #[must_use]
    pub fn secondary(&self, ply: usize) -> Move {
        self.slots[ply][1]
    }

    #[must_use]
    pub fn tertiary(&self, ply: usize) -> Move {
        self.slots[ply][2]
    }

    /// Promote `mv` to the primary slot, shifting the others down.
    pub fn update(&mut self, ply: usize, mv: Move) {
        let slot = &mut self.slots[ply];
        if slot[0] == mv {
            return;
        }
        slot[2] = slot[1];
        slot[1] = slot[0];
        slot[0] = mv;
    }

    pub fn reset(&mut self) {
        self.slots = [[EMPTY_MOVE; 3]; MAX_PLY];
    }
}

/// Counter-move table indexed by the opponent's previous (from, to).
pub struct CounterMoveTable {
    table: Vec<Move>,
}

impl CounterMoveTable {
    pub fn new() -> Self {
        CounterMoveTable {
            table: vec![EMPTY_MOVE; 64 * 64],
        }
    }

    #[must_use]
    pub fn get(&self, from: usize, to: usize) -> Move {
        self.table[from * 64 + to]
    }

    pub fn set(&mut self, from: usize, to: usize, mv: Move) {
        self.table[from * 64 + to] = mv;
    }

    pub fn reset(&mut self) {
        self.table.iter_mut().for_each(|m| *m = EMPTY_MOVE);
    }
}

/// Butterfly history table indexed by (from, to) of the moving piece.
pub struct HistoryTable {
    table: Vec<i32>,
}

impl HistoryTable {
    pub fn new() -> Self {
        HistoryTable {
            table: vec![0; 64 * 64],
        }
    }

    fn idx(mv: &Move) -> usize {
        mv.from().index() * 64 + mv.to().index()
    }

    #[must_use]
    pub fn score(&self, mv: &Move) -> i32 {
        self.table[Self::idx(mv)]
    }

    /// Reward a move that caused a beta cutoff.
    pub fn update(&mut self, mv: &Move, depth: u32) {
        let idx = Self::idx(mv);
        gravity_update(&mut self.table[idx], history_bonus(depth));
    }

    /// Penalize a quiet move that was tried but did not cause the cutoff.
    pub fn penalize(&mut self, mv: &Move, depth: u32) {
        let idx = Self::idx(mv);
        gravity_update(&mut self.table[idx], -history_bonus(depth));
    }

    /// Halve all entries between searches to avoid stale bias buildup.
    pub fn decay(&mut self) {
        for entry in &mut self.table {
            *entry >>= 2;
        }
    }

    pub fn reset(&mut self) {
        self.table.iter_mut().for_each(|e| *e = 0);
    }
}

/// Continuation history: how well a move pairs with the move played one ply
/// earlier. Indexed by (`previous_piece`, `previous_to`, `current_to`).
pub struct ContinuationHistory {
    table: Vec<i32>,
}

impl ContinuationHistory {
    pub fn new() -> Self {
        ContinuationHistory {
            table: vec![0; 6 * 64 * 64],
        }
    }

    fn idx(prev_piece: Piece, prev_to: usize, mv: &Move) -> usize {
        (prev_piece.index() * 64 + prev_to) * 64 + mv.to().index()
    }

    #[must_use]
    pub fn score(&self, prev_piece: Piece, prev_to: usize, mv: &Move) -> i32 {
        self.table[Self::idx(prev_piece, prev_to, mv)]
    }

    pub fn update(&mut self, prev_piece: Piece, prev_to: usize, mv: &Move, depth: u32) {
        let idx = Self::idx(prev_piece, prev_to, mv);
        gravity_update(&mut self.table[idx], history_bonus(depth));
    }

    pub fn reset(&mut self) {
        self.table.iter_mut().for_each(|e| *e = 0);
    }
}

/// Capture history: how often capturing `victim` with `attacker` has paid
/// off, used to break ties between captures beyond plain MVV-LVA.
pub struct CaptureHistory {
    table: Vec<i32>,
}

impl CaptureHistory {
    pub fn new() -> Self {
        CaptureHistory {
            table: vec![0; 6 * 6],
        }
    }

    fn idx(attacker: Piece, victim: Piece) -> usize {
        attacker.index() * 6 + victim.index()
    }

    #[must_use]
    pub fn score(&self, attacker: Piece, victim: Piece) -> i32 {
        self.table[Self::idx(attacker, victim)]
    }

    pub fn update(&mut self, attacker: Piece, victim: Piece, depth: u32) {
        let idx = Self::idx(attacker, victim);
        gravity_update(&mut self.table[idx], history_bonus(depth));
    }

    pub fn reset(&mut self) {
        self.table.iter_mut().for_each(|e| *e = 0);
    }
}

/// Correction history: tracks the running error between static eval and the
/// search result for a position, keyed on the Zobrist hash. Used to nudge
/// the static evaluator back towards observed search truth over time.
///
/// A full implementation would key separately on pawn structure and material
/// signature hashes; this keys on the position hash directly, which is a
/// simplification documented as an open question.
pub struct CorrectionHistory {
    table: Vec<i32>,
    mask: usize,
}

/// Divisor controlling how strongly stored error corrects the raw eval.
const CORRECTION_SCALE: i32 = 256;

impl CorrectionHistory {
    pub fn new() -> Self {
        let size = 1 << 14; // 16384 entries
        CorrectionHistory {
            table: vec![0; size],
            mask: size - 1,
        }
    }

    fn idx(&self, hash: u64) -> usize {
        ((hash >> 48) as usize) & self.mask
    }

    /// Apply the stored correction to a raw static evaluation.
    #[must_use]
    pub fn correct(&self, hash: u64, raw_eval: i32) -> i32 {
        let idx = self.idx(hash);
        raw_eval + self.table[idx] / CORRECTION_SCALE
    }

    /// Update the correction entry given the observed error (`search_score -
    /// raw_eval`) at a given depth.
    pub fn update(&mut self, hash: u64, depth: u32, error: i32) {
        let idx = self.idx(hash);
        let bonus = error.clamp(-HISTORY_MAX, HISTORY_MAX) * (depth as i32).min(16) / 16;
        gravity_update(&mut self.table[idx], bonus);
    }

    pub fn reset(&mut self) {
        self.table.iter_mut().for_each(|e| *e = 0);
    }
}

/// All move-ordering and correction tables used during search.
pub struct HistoryTables {
    pub killer_moves: KillerTable,
    pub counter_moves: CounterMoveTable,
    pub history: HistoryTable,
    pub continuation_history: ContinuationHistory,
    pub capture_history: CaptureHistory,
    pub correction_history: CorrectionHistory,
}

impl HistoryTables {
    pub fn new() -> Self {
        HistoryTables {
            killer_moves: KillerTable::new(),
            counter_moves: CounterMoveTable::new(),
            history: HistoryTable::new(),
            continuation_history: ContinuationHistory::new(),
            capture_history: CaptureHistory::new(),
            correction_history: CorrectionHistory::new(),
        }
    }

    /// Reset tables between games; decay (rather than zero) the history
    /// table so that useful ordering information from the previous search
    /// is not fully discarded.
    pub fn new_search(&mut self) {
        self.history.decay();
        self.killer_moves.reset();
        self.counter_moves.reset();
    }
}

impl Default for HistoryTables {
    fn default() -> Self {
        HistoryTables::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn killer_promotes_to_primary() {
        let mut k = KillerTable::new();
        let a = Move::quiet(
            crate::board::Square::from_index(8),
            crate::board::Square::from_index(16),
        );
        let b = Move::quiet(
            crate::board::Square::from_index(9),
            crate::board::Square::from_index(17),
        );
        k.update(3, a);
        k.update(3, b);
        assert_eq!(k.primary(3), b);
        assert_eq!(k.secondary(3), a);
    }

    #[test]
    fn history_gravity_keeps_bound() {
        let mut h = HistoryTable::new();
        let mv = Move::quiet(
            crate::board::Square::from_index(8),
            crate::board::Square::from_index(16),
        );
        for _ in 0..100 {
            h.update(&mv, 20);
        }
        assert!(h.score(&mv) <= HISTORY_MAX);
        assert!(h.score(&mv) > 0);
    }

    #[test]
    fn correction_history_round_trip() {
        let mut c = CorrectionHistory::new();
        c.update(0xdead_beef_1234_5678, 8, 100);
        let corrected = c.correct(0xdead_beef_1234_5678, 0);
        assert!(corrected != 0);
    }
}
