//! NNUE (Efficiently Updatable Neural Network) evaluation.
//!
//! Provides neural network based position evaluation with:
//! - Incremental accumulator updates for efficiency
//! - SIMD-optimized inference (AVX2/NEON)
//! - `SCReLU` activation function
//!
//! Architecture: (768 -> 256) x 2 perspectives -> 1

pub mod network;
pub mod simd;

use std::sync::Arc;

pub use network::{
    feature_index, king_bucket_for_perspective, NnueAccumulator, NnueNetwork, HIDDEN_SIZE,
    KING_BUCKETS,
};

/// Per-board NNUE state: the shared network weights plus this board's
/// running accumulator. Cloning a `Board` clones the accumulator (cheap,
/// a few hundred bytes) and bumps the network's refcount.
#[derive(Clone)]
pub struct NnueContext {
    pub network: Arc<NnueNetwork>,
    pub accumulator: NnueAccumulator,
}

impl NnueContext {
    /// Build a fresh context with a zeroed (bias-only) accumulator.
    /// Caller is expected to refresh it from the current position.
    #[must_use]
    pub fn new(network: Arc<NnueNetwork>) -> Self {
        let accumulator = NnueAccumulator::new(&network.feature_bias);
        NnueContext {
            network,
            accumulator,
        }
    }

    /// Rebuild the accumulator from scratch given the active features and
    /// each side's king square (used to pick the king bucket per
    /// perspective).
    pub fn refresh(
        &mut self,
        white_features: &[usize],
        black_features: &[usize],
        white_king_sq: usize,
        black_king_sq: usize,
    ) {
        let white_bucket = king_bucket_for_perspective(white_king_sq, 0);
        let black_bucket = king_bucket_for_perspective(black_king_sq, 1);
        self.accumulator.refresh(
            white_features,
            black_features,
            white_bucket,
            black_bucket,
            &self.network,
        );
    }

    /// Whether refreshing against the given king squares would select a
    /// different king bucket than the one currently baked into the
    /// accumulator for either perspective.
    #[must_use]
    pub fn king_buckets_changed(&self, white_king_sq: usize, black_king_sq: usize) -> bool {
        let white_bucket = king_bucket_for_perspective(white_king_sq, 0);
        let black_bucket = king_bucket_for_perspective(black_king_sq, 1);
        white_bucket != self.accumulator.white_bucket || black_bucket != self.accumulator.black_bucket
    }

    /// Add a piece's contribution to both perspectives.
    #[inline]
    pub fn add_piece(&mut self, piece_idx: usize, color_idx: usize, sq_idx: usize) {
        let w = feature_index(piece_idx, color_idx, sq_idx, 0);
        let b = feature_index(piece_idx, color_idx, sq_idx, 1);
        self.accumulator.add_feature(w, b, &self.network);
    }

    /// Remove a piece's contribution from both perspectives.
    #[inline]
    pub fn remove_piece(&mut self, piece_idx: usize, color_idx: usize, sq_idx: usize) {
        let w = feature_index(piece_idx, color_idx, sq_idx, 0);
        let b = feature_index(piece_idx, color_idx, sq_idx, 1);
        self.accumulator.sub_feature(w, b, &self.network);
    }

    /// Evaluate from the running accumulator (no recomputation).
    #[must_use]
    pub fn evaluate(&self, white_to_move: bool) -> i32 {
        self.network.evaluate(&self.accumulator, white_to_move)
    }
}

/// Weight quantization factor for feature weights
pub const QA: i32 = 255;

/// Output weight quantization factor
pub const QB: i32 = 64;

/// Evaluation scale factor
pub const SCALE: i32 = 400;
