//! Read-only accessors over piece placement, used throughout evaluation,
//! SEE, and move generation.

use super::{Bitboard, Board, Color, Piece};

impl Board {
    /// Bitboard of `piece` type belonging to `color`.
    #[inline]
    #[must_use]
    pub(crate) fn pieces_of(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces[color.index()][piece.index()]
    }

    /// Bitboard of `piece` type belonging to the opponent of `color`.
    #[inline]
    #[must_use]
    pub(crate) fn opponent_pieces(&self, color: Color, piece: Piece) -> Bitboard {
        self.pieces_of(color.opponent(), piece)
    }

    /// Bitboard of `piece` type for both colors combined.
    #[inline]
    #[must_use]
    pub(crate) fn all_pieces_of_type(&self, piece: Piece) -> Bitboard {
        Bitboard(self.pieces[0][piece.index()].0 | self.pieces[1][piece.index()].0)
    }

    /// Bitboard of every square occupied by `color`.
    #[inline]
    #[must_use]
    pub(crate) fn occupied_by(&self, color: Color) -> Bitboard {
        self.occupied[color.index()]
    }

    /// Number of pieces of `piece` type belonging to `color`.
    #[inline]
    #[must_use]
    pub(crate) fn piece_count(&self, color: Color, piece: Piece) -> u32 {
        self.pieces_of(color, piece).popcount()
    }

    /// Square index (0..64) of `color`'s king. Every reachable position has
    /// exactly one king per side (invariant I1), so this never panics.
    #[inline]
    #[must_use]
    pub(crate) fn king_square_index(&self, color: Color) -> usize {
        self.pieces_of(color, Piece::King)
            .iter()
            .next()
            .expect("king missing from board")
            .as_index()
    }

    /// The side to move.
    #[inline]
    #[must_use]
    pub fn side_to_move(&self) -> Color {
        self.current_color()
    }
}

#[cfg(test)]
mod tests {
    use super::super::Board;
    use super::*;

    #[test]
    fn starting_position_piece_counts() {
        let board = Board::new();
        assert_eq!(board.piece_count(Color::White, Piece::Pawn), 8);
        assert_eq!(board.piece_count(Color::Black, Piece::Pawn), 8);
        assert_eq!(board.piece_count(Color::White, Piece::Queen), 1);
        assert_eq!(board.all_pieces_of_type(Piece::King).popcount(), 2);
    }

    #[test]
    fn king_square_index_matches_start_position() {
        let board = Board::new();
        assert_eq!(board.king_square_index(Color::White), 4);
        assert_eq!(board.king_square_index(Color::Black), 60);
    }

    #[test]
    fn opponent_pieces_is_symmetric() {
        let board = Board::new();
        assert_eq!(
            board.opponent_pieces(Color::White, Piece::Pawn),
            board.pieces_of(Color::Black, Piece::Pawn)
        );
    }
}
