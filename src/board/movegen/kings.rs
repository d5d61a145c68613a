use super::super::attack_tables::{slider_attacks, KING_ATTACKS, KNIGHT_ATTACKS, PAWN_ATTACKS};
use super::super::{Bitboard, Board, Color, MoveList, Piece, Square};

impl Board {
    pub(crate) fn generate_king_moves(&self, from: Square) -> MoveList {
        let mut moves = MoveList::new();
        let color = self.current_color();
        let back_rank = if color == Color::White { 0 } else { 7 };
        let from_idx = from.index();
        let own_occ = self.occupied[color.index()].0;
        let mut targets = Bitboard(KING_ATTACKS[from_idx] & !own_occ);

        while !targets.is_empty() {
            let to_idx = targets.0.trailing_zeros() as usize;
            targets.0 &= targets.0 - 1;
            let to_sq = Square::from_index(to_idx);
            moves.push(self.create_move(from, to_sq, None, false, false));
        }

        if from == Square::new(back_rank, 4) {
            if self.has_castling_right(color, 'K')
                && self.is_empty(Square::new(back_rank, 5))
                && self.is_empty(Square::new(back_rank, 6))
                && self.piece_at(Square::new(back_rank, 7)) == Some((color, Piece::Rook))
            {
                let to_sq = Square::new(back_rank, 6);
                moves.push(self.create_move(from, to_sq, None, true, false));
            }
            if self.has_castling_right(color, 'Q')
                && self.is_empty(Square::new(back_rank, 1))
                && self.is_empty(Square::new(back_rank, 2))
                && self.is_empty(Square::new(back_rank, 3))
                && self.piece_at(Square::new(back_rank, 0)) == Some((color, Piece::Rook))
            {
                let to_sq = Square::new(back_rank, 2);
                moves.push(self.create_move(from, to_sq, None, true, false));
            }
        }

        moves
    }

    pub(crate) fn find_king(&self, color: Color) -> Option<Square> {
        let bb = self.pieces[color.index()][Piece::King.index()];
        if bb.is_empty() {
            None
        } else {
            Some(Square::from_index(bb.0.trailing_zeros() as usize))
        }
    }

    pub(crate) fn is_square_attacked(&self, square: Square, attacker_color: Color) -> bool {
        let target_idx = square.index();
        let c_idx = attacker_color.index();

        // Pawn attacks: look from the target square using the defender's
        // perspective to find attacking pawns.
        let defender = attacker_color.opponent();
        if PAWN_ATTACKS[defender.index()][target_idx]
            & self.pieces[c_idx][Piece::Pawn.index()].0
            != 0
        {
            return true;
        }

        if KNIGHT_ATTACKS[target_idx] & self.pieces[c_idx][Piece::Knight.index()].0 != 0 {
            return true;
        }

        if KING_ATTACKS[target_idx] & self.pieces[c_idx][Piece::King.index()].0 != 0 {
            return true;
        }

        let bishops_queens =
            self.pieces[c_idx][Piece::Bishop.index()].0 | self.pieces[c_idx][Piece::Queen.index()].0;
        if bishops_queens != 0
            && slider_attacks(target_idx, self.all_occupied.0, true) & bishops_queens != 0
        {
            return true;
        }

        let rooks_queens =
            self.pieces[c_idx][Piece::Rook.index()].0 | self.pieces[c_idx][Piece::Queen.index()].0;
        if rooks_queens != 0
            && slider_attacks(target_idx, self.all_occupied.0, false) & rooks_queens != 0
        {
            return true;
        }

        false
    }

    pub(crate) fn is_in_check(&self, color: Color) -> bool {
        match self.find_king(color) {
            Some(king_sq) => self.is_square_attacked(king_sq, color.opponent()),
            None => false,
        }
    }
}
