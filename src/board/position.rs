use super::attacks;
use super::bitboard::BitBoard;
use super::castle::{CastleRight, CastleRights};
use super::chessmove::ChessMove;
use super::magic::SlidingPiece;
use super::piece::{Color, Piece};
use super::square::Square;
use super::zobrist;

/// Undo information for one `make_move`, popped by the matching `unmake_move`.
/// Not part of Position's public surface — it exists purely so unmake can
/// restore exactly what make changed beyond what the history stacks already
/// capture.
#[derive(Clone, Copy, Debug)]
struct UndoInfo {
    moved_piece: Piece,
    captured: Option<(Piece, Square)>,
}

/// Complete game state: eight bitboards (derivable union/disjointness
/// invariant maintained by construction), side to move, and the en-passant
/// and castling-rights history stacks described in the data model.
#[derive(Clone, Debug)]
pub struct Position {
    color_bb: [BitBoard; 2],
    piece_bb: [BitBoard; 6],
    side_to_move: Color,
    ep_stack: Vec<Option<Square>>,
    castle_stack: [Vec<CastleRights>; 2],
    hash: u64,
    undo_stack: Vec<UndoInfo>,
}

impl Position {
    /// Empty board, White to move, no castling rights, no en-passant target.
    /// `FenDecoder` and the standard-starting-position constant build on top
    /// of this.
    pub fn empty() -> Position {
        let mut pos = Position {
            color_bb: [BitBoard(0); 2],
            piece_bb: [BitBoard(0); 6],
            side_to_move: Color::White,
            ep_stack: vec![None],
            castle_stack: [vec![CastleRights::NONE], vec![CastleRights::NONE]],
            hash: 0,
            undo_stack: Vec::new(),
        };
        pos.hash = pos.compute_hash();
        pos
    }

    /// The standard chess starting position.
    pub fn start_position() -> Position {
        let mut pos = Position::empty();
        let back_rank = [
            Piece::Rook,
            Piece::Knight,
            Piece::Bishop,
            Piece::Queen,
            Piece::King,
            Piece::Bishop,
            Piece::Knight,
            Piece::Rook,
        ];
        for (file, piece) in back_rank.iter().enumerate() {
            pos.place_piece(*piece, Color::White, Square::new(file as u8));
            pos.place_piece(*piece, Color::Black, Square::new(56 + file as u8));
            pos.place_piece(Piece::Pawn, Color::White, Square::new(8 + file as u8));
            pos.place_piece(Piece::Pawn, Color::Black, Square::new(48 + file as u8));
        }
        pos.castle_stack[Color::White.to_index()] = vec![CastleRights::BOTH];
        pos.castle_stack[Color::Black.to_index()] = vec![CastleRights::BOTH];
        pos.hash = pos.compute_hash();
        pos
    }

    /// Place a piece onto an empty square. Used only during construction
    /// (by `FenDecoder` and `start_position`) — not part of the make/unmake
    /// discipline, so it does not touch history stacks or the incremental
    /// hash.
    pub fn place_piece(&mut self, piece: Piece, color: Color, sq: Square) {
        let bb = BitBoard::from_square(sq);
        self.piece_bb[piece.to_index()] |= bb;
        self.color_bb[color.to_index()] |= bb;
    }

    pub fn set_side_to_move(&mut self, color: Color) {
        self.side_to_move = color;
    }

    pub fn set_en_passant(&mut self, target: Option<Square>) {
        *self.ep_stack.last_mut().unwrap() = target;
    }

    pub fn set_castle_rights(&mut self, color: Color, rights: CastleRights) {
        *self.castle_stack[color.to_index()].last_mut().unwrap() = rights;
    }

    /// Recompute the full hash from scratch; used at construction time and
    /// to cross-check the incrementally maintained hash in tests.
    pub fn compute_hash(&self) -> u64 {
        let mut h = 0u64;
        for piece in Piece::ALL {
            for color in [Color::White, Color::Black] {
                let bb = self.piece_bb[piece.to_index()] & self.color_bb[color.to_index()];
                for sq in bb.iter() {
                    h ^= zobrist::piece_key(piece.to_index(), color.to_index(), sq.to_index());
                }
            }
        }
        if self.side_to_move == Color::Black {
            h ^= zobrist::side_key();
        }
        h ^= zobrist::castling_key(
            self.castle_rights(Color::White).bits(),
            self.castle_rights(Color::Black).bits(),
        );
        h ^= zobrist::ep_key(self.en_passant().map(|s| s.to_index()));
        h
    }

    #[inline]
    pub fn hash(&self) -> u64 {
        self.hash
    }

    /// Reconcile the incrementally maintained hash after `FenDecoder` has
    /// finished populating placement/side/rights/en-passant via the
    /// construction-time setters above (none of which touch `self.hash`).
    pub fn set_hash_for_decoder(&mut self, hash: u64) {
        self.hash = hash;
    }

    #[inline]
    pub fn side_to_move(&self) -> Color {
        self.side_to_move
    }

    #[inline]
    pub fn color_bb(&self, color: Color) -> BitBoard {
        self.color_bb[color.to_index()]
    }

    #[inline]
    pub fn piece_bb(&self, piece: Piece) -> BitBoard {
        self.piece_bb[piece.to_index()]
    }

    #[inline]
    pub fn pieces_of(&self, piece: Piece, color: Color) -> BitBoard {
        self.piece_bb[piece.to_index()] & self.color_bb[color.to_index()]
    }

    #[inline]
    pub fn occupied(&self) -> BitBoard {
        self.color_bb[0] | self.color_bb[1]
    }

    #[inline]
    pub fn en_passant(&self) -> Option<Square> {
        *self.ep_stack.last().unwrap()
    }

    #[inline]
    pub fn castle_rights(&self, color: Color) -> CastleRights {
        *self.castle_stack[color.to_index()].last().unwrap()
    }

    /// Piece type and color occupying `sq`, or `None` if empty. Scans the
    /// six piece boards; fine off the hot legality-probe path (captures,
    /// FEN decode, evaluation) where this engine uses it.
    pub fn piece_at(&self, sq: Square) -> Option<(Piece, Color)> {
        let bb = BitBoard::from_square(sq);
        if (self.occupied() & bb).is_empty() {
            return None;
        }
        let color = if !(self.color_bb[0] & bb).is_empty() {
            Color::White
        } else {
            Color::Black
        };
        for piece in Piece::ALL {
            if !(self.piece_bb[piece.to_index()] & bb).is_empty() {
                return Some((piece, color));
            }
        }
        None
    }

    /// True if `color`'s king is attacked in the current position.
    pub fn in_check(&self, color: Color) -> bool {
        match self.pieces_of(Piece::King, color).lsb() {
            Some(king_sq) => self.is_attacked_by(king_sq, !color),
            None => false,
        }
    }

    /// True if any piece of `attacker` attacks `sq` in the current position.
    pub fn is_attacked_by(&self, sq: Square, attacker: Color) -> bool {
        let occ = self.occupied();

        if !(attacks::knight_attacks(sq) & self.pieces_of(Piece::Knight, attacker)).is_empty() {
            return true;
        }
        if !(attacks::king_attacks(sq) & self.pieces_of(Piece::King, attacker)).is_empty() {
            return true;
        }
        // pawn attacks are generated from the victim's perspective: a pawn
        // of `attacker` color attacks `sq` from the squares a defending pawn
        // of the opposite color would itself attack from `sq`.
        if !(attacks::pawn_attacks(!attacker, sq) & self.pieces_of(Piece::Pawn, attacker))
            .is_empty()
        {
            return true;
        }
        let bishops_queens =
            self.pieces_of(Piece::Bishop, attacker) | self.pieces_of(Piece::Queen, attacker);
        if !(attacks::bishop_attacks(sq, occ) & bishops_queens).is_empty() {
            return true;
        }
        let rooks_queens =
            self.pieces_of(Piece::Rook, attacker) | self.pieces_of(Piece::Queen, attacker);
        if !(attacks::rook_attacks(sq, occ) & rooks_queens).is_empty() {
            return true;
        }
        false
    }

    /// Attackers of `sq` belonging to `attacker`, as a bitboard of source
    /// squares. Used by MVV-LVA ordering and SEE-free capture heuristics.
    pub fn attackers_to(&self, sq: Square, attacker: Color) -> BitBoard {
        let occ = self.occupied();
        let mut result = attacks::knight_attacks(sq) & self.pieces_of(Piece::Knight, attacker);
        result |= attacks::king_attacks(sq) & self.pieces_of(Piece::King, attacker);
        result |= attacks::pawn_attacks(!attacker, sq) & self.pieces_of(Piece::Pawn, attacker);
        result |= attacks::slider_attacks(SlidingPiece::Bishop, sq, occ)
            & (self.pieces_of(Piece::Bishop, attacker) | self.pieces_of(Piece::Queen, attacker));
        result |= attacks::slider_attacks(SlidingPiece::Rook, sq, occ)
            & (self.pieces_of(Piece::Rook, attacker) | self.pieces_of(Piece::Queen, attacker));
        result
    }

    #[inline]
    fn clear_square(&mut self, piece: Piece, color: Color, sq: Square) {
        let bb = BitBoard::from_square(sq);
        self.piece_bb[piece.to_index()] &= !bb;
        self.color_bb[color.to_index()] &= !bb;
        self.hash ^= zobrist::piece_key(piece.to_index(), color.to_index(), sq.to_index());
    }

    #[inline]
    fn set_square(&mut self, piece: Piece, color: Color, sq: Square) {
        let bb = BitBoard::from_square(sq);
        self.piece_bb[piece.to_index()] |= bb;
        self.color_bb[color.to_index()] |= bb;
        self.hash ^= zobrist::piece_key(piece.to_index(), color.to_index(), sq.to_index());
    }

    fn rook_corner(color: Color, right: CastleRight) -> (Square, Square) {
        // (rook source, rook destination)
        match (color, right) {
            (Color::White, CastleRight::Short) => (Square::new(7), Square::new(5)),
            (Color::White, CastleRight::Long) => (Square::new(0), Square::new(3)),
            (Color::Black, CastleRight::Short) => (Square::new(63), Square::new(61)),
            (Color::Black, CastleRight::Long) => (Square::new(56), Square::new(59)),
        }
    }

    /// Apply `mv`, pushing one entry onto each history stack. Panics if `mv`
    /// has no piece on its source square — a programming error, never a
    /// legal-game condition.
    pub fn make_move(&mut self, mv: ChessMove) {
        let color = self.side_to_move;
        let src = mv.get_source();
        let dst = mv.get_dest();

        let (moved_piece, moved_color) = self.piece_at(src).unwrap_or_else(|| {
            log::error!("make_move: no piece on source square {src}");
            panic!("make_move: no piece on source square {src}");
        });
        debug_assert_eq!(moved_color, color);

        let mut captured = None;

        if mv.is_en_passant() {
            let captured_sq = ep_capture_square(dst, color);
            self.clear_square(Piece::Pawn, !color, captured_sq);
            captured = Some((Piece::Pawn, captured_sq));
        } else if mv.is_capture() {
            let (cap_piece, cap_color) = self.piece_at(dst).unwrap_or_else(|| {
                log::error!("make_move: capture flag set but no piece on destination {dst}");
                panic!("make_move: capture flag set but no piece on destination {dst}");
            });
            debug_assert_eq!(cap_color, !color);
            self.clear_square(cap_piece, !color, dst);
            captured = Some((cap_piece, dst));
        }

        self.clear_square(moved_piece, color, src);
        let final_piece = mv.get_promotion().unwrap_or(moved_piece);
        self.set_square(final_piece, color, dst);

        if mv.is_king_castle() {
            let (rook_src, rook_dst) = Self::rook_corner(color, CastleRight::Short);
            self.clear_square(Piece::Rook, color, rook_src);
            self.set_square(Piece::Rook, color, rook_dst);
        } else if mv.is_queen_castle() {
            let (rook_src, rook_dst) = Self::rook_corner(color, CastleRight::Long);
            self.clear_square(Piece::Rook, color, rook_src);
            self.set_square(Piece::Rook, color, rook_dst);
        }

        self.undo_stack.push(UndoInfo {
            moved_piece,
            captured,
        });

        // en-passant stack: new target only on a double push
        let old_ep = self.en_passant();
        let new_ep = if mv.is_double_push() {
            Some(ep_skip_square(src, dst))
        } else {
            None
        };
        self.hash ^= zobrist::ep_key(old_ep.map(|s| s.to_index()));
        self.hash ^= zobrist::ep_key(new_ep.map(|s| s.to_index()));
        self.ep_stack.push(new_ep);

        // castling rights: both stacks grow every move, values unchanged
        // unless this move disturbs a king/rook home square.
        let old_white = self.castle_rights(Color::White);
        let old_black = self.castle_rights(Color::Black);
        let mut new_white = old_white;
        let mut new_black = old_black;

        let strip = |rights: &mut CastleRights, sq: Square, home: Square, right: CastleRight| {
            if sq == home {
                *rights = rights.without(right);
            }
        };

        if moved_piece == Piece::King {
            match color {
                Color::White => new_white = CastleRights::NONE,
                Color::Black => new_black = CastleRights::NONE,
            }
        }
        match color {
            Color::White => {
                strip(&mut new_white, src, Square::new(0), CastleRight::Long);
                strip(&mut new_white, src, Square::new(7), CastleRight::Short);
            }
            Color::Black => {
                strip(&mut new_black, src, Square::new(56), CastleRight::Long);
                strip(&mut new_black, src, Square::new(63), CastleRight::Short);
            }
        }
        // a captured rook on its home square also forfeits that right
        strip(&mut new_white, dst, Square::new(0), CastleRight::Long);
        strip(&mut new_white, dst, Square::new(7), CastleRight::Short);
        strip(&mut new_black, dst, Square::new(56), CastleRight::Long);
        strip(&mut new_black, dst, Square::new(63), CastleRight::Short);

        self.hash ^= zobrist::castling_key(old_white.bits(), old_black.bits());
        self.hash ^= zobrist::castling_key(new_white.bits(), new_black.bits());
        self.castle_stack[Color::White.to_index()].push(new_white);
        self.castle_stack[Color::Black.to_index()].push(new_black);

        self.side_to_move = !color;
        self.hash ^= zobrist::side_key();
    }

    /// Undo the most recent `make_move`. Panics if called with no prior move
    /// on the undo stack — a programming error in the caller.
    pub fn unmake_move(&mut self, mv: ChessMove) {
        let undo = self
            .undo_stack
            .pop()
            .expect("unmake_move called with empty undo stack");

        self.side_to_move = !self.side_to_move;
        self.hash ^= zobrist::side_key();

        let old_white = self.castle_rights(Color::White);
        let old_black = self.castle_rights(Color::Black);
        self.castle_stack[Color::White.to_index()].pop();
        self.castle_stack[Color::Black.to_index()].pop();
        let new_white = self.castle_rights(Color::White);
        let new_black = self.castle_rights(Color::Black);
        self.hash ^= zobrist::castling_key(old_white.bits(), old_black.bits());
        self.hash ^= zobrist::castling_key(new_white.bits(), new_black.bits());

        let old_ep = self.en_passant();
        self.ep_stack.pop();
        let new_ep = self.en_passant();
        self.hash ^= zobrist::ep_key(old_ep.map(|s| s.to_index()));
        self.hash ^= zobrist::ep_key(new_ep.map(|s| s.to_index()));

        let color = self.side_to_move;
        let src = mv.get_source();
        let dst = mv.get_dest();

        if mv.is_king_castle() {
            let (rook_src, rook_dst) = Self::rook_corner(color, CastleRight::Short);
            self.clear_square(Piece::Rook, color, rook_dst);
            self.set_square(Piece::Rook, color, rook_src);
        } else if mv.is_queen_castle() {
            let (rook_src, rook_dst) = Self::rook_corner(color, CastleRight::Long);
            self.clear_square(Piece::Rook, color, rook_dst);
            self.set_square(Piece::Rook, color, rook_src);
        }

        let final_piece = mv.get_promotion().unwrap_or(undo.moved_piece);
        self.clear_square(final_piece, color, dst);
        self.set_square(undo.moved_piece, color, src);

        if let Some((cap_piece, cap_sq)) = undo.captured {
            self.set_square(cap_piece, !color, cap_sq);
        }
    }
}

impl PartialEq for Position {
    fn eq(&self, other: &Self) -> bool {
        self.color_bb == other.color_bb
            && self.piece_bb == other.piece_bb
            && self.side_to_move == other.side_to_move
            && self.en_passant() == other.en_passant()
            && self.castle_rights(Color::White) == other.castle_rights(Color::White)
            && self.castle_rights(Color::Black) == other.castle_rights(Color::Black)
    }
}

impl Eq for Position {}

fn ep_skip_square(src: Square, dst: Square) -> Square {
    Square::new((src.to_index() as u8 + dst.to_index() as u8) / 2)
}

fn ep_capture_square(dst: Square, mover: Color) -> Square {
    match mover {
        Color::White => Square::new(dst.to_index() as u8 - 8),
        Color::Black => Square::new(dst.to_index() as u8 + 8),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_position_piece_counts() {
        let pos = Position::start_position();
        assert_eq!(pos.pieces_of(Piece::Pawn, Color::White).popcnt(), 8);
        assert_eq!(pos.pieces_of(Piece::Pawn, Color::Black).popcnt(), 8);
        assert_eq!(pos.pieces_of(Piece::King, Color::White).popcnt(), 1);
        assert_eq!(pos.occupied().popcnt(), 32);
        assert_eq!(pos.side_to_move(), Color::White);
    }

    #[test]
    fn test_board_color_disjoint_union_invariant() {
        let pos = Position::start_position();
        let mut union = BitBoard(0);
        for piece in Piece::ALL {
            let bb = pos.piece_bb(piece);
            assert!((bb & union).is_empty(), "piece boards must be disjoint");
            union |= bb;
        }
        assert_eq!(union, pos.occupied());
    }

    #[test]
    fn test_make_unmake_quiet_move_restores_hash() {
        let mut pos = Position::start_position();
        let start_hash = pos.hash();
        let mv = ChessMove::double_push(Square::new(12), Square::new(28)); // e2e4
        pos.make_move(mv);
        assert_ne!(pos.hash(), start_hash);
        pos.unmake_move(mv);
        assert_eq!(pos.hash(), start_hash);
        assert_eq!(pos.compute_hash(), start_hash);
    }

    #[test]
    fn test_make_unmake_sequence_restores_hash() {
        let mut pos = Position::start_position();
        let start_hash = pos.hash();
        let moves = [
            ChessMove::double_push(Square::new(12), Square::new(28)), // e2e4
            ChessMove::double_push(Square::new(52), Square::new(36)), // e7e5
            ChessMove::quiet(Square::new(6), Square::new(21)),        // g1f3
            ChessMove::quiet(Square::new(57), Square::new(42)),       // b8c6
        ];
        for mv in moves {
            pos.make_move(mv);
        }
        for mv in moves.iter().rev() {
            pos.unmake_move(*mv);
        }
        assert_eq!(pos.hash(), start_hash);
        assert_eq!(pos, Position::start_position());
    }

    #[test]
    fn test_capture_restores_captured_piece() {
        let mut pos = Position::empty();
        pos.place_piece(Piece::Rook, Color::White, Square::new(0));
        pos.place_piece(Piece::Pawn, Color::Black, Square::new(8));
        pos.hash = pos.compute_hash();
        let before = pos.clone();

        let mv = ChessMove::capture(Square::new(0), Square::new(8));
        pos.make_move(mv);
        assert!(pos.piece_at(Square::new(8)).is_some());
        assert_eq!(pos.piece_at(Square::new(8)).unwrap().0, Piece::Rook);

        pos.unmake_move(mv);
        assert_eq!(pos, before);
        assert_eq!(pos.hash(), before.hash());
    }

    #[test]
    fn test_castling_updates_and_restores_rights() {
        let mut pos = Position::empty();
        pos.place_piece(Piece::King, Color::White, Square::new(4));
        pos.place_piece(Piece::Rook, Color::White, Square::new(7));
        pos.set_castle_rights(Color::White, CastleRights::BOTH);
        pos.hash = pos.compute_hash();
        let before = pos.clone();

        let mv = ChessMove::king_castle(Square::new(4), Square::new(6));
        pos.make_move(mv);
        assert_eq!(pos.piece_at(Square::new(6)).unwrap().0, Piece::King);
        assert_eq!(pos.piece_at(Square::new(5)).unwrap().0, Piece::Rook);
        assert!(pos.castle_rights(Color::White).is_empty());

        pos.unmake_move(mv);
        assert_eq!(pos, before);
        assert_eq!(pos.castle_rights(Color::White), CastleRights::BOTH);
    }

    #[test]
    fn test_en_passant_capture_restores_captured_pawn() {
        // white pawn e5, black pawn just double-pushed d7-d5 (landing on d5,
        // ep target d6); white captures exd6 e.p.
        let mut pos = Position::empty();
        pos.place_piece(Piece::Pawn, Color::White, Square::new(36)); // e5
        pos.place_piece(Piece::Pawn, Color::Black, Square::new(35)); // d5
        pos.set_en_passant(Some(Square::new(43))); // d6
        pos.hash = pos.compute_hash();
        let before = pos.clone();

        let mv = ChessMove::en_passant(Square::new(36), Square::new(43)); // exd6 e.p.
        pos.make_move(mv);
        assert!(pos.piece_at(Square::new(35)).is_none());
        assert_eq!(pos.piece_at(Square::new(43)).unwrap().0, Piece::Pawn);

        pos.unmake_move(mv);
        assert_eq!(pos, before);
    }

    #[test]
    fn test_equality_ignores_stack_history_tail() {
        let mut a = Position::start_position();
        let mut b = Position::start_position();
        a.make_move(ChessMove::double_push(Square::new(12), Square::new(28)));
        a.unmake_move(ChessMove::double_push(Square::new(12), Square::new(28)));
        // a's stacks now have depth 1 (pushed then popped back to the seed),
        // b's stacks still have depth 0 (never touched) -- tops agree, so
        // equality must hold despite the differing stack depths.
        assert_eq!(a, b);
        b.make_move(ChessMove::quiet(Square::new(1), Square::new(18)));
        assert_ne!(a, b);
    }

    #[test]
    fn test_in_check_detects_rook_check() {
        let mut pos = Position::empty();
        pos.place_piece(Piece::King, Color::White, Square::new(4));
        pos.place_piece(Piece::Rook, Color::Black, Square::new(60));
        assert!(pos.in_check(Color::White));
        assert!(!pos.in_check(Color::Black));
    }

    proptest::proptest! {
        // picks, at each ply, one of the legal moves available (by index
        // modulo the move count) rather than constructing arbitrary
        // `ChessMove`s directly -- a random u8 never corresponds to a legal
        // move, so this is the only way to get proptest-generated inputs
        // that actually exercise make/unmake at interesting depths.
        #[test]
        fn prop_make_unmake_round_trip_preserves_hash(picks in proptest::collection::vec(0u8..255, 1..6)) {
            let mut pos = Position::start_position();
            let start_hash = pos.hash();
            let mut played = Vec::new();

            for pick in &picks {
                let legal = crate::movegen::moves(&pos);
                if legal.is_empty() {
                    break;
                }
                let mv = legal[*pick as usize % legal.len()];
                pos.make_move(mv);
                played.push(mv);
            }

            for mv in played.iter().rev() {
                pos.unmake_move(*mv);
            }

            proptest::prop_assert_eq!(pos.hash(), start_hash);
            proptest::prop_assert_eq!(pos.hash(), pos.compute_hash());
            proptest::prop_assert_eq!(&pos, &Position::start_position());
        }
    }
}
