use crate::board::{CastleRight, CastleRights, Color, File, Piece, Position, Rank, Square};

fn piece_from_char(c: char) -> Option<(Piece, Color)> {
    let color = if c.is_ascii_uppercase() { Color::White } else { Color::Black };
    let piece = match c.to_ascii_lowercase() {
        'p' => Piece::Pawn,
        'n' => Piece::Knight,
        'b' => Piece::Bishop,
        'r' => Piece::Rook,
        'q' => Piece::Queen,
        'k' => Piece::King,
        _ => return None,
    };
    Some((piece, color))
}

fn parse_placement(pos: &mut Position, field: &str) -> Option<()> {
    let mut rank = 7i32;
    let mut file = 0i32;
    for c in field.chars() {
        match c {
            '/' => {
                if file != 8 {
                    return None;
                }
                rank -= 1;
                file = 0;
            }
            '1'..='8' => {
                file += c.to_digit(10).unwrap() as i32;
            }
            _ => {
                let (piece, color) = piece_from_char(c)?;
                if !(0..8).contains(&rank) || !(0..8).contains(&file) {
                    return None;
                }
                let sq = Square::make_square(Rank::from_index(rank as usize), File::from_index(file as usize));
                pos.place_piece(piece, color, sq);
                file += 1;
            }
        }
    }
    if rank != 0 || file != 8 {
        return None;
    }
    Some(())
}

fn parse_side(field: &str) -> Option<Color> {
    match field {
        "w" => Some(Color::White),
        "b" => Some(Color::Black),
        _ => None,
    }
}

fn parse_castling(field: &str) -> (CastleRights, CastleRights) {
    let mut white = CastleRights::NONE;
    let mut black = CastleRights::NONE;
    if field == "-" {
        return (white, black);
    }
    for c in field.chars() {
        match c {
            'K' => white = white.with(CastleRight::Short),
            'Q' => white = white.with(CastleRight::Long),
            'k' => black = black.with(CastleRight::Short),
            'q' => black = black.with(CastleRight::Long),
            _ => {}
        }
    }
    (white, black)
}

fn parse_en_passant(field: &str) -> Option<Option<Square>> {
    if field == "-" {
        return Some(None);
    }
    let mut chars = field.chars();
    let file_char = chars.next()?;
    let rank_char = chars.next()?;
    if chars.next().is_some() {
        return None;
    }
    if !('a'..='h').contains(&file_char) || !('1'..='8').contains(&rank_char) {
        return None;
    }
    let file = File::from_index((file_char as u8 - b'a') as usize);
    let rank = Rank::from_index((rank_char as u8 - b'1') as usize);
    Some(Some(Square::make_square(rank, file)))
}

/// Parse Forsyth-Edwards Notation into a `Position`. Only the first four
/// fields (placement, side to move, castling, en passant) affect search
/// state; halfmove clock and fullmove number, if present, are accepted but
/// not retained — this crate does not model the fifty-move rule.
pub fn from_fen(fen: &str) -> Option<Position> {
    let mut fields = fen.split_whitespace();
    let placement = fields.next()?;
    let side = fields.next().unwrap_or("w");
    let castling = fields.next().unwrap_or("-");
    let en_passant = fields.next().unwrap_or("-");

    let mut pos = Position::empty();
    parse_placement(&mut pos, placement)?;
    pos.set_side_to_move(parse_side(side)?);

    let (white_rights, black_rights) = parse_castling(castling);
    pos.set_castle_rights(Color::White, white_rights);
    pos.set_castle_rights(Color::Black, black_rights);

    pos.set_en_passant(parse_en_passant(en_passant)?);

    // `place_piece`/`set_*` don't touch the incrementally maintained hash
    // (they're construction-time helpers, not make/unmake) — reconcile it
    // once, now that placement/side/rights/ep have all been set.
    let hash = pos.compute_hash();
    pos.set_hash_for_decoder(hash);

    Some(pos)
}
