use std::sync::LazyLock;

use super::bitboard::BitBoard;
use super::magic::{MagicDb, SlidingPiece};
use super::piece::Color;
use super::square::Square;

struct LeaperTables {
    knight: [BitBoard; 64],
    king: [BitBoard; 64],
    pawn: [[BitBoard; 64]; 2],
}

fn knight_offsets() -> [(i8, i8); 8] {
    [
        (-2, -1),
        (-2, 1),
        (-1, -2),
        (-1, 2),
        (1, -2),
        (1, 2),
        (2, -1),
        (2, 1),
    ]
}

fn king_offsets() -> [(i8, i8); 8] {
    [
        (-1, -1),
        (-1, 0),
        (-1, 1),
        (0, -1),
        (0, 1),
        (1, -1),
        (1, 0),
        (1, 1),
    ]
}

fn leaper_bitboard(sq: u8, offsets: &[(i8, i8); 8]) -> BitBoard {
    let r = (sq >> 3) as i8;
    let f = (sq & 7) as i8;
    let mut bb = 0u64;
    for (dr, df) in offsets {
        let nr = r + dr;
        let nf = f + df;
        if (0..8).contains(&nr) && (0..8).contains(&nf) {
            bb |= 1u64 << (nr * 8 + nf);
        }
    }
    BitBoard(bb)
}

fn build_leaper_tables() -> LeaperTables {
    let mut knight = [BitBoard(0); 64];
    let mut king = [BitBoard(0); 64];
    let mut pawn = [[BitBoard(0); 64]; 2];

    let knight_off = knight_offsets();
    let king_off = king_offsets();

    for sq in 0..64u8 {
        knight[sq as usize] = leaper_bitboard(sq, &knight_off);
        king[sq as usize] = leaper_bitboard(sq, &king_off);

        let r = (sq >> 3) as i8;
        let f = (sq & 7) as i8;
        let mut white = 0u64;
        let mut black = 0u64;

        if r + 1 < 8 {
            if f > 0 {
                white |= 1u64 << ((r + 1) * 8 + (f - 1));
            }
            if f + 1 < 8 {
                white |= 1u64 << ((r + 1) * 8 + (f + 1));
            }
        }
        if r > 0 {
            if f > 0 {
                black |= 1u64 << ((r - 1) * 8 + (f - 1));
            }
            if f + 1 < 8 {
                black |= 1u64 << ((r - 1) * 8 + (f + 1));
            }
        }

        pawn[0][sq as usize] = BitBoard(white);
        pawn[1][sq as usize] = BitBoard(black);
    }

    LeaperTables { knight, king, pawn }
}

static LEAPERS: LazyLock<LeaperTables> = LazyLock::new(build_leaper_tables);
static MAGIC_DB: LazyLock<MagicDb> = LazyLock::new(MagicDb::new);

/// Force both lazy tables to build. Not required for correctness (first
/// lookup triggers the same build), but useful for benches and tests that
/// want init latency out of their timed section.
pub fn init_attacks() {
    LazyLock::force(&LEAPERS);
    LazyLock::force(&MAGIC_DB);
}

#[inline]
pub fn knight_attacks(sq: Square) -> BitBoard {
    LEAPERS.knight[sq.to_index()]
}

#[inline]
pub fn king_attacks(sq: Square) -> BitBoard {
    LEAPERS.king[sq.to_index()]
}

#[inline]
pub fn pawn_attacks(color: Color, sq: Square) -> BitBoard {
    LEAPERS.pawn[color.to_index()][sq.to_index()]
}

#[inline]
pub fn bishop_attacks(sq: Square, occupied: BitBoard) -> BitBoard {
    MAGIC_DB.bishop_attacks(sq, occupied)
}

#[inline]
pub fn rook_attacks(sq: Square, occupied: BitBoard) -> BitBoard {
    MAGIC_DB.rook_attacks(sq, occupied)
}

#[inline]
pub fn queen_attacks(sq: Square, occupied: BitBoard) -> BitBoard {
    MAGIC_DB.queen_attacks(sq, occupied)
}

/// Attacks for any piece type given its sliding-ness. Sliders (`None` means
/// knight/king/pawn don't use this path) look up the shared `MagicDb`.
#[inline]
pub fn slider_attacks(piece: SlidingPiece, sq: Square, occupied: BitBoard) -> BitBoard {
    MAGIC_DB.attacks(piece, sq, occupied)
}


// Precompute attack tables for every piece type on every square, stored
// behind `LazyLock` so the first caller (whichever thread it is) pays for
// construction and everyone else gets a cached reference — no `static mut`,
// no explicit `Once` bookkeeping.
