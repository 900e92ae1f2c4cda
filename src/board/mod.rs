pub mod attacks;
mod bitboard;
pub mod castle;
mod chessmove;
pub mod magic;
mod piece;
mod position;
mod square;
pub mod zobrist;

pub use bitboard::{BitBoard, EMPTY};
pub use castle::{CastleRight, CastleRights};
pub use chessmove::ChessMove;
pub use piece::{Color, Piece};
pub use position::Position;
pub use square::{File, Rank, Square, ALL_SQUARES};

/// Init attack tables and Zobrist keys. Must be called before any board operations.
/// Both are also lazily initialized on first access; this just forces that
/// eagerly, e.g. so benches don't attribute table-build time to the first sample.
pub fn init() {
    attacks::init_attacks();
    zobrist::init_zobrist();
}
