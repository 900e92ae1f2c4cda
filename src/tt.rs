use lru::LruCache;
use std::num::NonZeroUsize;

use crate::board::{ChessMove, Position};
use crate::search_result::SearchResult;
use crate::types::Score;

/// Whether a stored score is exact, or only a bound established by a cutoff.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Bound {
    Exact,
    LowerBound,
    UpperBound,
}

#[derive(Clone)]
pub struct TtEntry {
    position_snapshot: Position,
    pub depth: u32,
    pub result: SearchResult,
    pub bound: Bound,
}

/// What `lookup` tells the caller: a usable score, a move hint only, or
/// nothing at all.
pub enum LookupOutcome {
    Hit(TtEntry),
    Shallow { move_hint: Option<ChessMove> },
    Miss,
}

/// Bounded LRU cache of `position.hash() -> TtEntry`, keyed by hash with a
/// stored position snapshot for collision detection: two positions can
/// share a 64-bit hash, and the snapshot comparison turns that case into a
/// miss rather than a silently wrong answer.
pub struct TransPosTable {
    cache: LruCache<u64, TtEntry>,
}

impl TransPosTable {
    pub fn new(capacity: usize) -> TransPosTable {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::new(1).unwrap());
        TransPosTable {
            cache: LruCache::new(capacity),
        }
    }

    /// Hit: hash matches, snapshot equals, and stored depth covers the
    /// request. Shallow: matches but too shallow — only a move hint is
    /// useful. Miss: hash missing, or a collision on the snapshot check.
    pub fn lookup(&mut self, position: &Position, depth: u32) -> LookupOutcome {
        let Some(entry) = self.cache.get(&position.hash()) else {
            return LookupOutcome::Miss;
        };
        if entry.position_snapshot != *position {
            log::debug!(
                "tt: hash collision at {:#x}, treating as miss",
                position.hash()
            );
            return LookupOutcome::Miss;
        }
        if entry.depth >= depth {
            LookupOutcome::Hit(entry.clone())
        } else {
            LookupOutcome::Shallow {
                move_hint: entry.result.first(),
            }
        }
    }

    /// Insert policy: a fresh key always inserts. An existing key is
    /// overwritten only when the new entry is Exact and the old one isn't —
    /// Exact scores are most valuable for re-use and move ordering, and
    /// refusing to overwrite them avoids churn from transient bound updates.
    pub fn insert(&mut self, position: &Position, depth: u32, bound: Bound, result: SearchResult) {
        let key = position.hash();
        if let Some(existing) = self.cache.peek(&key) {
            if !(bound == Bound::Exact && existing.bound != Bound::Exact) {
                self.cache.promote(&key);
                return;
            }
        }
        self.cache.put(
            key,
            TtEntry {
                position_snapshot: position.clone(),
                depth,
                result,
                bound,
            },
        );
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}


// keyed by the full Zobrist hash, with a stored position snapshot for collision detection --
// two positions hashing to the same u64 degrade to a miss instead of a wrong answer.
