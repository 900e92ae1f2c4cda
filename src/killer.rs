use crate::board::ChessMove;
use crate::types::MAX_PLY;

const KILLERS_PER_PLY: usize = 2;

/// Per-ply history of quiet moves that recently caused a beta cutoff.
/// Capacity 2 per ply, matching the classic killer-heuristic sizing: enough
/// to catch alternating cutoff moves without the ordering pass costing much.
pub struct KillerTable {
    slots: Vec<[Option<ChessMove>; KILLERS_PER_PLY]>,
}

impl KillerTable {
    pub fn new() -> KillerTable {
        KillerTable {
            slots: vec![[None; KILLERS_PER_PLY]; MAX_PLY],
        }
    }

    /// Reorder `moves` so that any move present in this ply's killer slots
    /// comes first, preserving the relative order of everything else.
    pub fn killer_ordered(&self, ply: usize, moves: Vec<ChessMove>) -> Vec<ChessMove> {
        let killers = self.slots[ply];
        let mut front = Vec::with_capacity(KILLERS_PER_PLY);
        let mut rest = Vec::with_capacity(moves.len());
        for mv in moves {
            if killers.contains(&Some(mv)) {
                front.push(mv);
            } else {
                rest.push(mv);
            }
        }
        // preserve killer-slot order (slot 0 before slot 1) rather than the
        // order moves happened to appear in the input list.
        front.sort_by_key(|mv| killers.iter().position(|k| *k == Some(*mv)).unwrap());
        front.extend(rest);
        front
    }

    /// Record a cutoff move at `ply`. No-op if it's already the top killer;
    /// otherwise push to the front and drop the oldest beyond capacity.
    pub fn insert_killer(&mut self, ply: usize, mv: ChessMove) {
        let slot = &mut self.slots[ply];
        if slot[0] == Some(mv) {
            return;
        }
        for i in (1..KILLERS_PER_PLY).rev() {
            slot[i] = slot[i - 1];
        }
        slot[0] = Some(mv);
    }

    /// Seed killer slot `i` with the i-th move of a completed PV. Called
    /// once per iterative-deepening iteration.
    pub fn insert_pv_in_killer(&mut self, pv: &[ChessMove]) {
        for (i, mv) in pv.iter().enumerate() {
            if i >= self.slots.len() {
                break;
            }
            self.insert_killer(i, *mv);
        }
    }
}

impl Default for KillerTable {
    fn default() -> Self {
        KillerTable::new()
    }
}
