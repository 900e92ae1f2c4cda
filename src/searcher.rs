use crate::board::{ChessMove, Color, Position};
use crate::evaluator::evaluate;
use crate::info_sink::InfoSink;
use crate::killer::KillerTable;
use crate::movegen;
use crate::search_result::SearchResult;
use crate::tt::{Bound, LookupOutcome, TransPosTable};
use crate::types::{EngineConfig, Score, SCORE_INFINITY};

/// Search state owned across a single `search` call: the transposition
/// table, killer history, and node/hit counters. Counters are observational
/// only — nothing about them feeds back into the search result.
pub struct Searcher {
    tt: TransPosTable,
    killers: KillerTable,
    nodes: u64,
    tt_hits: u64,
    tt_misses: u64,
}

/// Result of the TT consult both `negascout` and `quiescence` perform on
/// entry: either a cutoff result to return immediately, or a move hint
/// (possibly absent) to prepend to whatever move list the caller searches.
enum TtConsult {
    CutOff(SearchResult),
    Continue(Option<ChessMove>),
}

impl Searcher {
    pub fn new(config: &EngineConfig) -> Searcher {
        Searcher {
            tt: TransPosTable::new(config.tt_capacity),
            killers: KillerTable::new(),
            nodes: 0,
            tt_hits: 0,
            tt_misses: 0,
        }
    }

    pub fn nodes(&self) -> u64 {
        self.nodes
    }

    fn color_sign(position: &Position) -> Score {
        if position.side_to_move() == Color::White {
            1
        } else {
            -1
        }
    }

    /// Iterative deepening from depth 1 to `max_depth`. Each completed
    /// iteration seeds the killer table from its PV and reports `info depth
    /// <d>` through `sink`; the final iteration's result is returned.
    pub fn search(&mut self, position: &mut Position, max_depth: u8, sink: &mut dyn InfoSink) -> SearchResult {
        let color_sign = Self::color_sign(position);
        let mut result = SearchResult::leaf(color_sign * evaluate(position));

        for depth in 1..=max_depth.max(1) {
            self.nodes = 0;
            sink.info(&format!("info depth {depth}"));
            result = self.negascout(position, depth, depth, -SCORE_INFINITY, SCORE_INFINITY, color_sign, sink);
            self.killers.insert_pv_in_killer(&result.variation);
        }

        result
    }

    /// The Hit/Shallow/Miss TT consult shared by `negascout` and
    /// `quiescence`: on a `Hit` that doesn't resolve the window outright,
    /// tightens `alpha`/`beta` in place and returns the stored move as a
    /// hint; on `Shallow`, returns the shallow entry's move hint with the
    /// window untouched; on `Miss`, returns no hint.
    fn consult_tt(&mut self, position: &Position, depth: u32, alpha: &mut Score, beta: &mut Score) -> TtConsult {
        match self.tt.lookup(position, depth) {
            LookupOutcome::Hit(entry) => {
                self.tt_hits += 1;
                match entry.bound {
                    Bound::Exact => TtConsult::CutOff(entry.result),
                    Bound::LowerBound => {
                        *alpha = (*alpha).max(entry.result.score);
                        if *alpha >= *beta {
                            TtConsult::CutOff(SearchResult::leaf(*alpha))
                        } else {
                            TtConsult::Continue(entry.result.first())
                        }
                    }
                    Bound::UpperBound => {
                        *beta = (*beta).min(entry.result.score);
                        if *alpha >= *beta {
                            TtConsult::CutOff(SearchResult::leaf(*alpha))
                        } else {
                            TtConsult::Continue(entry.result.first())
                        }
                    }
                }
            }
            LookupOutcome::Shallow { move_hint } => {
                self.tt_misses += 1;
                TtConsult::Continue(move_hint)
            }
            LookupOutcome::Miss => {
                self.tt_misses += 1;
                TtConsult::Continue(None)
            }
        }
    }

    /// `negascout(maxDepth, depthRemaining, alpha, beta, colorSign)`, wrapped
    /// implicitly by the TT consult at the top and the TT insert inside
    /// `iterate_moves`.
    fn negascout(
        &mut self,
        position: &mut Position,
        max_depth: u8,
        depth_remaining: u8,
        mut alpha: Score,
        mut beta: Score,
        color_sign: Score,
        sink: &mut dyn InfoSink,
    ) -> SearchResult {
        let hint = match self.consult_tt(position, depth_remaining as u32, &mut alpha, &mut beta) {
            TtConsult::CutOff(result) => return result,
            TtConsult::Continue(hint) => hint,
        };

        if !movegen::any_move(position) {
            self.nodes += 1;
            return SearchResult::leaf(color_sign * evaluate(position));
        }

        if depth_remaining == 0 {
            return self.quiescence(position, alpha, beta, color_sign);
        }

        let mut moves = movegen::moves(position);
        if let Some(hinted) = hint {
            if let Some(pos_in_list) = moves.iter().position(|m| *m == hinted) {
                moves.remove(pos_in_list);
            }
            moves.insert(0, hinted);
        }
        let ply = (max_depth - depth_remaining) as usize;
        let moves = self.killers.killer_ordered(ply, moves);

        self.iterate_moves(position, moves, max_depth, depth_remaining, alpha, beta, color_sign, sink)
    }

    #[allow(clippy::too_many_arguments)]
    fn iterate_moves(
        &mut self,
        position: &mut Position,
        moves: Vec<ChessMove>,
        max_depth: u8,
        depth_remaining: u8,
        original_alpha: Score,
        beta: Score,
        color_sign: Score,
        sink: &mut dyn InfoSink,
    ) -> SearchResult {
        let ply = (max_depth - depth_remaining) as usize;
        let is_root = depth_remaining == max_depth;

        let mut alpha = original_alpha;
        let mut best_score = original_alpha;
        let mut best_result = SearchResult::leaf(original_alpha);

        for (i, mv) in moves.iter().enumerate() {
            let is_first = i == 0;

            position.make_move(*mv);
            let n = if is_first {
                self.negascout(position, max_depth, depth_remaining - 1, -beta, -alpha, -color_sign, sink)
                    .negate()
                    .prepend(*mv)
            } else {
                let scout = self
                    .negascout(position, max_depth, depth_remaining - 1, -alpha - 1, -alpha, -color_sign, sink)
                    .negate()
                    .prepend(*mv);
                if alpha < scout.score && scout.score < beta {
                    self.negascout(position, max_depth, depth_remaining - 1, -beta, -alpha, -color_sign, sink)
                        .negate()
                        .prepend(*mv)
                } else {
                    scout
                }
            };
            position.unmake_move(*mv);

            if is_root {
                let ratio = if self.tt_hits + self.tt_misses == 0 {
                    0
                } else {
                    100 * self.tt_hits / (self.tt_hits + self.tt_misses)
                };
                let kn = self.nodes / 1000;
                let pv: String = best_result.variation.iter().map(|m| m.to_string()).collect::<Vec<_>>().join(" ");
                sink.info(&format!("info TPC : {ratio}% {kn}kn  PV : {pv}  curr : {mv}"));
            }

            if n.score >= beta {
                self.killers.insert_killer(ply, *mv);
                let cutoff = SearchResult {
                    score: beta,
                    variation: vec![*mv],
                };
                self.tt.insert(position, depth_remaining as u32, Bound::LowerBound, cutoff.clone());
                return cutoff;
            }

            if n.score > best_score {
                best_score = n.score;
                best_result = n;
                alpha = alpha.max(best_score);
            }
        }

        let bound = if best_score <= original_alpha {
            Bound::UpperBound
        } else {
            Bound::Exact
        };
        self.tt.insert(position, depth_remaining as u32, bound, best_result.clone());
        best_result
    }

    /// `quiescence(alpha, beta, colorSign)`: wrapped by the same TT consult
    /// as `negascout`, then stands pat and extends only captures/promotions,
    /// with the TT move hint (if any) prepended to that forcing-move list.
    /// Does not special-case being in check — a deliberate simplification
    /// over the teacher's evasion-search branch.
    fn quiescence(&mut self, position: &mut Position, mut alpha: Score, mut beta: Score, color_sign: Score) -> SearchResult {
        self.nodes += 1;

        let hint = match self.consult_tt(position, 0, &mut alpha, &mut beta) {
            TtConsult::CutOff(result) => return result,
            TtConsult::Continue(hint) => hint,
        };

        let original_alpha = alpha;
        let stand_pat = color_sign * evaluate(position);

        if stand_pat >= beta {
            let cutoff = SearchResult::leaf(beta);
            self.tt.insert(position, 0, Bound::LowerBound, cutoff.clone());
            return cutoff;
        }

        alpha = alpha.max(stand_pat);
        let mut best_result = SearchResult::leaf(stand_pat);

        let mut forcing = movegen::forcing_moves(position);
        if let Some(hinted) = hint {
            if let Some(idx) = forcing.iter().position(|m| *m == hinted) {
                forcing.remove(idx);
            }
            forcing.insert(0, hinted);
        }

        for mv in forcing {
            position.make_move(mv);
            let n = self
                .quiescence(position, -beta, -alpha, -color_sign)
                .negate()
                .prepend(mv);
            position.unmake_move(mv);

            if n.score >= beta {
                let cutoff = SearchResult { score: beta, variation: vec![mv] };
                self.tt.insert(position, 0, Bound::LowerBound, cutoff.clone());
                return cutoff;
            }
            if n.score > best_result.score {
                best_result = n;
                alpha = alpha.max(best_result.score);
            }
        }

        let bound = if best_result.score <= original_alpha {
            Bound::UpperBound
        } else {
            Bound::Exact
        };
        self.tt.insert(position, 0, bound, best_result.clone());
        best_result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::from_fen;
    use crate::info_sink::VecSink;
    use crate::types::EngineConfig;

    fn searcher() -> Searcher {
        Searcher::new(&EngineConfig::default())
    }

    #[test]
    fn test_s1_initial_position_depth_1() {
        let mut pos = Position::start_position();
        let mut sink = VecSink::new();
        let result = searcher().search(&mut pos, 1, &mut sink);
        assert_eq!(result.score, 0);
        assert_eq!(result.variation.len(), 1);
    }

    #[test]
    fn test_s2_kpk_prefers_pawn_push() {
        let mut pos = from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        let mut sink = VecSink::new();
        let result = searcher().search(&mut pos, 4, &mut sink);
        let first = result.first().unwrap().to_string();
        assert!(first == "e2e4" || first == "e2e3", "expected a pawn push, got {first}");
        assert!(result.score > 0);
    }

    #[test]
    fn test_s3_mate_in_one() {
        let mut pos = from_fen("6k1/5ppp/8/8/8/8/5PPP/R6K w - - 0 1").unwrap();
        let mut sink = VecSink::new();
        let result = searcher().search(&mut pos, 2, &mut sink);
        assert_eq!(result.first().unwrap().to_string(), "a1a8");
        assert_eq!(result.score, crate::types::SCORE_MATE);
    }

    #[test]
    fn test_s4_stalemate_returns_terminal_score() {
        let mut pos = from_fen("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1").unwrap();
        assert!(!movegen::any_move(&pos));
        let mut sink = VecSink::new();
        let result = searcher().search(&mut pos, 1, &mut sink);
        assert_eq!(result.score, 0);
        assert!(result.variation.is_empty());
    }

    #[test]
    fn test_search_determinism() {
        let mut a = Position::start_position();
        let mut b = Position::start_position();
        let mut sink_a = VecSink::new();
        let mut sink_b = VecSink::new();
        let ra = searcher().search(&mut a, 3, &mut sink_a);
        let rb = searcher().search(&mut b, 3, &mut sink_b);
        assert_eq!(ra.score, rb.score);
        assert_eq!(ra.variation, rb.variation);
    }
}

// negascout: first move gets the full (alpha, beta) window, every later
// sibling gets a null window (alpha, alpha+1) -- cheap to refute, and only
// re-searched at full width if it unexpectedly beats alpha without failing
// high. Equivalent in score to plain alpha-beta; differs only in how many
// nodes it costs to reach that score.
