use crate::board::ChessMove;
use crate::types::Score;

/// Score plus principal variation, the value every `negascout`/`quiescence`
/// call returns. The three operators below are exactly the composition
/// rules a negamax-style search needs: flip perspective on the way back up
/// the tree, and grow the variation one move at a time.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SearchResult {
    pub score: Score,
    pub variation: Vec<ChessMove>,
}

impl SearchResult {
    pub fn leaf(score: Score) -> SearchResult {
        SearchResult {
            score,
            variation: Vec::new(),
        }
    }

    #[inline]
    pub fn negate(mut self) -> SearchResult {
        self.score = -self.score;
        self
    }

    #[inline]
    pub fn prepend(mut self, mv: ChessMove) -> SearchResult {
        self.variation.insert(0, mv);
        self
    }

    #[inline]
    pub fn first(&self) -> Option<ChessMove> {
        self.variation.first().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::Square;

    fn mv(src: u8, dst: u8) -> ChessMove {
        ChessMove::quiet(Square::new(src), Square::new(dst))
    }

    #[test]
    fn test_negate_flips_score_only() {
        let r = SearchResult {
            score: 37,
            variation: vec![mv(0, 1)],
        };
        let n = r.clone().negate();
        assert_eq!(n.score, -37);
        assert_eq!(n.variation, r.variation);
    }

    #[test]
    fn test_prepend_grows_front() {
        let r = SearchResult {
            score: 0,
            variation: vec![mv(8, 16)],
        };
        let r = r.prepend(mv(0, 1));
        assert_eq!(r.variation, vec![mv(0, 1), mv(8, 16)]);
    }

    #[test]
    fn test_first_of_empty_variation() {
        assert_eq!(SearchResult::leaf(0).first(), None);
    }

    #[test]
    fn test_first_returns_head() {
        let r = SearchResult {
            score: 10,
            variation: vec![mv(0, 1), mv(2, 3)],
        };
        assert_eq!(r.first(), Some(mv(0, 1)));
    }
}
