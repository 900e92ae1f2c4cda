use crate::board::{self, Position};
use crate::info_sink::InfoSink;
use crate::search_result::SearchResult;
use crate::searcher::Searcher;
use crate::types::EngineConfig;

/// Top-level handle a front-end drives: holds the position under
/// consideration plus the searcher's persistent state (transposition table,
/// killer history). `set_position` replaces the position wholesale; `search`
/// runs iterative deepening against it.
pub struct EngineState {
    position: Position,
    searcher: Searcher,
}

impl EngineState {
    pub fn new(config: EngineConfig) -> EngineState {
        board::init();
        EngineState {
            position: Position::start_position(),
            searcher: Searcher::new(&config),
        }
    }

    pub fn set_position(&mut self, position: Position) {
        self.position = position;
    }

    pub fn position(&self) -> &Position {
        &self.position
    }

    pub fn search(&mut self, depth: u8, sink: &mut dyn InfoSink) -> SearchResult {
        self.searcher.search(&mut self.position, depth, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen::from_fen;
    use crate::info_sink::VecSink;

    #[test]
    fn test_default_position_searches_without_panic() {
        let mut engine = EngineState::new(EngineConfig::default());
        let mut sink = VecSink::new();
        let result = engine.search(2, &mut sink);
        assert!(!result.variation.is_empty());
    }

    #[test]
    fn test_set_position_replaces_board() {
        let mut engine = EngineState::new(EngineConfig::default());
        let custom = from_fen("4k3/8/8/8/8/8/4P3/4K3 w - - 0 1").unwrap();
        engine.set_position(custom.clone());
        assert_eq!(*engine.position(), custom);
    }
}
