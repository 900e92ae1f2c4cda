use pvsearch::board;
use pvsearch::engine::EngineState;
use pvsearch::fen::from_fen;
use pvsearch::info_sink::StdoutSink;
use pvsearch::types::EngineConfig;

/// Fixed-depth search demo: `pvsearch [fen] [depth]`. Defaults to the start
/// position and `EngineConfig::default().max_depth` when arguments are
/// omitted. Not a UCI front-end -- this crate only implements the search
/// core.
fn main() {
    env_logger::init();
    board::init();

    let mut args = std::env::args().skip(1);
    let fen = args.next();
    let depth = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(EngineConfig::default().max_depth);

    let mut engine = EngineState::new(EngineConfig::default());
    if let Some(fen) = fen {
        match from_fen(&fen) {
            Some(position) => engine.set_position(position),
            None => {
                log::error!("could not parse FEN: {fen}");
                std::process::exit(1);
            }
        }
    }

    let mut sink = StdoutSink;
    let result = engine.search(depth, &mut sink);

    let pv: String = result
        .variation
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ");
    println!("bestmove {}", result.first().map(|m| m.to_string()).unwrap_or_else(|| "(none)".to_string()));
    println!("score {}  pv {pv}", result.score);
}
