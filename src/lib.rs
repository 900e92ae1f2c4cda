pub mod board;
pub mod engine;
pub mod evaluator;
pub mod fen;
pub mod info_sink;
pub mod killer;
pub mod movegen;
pub mod search_result;
pub mod searcher;
pub mod tt;
pub mod types;
