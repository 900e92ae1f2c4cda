/// Side channel for the root-iteration informational lines the searcher
/// emits (`info depth <d>` / `info TPC : ...`). Injected rather than a bare
/// `println!` buried in the search, so tests can capture output and a future
/// front-end can redirect it without touching the search code.
pub trait InfoSink {
    fn info(&mut self, line: &str);
}

/// Default sink: writes each line to stdout, matching the line format used
/// by the teacher's UCI output.
pub struct StdoutSink;

impl InfoSink for StdoutSink {
    fn info(&mut self, line: &str) {
        println!("{line}");
    }
}

/// In-memory sink for tests: collects every line instead of writing it.
pub struct VecSink(pub Vec<String>);

impl VecSink {
    pub fn new() -> VecSink {
        VecSink(Vec::new())
    }
}

impl Default for VecSink {
    fn default() -> Self {
        VecSink::new()
    }
}

impl InfoSink for VecSink {
    fn info(&mut self, line: &str) {
        self.0.push(line.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vec_sink_collects_lines() {
        let mut sink = VecSink::new();
        sink.info("info depth 1");
        sink.info("info depth 2");
        assert_eq!(sink.0, vec!["info depth 1", "info depth 2"]);
    }
}
