// src/progress.rs
/// Lightweight progress reporting used by long-running operations (scrape polling).
/// Frontends (GUI/CLI) implement this to surface status to users.
pub trait Progress {
    /// Called at the start with the total number of attempts (if known).
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// Called after each attempt; `done` counts attempts so far.
    fn step(&mut self, _done: usize) {}

    /// Called at the end, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}

/// Collects status lines; handy for headless callers.
#[derive(Default, Debug)]
pub struct LineProgress {
    pub lines: Vec<String>,
    pub steps: usize,
}

impl Progress for LineProgress {
    fn log(&mut self, msg: &str) {
        self.lines.push(s!(msg));
    }
    fn step(&mut self, done: usize) {
        self.steps = done;
    }
}
