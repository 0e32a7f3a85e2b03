use crate::RunResult;
use std::path::Path;
use std::time::{Duration, Instant};

pub trait ProgressSink {
    fn start_pass(&mut self, _source: &Path, _pass: Pass) {}
    fn on_line(&mut self) {}
    fn start_output(&mut self, _index: usize, _path: &Path) {}
    fn finish_output(&mut self, _index: usize, _path: &Path, _lines: u64) {}
    fn finish(&mut self, _result: &RunResult) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pass {
    Count,
    Split,
}

impl Pass {
    pub fn label(self) -> &'static str {
        match self {
            Pass::Count => "Counting lines in",
            Pass::Split => "Splitting",
        }
    }
}

pub struct ProgressReporter {
    enabled: bool,
    total_lines: u64,
    lines_since_tick: u64,
    last_emit: Instant,
    current_output: Option<String>,
}

impl ProgressReporter {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            total_lines: 0,
            lines_since_tick: 0,
            last_emit: Instant::now(),
            current_output: None,
        }
    }

    fn current_output(&self) -> &str {
        self.current_output.as_deref().unwrap_or("source")
    }

    fn reset_tick(&mut self) {
        self.lines_since_tick = 0;
        self.last_emit = Instant::now();
    }
}

impl ProgressSink for ProgressReporter {
    fn start_pass(&mut self, source: &Path, pass: Pass) {
        if !self.enabled {
            return;
        }
        eprintln!("{} {}", pass.label(), source.display());
        self.reset_tick();
    }

    fn on_line(&mut self) {
        if !self.enabled {
            return;
        }
        self.total_lines += 1;
        self.lines_since_tick += 1;
        if self.lines_since_tick >= 100_000 || self.last_emit.elapsed() >= Duration::from_secs(2) {
            eprintln!(
                "{}: {} lines copied",
                self.current_output(),
                self.total_lines
            );
            self.reset_tick();
        }
    }

    fn start_output(&mut self, index: usize, path: &Path) {
        if !self.enabled {
            return;
        }
        self.current_output = Some(path.display().to_string());
        eprintln!("[{}] Writing {}", index, self.current_output());
        self.reset_tick();
    }

    fn finish_output(&mut self, index: usize, path: &Path, lines: u64) {
        if !self.enabled {
            return;
        }
        eprintln!("[{}] Done {} ({} lines)", index, path.display(), lines);
        self.current_output = None;
        self.reset_tick();
    }

    fn finish(&mut self, result: &RunResult) {
        if !self.enabled {
            return;
        }
        match result {
            RunResult::FilesWritten(files) => eprintln!(
                "Finished. {} file(s) written, {} lines copied.",
                files, self.total_lines
            ),
            RunResult::LineCount(lines) => eprintln!("Finished. {} lines counted.", lines),
        }
    }
}
