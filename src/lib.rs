pub mod config;
pub mod error;
mod lines;
mod naming;
mod output;
pub mod progress;
mod splitter;

pub use config::SplitConfig;
pub use error::{ConfigError, ErrorKind, SplitError};
pub use lines::{count_lines, read_header};
pub use naming::increment_filename;
pub use progress::{ProgressReporter, ProgressSink};
pub use splitter::ChunkPlan;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunResult {
    FilesWritten(usize),
    LineCount(u64),
}

pub fn run(config: &SplitConfig) -> Result<RunResult, SplitError> {
    let mut progress = ProgressReporter::new(!config.quiet);
    run_with_progress(config, &mut progress)
}

pub fn run_with_progress(
    config: &SplitConfig,
    progress: &mut dyn ProgressSink,
) -> Result<RunResult, SplitError> {
    config.validate()?;
    let result = splitter::Splitter::new(config).run(progress)?;
    progress.finish(&result);
    Ok(result)
}
