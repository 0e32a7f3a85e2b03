use std::io;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("the source and destination file names cannot be blank")]
    BlankFilenames,

    #[error("the source file name cannot be blank")]
    BlankSource,

    #[error("the source and destination files must be different")]
    SameFile,

    #[error("the file cannot be split to less than 1 line per file")]
    LineCount,

    #[error("maximum file count must be zero (maximum files) or greater")]
    NegativeMaxFiles,

    #[error("maximum file count cannot be zero to split file evenly over multiple files")]
    EvenSplitWithoutMaxFiles,

    #[error("line counting cannot be combined with header repetition")]
    CountWithHeader,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Config,
    Io,
}

#[derive(Error, Debug)]
pub enum SplitError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("{context}")]
    Io {
        context: String,
        files_written: usize,
        #[source]
        source: io::Error,
    },
}

impl SplitError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SplitError::Config(_) => ErrorKind::Config,
            SplitError::Io { .. } => ErrorKind::Io,
        }
    }

    /// Output files completed before the failure.
    pub fn files_written(&self) -> usize {
        match self {
            SplitError::Config(_) => 0,
            SplitError::Io { files_written, .. } => *files_written,
        }
    }
}

/// Attaches a description and the partial file count to an I/O failure.
pub(crate) trait IoContext<T> {
    fn io_context<F>(self, files_written: usize, context: F) -> Result<T, SplitError>
    where
        F: FnOnce() -> String;
}

impl<T> IoContext<T> for io::Result<T> {
    fn io_context<F>(self, files_written: usize, context: F) -> Result<T, SplitError>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|source| SplitError::Io {
            context: context(),
            files_written,
            source,
        })
    }
}
