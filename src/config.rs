use crate::error::ConfigError;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub max_lines: i64,
    /// 0 means no cap on the number of output files.
    pub max_files: i64,
    pub even_split: bool,
    pub repeat_header: bool,
    pub count_only: bool,
    pub quiet: bool,
}

impl SplitConfig {
    /// Returns the first violated rule.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let source_blank = is_blank(&self.source);
        if self.count_only {
            if source_blank {
                return Err(ConfigError::BlankSource);
            }
        } else if source_blank || is_blank(&self.destination) {
            return Err(ConfigError::BlankFilenames);
        }

        if self.source == self.destination {
            return Err(ConfigError::SameFile);
        }

        if !self.count_only && !self.even_split && self.max_lines < 1 {
            return Err(ConfigError::LineCount);
        }

        if self.max_files < 0 {
            return Err(ConfigError::NegativeMaxFiles);
        }

        if self.even_split && self.max_files == 0 {
            return Err(ConfigError::EvenSplitWithoutMaxFiles);
        }

        if self.count_only && self.repeat_header {
            return Err(ConfigError::CountWithHeader);
        }

        Ok(())
    }

    pub fn file_cap(&self) -> Option<usize> {
        usize::try_from(self.max_files).ok().filter(|&n| n > 0)
    }
}

fn is_blank(path: &std::path::Path) -> bool {
    path.as_os_str().to_string_lossy().trim().is_empty()
}
