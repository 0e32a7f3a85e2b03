use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::{Builder, NamedTempFile};

/// Creates numbered output files in the destination directory. Each file is
/// staged under a temporary name and renamed into place once complete.
pub struct OutputFactory {
    dir: PathBuf,
}

impl OutputFactory {
    pub fn new(template: &Path) -> Self {
        let dir = template
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));
        Self { dir }
    }

    pub fn create(&self, target: PathBuf) -> io::Result<OutputFile> {
        let tmp = Builder::new()
            .prefix(".line_splitter_part")
            .tempfile_in(&self.dir)?;
        Ok(OutputFile {
            writer: BufWriter::new(tmp),
            target,
        })
    }
}

pub struct OutputFile {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
}

impl OutputFile {
    pub fn target(&self) -> &Path {
        &self.target
    }

    pub fn write_record(&mut self, record: &[u8]) -> io::Result<()> {
        self.writer.write_all(record)
    }

    /// Flushes and closes the file under its final name. Dropping an
    /// unfinished `OutputFile` removes the staged data.
    pub fn finish(self) -> io::Result<PathBuf> {
        let tmp = self.writer.into_inner().map_err(|err| err.into_error())?;
        tmp.persist(&self.target).map_err(|err| err.error)?;
        Ok(self.target)
    }
}
