use crate::config::SplitConfig;
use crate::error::{IoContext, SplitError};
use crate::lines::{count_lines, read_header, read_next_record};
use crate::naming::increment_filename;
use crate::output::OutputFactory;
use crate::progress::{Pass, ProgressSink};
use crate::RunResult;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};

/// Chunk boundaries derived once per run from a validated config.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPlan {
    pub lines_per_file: u64,
    pub max_files: Option<usize>,
}

impl ChunkPlan {
    pub fn fixed(config: &SplitConfig) -> Self {
        Self {
            lines_per_file: config.max_lines.max(1) as u64,
            max_files: config.file_cap(),
        }
    }

    /// Spreads `total_lines` over `files` outputs. Every output gets at least
    /// one line and the cap never exceeds the number of lines available.
    pub fn even(total_lines: u64, files: usize) -> Self {
        let files = files.max(1);
        let lines_per_file = total_lines.div_ceil(files as u64).max(1);
        let cap = usize::try_from(total_lines.max(1)).map_or(files, |lines| files.min(lines));
        Self {
            lines_per_file,
            max_files: Some(cap),
        }
    }
}

pub struct Splitter<'a> {
    config: &'a SplitConfig,
}

impl<'a> Splitter<'a> {
    pub fn new(config: &'a SplitConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, progress: &mut dyn ProgressSink) -> Result<RunResult, SplitError> {
        let source = &self.config.source;
        let file = File::open(source)
            .io_context(0, || format!("opening source file for reading {:?}", source))?;
        let mut reader = BufReader::new(file);

        if self.config.count_only {
            progress.start_pass(source, Pass::Count);
            let total = count_lines(&mut reader)
                .io_context(0, || format!("counting lines in {:?}", source))?;
            return Ok(RunResult::LineCount(total));
        }

        let plan = if self.config.even_split {
            progress.start_pass(source, Pass::Count);
            let total = count_lines(&mut reader)
                .io_context(0, || format!("counting lines in {:?}", source))?;
            rewind(&mut reader, source)?;
            ChunkPlan::even(total, self.config.file_cap().unwrap_or(1))
        } else {
            ChunkPlan::fixed(self.config)
        };

        let header = if self.config.repeat_header {
            let header = read_header(&mut reader)
                .io_context(0, || format!("reading header line from {:?}", source))?;
            rewind(&mut reader, source)?;
            Some(header)
        } else {
            None
        };

        progress.start_pass(source, Pass::Split);
        let files = self.write_chunks(&mut reader, plan, header.as_deref(), progress)?;
        Ok(RunResult::FilesWritten(files))
    }

    fn write_chunks<R: BufRead>(
        &self,
        reader: &mut R,
        plan: ChunkPlan,
        header: Option<&[u8]>,
        progress: &mut dyn ProgressSink,
    ) -> Result<usize, SplitError> {
        let source = &self.config.source;
        let template = &self.config.destination;
        let factory = OutputFactory::new(template);

        let mut record = Vec::new();
        let mut has_next = read_next_record(reader, &mut record)
            .io_context(0, || format!("reading {:?}", source))?;
        let mut files: usize = 0;

        loop {
            // An empty source still yields one (empty) output file.
            if files > 0 && !has_next {
                break;
            }
            if plan.max_files.is_some_and(|cap| files >= cap) {
                break;
            }

            let index = files + 1;
            let path = increment_filename(template, index);
            let mut output = factory
                .create(path.clone())
                .io_context(files, || format!("creating output file {:?}", path))?;
            progress.start_output(index, output.target());

            if let Some(header) = header.filter(|_| index > 1) {
                output
                    .write_record(header)
                    .io_context(files, || format!("writing header to {:?}", path))?;
            }

            let mut written: u64 = 0;
            while has_next && written < plan.lines_per_file {
                output
                    .write_record(&record)
                    .io_context(files, || format!("writing to output file {:?}", path))?;
                written += 1;
                progress.on_line();
                has_next = read_next_record(reader, &mut record)
                    .io_context(files, || format!("reading {:?}", source))?;
            }

            output
                .finish()
                .io_context(files, || format!("closing output file {:?}", path))?;
            files = index;
            progress.finish_output(index, &path, written);
        }

        Ok(files)
    }
}

fn rewind<S: Seek>(stream: &mut S, source: &std::path::Path) -> Result<(), SplitError> {
    stream
        .seek(SeekFrom::Start(0))
        .map(|_| ())
        .io_context(0, || format!("rewinding {:?}", source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::progress::ProgressSink;
    use std::path::{Path, PathBuf};
    use tempfile::tempdir;

    struct NoopProgress;
    impl ProgressSink for NoopProgress {}

    fn build_config(source: PathBuf, destination: PathBuf, max_lines: i64) -> SplitConfig {
        SplitConfig {
            source,
            destination,
            max_lines,
            max_files: 0,
            even_split: false,
            repeat_header: false,
            count_only: false,
            quiet: true,
        }
    }

    fn numbered_lines(count: usize) -> String {
        (1..=count).map(|i| format!("line {i}\n")).collect()
    }

    fn read_outputs(dir: &Path, stem: &str, count: usize) -> Vec<String> {
        (1..=count)
            .map(|i| std::fs::read_to_string(dir.join(format!("{stem}{i}.txt"))).unwrap())
            .collect()
    }

    fn run(config: &SplitConfig) -> RunResult {
        Splitter::new(config).run(&mut NoopProgress).unwrap()
    }

    #[test]
    fn splits_into_fixed_chunks() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, numbered_lines(10)).unwrap();
        let config = build_config(input, dir.path().join("out.txt"), 4);

        assert_eq!(run(&config), RunResult::FilesWritten(3));
        let outputs = read_outputs(dir.path(), "out", 3);
        assert_eq!(outputs[0].lines().count(), 4);
        assert_eq!(outputs[1].lines().count(), 4);
        assert_eq!(outputs[2], "line 9\nline 10\n");
        assert!(!dir.path().join("out4.txt").exists());
    }

    #[test]
    fn exact_multiple_leaves_no_trailing_empty_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, numbered_lines(10)).unwrap();
        let config = build_config(input, dir.path().join("out.txt"), 5);

        assert_eq!(run(&config), RunResult::FilesWritten(2));
        assert!(!dir.path().join("out3.txt").exists());
    }

    #[test]
    fn empty_source_produces_one_empty_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, b"").unwrap();
        let config = build_config(input, dir.path().join("out.txt"), 5);

        assert_eq!(run(&config), RunResult::FilesWritten(1));
        assert_eq!(read_outputs(dir.path(), "out", 1), vec![String::new()]);
    }

    #[test]
    fn stops_at_max_files() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, numbered_lines(10)).unwrap();
        let mut config = build_config(input, dir.path().join("out.txt"), 3);
        config.max_files = 2;

        assert_eq!(run(&config), RunResult::FilesWritten(2));
        assert_eq!(read_outputs(dir.path(), "out", 2)[1], "line 4\nline 5\nline 6\n");
        assert!(!dir.path().join("out3.txt").exists());
    }

    #[test]
    fn keeps_unterminated_final_record() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, b"a\nb\nc").unwrap();
        let config = build_config(input, dir.path().join("out.txt"), 2);

        assert_eq!(run(&config), RunResult::FilesWritten(2));
        assert_eq!(read_outputs(dir.path(), "out", 2), vec!["a\nb\n", "c"]);
    }

    #[test]
    fn even_split_balances_lines() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, numbered_lines(25)).unwrap();
        let mut config = build_config(input, dir.path().join("out.txt"), 0);
        config.even_split = true;
        config.max_files = 4;

        assert_eq!(run(&config), RunResult::FilesWritten(4));
        let counts: Vec<usize> = read_outputs(dir.path(), "out", 4)
            .iter()
            .map(|s| s.lines().count())
            .collect();
        assert_eq!(counts, vec![7, 7, 7, 4]);
    }

    #[test]
    fn even_split_with_more_files_than_lines() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, numbered_lines(3)).unwrap();
        let mut config = build_config(input, dir.path().join("out.txt"), 0);
        config.even_split = true;
        config.max_files = 5;

        assert_eq!(run(&config), RunResult::FilesWritten(3));
        assert_eq!(
            read_outputs(dir.path(), "out", 3),
            vec!["line 1\n", "line 2\n", "line 3\n"]
        );
    }

    #[test]
    fn header_counts_toward_first_file_only() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        let body: String = (1..=20).map(|i| format!("row {i}\n")).collect();
        std::fs::write(&input, format!("id,name\n{body}")).unwrap();
        let mut config = build_config(input, dir.path().join("out.txt"), 5);
        config.repeat_header = true;

        assert_eq!(run(&config), RunResult::FilesWritten(5));
        let outputs = read_outputs(dir.path(), "out", 5);

        let first: Vec<&str> = outputs[0].lines().collect();
        assert_eq!(first, vec!["id,name", "row 1", "row 2", "row 3", "row 4"]);

        for later in &outputs[1..4] {
            let lines: Vec<&str> = later.lines().collect();
            assert_eq!(lines.len(), 6);
            assert_eq!(lines[0], "id,name");
            assert_eq!(lines.iter().filter(|l| **l == "id,name").count(), 1);
        }
        assert_eq!(outputs[4], "id,name\nrow 20\n");
    }

    #[test]
    fn header_repeat_on_empty_source_fails() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, b"").unwrap();
        let mut config = build_config(input, dir.path().join("out.txt"), 5);
        config.repeat_header = true;

        let err = Splitter::new(&config).run(&mut NoopProgress).unwrap_err();
        assert!(err.to_string().starts_with("reading header line"));
        assert!(!dir.path().join("out1.txt").exists());
    }

    #[test]
    fn count_only_writes_nothing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, "a\nb\nc").unwrap();
        let mut config = build_config(input, PathBuf::new(), 0);
        config.count_only = true;

        assert_eq!(run(&config), RunResult::LineCount(3));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn missing_source_is_reported() {
        let dir = tempdir().unwrap();
        let config = build_config(dir.path().join("unknown"), dir.path().join("out.txt"), 10);
        let err = Splitter::new(&config).run(&mut NoopProgress).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
        assert!(err.to_string().starts_with("opening source file for reading"));
    }

    #[test]
    fn failed_output_reports_partial_progress() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("input.txt");
        std::fs::write(&input, numbered_lines(6)).unwrap();
        // out2.txt is a directory, so renaming the second chunk into place fails.
        std::fs::create_dir(dir.path().join("out2.txt")).unwrap();
        let config = build_config(input, dir.path().join("out.txt"), 3);

        let err = Splitter::new(&config).run(&mut NoopProgress).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
        assert_eq!(err.files_written(), 1);
        assert!(dir.path().join("out1.txt").is_file());
    }

    #[test]
    fn even_plan_arithmetic() {
        assert_eq!(
            ChunkPlan::even(25, 4),
            ChunkPlan { lines_per_file: 7, max_files: Some(4) }
        );
        assert_eq!(
            ChunkPlan::even(0, 4),
            ChunkPlan { lines_per_file: 1, max_files: Some(1) }
        );
        assert_eq!(
            ChunkPlan::even(2, 3),
            ChunkPlan { lines_per_file: 1, max_files: Some(2) }
        );
    }

    mod round_trip {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(32))]

            #[test]
            fn outputs_concatenate_to_source(
                lines in proptest::collection::vec("[a-z ]{0,12}", 1..60),
                chunk in 1i64..9,
            ) {
                let dir = tempdir().unwrap();
                let input = dir.path().join("input.txt");
                let text: String = lines.iter().map(|l| format!("{l}\n")).collect();
                std::fs::write(&input, &text).unwrap();
                let config = build_config(input, dir.path().join("out.txt"), chunk);

                let expected = lines.len().div_ceil(chunk as usize);
                prop_assert_eq!(run(&config), RunResult::FilesWritten(expected));
                let joined: String = read_outputs(dir.path(), "out", expected).concat();
                prop_assert_eq!(joined, text);
            }
        }
    }
}
