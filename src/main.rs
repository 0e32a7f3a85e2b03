mod cli;

use clap::{CommandFactory, Parser};
use cli::Cli;
use line_splitter::{ErrorKind, RunResult};
use std::process::ExitCode;

const EXIT_CONFIG: u8 = 1;
const EXIT_IO: u8 = 2;

fn main() -> ExitCode {
    let config = Cli::parse().into_config();

    if let Err(err) = config.validate() {
        let _ = Cli::command().print_help();
        println!();
        println!("Error: {err}");
        return ExitCode::from(EXIT_CONFIG);
    }

    println!("Source file: {}", config.source.display());
    if !config.count_only {
        println!("Destination file: {}", config.destination.display());
    }

    match line_splitter::run(&config) {
        Ok(RunResult::FilesWritten(files)) => {
            println!("Split complete. {files} files.");
            ExitCode::SUCCESS
        }
        Ok(RunResult::LineCount(lines)) => {
            println!(
                "Total lines in file {}: {lines}.",
                config.source.display()
            );
            ExitCode::SUCCESS
        }
        Err(err) => {
            let err_kind = err.kind();
            let files_written = err.files_written();
            eprintln!("Error splitting files: {:#}", anyhow::Error::new(err));
            if files_written > 0 {
                eprintln!("{files_written} file(s) were written before the failure.");
            }
            match err_kind {
                ErrorKind::Config => ExitCode::from(EXIT_CONFIG),
                ErrorKind::Io => ExitCode::from(EXIT_IO),
            }
        }
    }
}
