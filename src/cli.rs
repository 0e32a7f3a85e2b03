use clap::Parser;
use line_splitter::SplitConfig;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "line-splitter",
    version,
    about = "Splits a text file into numbered files of at most N lines each.",
    disable_help_flag = true,
    allow_negative_numbers = true
)]
pub struct Cli {
    #[arg(
        short = 'i',
        value_name = "FILE",
        help = "File to be split"
    )]
    pub source: Option<PathBuf>,

    #[arg(
        short = 'l',
        value_name = "LINES",
        default_value_t = 0,
        help = "Maximum lines per output file"
    )]
    pub max_lines: i64,

    #[arg(
        short = 'o',
        value_name = "FILE",
        help = "Destination file name; a counter is inserted before the extension"
    )]
    pub destination: Option<PathBuf>,

    #[arg(
        short = 'm',
        value_name = "FILES",
        default_value_t = 0,
        help = "Maximum number of files to be output (0 for all)"
    )]
    pub max_files: i64,

    #[arg(short = 'e', help = "Split the file evenly over the -m number of files")]
    pub even_split: bool,

    #[arg(
        short = 'h',
        help = "Repeat the first line of the source at the top of every output file"
    )]
    pub repeat_header: bool,

    #[arg(short = 'c', help = "Only count the lines in the source file")]
    pub count_only: bool,

    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress progress messages",
        action = clap::ArgAction::SetTrue
    )]
    pub quiet: bool,

    #[arg(long = "help", action = clap::ArgAction::Help, help = "Print help")]
    help: Option<bool>,
}

impl Cli {
    pub fn into_config(self) -> SplitConfig {
        SplitConfig {
            source: self.source.unwrap_or_default(),
            destination: self.destination.unwrap_or_default(),
            max_lines: self.max_lines,
            max_files: self.max_files,
            even_split: self.even_split,
            repeat_header: self.repeat_header,
            count_only: self.count_only,
            quiet: self.quiet,
        }
    }
}
