use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[clap(version, about, long_about = None, arg_required_else_help(true))]
pub struct Cli {
    /// Preprocessed C translation units to check
    #[clap(required = true)]
    pub files: Vec<PathBuf>,

    #[clap(long, default_value_t = 100, help = "Stop after this many errors")]
    pub max_errors: usize,

    #[clap(short, long, help = "Suppress progress output")]
    pub quiet: bool,
}
