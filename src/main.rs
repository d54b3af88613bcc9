//! CLI entry point for the stippled dot rasterizer

use clap::Parser;
use dotraster::io::cli::{Cli, FileProcessor};

fn main() -> dotraster::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();
    let mut processor = FileProcessor::new(cli);
    processor.process()
}
