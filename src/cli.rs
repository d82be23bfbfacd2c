use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "qtfaststart")]
#[command(
    author,
    version,
    about = "Move the moov atom of a QuickTime movie to the front for progressive playback"
)]
pub struct Cli {
    /// Movie to read
    pub input: PathBuf,

    /// Where to write the fast-start movie
    pub output: PathBuf,

    /// Path to config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
