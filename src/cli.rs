use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "bandscope", about = "Equalizer band planner and spectrum level aggregator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (defaults to bandscope.toml or the user config dir)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Center frequency of the lowest band, in Hz
    #[arg(long, global = true)]
    pub start_frequency: Option<f64>,

    /// Number of equalizer bands
    #[arg(long, global = true)]
    pub band_count: Option<usize>,

    /// Number of bins the analyzer reports per frame
    #[arg(long, global = true)]
    pub raw_bins: Option<usize>,

    /// Level smoothing factor (0.0-1.0, 0 disables)
    #[arg(long, global = true)]
    pub smoothing: Option<f64>,

    /// Keep the previous value for bands no bins reach, instead of zeroing them
    #[arg(long, global = true)]
    pub retain_stale: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the equalizer bands and the bin-to-band plan
    Plan {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Run recorded analyzer frames (JSON lines) through the aggregator
    Replay {
        /// Frame capture, one JSON object per line
        input: PathBuf,

        /// Output file for levels (stdout when omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
