mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use bandscope::config::{self, Config};
use bandscope::replay;
use bandscope::{AggregationPlan, EqualizerBandSpec, Session, StaleBandPolicy};
use cli::{Cli, Command};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let cfg = resolve_config(&cli);

    let mut session = Session::from_config(&cfg).context("Failed to set up equalizer session")?;

    match &cli.command {
        Command::Plan { json } => print_plan(&session, *json),
        Command::Replay { input, output } => run_replay(&mut session, input, output.as_deref()),
    }
}

/// Config file values, with any CLI overrides applied on top.
fn resolve_config(cli: &Cli) -> Config {
    let mut cfg = match config::find_config(cli.config.as_deref()) {
        Some(path) => match config::load_config(&path) {
            Ok(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            Err(err) => {
                log::warn!("Failed to load config from {}: {:#}", path.display(), err);
                Config::default()
            }
        },
        None => Config::default(),
    };

    if let Some(v) = cli.start_frequency { cfg.equalizer.start_frequency = v; }
    if let Some(v) = cli.band_count { cfg.equalizer.band_count = v; }
    if let Some(v) = cli.raw_bins { cfg.spectrum.bands = v; }
    if let Some(v) = cli.smoothing { cfg.levels.smoothing = v; }
    if cli.retain_stale { cfg.levels.stale_bands = StaleBandPolicy::Retain; }

    cfg
}

#[derive(Serialize)]
struct PlanReport<'a> {
    bands: &'a [EqualizerBandSpec],
    plan: &'a AggregationPlan,
}

fn print_plan(session: &Session, json: bool) -> Result<()> {
    let bands = session.bands();
    let plan = session.plan();

    if json {
        println!("{}", serde_json::to_string_pretty(&PlanReport { bands, plan })?);
        return Ok(());
    }

    println!("{:<10} {:>10} {:>10} {:>8} {:>6} {:>8}", "band", "center", "width", "gain", "bins", "divisor");
    for (i, band) in bands.iter().enumerate() {
        println!(
            "{:<10} {:>10.1} {:>10.1} {:>8.2} {:>6} {:>8.2}",
            band.label(),
            band.center_frequency,
            band.bandwidth,
            band.initial_gain,
            plan.bucket_counts[i],
            plan.norm_divisors[i],
        );
    }
    let dropped = plan.raw_bin_count - plan.assigned_bins();
    if dropped > 0 {
        println!("{} of {} analyzer bins fall above the last band and are ignored", dropped, plan.raw_bin_count);
    }
    Ok(())
}

fn run_replay(session: &mut Session, input: &Path, output: Option<&Path>) -> Result<()> {
    let file = File::open(input)
        .with_context(|| format!("Failed to open frame capture: {}", input.display()))?;
    let frames = replay::read_frames(
        BufReader::new(file),
        session.noise_floor_db(),
        session.interval(),
    )?;
    log::info!("Replaying {} frames from {}", frames.len(), input.display());

    let (mut writer, pb): (Box<dyn Write>, ProgressBar) = match output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            let pb = ProgressBar::new(frames.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} frames")?
                    .progress_chars("=>-"),
            );
            (Box::new(BufWriter::new(file)), pb)
        }
        None => (Box::new(BufWriter::new(io::stdout().lock())), ProgressBar::hidden()),
    };

    for (idx, frame) in frames.iter().enumerate() {
        let levels = match session.process(frame) {
            Ok(levels) => levels,
            Err(err) => {
                log::warn!("Frame {} (t={:.3}s) rejected", idx + 1, frame.timestamp);
                return Err(err).with_context(|| format!("Failed to aggregate frame {}", idx + 1));
            }
        };
        replay::write_levels(&mut writer, frame.timestamp, &levels)?;
        pb.inc(1);
    }

    writer.flush()?;
    pb.finish_with_message("Replay complete");

    if let Some(path) = output {
        log::info!("Done! Output: {}", path.display());
    }
    Ok(())
}
