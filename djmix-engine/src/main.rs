//! djmix - beat-synchronized mixing from the command line
//!
//! Subcommands:
//! - `analyze`: print (or save) the analysis of one track
//! - `mix`: chain tracks with beat-aligned crossfades into one WAV file
//! - `extend`: loop one track against itself up to a target duration

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use djmix_common::config::MixSettings;
use djmix_common::human_time::{format_duration, parse_duration};
use djmix_engine::analyzer::{Analyzer, GridAnalyzer, SidecarAnalyzer};
use djmix_engine::session::{analysis_report, MixSession};
use djmix_engine::{BlendStyle, MixOptions};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Command-line arguments for djmix
#[derive(Parser, Debug)]
#[command(name = "djmix")]
#[command(about = "Beat-synchronized DJ mixing engine")]
#[command(version)]
struct Cli {
    /// Config file (TOML); defaults to $DJMIX_CONFIG or the platform config dir
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the analysis the mixer would use for a track
    Analyze {
        file: PathBuf,

        #[command(flatten)]
        analyzer: AnalyzerArgs,

        /// Print the analysis as JSON
        #[arg(long)]
        json: bool,

        /// Write the analysis next to the track as <track>.analysis.json
        #[arg(long)]
        save: bool,
    },

    /// Mix tracks in order into one file
    Mix {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        mix: MixArgs,

        /// Do not snap the mix-out point to a beat
        #[arg(long)]
        no_sync_beats: bool,

        /// Splice tracks at their own tempo
        #[arg(long)]
        no_match_tempo: bool,

        /// Skip the key compatibility check
        #[arg(long)]
        no_harmonic_mix: bool,

        /// Mix out over the last N bars instead of following song structure
        #[arg(long)]
        manual: bool,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },

    /// Loop a track against itself up to a target duration
    Extend {
        file: PathBuf,

        /// Target duration: 300, 300s, 30m or 1h
        #[arg(short, long)]
        duration: String,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,

        #[command(flatten)]
        mix: MixArgs,

        #[command(flatten)]
        analyzer: AnalyzerArgs,
    },
}

/// Where track analyses come from
#[derive(Args, Debug)]
struct AnalyzerArgs {
    /// Build a constant-tempo beat grid at this BPM instead of reading
    /// <track>.analysis.json
    #[arg(long)]
    bpm: Option<f64>,

    /// Time of the first beat in seconds (with --bpm)
    #[arg(long, default_value_t = 0.0, requires = "bpm")]
    first_beat: f64,

    /// Camelot key code such as 8A (with --bpm)
    #[arg(long, requires = "bpm")]
    key: Option<String>,
}

/// Overrides for config file settings
#[derive(Args, Debug)]
struct MixArgs {
    /// Transition style: classic, bass_swap, filter_sweep
    #[arg(long)]
    style: Option<String>,

    /// Transition length in bars
    #[arg(long)]
    bars: Option<u32>,

    /// Loudness target in dBFS RMS
    #[arg(long, allow_negative_numbers = true)]
    target_db: Option<f64>,
}

impl AnalyzerArgs {
    fn build(&self) -> Result<Box<dyn Analyzer>> {
        match self.bpm {
            Some(bpm) => Ok(Box::new(
                GridAnalyzer::new(bpm, self.first_beat, self.key.clone()).context("Invalid beat grid")?,
            )),
            None => Ok(Box::new(SidecarAnalyzer::new())),
        }
    }
}

impl MixArgs {
    fn apply(&self, settings: &mut MixSettings) {
        if let Some(style) = &self.style {
            settings.transition_style = style.clone();
        }
        if let Some(bars) = self.bars {
            settings.transition_bars = bars;
        }
        if let Some(target_db) = self.target_db {
            settings.target_db = target_db;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = MixSettings::load(cli.config.as_deref()).context("Failed to load configuration")?;

    // Initialize tracing
    let default_filter = format!(
        "djmix_engine={level},djmix_common={level},djmix={level}",
        level = settings.logging.level
    );
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Command::Analyze {
            file,
            analyzer,
            json,
            save,
        } => {
            let session = MixSession::new(MixOptions::from_settings(&settings), settings.target_db, analyzer.build()?);
            let analysis = session
                .analyze_file(&file)
                .with_context(|| format!("Failed to analyze {}", file.display()))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&analysis)?);
            } else {
                print!("{}", analysis_report(&file, &analysis));
            }

            if save {
                let sidecar = SidecarAnalyzer::sidecar_path(&file);
                analysis
                    .to_json_file(&sidecar)
                    .with_context(|| format!("Failed to write {}", sidecar.display()))?;
                info!("Saved analysis to {}", sidecar.display());
            }
        }

        Command::Mix {
            files,
            output,
            mix,
            no_sync_beats,
            no_match_tempo,
            no_harmonic_mix,
            manual,
            analyzer,
        } => {
            mix.apply(&mut settings);
            settings.sync_beats &= !no_sync_beats;
            settings.match_tempo &= !no_match_tempo;
            settings.harmonic_mix &= !no_harmonic_mix;
            settings.auto_detect &= !manual;
            settings.validate().context("Invalid mix settings")?;

            let session = build_session(&settings, analyzer.build()?);
            info!(
                "Mixing {} tracks into {} ({} bars, {})",
                files.len(),
                output.display(),
                settings.transition_bars,
                session.options.style
            );

            let report = session
                .mix_files(&files, &output)
                .with_context(|| format!("Failed to mix into {}", output.display()))?;
            print_report(&report.output, report.duration, report.splices);
        }

        Command::Extend {
            file,
            duration,
            output,
            mix,
            analyzer,
        } => {
            mix.apply(&mut settings);
            settings.validate().context("Invalid mix settings")?;
            let target = parse_duration(&duration).context("Invalid --duration")?;

            let session = build_session(&settings, analyzer.build()?);
            info!(
                "Extending {} to {} into {}",
                file.display(),
                format_duration(target),
                output.display()
            );

            let report = session
                .extend_file(&file, target, &output)
                .with_context(|| format!("Failed to extend {}", file.display()))?;
            print_report(&report.output, report.duration, report.splices);
        }
    }

    Ok(())
}

fn build_session(settings: &MixSettings, analyzer: Box<dyn Analyzer>) -> MixSession {
    let options = MixOptions::from_settings(settings);
    if options.style == BlendStyle::FilterSweep {
        info!("filter_sweep renders as a classic crossfade");
    }
    MixSession::new(options, settings.target_db, analyzer)
}

fn print_report(output: &Path, duration: f64, splices: usize) {
    println!(
        "Wrote {} ({}, {} transitions)",
        output.display(),
        format_duration(duration),
        splices
    );
}
