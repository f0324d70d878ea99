mod config;
mod output;

use config::NodecompatConfig;

use anyhow::{Context, Result};
use clap::Parser;
use nodecompat_manifest::{analyze, AnalysisOptions, Report};
use nodecompat_semver::AggregationMode;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "nodecompat")]
#[command(version)]
#[command(about = "Determine the Node.js versions a project and its dependencies can run on")]
struct Args {
    /// Path to the project directory
    #[arg(short = 'p', long, default_value = ".")]
    project_path: PathBuf,

    /// Output results in JSON format
    #[arg(long)]
    json: bool,

    /// Exclude devDependencies from analysis
    #[arg(long)]
    no_dev: bool,

    /// Keep OR-alternatives apart instead of collapsing them
    #[arg(long)]
    disjoint: bool,

    /// Show every participant and more logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Options from nodecompat.toml, then command-line flags on top
fn build_options(args: &Args, project_dir: PathBuf) -> Result<AnalysisOptions> {
    let mut options = AnalysisOptions::new(project_dir);

    if let Some(config) = NodecompatConfig::load(&options.project_dir)? {
        config.apply(&mut options);
    }

    if args.no_dev {
        options.exclude_dev = true;
    }
    if args.disjoint {
        options.mode = AggregationMode::Disjoint;
    }

    Ok(options)
}

fn run() -> Result<u8> {
    let args = Args::parse();
    init_logging(args.verbose);

    let project_dir = args
        .project_path
        .canonicalize()
        .with_context(|| format!("Project directory not found: {}", args.project_path.display()))?;
    let options = build_options(&args, project_dir)?;
    log::debug!("Analysis options: {:?}", options);

    let analysis = analyze(&options)
        .with_context(|| format!("Failed to analyze {}", options.project_dir.display()))?;

    if args.json {
        let report = Report::from(analysis.result());
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", output::render(&analysis, args.verbose));
    }

    Ok(if analysis.is_conflict() { 1 } else { 0 })
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("Error: {}", e);
            for cause in e.chain().skip(1) {
                eprintln!("  Caused by: {}", cause);
            }
            ExitCode::from(2)
        }
    }
}
