use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use env_logger::Env;
use indicatif::{ProgressBar, ProgressStyle};
use partfinder_core::{Config, Pipeline};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "partfinder")]
#[command(about = "Look up distributor offers for a spreadsheet of component part numbers", long_about = None)]
#[command(version)]
struct Cli {
    /// Spreadsheet with a "Part No" title row and a "Reference" column (xlsx, xls, ods or csv)
    #[arg(value_name = "FILE", value_hint = clap::ValueHint::FilePath)]
    file: PathBuf,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {e}", "Error:".red());
        for cause in e.chain().skip(1) {
            eprintln!("  {cause}");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Default level is overridden by RUST_LOG
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("Invalid configuration")?;

    // Input problems abort before any network request
    let mut components = partfinder_sheet::read_components(&cli.file)?;

    let pipeline = Pipeline::with_http(config)?;
    let progress = progress_bar(components.len() as u64);
    let summary = pipeline.run(&mut components, |component| {
        progress.set_message(format!("{} ({})", component.reference, component.status));
        progress.inc(1);
    });
    progress.finish_and_clear();

    let output_dir = std::env::current_dir().context("Failed to resolve working directory")?;
    let path = partfinder_sheet::write_results(&components, &output_dir)?;

    println!(
        "{} {} of {} components available, {} offers written to {}",
        "Done:".green(),
        summary.resolved,
        summary.components,
        summary.offers,
        path.display()
    );
    if summary.unresolved > 0 || summary.discarded > 0 {
        println!(
            "  {} unresolved, {} skipped, {} rows discarded",
            summary.unresolved, summary.skipped, summary.discarded
        );
    }
    Ok(())
}

fn progress_bar(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    let style = ProgressStyle::with_template("{bar:40.cyan/blue} {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    progress.set_style(style);
    progress
}
