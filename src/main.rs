// Tue Jan 13 2026 - Alex

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Instant;
use testcase_registry::{
    config::Config,
    orchestration::{DiscoveryReport, RegistryCoordinator},
    utils::logging,
};

#[derive(Parser, Debug)]
#[command(author = "Alex")]
#[command(version = "1.0.0")]
#[command(about = "Builds the test case registry from a directory of unit files", long_about = None)]
struct Args {
    /// Directory scanned for unit files
    root: PathBuf,

    /// Output file, implies --write
    #[arg(short, long)]
    output: Option<PathBuf>,

    #[arg(short, long)]
    write: bool,

    /// JSON config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    suffix: Option<String>,

    #[arg(long)]
    entry_point: Option<String>,

    #[arg(long)]
    no_recursive: bool,

    #[arg(long)]
    threads: Option<usize>,

    #[arg(long)]
    sequential: bool,

    #[arg(long)]
    show_skipped: bool,

    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[arg(short, long)]
    quiet: bool,
}

fn main() {
    let args = Args::parse();
    logging::init_logger(args.verbose, args.quiet);

    if let Err(e) = run(&args) {
        eprintln!("{} {:#}", "[!]".red(), e);
        std::process::exit(1);
    }
}

fn run(args: &Args) -> anyhow::Result<()> {
    let config = build_config(args)?;
    let write_to_file = args.write || args.output.is_some();

    if !args.quiet {
        eprintln!("{}", "Test Case Registry Builder".cyan().bold());
        eprintln!("{}", "=".repeat(50).cyan());
        eprintln!("{} Scanning {}", "[*]".blue(), config.root.display());
    }

    let start_time = Instant::now();

    let mut coordinator = RegistryCoordinator::new(config).context("invalid configuration")?;
    if !args.quiet {
        coordinator = coordinator.with_progress(create_progress_bar()?);
    }

    let report = coordinator.discover(write_to_file).context("registry build failed")?;

    if let Some(document) = &report.document {
        print!("{}", document);
    }

    if !args.quiet {
        print_summary(&report, start_time);
    }
    if args.show_skipped {
        print_skipped(&report);
    }

    Ok(())
}

fn build_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::new(),
    };

    config = config.with_root(&args.root);

    if let Some(output) = &args.output {
        config = config.with_output_file(output);
    }
    if let Some(suffix) = &args.suffix {
        config = config.with_unit_suffix(suffix);
    }
    if let Some(entry_point) = &args.entry_point {
        config = config.with_entry_point(entry_point);
    }
    if let Some(threads) = args.threads {
        config = config.with_max_threads(threads);
    }
    if args.no_recursive {
        config = config.with_recursive(false);
    }
    if args.sequential {
        config = config.with_parallel_loading(false);
    }

    Ok(config)
}

fn create_progress_bar() -> anyhow::Result<ProgressBar> {
    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} units")
            .context("invalid progress template")?
            .progress_chars("#>-"),
    );
    Ok(pb)
}

fn print_summary(report: &DiscoveryReport, start_time: Instant) {
    let summary = &report.summary;

    eprintln!("{} {}", "[+]".green(), summary.display());
    match &report.written_to {
        Some(path) => eprintln!("{} Registry written to {}", "[+]".green(), path.display()),
        None if report.document.is_none() => {
            eprintln!("{} No units retained, nothing written", "[-]".yellow())
        }
        None => {}
    }
    if summary.failed > 0 {
        eprintln!(
            "{} {} units failed to load (use --show-skipped for details)",
            "[!]".yellow(),
            summary.failed
        );
    }
    eprintln!(
        "{} Completed in {:.2}s",
        "[*]".blue(),
        start_time.elapsed().as_secs_f64()
    );
}

fn print_skipped(report: &DiscoveryReport) {
    for skipped in &report.skipped {
        let marker = if skipped.reason.is_error() {
            "[!]".red()
        } else {
            "[-]".dimmed()
        };
        eprintln!(
            "{} {} ({}): {}",
            marker,
            skipped.unit.id,
            skipped.unit.path().display(),
            skipped.reason
        );
    }
}
