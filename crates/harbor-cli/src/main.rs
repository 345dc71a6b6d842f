//! Harbor capture converter CLI.
//!
//! Folds captured `.har` traffic from an input directory into a
//! rule-indexed mock environment document, merging into the document from
//! previous runs.
//!
//! Usage:
//!   harbor [OPTIONS]

use clap::Parser;
use harbor_cli::{run, FileOutcome, RunOptions, RunReport};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Harbor capture converter
#[derive(Parser, Debug)]
#[command(name = "harbor")]
#[command(
    author,
    version,
    about = "Fold captured HTTP archives into a rule-indexed mock environment"
)]
struct Args {
    /// Directory scanned for .har capture files
    #[arg(short, long, default_value = "input")]
    input: PathBuf,

    /// Environment document to create or merge into
    #[arg(short, long, default_value = "output/mockoon.json")]
    output: PathBuf,

    /// Leave processed capture files in place
    #[arg(short, long)]
    keep_inputs: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    println!("{BOLD}{CYAN}Harbor Capture Converter{RESET}");
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!("{DIM}Input:{RESET}  {CYAN}{}{RESET}", args.input.display());
    println!("{DIM}Output:{RESET} {CYAN}{}{RESET}\n", args.output.display());

    let options = RunOptions {
        input_dir: args.input.clone(),
        output_file: args.output.clone(),
        keep_inputs: args.keep_inputs,
    };

    match run(&options) {
        Ok(report) => {
            print_report(&report, &args);
            std::process::exit(0);
        }
        Err(e) => {
            eprintln!("{RED}{BOLD}Error:{RESET} {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn print_report(report: &RunReport, args: &Args) {
    if report.files.is_empty() {
        println!(
            "{YELLOW}Warning:{RESET} no capture files found in {} (migrated environment still written)",
            args.input.display()
        );
    }

    for outcome in &report.files {
        match outcome {
            FileOutcome::Folded { file, stats } => {
                let file_name = file.file_name().unwrap_or_default().to_string_lossy();
                println!(
                    "{GREEN}OK{RESET}   {BOLD}{CYAN}{file_name}{RESET} {DIM}({} merged, {} skipped){RESET}",
                    stats.entries_merged(),
                    stats.entries_skipped()
                );
            }
            FileOutcome::Failed { file, reason } => {
                let file_name = file.file_name().unwrap_or_default().to_string_lossy();
                println!("{RED}FAIL{RESET} {BOLD}{CYAN}{file_name}{RESET} {DIM}{reason}{RESET}");
            }
        }
    }

    // Summary
    let totals = &report.totals;
    println!();
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!("{BOLD}{CYAN}Summary{RESET}");
    println!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    println!(
        "  {DIM}Files processed:{RESET}   {BOLD}{}{RESET}",
        report.files.len() - report.failed_files()
    );
    if report.failed_files() > 0 {
        println!(
            "  {RED}Files failed:{RESET}      {BOLD}{RED}{}{RESET}",
            report.failed_files()
        );
    }
    println!(
        "  {DIM}Routes created:{RESET}    {BOLD}{}{RESET}",
        totals.routes_created
    );
    println!(
        "  {DIM}Responses added:{RESET}   {BOLD}{}{RESET}",
        totals.responses_added
    );
    println!(
        "  {DIM}Duplicates:{RESET}        {BOLD}{}{RESET}",
        totals.duplicates_skipped
    );
    println!(
        "  {DIM}Entries skipped:{RESET}   {BOLD}{}{RESET}",
        totals.error_status_skipped + totals.empty_body_skipped + totals.missing_response_skipped
    );
    println!(
        "  {DIM}Routes total:{RESET}      {BOLD}{}{RESET}",
        report.route_count
    );
    println!();

    if report.failed_files() == 0 {
        println!(
            "{GREEN}{BOLD}Environment written to {}{RESET}",
            args.output.display()
        );
    } else {
        println!(
            "{YELLOW}{BOLD}Environment written to {} (some capture files were skipped){RESET}",
            args.output.display()
        );
    }
}
