use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use camino::Utf8PathBuf;
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::cli::Cli;
use crate::config::{self, RecodeConfig};
use crate::recode::{self, ConvertOptions, Outcome};

const SEPARATOR_WIDTH: usize = 40;

/// Counters aggregated over one conversion pass.
#[derive(Debug, Default, Eq, PartialEq)]
pub struct RunStats {
    pub scanned: usize,
    pub converted: usize,
    pub unchanged: usize,
    pub failed: usize,
    pub skipped: usize,
}

pub fn run(cli: Cli) -> Result<()> {
    let explicit = match &cli.config {
        Some(path) => Some(
            Utf8PathBuf::from_path_buf(path.clone())
                .map_err(|_| anyhow!("config path must be valid UTF-8"))?,
        ),
        None => None,
    };
    let cfg = config::load(explicit.as_deref())?;
    let opts = ConvertOptions {
        extensions: cfg.extensions(),
        dry_run: cli.dry_run,
    };
    debug!("recognized extensions: {:?}", opts.extensions);

    let target = match cli.path {
        Some(path) => path,
        None => {
            let Some(line) = prompt("Path to convert: ")? else {
                println!("Input cancelled.");
                return Ok(());
            };
            let line = line.trim();
            if line.is_empty() {
                println!("Input cancelled.");
                return Ok(());
            }
            PathBuf::from(line)
        }
    };

    let stats = process(&target, &cfg, &opts);
    print_summary(&stats, cli.dry_run);
    Ok(())
}

/// Convert `target`, a file or a directory tree, reporting per-file
/// outcomes on stdout. Path-level misses are printed, and per-file errors
/// only surface in the counters; nothing here aborts a run.
pub fn process(target: &Path, cfg: &RecodeConfig, opts: &ConvertOptions) -> RunStats {
    let mut stats = RunStats::default();
    if target.is_dir() {
        walk(target, cfg, opts, &mut stats);
    } else if target.is_file() {
        record(convert_and_report(target, opts), &mut stats);
    } else {
        println!("{}: no such file or directory", target.display());
    }
    stats
}

fn walk(root: &Path, cfg: &RecodeConfig, opts: &ConvertOptions, stats: &mut RunStats) {
    let ignore_hidden = cfg.ignore_hidden();
    let entries = WalkDir::new(root)
        .follow_links(cfg.follow_links())
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !(ignore_hidden && is_hidden(entry)));

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!("skipping unreadable entry under {}: {}", root.display(), err);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        record(convert_and_report(entry.path(), opts), stats);
    }
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}

fn convert_and_report(path: &Path, opts: &ConvertOptions) -> Outcome {
    let outcome = recode::convert_file(path, opts);
    report(path, &outcome);
    outcome
}

/// One stdout line per non-skip outcome, then the separator rule.
fn report(path: &Path, outcome: &Outcome) {
    let display = path.display();
    match outcome {
        Outcome::Skipped => return,
        Outcome::AlreadyCanonical {
            encoding: Some(label),
        } => println!("{}: already {}", display, label),
        Outcome::AlreadyCanonical { encoding: None } => {
            println!("{}: encoding undetected; left unchanged", display);
        }
        Outcome::Converted { from } => println!("{}: converted from {}", display, from),
        Outcome::WouldConvert { from } => {
            println!("{}: would convert from {} (dry-run)", display, from);
        }
        Outcome::Failed(err) => println!("{}: ERROR: {}", display, err),
    }
    println!("{}", "-".repeat(SEPARATOR_WIDTH));
}

fn record(outcome: Outcome, stats: &mut RunStats) {
    stats.scanned += 1;
    match outcome {
        Outcome::Skipped => stats.skipped += 1,
        Outcome::AlreadyCanonical { .. } => stats.unchanged += 1,
        Outcome::Converted { .. } | Outcome::WouldConvert { .. } => stats.converted += 1,
        Outcome::Failed(_) => stats.failed += 1,
    }
}

fn print_summary(stats: &RunStats, dry_run: bool) {
    let converted_label = if dry_run { "convertible" } else { "converted" };
    println!(
        "{} files scanned: {} {}, {} unchanged, {} failed, {} skipped",
        stats.scanned, stats.converted, converted_label, stats.unchanged, stats.failed,
        stats.skipped
    );
}

fn prompt(label: &str) -> Result<Option<String>> {
    print!("{}", label);
    io::Write::flush(&mut io::stdout()).with_context(|| format!("writing prompt `{label}`"))?;
    let mut buf = String::new();
    let read = io::stdin()
        .read_line(&mut buf)
        .with_context(|| format!("reading input for `{label}`"))?;
    if read == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\n', '\r']).to_owned()))
}
