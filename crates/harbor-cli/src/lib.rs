//! Conversion-run plumbing for the `harbor` binary.
//!
//! Wraps the core merge session with the directory bookkeeping the capture
//! workflow expects: scan an input directory for `.har` captures, fold them
//! into the environment document at the output path, delete the captures
//! that were folded, and write the document once at the end.

use anyhow::{Context, Result};
use harbor_core::capture::CaptureDocument;
use harbor_core::environment::Environment;
use harbor_core::{FoldStats, MergeSession};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Options for one conversion run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory scanned (non-recursively) for `.har` capture files.
    pub input_dir: PathBuf,
    /// Environment document to create or merge into.
    pub output_file: PathBuf,
    /// Leave processed capture files in place instead of deleting them.
    pub keep_inputs: bool,
}

/// Per-file outcome for the console report.
#[derive(Debug, Clone)]
pub enum FileOutcome {
    /// File parsed and folded into the environment.
    Folded { file: PathBuf, stats: FoldStats },
    /// File could not be read or parsed; left in place.
    Failed { file: PathBuf, reason: String },
}

/// Result of a conversion run.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub files: Vec<FileOutcome>,
    pub totals: FoldStats,
    /// Routes in the document after the run.
    pub route_count: usize,
}

impl RunReport {
    pub fn failed_files(&self) -> usize {
        self.files
            .iter()
            .filter(|outcome| matches!(outcome, FileOutcome::Failed { .. }))
            .count()
    }
}

/// Collect capture files from the input directory, sorted for a
/// deterministic processing order.
pub fn collect_capture_files(dir: &Path) -> Vec<PathBuf> {
    let mut files = Vec::new();
    if let Ok(entries) = fs::read_dir(dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_file() && path.extension().is_some_and(|ext| ext == "har") {
                files.push(path);
            }
        }
    }
    files.sort();
    files
}

/// Execute a conversion run.
///
/// Only an unreadable environment document or a failed final write is
/// fatal. Capture files that fail to parse are reported, left on disk, and
/// the batch continues; the environment is written even when the input
/// directory is empty, so a migration-only run still lands.
pub fn run(options: &RunOptions) -> Result<RunReport> {
    let env = if options.output_file.exists() {
        Environment::from_file(&options.output_file).with_context(|| {
            format!(
                "failed to load environment {}",
                options.output_file.display()
            )
        })?
    } else {
        Environment::skeleton()
    };

    let mut session = MergeSession::new(env);
    let mut report = RunReport::default();

    for file in collect_capture_files(&options.input_dir) {
        match CaptureDocument::from_file(&file) {
            Ok(doc) => {
                let stats = session.fold_document(&doc);
                info!(
                    "processed {}: {} merged, {} skipped",
                    file.display(),
                    stats.entries_merged(),
                    stats.entries_skipped()
                );
                report.totals.absorb(stats);
                if !options.keep_inputs {
                    if let Err(e) = fs::remove_file(&file) {
                        warn!("could not delete {}: {e}", file.display());
                    }
                }
                report.files.push(FileOutcome::Folded { file, stats });
            }
            Err(e) => {
                warn!("skipping {}: {e}", file.display());
                report.files.push(FileOutcome::Failed {
                    file,
                    reason: e.to_string(),
                });
            }
        }
    }

    let env = session.finish();
    report.route_count = env.routes.len();
    env.to_file(&options.output_file).with_context(|| {
        format!(
            "failed to write environment {}",
            options.output_file.display()
        )
    })?;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const CAPTURE: &str = r#"{
        "log": {
            "entries": [{
                "request": {
                    "method": "GET",
                    "url": "https://api.example.com/items?type=book",
                    "queryString": [{"name": "type", "value": "book"}]
                },
                "response": {
                    "status": 200,
                    "headers": [{"name": "Content-Type", "value": "application/json"}],
                    "content": {"mimeType": "application/json", "text": "{\"id\":1}"}
                }
            }]
        }
    }"#;

    fn options(root: &Path) -> RunOptions {
        RunOptions {
            input_dir: root.join("input"),
            output_file: root.join("output/mockoon.json"),
            keep_inputs: false,
        }
    }

    #[test]
    fn test_run_creates_environment_and_deletes_input() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        fs::create_dir_all(&options.input_dir).unwrap();
        let capture_file = options.input_dir.join("session.har");
        fs::write(&capture_file, CAPTURE).unwrap();

        let report = run(&options).unwrap();
        assert_eq!(report.totals.routes_created, 1);
        assert_eq!(report.route_count, 1);
        assert_eq!(report.failed_files(), 0);
        assert!(!capture_file.exists());

        let env = Environment::from_file(&options.output_file).unwrap();
        assert_eq!(env.routes.len(), 1);
        assert_eq!(env.routes[0].endpoint, "items");
    }

    #[test]
    fn test_keep_inputs_leaves_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut options = options(dir.path());
        options.keep_inputs = true;
        fs::create_dir_all(&options.input_dir).unwrap();
        let capture_file = options.input_dir.join("session.har");
        fs::write(&capture_file, CAPTURE).unwrap();

        run(&options).unwrap();
        assert!(capture_file.exists());
    }

    #[test]
    fn test_malformed_capture_reported_and_kept() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        fs::create_dir_all(&options.input_dir).unwrap();
        let bad = options.input_dir.join("broken.har");
        fs::write(&bad, "not json").unwrap();
        fs::write(options.input_dir.join("good.har"), CAPTURE).unwrap();

        let report = run(&options).unwrap();
        assert_eq!(report.failed_files(), 1);
        assert_eq!(report.totals.routes_created, 1);
        // failed files are never deleted
        assert!(bad.exists());
    }

    #[test]
    fn test_empty_input_still_writes_environment() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());

        let report = run(&options).unwrap();
        assert!(report.files.is_empty());
        assert!(options.output_file.exists());
    }

    #[test]
    fn test_second_run_merges_into_existing_document() {
        let dir = tempfile::tempdir().unwrap();
        let options = options(dir.path());
        fs::create_dir_all(&options.input_dir).unwrap();
        fs::write(options.input_dir.join("first.har"), CAPTURE).unwrap();
        run(&options).unwrap();

        // same capture again: folded as a duplicate, not a new variant
        fs::write(options.input_dir.join("second.har"), CAPTURE).unwrap();
        let report = run(&options).unwrap();
        assert_eq!(report.totals.duplicates_skipped, 1);

        let env = Environment::from_file(&options.output_file).unwrap();
        assert_eq!(env.routes.len(), 1);
        assert_eq!(env.routes[0].responses.len(), 1);
    }

    #[test]
    fn test_collect_sorts_and_filters() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("b.har"), "{}").unwrap();
        fs::write(dir.path().join("a.har"), "{}").unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let files = collect_capture_files(dir.path());
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["a.har", "b.har"]);
    }
}
