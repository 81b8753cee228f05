// src/pipeline.rs

use anyhow::Result;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::PathBuf;
use tracing::{error, info, warn};

use crate::process::{self, normalize, FileOutcome};
use crate::schema::{RejectReason, RejectedFile};
use crate::{consolidate, discover, store};

/// Everything one invocation needs. There is no module-level configuration:
/// callers build a config and hand it to [`run`].
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Glob pattern the daily composition files are discovered under.
    pub input_pattern: String,
    /// The append-only consolidated dataset.
    pub output_path: PathBuf,
    /// Sector canonical map, (variant, canonical) pairs applied in order.
    pub sector_map: Vec<(String, String)>,
}

impl PipelineConfig {
    /// Config with the built-in sector canonical map.
    pub fn new(input_pattern: impl Into<String>, output_path: impl Into<PathBuf>) -> Self {
        PipelineConfig {
            input_pattern: input_pattern.into(),
            output_path: output_path.into(),
            sector_map: normalize::default_sector_map(),
        }
    }
}

/// What one invocation did, for logging and for tests.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub accepted: Vec<PathBuf>,
    pub rejected: Vec<RejectedFile>,
    pub rows_written: usize,
    pub dates: BTreeSet<NaiveDate>,
    pub sectors: BTreeSet<String>,
}

/// One synchronous pass: discover → per file {parse, validate, normalize} →
/// consolidate → append.
///
/// Per-file problems are recorded on the summary and never abort the run;
/// only a failure to write the output dataset surfaces as an error. With no
/// accepted rows the writer is skipped and the output file is left exactly
/// as found.
pub fn run(config: &PipelineConfig) -> Result<RunSummary> {
    // 1) discover input files; sort so runs don't depend on OS listing order
    let mut files = discover::matching_files(&config.input_pattern)?;
    files.sort();
    info!(
        pattern = %config.input_pattern,
        files = files.len(),
        "discovered input files"
    );

    // 2) per file: parse, validate, normalize
    let mut summary = RunSummary::default();
    let mut tables = Vec::with_capacity(files.len());
    for path in files {
        match process::load_index_file(&path) {
            Ok(FileOutcome::Accepted(raw)) => {
                tables.push(process::normalize_table(raw, &config.sector_map));
                summary.accepted.push(path);
            }
            Ok(FileOutcome::Rejected { missing }) => {
                warn!(path = %path.display(), ?missing, "schema mismatch; file skipped");
                summary.rejected.push(RejectedFile {
                    path,
                    reason: RejectReason::MissingColumns(missing),
                });
            }
            Err(err) => {
                error!(path = %path.display(), err = %format!("{err:#}"), "file skipped");
                summary.rejected.push(RejectedFile {
                    path,
                    reason: RejectReason::Unreadable(format!("{err:#}")),
                });
            }
        }
    }

    // 3) consolidate across file boundaries
    let dataset = consolidate::consolidate(tables);

    // 4) append to the output dataset
    store::append_rows(&config.output_path, &dataset.rows)?;

    summary.rows_written = dataset.rows.len();
    summary.dates = dataset.dates;
    summary.sectors = dataset.sectors;
    Ok(summary)
}
