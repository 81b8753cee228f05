// src/consolidate/mod.rs

use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{debug, info};

use crate::process::{fill, IndexRow};

/// The consolidated table plus its distinct-value diagnostics. The distinct
/// sets exist for operator visibility only; they are never persisted.
#[derive(Debug, Default)]
pub struct Dataset {
    pub rows: Vec<IndexRow>,
    pub dates: BTreeSet<NaiveDate>,
    pub sectors: BTreeSet<String>,
}

/// Concatenate per-file tables in processing order and repair gaps across
/// file boundaries.
///
/// The per-file pass cannot see across files, so the same forward-fill fold
/// runs once more over the full sequence with a fresh accumulator: a file
/// whose leading rows were absent picks up the last present value of an
/// earlier file. Gaps before the first present value anywhere stay absent.
pub fn consolidate(tables: Vec<Vec<IndexRow>>) -> Dataset {
    let mut rows: Vec<IndexRow> = tables.into_iter().flatten().collect();

    let mut state = fill::FillState::default();
    fill::fill_forward(&mut rows, &mut state);

    let mut dataset = Dataset {
        rows,
        ..Dataset::default()
    };
    for row in &dataset.rows {
        if let Some(date) = row.date {
            dataset.dates.insert(date);
        }
        if let Some(setor) = &row.setor {
            dataset.sectors.insert(setor.clone());
        }
    }

    info!(
        rows = dataset.rows.len(),
        dates = dataset.dates.len(),
        sectors = dataset.sectors.len(),
        "consolidated"
    );
    debug!(?dataset.dates, ?dataset.sectors, "distinct resolved values");
    dataset
}
