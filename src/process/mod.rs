// src/process/mod.rs

pub mod date_parser;
pub mod fill;
pub mod normalize;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::schema;

/// One record exactly as it appears in a daily composition file. Every field
/// is text; the source omits `date` and `setor` on rows that repeat the
/// previous value.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub setor: String,
    pub codigo: String,
    pub acao: String,
    pub tipo: String,
    pub qtde_teorica: String,
    pub part_percent: String,
    pub part_acum_percent: String,
}

/// A record after date resolution and sector cleanup. `None` marks a value
/// the source omitted and no earlier row has supplied yet.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndexRow {
    pub date: Option<NaiveDate>,
    pub setor: Option<String>,
    pub codigo: String,
    pub acao: String,
    pub tipo: String,
    pub qtde_teorica: String,
    pub part_percent: String,
    pub part_acum_percent: String,
}

impl IndexRow {
    fn from_raw(raw: RawRow) -> Self {
        IndexRow {
            date: date_parser::parse_trading_date(&raw.date),
            setor: non_empty(raw.setor),
            codigo: raw.codigo,
            acao: raw.acao,
            tipo: raw.tipo,
            qtde_teorica: raw.qtde_teorica,
            part_percent: raw.part_percent,
            part_acum_percent: raw.part_acum_percent,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Outcome of loading one discovered file.
#[derive(Debug)]
pub enum FileOutcome {
    Accepted(Vec<RawRow>),
    Rejected { missing: Vec<&'static str> },
}

/// Parse one `;`-delimited composition file and validate its header.
///
/// A header missing required columns yields `Rejected` with the absent names;
/// I/O and CSV body errors surface as `Err` so the caller can record the file
/// as unreadable. Neither aborts the run.
pub fn load_index_file(path: &Path) -> Result<FileOutcome> {
    let mut rdr = ReaderBuilder::new()
        .delimiter(b';')
        .from_path(path)
        .with_context(|| format!("opening {}", path.display()))?;

    let headers = rdr
        .headers()
        .with_context(|| format!("reading header of {}", path.display()))?;
    let missing = schema::missing_columns(headers.iter());
    if !missing.is_empty() {
        return Ok(FileOutcome::Rejected { missing });
    }

    let mut rows = Vec::new();
    for (idx, record) in rdr.deserialize::<RawRow>().enumerate() {
        let row = record
            .with_context(|| format!("parse error in {} at record {}", path.display(), idx))?;
        rows.push(row);
    }
    debug!(path = %path.display(), rows = rows.len(), "loaded");
    Ok(FileOutcome::Accepted(rows))
}

/// Turn one accepted file's rows into normalized rows: resolve dates, repair
/// gaps within the file, then clean and canonicalize sector labels.
///
/// Rows whose gaps have no preceding value in this file stay absent here; the
/// consolidation pass repairs them from earlier files where possible.
pub fn normalize_table(raw: Vec<RawRow>, sector_map: &[(String, String)]) -> Vec<IndexRow> {
    let mut rows: Vec<IndexRow> = raw.into_iter().map(IndexRow::from_raw).collect();

    let mut state = fill::FillState::default();
    fill::fill_forward(&mut rows, &mut state);

    for row in &mut rows {
        if let Some(setor) = row.setor.take() {
            let normalized = normalize::normalize_sector(&setor);
            row.setor = Some(normalize::canonicalize_sector(&normalized, sector_map));
        }
    }
    rows
}
