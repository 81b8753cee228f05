// src/store/mod.rs

use anyhow::{Context, Result};
use csv::WriterBuilder;
use std::fs::OpenOptions;
use std::path::Path;
use tracing::info;

use crate::process::IndexRow;
use crate::schema;

/// Append `rows` to the dataset at `path`.
///
/// On first write the file is created with the canonical header; every later
/// write appends body rows only, so the file carries exactly one header line
/// over its whole lifetime. An empty `rows` leaves the path untouched — no
/// file is created for an empty run.
///
/// No deduplication happens here: re-running the pipeline over overlapping
/// inputs appends the overlapping rows again. That is a documented limitation
/// of the dataset, not a condition this writer detects.
pub fn append_rows(path: &Path, rows: &[IndexRow]) -> Result<()> {
    if rows.is_empty() {
        info!(path = %path.display(), "empty dataset; nothing written");
        return Ok(());
    }

    let is_new = !path.exists();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening dataset {}", path.display()))?;

    let mut wtr = WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_writer(file);

    if is_new {
        wtr.write_record(schema::COLUMNS)
            .with_context(|| format!("writing header to {}", path.display()))?;
    }
    for row in rows {
        wtr.serialize(row)
            .with_context(|| format!("writing row to {}", path.display()))?;
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!(
        path = %path.display(),
        rows = rows.len(),
        created = is_new,
        "dataset written"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::fs;
    use tempfile::TempDir;

    fn row(codigo: &str) -> IndexRow {
        IndexRow {
            date: NaiveDate::from_ymd_opt(2024, 1, 2),
            setor: Some("Bens Industriais".into()),
            codigo: codigo.into(),
            acao: codigo.into(),
            tipo: "ON".into(),
            qtde_teorica: "2.105".into(),
            part_percent: "2,864".into(),
            part_acum_percent: "2,864".into(),
        }
    }

    #[test]
    fn first_write_creates_the_file_with_one_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consolidated_data.csv");

        append_rows(&path, &[row("WEGE3")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            lines[0],
            "date;setor;codigo;acao;tipo;qtde_teorica;part_percent;part_acum_percent"
        );
        assert_eq!(
            lines[1],
            "2024-01-02;Bens Industriais;WEGE3;WEGE3;ON;2.105;2,864;2,864"
        );
    }

    #[test]
    fn second_write_appends_without_a_second_header() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consolidated_data.csv");

        append_rows(&path, &[row("WEGE3")]).unwrap();
        append_rows(&path, &[row("EMBR3"), row("TUPY3")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 4);
        assert_eq!(lines.iter().filter(|l| l.starts_with("date;")).count(), 1);
        assert!(lines[2].contains("EMBR3"));
        assert!(lines[3].contains("TUPY3"));
    }

    #[test]
    fn absent_values_serialize_as_empty_fields() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consolidated_data.csv");

        let mut leading = row("PETR4");
        leading.date = None;
        leading.setor = None;
        append_rows(&path, &[leading]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().nth(1).unwrap(), ";;PETR4;PETR4;ON;2.105;2,864;2,864");
    }

    #[test]
    fn empty_dataset_creates_no_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("consolidated_data.csv");

        append_rows(&path, &[]).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn write_failure_surfaces_to_the_caller() {
        let dir = TempDir::new().unwrap();
        // The parent is a file, so the dataset path cannot be created.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "x").unwrap();
        let path = blocker.join("consolidated_data.csv");

        assert!(append_rows(&path, &[row("WEGE3")]).is_err());
    }
}
