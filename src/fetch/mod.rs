// src/fetch/mod.rs

use anyhow::{anyhow, Context, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use chrono::NaiveDate;
use csv::WriterBuilder;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use url::Url;

use crate::schema;

/// B3 index proxy. The request envelope travels base64-encoded in the URL
/// path; the response is paged JSON.
static PORTFOLIO_DAY_ENDPOINT: &str =
    "https://sistemaswebb3-listados.b3.com.br/indexProxy/indexCall/GetPortfolioDay/";

/// Segment view "setor de atuação" — the grouping the pipeline's sector
/// column comes from.
const SEGMENT_SECTOR: &str = "2";

const PAGE_SIZE: u32 = 120;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioRequest<'a> {
    language: &'a str,
    page_number: u32,
    page_size: u32,
    index: &'a str,
    segment: &'a str,
}

#[derive(Debug, Deserialize)]
struct PortfolioPage {
    page: PageInfo,
    header: Option<PageHeader>,
    #[serde(default)]
    results: Vec<PortfolioEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageInfo {
    total_pages: u32,
}

#[derive(Debug, Deserialize)]
struct PageHeader {
    /// Trading date as the proxy formats it, `DD/MM/YY`.
    date: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PortfolioEntry {
    /// Sector label; present only in the segment view.
    segment: Option<String>,
    cod: String,
    asset: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "theoricalQty")]
    theorical_qty: String,
    part: String,
    #[serde(rename = "partAcum", default)]
    part_acum: Option<String>,
}

/// Download the current composition of `index` in the sector view and write
/// it under `dest_dir` as `<INDEX>Dia_DD-MM-YY.csv` — the same sparse shape
/// the manual download produces: date only on the first row, sector only
/// where it changes from the previous row. Returns the written path.
pub fn download_portfolio_day(client: &Client, index: &str, dest_dir: &Path) -> Result<PathBuf> {
    let mut entries = Vec::new();
    let mut header_date: Option<String> = None;
    let mut page_number = 1;
    loop {
        let page = fetch_page(client, index, page_number)
            .with_context(|| format!("fetching {index} portfolio page {page_number}"))?;
        if header_date.is_none() {
            header_date = page.header.map(|h| h.date);
        }
        let total_pages = page.page.total_pages.max(1);
        entries.extend(page.results);
        if page_number >= total_pages {
            break;
        }
        page_number += 1;
    }

    let header_date =
        header_date.ok_or_else(|| anyhow!("{index} portfolio response carried no date header"))?;
    let trade_date = NaiveDate::parse_from_str(&header_date, "%d/%m/%y")
        .with_context(|| format!("unexpected portfolio date {header_date:?}"))?;

    info!(index, %trade_date, entries = entries.len(), "portfolio downloaded");
    write_day_csv(dest_dir, index, trade_date, &entries)
}

fn fetch_page(client: &Client, index: &str, page_number: u32) -> Result<PortfolioPage> {
    let params = serde_json::to_vec(&PortfolioRequest {
        language: "pt-br",
        page_number,
        page_size: PAGE_SIZE,
        index,
        segment: SEGMENT_SECTOR,
    })?;
    let url = Url::parse(&format!(
        "{}{}",
        PORTFOLIO_DAY_ENDPOINT,
        STANDARD.encode(params)
    ))?;
    debug!(%url, "requesting portfolio page");

    let page = client
        .get(url)
        .send()?
        .error_for_status()?
        .json::<PortfolioPage>()?;
    Ok(page)
}

/// Write one day's entries in the source file shape the pipeline repairs.
fn write_day_csv(
    dest_dir: &Path,
    index: &str,
    trade_date: NaiveDate,
    entries: &[PortfolioEntry],
) -> Result<PathBuf> {
    fs::create_dir_all(dest_dir)
        .with_context(|| format!("creating {}", dest_dir.display()))?;
    let name = format!("{}Dia_{}.csv", index, trade_date.format("%d-%m-%y"));
    let path = dest_dir.join(name);

    let mut wtr = WriterBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .from_path(&path)
        .with_context(|| format!("creating {}", path.display()))?;
    wtr.write_record(schema::COLUMNS)?;

    let mut last_sector: Option<&str> = None;
    for (idx, entry) in entries.iter().enumerate() {
        let date_field = if idx == 0 {
            trade_date.format("%Y-%m-%d").to_string()
        } else {
            String::new()
        };
        let sector = entry.segment.as_deref().unwrap_or("");
        let sector_field = if last_sector == Some(sector) { "" } else { sector };
        wtr.write_record([
            date_field.as_str(),
            sector_field,
            entry.cod.as_str(),
            entry.asset.as_str(),
            entry.kind.as_str(),
            entry.theorical_qty.as_str(),
            entry.part.as_str(),
            entry.part_acum.as_deref().unwrap_or(""),
        ])?;
        last_sector = Some(sector);
    }
    wtr.flush()
        .with_context(|| format!("flushing {}", path.display()))?;

    info!(path = %path.display(), rows = entries.len(), "daily file written");
    Ok(path)
}
