use anyhow::Result;
use b3scraper::pipeline::{self, PipelineConfig};
use std::env;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();
    info!("startup");

    // ─── 2) build config ─────────────────────────────────────────────
    let mut args = env::args().skip(1);
    let pattern = args.next().unwrap_or_else(|| "bovespa/*.csv".to_string());
    let output = args.next().unwrap_or_else(|| "consolidated_data.csv".to_string());
    let config = PipelineConfig::new(pattern, output);

    // ─── 3) run the pipeline ─────────────────────────────────────────
    let summary = pipeline::run(&config)?;
    for rejected in &summary.rejected {
        info!(path = %rejected.path.display(), reason = %rejected.reason, "skipped");
    }
    info!(
        accepted = summary.accepted.len(),
        rejected = summary.rejected.len(),
        rows = summary.rows_written,
        dates = summary.dates.len(),
        sectors = summary.sectors.len(),
        "run complete"
    );
    Ok(())
}
