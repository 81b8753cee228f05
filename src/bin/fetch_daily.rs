use anyhow::Result;
use b3scraper::fetch;
use reqwest::blocking::Client;
use std::env;
use std::path::Path;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// Producer collaborator: downloads today's index composition from B3 and
/// drops it where the pipeline discovers its inputs.
fn main() -> Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder().with_env_filter(env_filter).init();

    let mut args = env::args().skip(1);
    let index = args.next().unwrap_or_else(|| "IBOV".to_string());
    let dest = args.next().unwrap_or_else(|| "bovespa".to_string());

    let client = Client::builder()
        .timeout(Duration::from_secs(30))
        .build()?;
    let path = fetch::download_portfolio_day(&client, &index, Path::new(&dest))?;
    info!(path = %path.display(), "daily composition saved");
    Ok(())
}
