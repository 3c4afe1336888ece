use anyhow::{Context, Result};

use gemdash::{refresh, Config};

pub async fn cmd_refresh(config: &Config) -> Result<()> {
    let store = super::store(config);
    let mut renderer = super::renderer(config)?;

    let record = refresh(&super::extractor(config), &mut renderer, &store)
        .await
        .with_context(|| format!("refresh of {} failed", config.source_url))?;

    println!("{}", record.fetched_at.to_rfc3339());
    Ok(())
}
