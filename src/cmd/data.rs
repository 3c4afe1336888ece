use anyhow::{Context, Result};

use gemdash::{summarize, Config, PageRecord};

pub fn cmd_data(config: &Config) -> Result<()> {
    let record = load(config)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(())
}

pub fn cmd_metrics(config: &Config) -> Result<()> {
    let record = load(config)?;
    println!("{}", serde_json::to_string_pretty(&summarize(&record))?);
    Ok(())
}

fn load(config: &Config) -> Result<PageRecord> {
    super::store(config)
        .load()
        .context("failed to read stored record")?
        .context(super::NO_DATA)
}
