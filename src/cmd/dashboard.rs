use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use gemdash::{is_stale, refresh, render_dashboard, summarize, Config};

/// Print the dashboard. Missing or stale data triggers an extraction first;
/// if that fails, stale data is still shown.
pub async fn cmd_dashboard(config: &Config) -> Result<()> {
    let store = super::store(config);
    let stored = store.load().context("failed to read stored record")?;

    let needs_refresh = stored
        .as_ref()
        .map_or(true, |r| is_stale(r, Utc::now(), config.stale_after()));

    let record = if needs_refresh {
        info!("Stored data missing or stale, extracting");
        let mut renderer = super::renderer(config)?;
        match refresh(&super::extractor(config), &mut renderer, &store).await {
            Ok(record) => record,
            Err(e) => match stored {
                Some(record) => {
                    warn!(error = %e, "Refresh failed, showing stored data");
                    record
                }
                None => return Err(e).context(super::NO_DATA),
            },
        }
    } else {
        stored.context(super::NO_DATA)?
    };

    let stale = is_stale(&record, Utc::now(), config.stale_after());
    print!("{}", render_dashboard(&record, &summarize(&record), stale));
    Ok(())
}
