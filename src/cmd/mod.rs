mod dashboard;
mod data;
mod refresh;

pub use dashboard::cmd_dashboard;
pub use data::{cmd_data, cmd_metrics};
pub use refresh::cmd_refresh;

use anyhow::{Context, Result};

use gemdash::{chrome_profile, Config, Extractor, HttpRenderer, PageClient, Store};

pub(crate) const NO_DATA: &str = "No data available. Run `gemdash refresh` first.";

fn store(config: &Config) -> Store {
    Store::new(&config.data_dir)
}

fn extractor(config: &Config) -> Extractor {
    Extractor::new(config.extract_options())
}

fn renderer(config: &Config) -> Result<HttpRenderer> {
    let mut profile = chrome_profile();
    if let Some(user_agent) = &config.user_agent {
        profile = profile.with_user_agent(user_agent);
    }
    let client = PageClient::with_profile(profile).context("failed to build HTTP client")?;
    Ok(HttpRenderer::new(client))
}
