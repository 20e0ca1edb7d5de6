//! `refetch config` – print the resolved config path and contents.

use anyhow::Result;
use refetch_core::config::{self, RefetchConfig};

pub fn run_show_config(cfg: &RefetchConfig) -> Result<()> {
    let path = config::config_path()?;
    println!("config: {}", path.display());
    println!("{}", toml::to_string_pretty(cfg)?);
    Ok(())
}
