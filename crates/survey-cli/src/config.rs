//! Resolving the cleaning configuration from command line flags.

use std::path::Path;

use anyhow::{Context, Result, bail};
use survey_model::{CleanConfig, SourceConfig};
use tracing::debug;

/// Load `config_path` when given, otherwise the built-in sources under `data_dir`.
pub fn load_config(config_path: Option<&Path>, data_dir: &Path) -> Result<CleanConfig> {
    match config_path {
        Some(path) => CleanConfig::load(path)
            .with_context(|| format!("load config {}", path.display())),
        None => {
            debug!(data_dir = %data_dir.display(), "using built-in sources");
            Ok(CleanConfig::default_for(data_dir))
        }
    }
}

/// Sources named in `names`, in configuration order; every source when empty.
pub fn select_sources<'a>(config: &'a CleanConfig, names: &[String]) -> Result<Vec<&'a SourceConfig>> {
    if let Some(unknown) = names.iter().find(|name| config.source(name).is_none()) {
        let known: Vec<&str> = config.sources.iter().map(|s| s.name.as_str()).collect();
        bail!("unknown source '{unknown}' (configured: {})", known.join(", "));
    }
    Ok(config
        .sources
        .iter()
        .filter(|source| names.is_empty() || names.contains(&source.name))
        .collect())
}

/// The single source called `name`.
pub fn find_source<'a>(config: &'a CleanConfig, name: &str) -> Result<&'a SourceConfig> {
    let selected = select_sources(config, &[name.to_string()])?;
    selected
        .into_iter()
        .next()
        .with_context(|| format!("unknown source '{name}'"))
}
