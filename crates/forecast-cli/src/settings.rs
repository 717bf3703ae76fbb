use forecast_core::EngineConfig;
use std::path::Path;
use tracing::debug;

use crate::input;

/// Load the engine configuration from a JSON or YAML file, falling back to
/// defaults. `--seed` overrides any seed in the file.
pub fn load_engine_config(
    path: Option<&str>,
    seed: Option<u64>,
) -> Result<EngineConfig, Box<dyn std::error::Error>> {
    let mut config: EngineConfig = match path {
        Some(p) if is_yaml(p) => input::file::read_yaml(p)?,
        Some(p) => input::file::read_json(p)?,
        None => EngineConfig::default(),
    };

    if seed.is_some() {
        config.seed = seed;
    }
    config.validate()?;

    debug!(seed = ?config.seed, path = ?path, "engine configuration loaded");
    Ok(config)
}

fn is_yaml(path: &str) -> bool {
    matches!(
        Path::new(path).extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    )
}
