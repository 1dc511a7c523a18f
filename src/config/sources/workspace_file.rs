//! Workspace config files: `config/config.toml`, then `config/{BODYCOMP_ENV}.toml`.

use config::builder::DefaultState;
use config::{ConfigBuilder, ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

pub const ENV_VAR: &str = "BODYCOMP_ENV";
const DEFAULT_ENV: &str = "development";

/// Candidate files in increasing precedence. Files need not exist.
pub fn candidate_paths(workspace_root: &Path) -> Vec<PathBuf> {
    let config_dir = workspace_root.join("config");
    let env_name = std::env::var(ENV_VAR).unwrap_or_else(|_| DEFAULT_ENV.to_string());
    vec![
        config_dir.join("config.toml"),
        config_dir.join(format!("{}.toml", env_name)),
    ]
}

pub fn add_to_builder(
    builder: ConfigBuilder<DefaultState>,
    workspace_root: &Path,
) -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    let builder = candidate_paths(workspace_root)
        .into_iter()
        .filter(|path| path.is_file())
        .fold(builder, |builder, path| {
            debug!(path = %path.display(), "Layering workspace config");
            builder.add_source(File::from(path).format(FileFormat::Toml).required(false))
        });
    Ok(builder)
}
