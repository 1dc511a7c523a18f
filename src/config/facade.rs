//! Config loading facade: assembles sources in precedence order.

use super::merge::merge_policy;
use super::sources::{environment, global_file, workspace_file};
use super::BodycompConfig;
use config::{ConfigError, File, FileFormat};
use std::path::{Path, PathBuf};

/// Loads [`BodycompConfig`] from layered sources.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Defaults, then global file, then workspace files, then environment.
    pub fn load(workspace_root: &Path) -> Result<BodycompConfig, ConfigError> {
        let builder = merge_policy::builder_with_defaults()?;
        let builder = global_file::add_to_builder(builder)?;
        let builder = workspace_file::add_to_builder(builder, workspace_root)?;
        let builder = environment::add_to_builder(builder);
        builder.build()?.try_deserialize()
    }

    /// Defaults overlaid with exactly one file. Environment and other files are ignored.
    pub fn load_from_file(path: &Path) -> Result<BodycompConfig, ConfigError> {
        merge_policy::builder_with_defaults()?
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()?
            .try_deserialize()
    }

    /// Path of the global config file, whether or not it exists.
    pub fn global_config_path() -> Option<PathBuf> {
        global_file::global_config_path()
    }

    /// Render a configuration as TOML, for `bodycomp config`-style inspection.
    pub fn to_toml(config: &BodycompConfig) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(config)
    }
}
