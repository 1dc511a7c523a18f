//! Merge rules: defaults, override order, conflict handling.

use config::builder::DefaultState;
use config::Config;
use config::ConfigBuilder;
use config::ConfigError;

/// Create a Config builder with merge policy defaults applied.
///
/// Only scalar path defaults are set here; list defaults (timestamp formats,
/// metrics, targets) come from the serde defaults on the config structs so a
/// file that names a list replaces it instead of merging element-wise.
pub fn builder_with_defaults() -> Result<ConfigBuilder<DefaultState>, ConfigError> {
    Config::builder()
        .set_default("data.dir", "data")?
        .set_default("data.extension", "csv")?
        .set_default("storage.ledger_path", "processed_files.json")?
        .set_default("storage.snapshot_path", ".bodycomp/snapshot.bin")
}
