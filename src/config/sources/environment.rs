//! Environment source: BODYCOMP__SECTION__KEY, e.g. BODYCOMP__DATA__DIR=/srv/scale.

use config::builder::DefaultState;
use config::ConfigBuilder;
use config::Environment;

pub fn add_to_builder(builder: ConfigBuilder<DefaultState>) -> ConfigBuilder<DefaultState> {
    builder.add_source(
        Environment::with_prefix("BODYCOMP")
            .prefix_separator("__")
            .separator("__"),
    )
}
