mod settings;

pub use settings::{
    save_filter_patterns, ConfigError, FilterKind, Settings, TomlConfig, EXAMPLE_CONFIG,
};
