use std::path::Path;

// Declare the modules that make up this crate.
pub mod error;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use settings::{
    Config, IngestSettings, LoggingSettings, OutputFormat, OutputSettings, ReportSettings, SourceKind,
    SourceSettings,
};

/// Prefix of the environment variables that override file settings,
/// e.g. `SALES_REPORT__SOURCE__KIND=postgres`.
pub const ENV_PREFIX: &str = "SALES_REPORT";

/// Loads the application configuration.
///
/// Built-in defaults are overlaid by the TOML file and then by environment
/// variables. Without an explicit `path`, a `config.toml` in the working
/// directory is used when present; an explicit path must exist.
pub fn load_config(path: Option<&Path>) -> Result<Config, ConfigError> {
    let file = match path {
        Some(path) => config::File::from(path).required(true),
        None => config::File::with_name("config.toml").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    // Attempt to deserialize the entire configuration into our `Config` struct
    let config = builder.try_deserialize::<Config>()?;
    config.validate()?;

    tracing::debug!(?config, "Configuration loaded");
    Ok(config)
}
