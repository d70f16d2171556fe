//! Storage infrastructure: configuration and the settings-override artifact.
//!
//! The `config` sub-module handles the host's own TOML configuration file:
//! reading it from the platform-appropriate directory, writing changes back,
//! and providing sensible defaults on first run.
//!
//! The `override_store` sub-module owns the lifecycle of the persisted
//! settings-override artifact, the file the M500/M501/M503 family creates,
//! removes, and probes. Its *contents* are written by subscribed control
//! modules and are never parsed here.

pub mod config;
pub mod override_store;

pub use config::{load_config, save_config, AppConfig, ConfigError};
pub use override_store::OverrideStore;
