pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{http::MediaWikiFetcher, storage::LocalStorage};
pub use config::toml_config::TomlConfig;
pub use core::{
    expander::{merge, CategorySetExpander},
    tracker::{CategoryTracker, RunSummary},
    CategoryFetcher, CategoryRecord, CategoryStatus, CategoryTable, ConfigProvider, Expansion,
    Storage,
};
pub use utils::error::{Result, TrackerError};
