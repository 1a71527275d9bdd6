pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{
    validate_non_empty_string, validate_path, validate_range, validate_url,
};

pub const DEFAULT_API_ENDPOINT: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_DATA_FILE: &str = "mathematics_categories.csv";
pub const DEFAULT_ROOT_CATEGORY: &str = "Mathematics";
pub const DEFAULT_USER_AGENT: &str = concat!("category-tracker/", env!("CARGO_PKG_VERSION"));
/// Upper bound the categorymembers API accepts for `cmlimit` on normal accounts.
pub const MAX_PAGE_LIMIT: u32 = 500;

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validate_url("api_endpoint", config.api_endpoint())?;
    validate_path("data_file", config.data_file())?;
    validate_non_empty_string("root_category", config.root_category())?;
    validate_range("page_limit", config.page_limit(), 1, MAX_PAGE_LIMIT)?;
    validate_non_empty_string("user_agent", config.user_agent())?;
    if let Some(timeout) = config.timeout_seconds() {
        validate_range("timeout_seconds", timeout, 1, 3600)?;
    }
    Ok(())
}

#[cfg(feature = "cli")]
mod cli {
    use super::*;
    use crate::utils::validation::Validate;
    use clap::Parser;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "category-tracker")]
    #[command(about = "Tracks Wikipedia categories reachable from a root category, one level per run")]
    pub struct CliConfig {
        /// Path to a TOML configuration file; its values replace the source and storage flags
        #[arg(short, long)]
        pub config: Option<String>,

        #[arg(long, default_value = DEFAULT_DATA_FILE)]
        pub data_file: String,

        #[arg(long, default_value = DEFAULT_API_ENDPOINT)]
        pub api_endpoint: String,

        #[arg(long, default_value = DEFAULT_ROOT_CATEGORY)]
        pub root_category: String,

        /// Members requested per category (single page, no continuation)
        #[arg(long, default_value_t = MAX_PAGE_LIMIT)]
        pub page_limit: u32,

        #[arg(long)]
        pub timeout_seconds: Option<u64>,

        #[arg(long, default_value = DEFAULT_USER_AGENT)]
        pub user_agent: String,

        /// Ask the API for subcategories only (cmtype=subcat)
        #[arg(long)]
        pub subcategories_only: bool,

        /// Fetch and merge but do not write the table file
        #[arg(long)]
        pub dry_run: bool,

        #[arg(short, long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,

        #[arg(long, help = "Log process CPU and memory per phase")]
        pub monitor: bool,
    }

    impl ConfigProvider for CliConfig {
        fn api_endpoint(&self) -> &str {
            &self.api_endpoint
        }

        fn data_file(&self) -> &str {
            &self.data_file
        }

        fn root_category(&self) -> &str {
            &self.root_category
        }

        fn page_limit(&self) -> u32 {
            self.page_limit
        }

        fn timeout_seconds(&self) -> Option<u64> {
            self.timeout_seconds
        }

        fn user_agent(&self) -> &str {
            &self.user_agent
        }

        fn subcategories_only(&self) -> bool {
            self.subcategories_only
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_provider(self)
        }
    }

}

#[cfg(feature = "cli")]
pub use cli::CliConfig;
