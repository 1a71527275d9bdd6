pub mod expander;
pub mod table_file;
pub mod tracker;

pub use crate::domain::model::{CategoryRecord, CategoryStatus, CategoryTable, Expansion};
pub use crate::domain::ports::{CategoryFetcher, ConfigProvider, Storage};
pub use crate::utils::error::Result;
