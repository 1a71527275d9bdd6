use crate::core::expander::CategorySetExpander;
use crate::core::table_file::{decode_table, encode_table};
use crate::core::{CategoryFetcher, CategoryTable, Storage};
use crate::utils::error::Result;
use crate::utils::monitor::RunMonitor;
use std::fmt;

/// Outcome of a single tracker run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSummary {
    /// No table existed; one was built from the root category.
    Created {
        root: String,
        count: usize,
        persisted: bool,
    },
    /// An existing table was expanded by one level.
    Updated {
        total: usize,
        added: Vec<String>,
        persisted: bool,
    },
}

impl RunSummary {
    pub fn persisted(&self) -> bool {
        match self {
            RunSummary::Created { persisted, .. } | RunSummary::Updated { persisted, .. } => {
                *persisted
            }
        }
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.persisted() {
            f.write_str("[dry run, not saved] ")?;
        }
        match self {
            RunSummary::Created { root, count, .. } => write!(
                f,
                "Initial file created with {} subcategories of {}.",
                count, root
            ),
            RunSummary::Updated { total, .. } => {
                write!(f, "Updated file. Now contains {} categories.", total)
            }
        }
    }
}

/// Load → expand → save driver around the persisted category table.
///
/// The table is written once, after every fetch has succeeded, so a failed
/// run leaves the previous file untouched.
pub struct CategoryTracker<F: CategoryFetcher, S: Storage> {
    expander: CategorySetExpander<F>,
    storage: S,
    data_file: String,
    root_category: String,
    dry_run: bool,
    monitor_enabled: bool,
}

impl<F: CategoryFetcher, S: Storage> CategoryTracker<F, S> {
    pub fn new(
        fetcher: F,
        storage: S,
        data_file: impl Into<String>,
        root_category: impl Into<String>,
    ) -> Self {
        Self {
            expander: CategorySetExpander::new(fetcher),
            storage,
            data_file: data_file.into(),
            root_category: root_category.into(),
            dry_run: false,
            monitor_enabled: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_monitoring(mut self, enabled: bool) -> Self {
        self.monitor_enabled = enabled;
        self
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn run(&self) -> Result<RunSummary> {
        let mut monitor = RunMonitor::new(self.monitor_enabled);

        if self.storage.exists(&self.data_file).await? {
            self.update(&mut monitor).await
        } else {
            tracing::info!("📄 No table at '{}', starting a new one", self.data_file);
            self.create(&mut monitor).await
        }
    }

    async fn create(&self, monitor: &mut RunMonitor) -> Result<RunSummary> {
        let expansion = self.expander.bootstrap(&self.root_category).await?;
        monitor.log_stats("expand");

        let persisted = self.save(&expansion.table).await?;
        monitor.log_stats("save");

        Ok(RunSummary::Created {
            root: self.root_category.clone(),
            count: expansion.table.len(),
            persisted,
        })
    }

    async fn update(&self, monitor: &mut RunMonitor) -> Result<RunSummary> {
        let table = self.load().await?;
        monitor.log_stats("load");

        let expansion = self.expander.expand(&table).await?;
        monitor.log_stats("expand");

        let persisted = self.save(&expansion.table).await?;
        monitor.log_stats("save");

        Ok(RunSummary::Updated {
            total: expansion.table.len(),
            added: expansion.added,
            persisted,
        })
    }

    async fn load(&self) -> Result<CategoryTable> {
        tracing::debug!("Loading table from '{}'", self.data_file);
        let data = self.storage.read_file(&self.data_file).await?;
        let table = decode_table(&data)?;
        tracing::info!("📥 Loaded {} categories from '{}'", table.len(), self.data_file);
        Ok(table)
    }

    async fn save(&self, table: &CategoryTable) -> Result<bool> {
        let data = encode_table(table)?;
        if self.dry_run {
            tracing::info!("🔍 Dry run: skipping write of {} categories", table.len());
            return Ok(false);
        }

        self.storage.write_file(&self.data_file, &data).await?;
        tracing::info!("💾 Saved {} categories to '{}'", table.len(), self.data_file);
        Ok(true)
    }
}
