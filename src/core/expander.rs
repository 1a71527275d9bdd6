use crate::core::{CategoryFetcher, CategoryRecord, CategoryTable, Expansion};
use crate::utils::error::Result;
use std::collections::BTreeSet;

/// Union of `table` and `fetched` by name.
///
/// Known names keep their record untouched; unknown names are added as
/// `Included`. Duplicates in `fetched` collapse to one row.
pub fn merge<I, S>(table: &CategoryTable, fetched: I) -> Expansion
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut merged = table.clone();
    let mut added = BTreeSet::new();

    for name in fetched {
        let name = name.into();
        if merged.insert_if_absent(CategoryRecord::included(name.clone())) {
            added.insert(name);
        }
    }

    Expansion {
        table: merged,
        added: added.into_iter().collect(),
    }
}

/// Computes the next table state one level at a time.
pub struct CategorySetExpander<F: CategoryFetcher> {
    fetcher: F,
}

impl<F: CategoryFetcher> CategorySetExpander<F> {
    pub fn new(fetcher: F) -> Self {
        Self { fetcher }
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Initial table: the root's direct subcategories. The root itself is not recorded.
    pub async fn bootstrap(&self, root_category: &str) -> Result<Expansion> {
        tracing::info!("🌱 Bootstrapping from root category '{}'", root_category);
        let subcategories = self.fetcher.fetch_subcategories(root_category).await?;
        tracing::debug!(
            "Root '{}' returned {} subcategories",
            root_category,
            subcategories.len()
        );

        Ok(merge(&CategoryTable::new(), subcategories))
    }

    /// Expands every expandable record by one level and merges the results.
    ///
    /// Fetches run one after another in table order. The first failure aborts
    /// the pass and nothing is returned.
    pub async fn expand(&self, table: &CategoryTable) -> Result<Expansion> {
        let parents = table.expandable_names();
        tracing::info!("🔎 Expanding {} included categories", parents.len());

        let mut fetched = Vec::new();
        for (index, parent) in parents.iter().enumerate() {
            let subcategories = self.fetcher.fetch_subcategories(parent).await?;
            tracing::debug!(
                "[{}/{}] '{}' -> {} subcategories",
                index + 1,
                parents.len(),
                parent,
                subcategories.len()
            );
            fetched.extend(subcategories);
        }

        tracing::debug!("Fetched {} names before merge", fetched.len());
        let expansion = merge(table, fetched);

        if expansion.is_converged() {
            tracing::info!("✅ No new categories found in this pass");
        } else {
            tracing::info!("🆕 Discovered {} new categories", expansion.added.len());
        }

        Ok(expansion)
    }
}
