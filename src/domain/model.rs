use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Tracking status of a category. `Included` is the only status produced today.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryStatus {
    Included,
}

impl CategoryStatus {
    /// Whether categories with this status get their subcategories fetched.
    pub fn is_expandable(self) -> bool {
        match self {
            CategoryStatus::Included => true,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryStatus::Included => "Included",
        }
    }
}

impl fmt::Display for CategoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the persisted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    #[serde(rename = "Category")]
    pub name: String,
    #[serde(rename = "Status")]
    pub status: CategoryStatus,
}

impl CategoryRecord {
    pub fn included(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status: CategoryStatus::Included,
        }
    }
}

/// Known categories keyed by name. Iteration is always in ascending name order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryTable {
    records: BTreeMap<String, CategoryRecord>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.records.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&CategoryRecord> {
        self.records.get(name)
    }

    /// Inserts `record` unless its name is already known. Returns true when inserted.
    /// An existing record is never replaced, so statuses cannot regress.
    pub fn insert_if_absent(&mut self, record: CategoryRecord) -> bool {
        if self.records.contains_key(&record.name) {
            return false;
        }
        self.records.insert(record.name.clone(), record);
        true
    }

    pub fn records(&self) -> impl Iterator<Item = &CategoryRecord> {
        self.records.values()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    /// Names whose status says they should be expanded on the next pass.
    pub fn expandable_names(&self) -> Vec<String> {
        self.records
            .values()
            .filter(|record| record.status.is_expandable())
            .map(|record| record.name.clone())
            .collect()
    }
}

impl FromIterator<CategoryRecord> for CategoryTable {
    /// First occurrence of a name wins.
    fn from_iter<I: IntoIterator<Item = CategoryRecord>>(iter: I) -> Self {
        let mut table = CategoryTable::new();
        for record in iter {
            table.insert_if_absent(record);
        }
        table
    }
}

/// Result of one expansion pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expansion {
    pub table: CategoryTable,
    /// Names first seen in this pass, ascending. Empty means the crawl has converged.
    pub added: Vec<String>,
}

impl Expansion {
    pub fn is_converged(&self) -> bool {
        self.added.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_iterates_in_name_order() {
        let table: CategoryTable = ["Topology", "Algebra", "Linear algebra"]
            .into_iter()
            .map(CategoryRecord::included)
            .collect();

        let names: Vec<&str> = table.names().collect();
        assert_eq!(names, vec!["Algebra", "Linear algebra", "Topology"]);
    }

    #[test]
    fn test_insert_if_absent_keeps_existing_record() {
        let mut table = CategoryTable::new();
        assert!(table.insert_if_absent(CategoryRecord::included("Algebra")));
        assert!(!table.insert_if_absent(CategoryRecord::included("Algebra")));
        assert_eq!(table.len(), 1);
        assert_eq!(
            table.get("Algebra").map(|r| r.status),
            Some(CategoryStatus::Included)
        );
    }

    #[test]
    fn test_expandable_names_selects_included() {
        let table: CategoryTable = ["B", "A"].into_iter().map(CategoryRecord::included).collect();
        assert_eq!(table.expandable_names(), vec!["A".to_string(), "B".to_string()]);
    }
}
