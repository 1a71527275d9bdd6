use crate::core::{CategoryRecord, CategoryTable};
use crate::utils::error::{Result, TrackerError};

pub const CATEGORY_COLUMN: &str = "Category";
pub const STATUS_COLUMN: &str = "Status";

/// Parses the `Category,Status` CSV table.
pub fn decode_table(data: &[u8]) -> Result<CategoryTable> {
    let mut reader = csv::ReaderBuilder::new().has_headers(true).from_reader(data);
    let headers = reader.headers()?.clone();

    // 空檔案視為空表
    if headers.is_empty() {
        return Ok(CategoryTable::new());
    }

    for column in [CATEGORY_COLUMN, STATUS_COLUMN] {
        if !headers.iter().any(|h| h == column) {
            return Err(TrackerError::TableFormatError {
                line: 1,
                message: format!("missing '{}' column", column),
            });
        }
    }

    let mut table = CategoryTable::new();
    for result in reader.records() {
        let row = result?;
        let line = row.position().map(|p| p.line()).unwrap_or_default();
        let record: CategoryRecord = row.deserialize(Some(&headers))?;

        if record.name.trim().is_empty() {
            return Err(TrackerError::TableFormatError {
                line,
                message: "empty category name".to_string(),
            });
        }

        let name = record.name.clone();
        if !table.insert_if_absent(record) {
            tracing::warn!("⚠️ Duplicate category '{}' at line {} ignored", name, line);
        }
    }

    tracing::debug!("Decoded table with {} categories", table.len());
    Ok(table)
}

/// Serialises the table in name order, header first, `\n` line endings.
pub fn encode_table(table: &CategoryTable) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record([CATEGORY_COLUMN, STATUS_COLUMN])?;
    for record in table.records() {
        writer.serialize(record)?;
    }

    writer
        .into_inner()
        .map_err(|e| TrackerError::IoError(e.into_error()))
}
