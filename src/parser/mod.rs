use crate::error::{FieldsmithError, FieldsmithResult};
use crate::types::{FieldRow, FieldTable, FieldType};
use serde::Deserialize;
use std::path::Path;

/// Raw CSV record, bound by column name.
///
/// Column order in the file does not matter; the header names do. The
/// text columns default to empty so a template may omit columns it never
/// uses (a form with no file uploads does not need `allowed_file_types`).
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(rename = "sectionIndex")]
    section_index: u32,
    #[serde(rename = "fieldIndex")]
    field_index: u32,
    #[serde(rename = "fieldType")]
    field_type: String,
    label: String,
    #[serde(default)]
    options: String,
    #[serde(default)]
    formula: String,
    #[serde(default)]
    display_condition: String,
    #[serde(default)]
    allowed_file_types: String,
    #[serde(default)]
    required: String,
}

/// Load a field template from a CSV file.
///
/// Each record becomes one [`FieldRow`], indexed by its position in the
/// file. The whole table is read up front; processing never streams.
///
/// # Arguments
/// * `path` - Path to the CSV template
///
/// # Returns
/// * `Ok(FieldTable)` - All rows, in file order
/// * `Err(FieldsmithError)` - IO, CSV, or per-row parse error
///
/// # Example
/// ```no_run
/// use fieldsmith::parser::load_table;
/// use std::path::Path;
///
/// let table = load_table(Path::new("template.csv"))?;
/// println!("{} fields", table.len());
/// # Ok::<(), fieldsmith::error::FieldsmithError>(())
/// ```
pub fn load_table(path: &Path) -> FieldsmithResult<FieldTable> {
    let mut reader = csv::Reader::from_path(path)?;

    let mut rows = Vec::new();
    for (index, record) in reader.deserialize::<RawRecord>().enumerate() {
        rows.push(row_from_record(index, record?)?);
    }

    Ok(FieldTable::new(rows))
}

fn row_from_record(index: usize, record: RawRecord) -> FieldsmithResult<FieldRow> {
    let label = record.label.trim().to_string();
    if label.is_empty() {
        return Err(FieldsmithError::Parse(format!(
            "row {index}: label must not be empty"
        )));
    }

    let field_type = record.field_type.trim();
    if field_type.is_empty() {
        return Err(FieldsmithError::Parse(format!(
            "row {index} ({label}): fieldType must not be empty"
        )));
    }

    Ok(FieldRow {
        index,
        section_index: record.section_index,
        field_index: record.field_index,
        field_type: FieldType::from_wire(field_type),
        label,
        options: split_list(&record.options),
        formula: none_if_blank(&record.formula),
        display_condition: none_if_blank(&record.display_condition),
        allowed_file_types: split_list(&record.allowed_file_types),
        required: truthy(&record.required),
        field_name: None,
    })
}

/// Split a comma-separated cell into trimmed, non-empty items.
fn split_list(cell: &str) -> Vec<String> {
    cell.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(String::from)
        .collect()
}

fn none_if_blank(cell: &str) -> Option<String> {
    let trimmed = cell.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Blank means not required; anything truthy-looking means required.
fn truthy(cell: &str) -> bool {
    matches!(
        cell.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "y" | "1"
    )
}
