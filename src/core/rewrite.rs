//! Placeholder rewriting as remote identifiers resolve.
//!
//! Rewriting is a literal text substitution over the whole table, applied
//! once per resolved row. Because the engine materializes in dependency
//! order, every placeholder a row still carries when its turn comes can
//! only name a row whose creation failed.

use super::extract::extract_references;
use crate::types::FieldTable;

/// Record `field_name` for a freshly created row and substitute its
/// positional placeholder with the identifier everywhere it still occurs.
///
/// Rows already materialized are rewritten too; their text is no longer
/// consulted, so that is harmless, and it keeps the invariant simple:
/// after this call the positional token for `row_index` is gone from the
/// entire table.
pub fn resolve_row(table: &mut FieldTable, row_index: usize, field_name: &str) {
    debug_assert!(
        table.rows[row_index].field_name.is_none(),
        "row {row_index} resolved twice"
    );

    let token = table.rows[row_index].placeholder_token();
    let replacement = format!("{{{field_name}}}");
    table.rows[row_index].field_name = Some(field_name.to_string());

    for row in &mut table.rows {
        if let Some(formula) = &row.formula {
            if formula.contains(&token) {
                row.formula = Some(formula.replace(&token, &replacement));
            }
        }
        if let Some(condition) = &row.display_condition {
            if condition.contains(&token) {
                row.display_condition = Some(condition.replace(&token, &replacement));
            }
        }
    }
}

/// Row indices still referenced positionally in this row's text.
///
/// After in-order rewriting these can only point at rows that never
/// obtained an identifier.
pub fn unresolved_references(table: &FieldTable, row_index: usize) -> Vec<i64> {
    let row = &table.rows[row_index];
    let mut references = extract_references(row.formula.as_deref());
    for reference in extract_references(row.display_condition.as_deref()) {
        if !references.contains(&reference) {
            references.push(reference);
        }
    }
    references
}
