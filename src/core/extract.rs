use crate::types::ROW_TOKEN_OFFSET;
use regex::Regex;

/// Extract the distinct row indices referenced by a formula or display
/// condition, in first-occurrence order.
///
/// Placeholders look like `{4}`; token value `k` denotes table row
/// `k - ROW_TOKEN_OFFSET`. Absent or empty text yields an empty result.
/// Range checking deliberately does not happen here: the graph builder
/// owns that error so it can name the offending row, which is why the
/// returned indices are signed.
pub fn extract_references(text: Option<&str>) -> Vec<i64> {
    let Some(text) = text else {
        return Vec::new();
    };

    let re = Regex::new(r"\{(\d+)\}").expect("placeholder pattern is valid");

    let mut references = Vec::new();
    for capture in re.captures_iter(text) {
        if let Ok(token) = capture[1].parse::<i64>() {
            let index = token - ROW_TOKEN_OFFSET;
            if !references.contains(&index) {
                references.push(index);
            }
        }
    }
    references
}
