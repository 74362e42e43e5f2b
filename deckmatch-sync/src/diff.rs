//! Label-level unified diff for `deckmatch plan`.

use similar::TextDiff;

use deckmatch_core::types::Label;

/// Unified diff of two templates, one label per line.
///
/// Returns an empty string when the templates are equal.
pub fn label_diff(current: &[Label], target: &[Label]) -> String {
    let old = to_lines(current);
    let new = to_lines(target);
    if old == new {
        return String::new();
    }
    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .header("current", "target")
        .context_radius(3)
        .to_string()
}

fn to_lines(labels: &[Label]) -> String {
    labels.iter().map(|l| format!("{l}\n")).collect()
}
