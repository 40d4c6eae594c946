//! Placeholder substitution and missing-tag reporting.

use crate::data::ValueMap;
use crate::docx::content_control;
use crate::docx::tree::DocumentTree;
use std::collections::BTreeSet;

/// The tags for which no usable value was found during substitution.
///
/// Tags are deduplicated and sorted. A tag counts as missing when it is
/// absent from the value map or maps to an empty or whitespace-only value.
/// This is informational, not an error: the document is still written, with
/// those placeholders emptied.
#[derive(Debug, Clone, Default)]
pub struct MissingTagReport {
    tags: BTreeSet<String>,
}

impl MissingTagReport {
    /// Check whether every placeholder received a value.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Get the number of distinct missing tags.
    #[inline]
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Check whether a specific tag is reported missing.
    pub fn contains(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Iterate the missing tags in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(String::as_str)
    }

    /// Consume the report and return the sorted tag list.
    pub fn into_vec(self) -> Vec<String> {
        self.tags.into_iter().collect()
    }

    fn record(&mut self, tag: &str) {
        if !tag.is_empty() {
            self.tags.insert(tag.to_string());
        }
    }
}

/// Substitute every tagged content control in the tree.
///
/// Each control is visited exactly once. The first text run receives the
/// looked-up value (empty when the tag is unmapped), every later run in the
/// same control is cleared, and controls without text runs keep their
/// structure. The surrounding sdt markup stays in place, so the document
/// remains a fillable template.
pub(crate) fn substitute(tree: &mut DocumentTree, values: &ValueMap) -> MissingTagReport {
    let mut report = MissingTagReport::default();

    for control in content_control::collect(tree) {
        let key = control.tag().unwrap_or("");
        let value = values.get(key).map(String::as_str).unwrap_or("");

        if value.trim().is_empty() {
            if let Some(tag) = control.tag() {
                report.record(tag);
            }
        }

        let runs = content_control::text_runs(tree, control.node());
        if let Some((&first, rest)) = runs.split_first() {
            tree.set_text_content(first, value);
            for &run in rest {
                tree.set_text_content(run, "");
            }
        }
    }

    report
}
