/// Placeholder resolution engine.
///
/// Resolution runs in two passes over the document tree. The first pass
/// prunes conditional blocks against the integer control value from the
/// value map; the second substitutes every remaining tagged content control
/// and collects the tags that had no usable value. Pruning always completes
/// before substitution starts, so deleted blocks are never substituted and
/// unwrapped content is no longer tagged when the second pass sees it.
///
/// # Examples
///
/// ```rust
/// use sdtfill::data::ValueMap;
/// use sdtfill::docx::DocumentTree;
/// use sdtfill::engine;
///
/// let mut tree = DocumentTree::parse(
///     br#"<w:body><w:sdt><w:sdtPr><w:tag w:val="Kunde_Name"/></w:sdtPr><w:sdtContent><w:r><w:t>x</w:t></w:r></w:sdtContent></w:sdt></w:body>"#,
/// )?;
/// let mut values = ValueMap::new();
/// values.insert("Kunde_Name".to_string(), "Muster GmbH".to_string());
///
/// let outcome = engine::resolve(&mut tree, &values);
/// assert!(outcome.missing.is_empty());
/// # Ok::<(), sdtfill::docx::DocxError>(())
/// ```
pub mod prune;
pub mod substitute;

pub use prune::PruneSummary;
pub use substitute::MissingTagReport;

use crate::data::ValueMap;
use crate::docx::tree::DocumentTree;

/// Value map key whose integer value selects the surviving measures block.
pub const MEASURE_COUNT_KEY: &str = "Anzahl_Maßnahmen";

/// The rule connecting a control value to its conditional blocks.
///
/// Blocks are tagged `<key>_<N>`; the block whose `N` equals the integer
/// value stored under `key` survives, the others are removed. The prefix
/// comparison is exact and case-sensitive.
#[derive(Debug, Clone)]
pub struct ConditionalRule {
    key: String,
}

impl ConditionalRule {
    /// Create a rule for a specific control key.
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }

    /// Get the control key.
    #[inline]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get the tag prefix conditional blocks must carry.
    fn prefix(&self) -> String {
        format!("{}_", self.key)
    }
}

impl Default for ConditionalRule {
    fn default() -> Self {
        Self::new(MEASURE_COUNT_KEY)
    }
}

/// What a resolution pass did to the document.
#[derive(Debug, Clone)]
pub struct ResolveOutcome {
    /// Tags that had no usable value at substitution time
    pub missing: MissingTagReport,
    /// Pruning counts, or `None` when the control value was unusable and
    /// pruning was skipped
    pub pruned: Option<PruneSummary>,
}

/// Resolve all placeholders in a document tree against a value map,
/// using the default conditional rule.
pub fn resolve(tree: &mut DocumentTree, values: &ValueMap) -> ResolveOutcome {
    resolve_with(tree, values, &ConditionalRule::default())
}

/// Resolve all placeholders in a document tree against a value map.
///
/// The tree is mutated in place; the caller serializes it back into the
/// package afterwards. The value map is read-only input.
pub fn resolve_with(
    tree: &mut DocumentTree,
    values: &ValueMap,
    rule: &ConditionalRule,
) -> ResolveOutcome {
    let pruned = match control_value(values, rule.key()) {
        Some(expected) => {
            let summary = prune::prune(tree, &rule.prefix(), expected);
            log::info!(
                "{}={}: {} deleted, {} unwrapped",
                rule.key(),
                expected,
                summary.deleted,
                summary.unwrapped
            );
            Some(summary)
        },
        None => None,
    };

    let missing = substitute::substitute(tree, values);
    if !missing.is_empty() {
        log::warn!(
            "{} placeholder(s) without a value: {}",
            missing.len(),
            missing.iter().collect::<Vec<_>>().join(", ")
        );
    }

    ResolveOutcome { missing, pruned }
}

/// Read and parse the control value, warning when it is unusable.
fn control_value(values: &ValueMap, key: &str) -> Option<i64> {
    let raw = values.get(key).map(String::as_str).unwrap_or("");
    match raw.trim().parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => {
            log::warn!(
                "control value '{}' is invalid ('{}'), conditional blocks left untouched",
                key,
                raw
            );
            None
        },
    }
}
