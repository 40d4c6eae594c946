/// Content control support for Word documents.
///
/// Content controls (`w:sdt`) are structured regions in a document that
/// carry a tag for programmatic identification. The resolution engine uses
/// them as placeholders: the tag names the value to insert, and the text
/// runs inside `w:sdtContent` receive it.
use crate::docx::tree::{DocumentTree, NodeId};

/// A tagged content control in a document tree.
///
/// # Examples
///
/// ```rust
/// use sdtfill::docx::{DocumentTree, content_control};
///
/// let tree = DocumentTree::parse(
///     br#"<w:body><w:sdt><w:sdtPr><w:tag w:val="Kunde_Name"/></w:sdtPr><w:sdtContent><w:r><w:t>x</w:t></w:r></w:sdtContent></w:sdt></w:body>"#,
/// )?;
/// let controls = content_control::collect(&tree);
/// assert_eq!(controls.len(), 1);
/// assert_eq!(controls[0].tag(), Some("Kunde_Name"));
/// # Ok::<(), sdtfill::docx::DocxError>(())
/// ```
#[derive(Debug, Clone)]
pub struct ContentControl {
    /// The `w:sdt` element
    node: NodeId,
    /// The `w:val` attribute of `w:sdtPr/w:tag`, when present
    tag: Option<String>,
}

impl ContentControl {
    /// Get the id of the `w:sdt` element.
    #[inline]
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Get the control tag.
    #[inline]
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }
}

/// Collect all content controls that carry a tag property, in document order.
///
/// Controls whose `w:sdtPr` has no `w:tag` child are not placeholders and
/// are skipped. A `w:tag` without a `w:val` attribute yields a control with
/// `tag() == None`.
pub fn collect(tree: &DocumentTree) -> Vec<ContentControl> {
    tree.descendants()
        .into_iter()
        .filter(|&id| {
            tree.element(id)
                .is_some_and(|el| el.local_name() == "sdt")
        })
        .filter_map(|id| {
            let tag_el = tag_element(tree, id)?;
            let tag = tree.element(tag_el).and_then(|el| el.attribute("val"));
            Some(ContentControl { node: id, tag })
        })
        .collect()
}

/// Find the `w:tag` element inside a control's `w:sdtPr`.
pub(crate) fn tag_element(tree: &DocumentTree, sdt: NodeId) -> Option<NodeId> {
    let pr = tree.child_element(sdt, "sdtPr")?;
    tree.descendant_elements(pr, "tag").into_iter().next()
}

/// Get a control's tag value, when it has a tag property at all.
///
/// A tag element without a `w:val` attribute yields an empty string, which
/// matches how untagged conditional candidates are classified.
pub(crate) fn tag_value(tree: &DocumentTree, sdt: NodeId) -> Option<String> {
    let tag_el = tag_element(tree, sdt)?;
    Some(
        tree.element(tag_el)
            .and_then(|el| el.attribute("val"))
            .unwrap_or_default(),
    )
}

/// Find a control's `w:sdtContent` element.
pub(crate) fn content_node(tree: &DocumentTree, sdt: NodeId) -> Option<NodeId> {
    tree.child_element(sdt, "sdtContent")
}

/// Collect the `w:t` text runs inside a control's content, in document order.
pub(crate) fn text_runs(tree: &DocumentTree, sdt: NodeId) -> Vec<NodeId> {
    content_node(tree, sdt)
        .map(|content| tree.descendant_elements(content, "t"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> DocumentTree {
        DocumentTree::parse(
            br#"<w:body>
                <w:sdt><w:sdtPr><w:id w:val="1"/><w:tag w:val="Kunde_Name"/></w:sdtPr><w:sdtContent><w:r><w:t>alt</w:t></w:r><w:r><w:t>rest</w:t></w:r></w:sdtContent></w:sdt>
                <w:sdt><w:sdtPr><w:id w:val="2"/></w:sdtPr><w:sdtContent><w:r><w:t>untagged</w:t></w:r></w:sdtContent></w:sdt>
                <w:sdt><w:sdtPr><w:tag/></w:sdtPr><w:sdtContent><w:r><w:t>no val</w:t></w:r></w:sdtContent></w:sdt>
            </w:body>"#,
        )
        .unwrap()
    }

    #[test]
    fn test_collect_skips_controls_without_tag_property() {
        let tree = sample_tree();
        let controls = collect(&tree);
        assert_eq!(controls.len(), 2);
        assert_eq!(controls[0].tag(), Some("Kunde_Name"));
        assert_eq!(controls[1].tag(), None);
    }

    #[test]
    fn test_text_runs_in_document_order() {
        let tree = sample_tree();
        let controls = collect(&tree);
        let runs = text_runs(&tree, controls[0].node());
        assert_eq!(runs.len(), 2);
        assert_eq!(tree.text_content(runs[0]), "alt");
        assert_eq!(tree.text_content(runs[1]), "rest");
    }

    #[test]
    fn test_tag_value_defaults_to_empty_without_val() {
        let tree = sample_tree();
        let controls = collect(&tree);
        assert_eq!(
            tag_value(&tree, controls[1].node()).as_deref(),
            Some("")
        );
    }

    #[test]
    fn test_tag_value_none_without_tag_element() {
        let tree = DocumentTree::parse(
            br#"<w:body><w:sdt><w:sdtPr/><w:sdtContent/></w:sdt></w:body>"#,
        )
        .unwrap();
        let sdt = tree.child_element(tree.roots()[0], "sdt").unwrap();
        assert_eq!(tag_value(&tree, sdt), None);
    }
}
