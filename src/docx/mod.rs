/// Word (.docx) document support.
///
/// This module provides reading and writing of Word report templates in the
/// Office Open XML (OOXML) format.
///
/// # Architecture
///
/// The module is organized around these key types:
/// - `Package`: the overall .docx file package (ZIP archive of parts)
/// - `DocumentTree`: the owned XML tree of the main document part
/// - `ContentControl`: a tagged `w:sdt` placeholder region in the tree
///
/// # Example
///
/// ```rust,no_run
/// use sdtfill::docx::{content_control, DocumentTree, Package};
///
/// let pkg = Package::open("template.docx")?;
/// let tree = DocumentTree::parse(pkg.document_xml()?)?;
///
/// for control in content_control::collect(&tree) {
///     if let Some(tag) = control.tag() {
///         println!("placeholder: {}", tag);
///     }
/// }
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub mod content_control;
pub mod error;
pub mod package;
pub mod tree;

pub use content_control::ContentControl;
pub use error::{DocxError, Result};
pub use package::Package;
pub use tree::{DocumentTree, Element, NodeId, XmlNode};
