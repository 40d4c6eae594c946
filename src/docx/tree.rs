/// Owned XML tree for the main document part.
///
/// The tree is parsed once from `word/document.xml`, mutated in place by the
/// resolution engine, and serialized back to bytes when the package is saved.
/// Nodes live in a single arena (`Vec`) and refer to each other by index, so
/// structural edits replace child-index lists instead of invalidating
/// iterators. Removed nodes simply become unreachable; serialization and
/// traversal only ever follow the root list.
///
/// Text and attribute payloads are kept in their escaped wire form so that
/// serialization reproduces the document content exactly. Accessors unescape
/// on read and newly inserted text is escaped on write.
use crate::docx::error::{DocxError, Result};
use quick_xml::Reader;
use quick_xml::escape::{escape, unescape};
use quick_xml::events::Event;

/// Index of a node in the tree arena.
pub type NodeId = usize;

/// A single node in the document tree.
#[derive(Debug, Clone)]
pub enum XmlNode {
    /// An element with a qualified name, attributes and children
    Element(Element),
    /// Character data, stored escaped
    Text(String),
    /// A CDATA section, stored verbatim
    CData(String),
    /// A comment, stored verbatim
    Comment(String),
    /// A processing instruction, stored verbatim
    ProcessingInstruction(String),
    /// A document type declaration, stored verbatim
    DocType(String),
}

/// An element node.
#[derive(Debug, Clone)]
pub struct Element {
    /// Qualified name, e.g. `w:sdt`
    name: String,
    /// Attributes as (qualified name, escaped value) pairs
    attributes: Vec<(String, String)>,
    /// Child nodes in document order
    children: Vec<NodeId>,
    /// Whether the element was written as `<name/>`
    self_closing: bool,
}

impl Element {
    /// Get the qualified element name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the local part of the element name, without any namespace prefix.
    #[inline]
    pub fn local_name(&self) -> &str {
        local_name(&self.name)
    }

    /// Get the child nodes in document order.
    #[inline]
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Look up an attribute by its local name and return the unescaped value.
    ///
    /// Namespace prefixes are ignored, so `attribute("val")` matches `w:val`.
    pub fn attribute(&self, local: &str) -> Option<String> {
        self.attributes
            .iter()
            .find(|(name, _)| local_name(name) == local)
            .map(|(_, value)| unescape_or_raw(value))
    }

    /// Get the raw attribute list as (qualified name, escaped value) pairs.
    #[inline]
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }
}

/// The XML declaration of a parsed document.
#[derive(Debug, Clone)]
struct XmlDecl {
    version: String,
    encoding: Option<String>,
    standalone: Option<String>,
}

/// An owned XML document tree with arena node storage.
pub struct DocumentTree {
    /// Node arena; ids are indices into this vector
    nodes: Vec<XmlNode>,
    /// Top-level nodes in document order
    roots: Vec<NodeId>,
    /// XML declaration, if the document had one
    decl: Option<XmlDecl>,
}

impl DocumentTree {
    /// Parse a document tree from XML bytes.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sdtfill::docx::DocumentTree;
    ///
    /// let tree = DocumentTree::parse(b"<w:document><w:body/></w:document>")?;
    /// assert_eq!(tree.roots().len(), 1);
    /// # Ok::<(), sdtfill::docx::DocxError>(())
    /// ```
    pub fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);

        let mut tree = Self {
            nodes: Vec::new(),
            roots: Vec::new(),
            decl: None,
        };
        let mut stack: Vec<NodeId> = Vec::new();

        loop {
            match reader.read_event() {
                Ok(Event::Start(e)) => {
                    let id = tree.push_element(read_element(&e, false)?);
                    tree.attach(&stack, id);
                    stack.push(id);
                },
                Ok(Event::Empty(e)) => {
                    let id = tree.push_element(read_element(&e, true)?);
                    tree.attach(&stack, id);
                },
                Ok(Event::End(_)) => {
                    if stack.pop().is_none() {
                        return Err(DocxError::Xml("unexpected closing tag".to_string()));
                    }
                },
                Ok(Event::Text(e)) => {
                    let raw = std::str::from_utf8(e.as_ref())
                        .map_err(|e| DocxError::Xml(e.to_string()))?;
                    let id = tree.push_node(XmlNode::Text(raw.to_string()));
                    tree.attach(&stack, id);
                },
                Ok(Event::GeneralRef(e)) => {
                    let name = std::str::from_utf8(&e)
                        .map_err(|e| DocxError::Xml(e.to_string()))?;
                    let id = tree.push_node(XmlNode::Text(format!("&{};", name)));
                    tree.attach(&stack, id);
                },
                Ok(Event::CData(e)) => {
                    let raw = std::str::from_utf8(e.as_ref())
                        .map_err(|e| DocxError::Xml(e.to_string()))?;
                    let id = tree.push_node(XmlNode::CData(raw.to_string()));
                    tree.attach(&stack, id);
                },
                Ok(Event::Comment(e)) => {
                    let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                    let id = tree.push_node(XmlNode::Comment(raw));
                    tree.attach(&stack, id);
                },
                Ok(Event::PI(e)) => {
                    let raw = String::from_utf8_lossy(&e).into_owned();
                    let id = tree.push_node(XmlNode::ProcessingInstruction(raw));
                    tree.attach(&stack, id);
                },
                Ok(Event::DocType(e)) => {
                    let raw = String::from_utf8_lossy(e.as_ref()).into_owned();
                    let id = tree.push_node(XmlNode::DocType(raw));
                    tree.attach(&stack, id);
                },
                Ok(Event::Decl(e)) => {
                    tree.decl = Some(read_decl(&e)?);
                },
                Ok(Event::Eof) => break,
                Err(e) => return Err(DocxError::Xml(e.to_string())),
            }
        }

        if !stack.is_empty() {
            return Err(DocxError::Xml("unclosed element at end of input".to_string()));
        }

        Ok(tree)
    }

    /// Serialize the tree back to an XML string.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        if let Some(decl) = &self.decl {
            out.push_str("<?xml version=\"");
            out.push_str(&decl.version);
            out.push('"');
            if let Some(encoding) = &decl.encoding {
                out.push_str(" encoding=\"");
                out.push_str(encoding);
                out.push('"');
            }
            if let Some(standalone) = &decl.standalone {
                out.push_str(" standalone=\"");
                out.push_str(standalone);
                out.push('"');
            }
            out.push_str("?>");
        }
        for &id in &self.roots {
            self.write_node(id, &mut out);
        }
        out
    }

    /// Serialize the tree back to XML bytes.
    #[inline]
    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_xml().into_bytes()
    }

    /// Get the top-level nodes in document order.
    #[inline]
    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Get a node by id.
    #[inline]
    pub fn node(&self, id: NodeId) -> &XmlNode {
        &self.nodes[id]
    }

    /// Get a node as an element, if it is one.
    pub fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.nodes[id] {
            XmlNode::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Visit every node reachable from the roots in document order.
    ///
    /// Nodes detached by structural edits are not visited.
    pub fn descendants(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut pending: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = pending.pop() {
            out.push(id);
            if let XmlNode::Element(el) = &self.nodes[id] {
                pending.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// Find the first direct child element with the given local name.
    pub fn child_element(&self, id: NodeId, local: &str) -> Option<NodeId> {
        let el = self.element(id)?;
        el.children
            .iter()
            .copied()
            .find(|&child| {
                self.element(child)
                    .is_some_and(|child_el| child_el.local_name() == local)
            })
    }

    /// Collect all descendant elements of a node with the given local name,
    /// in document order.
    pub fn descendant_elements(&self, id: NodeId, local: &str) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut pending: Vec<NodeId> = match &self.nodes[id] {
            XmlNode::Element(el) => el.children.iter().rev().copied().collect(),
            _ => return out,
        };
        while let Some(current) = pending.pop() {
            if let XmlNode::Element(el) = &self.nodes[current] {
                if el.local_name() == local {
                    out.push(current);
                }
                pending.extend(el.children.iter().rev().copied());
            }
        }
        out
    }

    /// Concatenate the unescaped character data beneath a node.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        let mut pending = vec![id];
        while let Some(current) = pending.pop() {
            match &self.nodes[current] {
                XmlNode::Element(el) => pending.extend(el.children.iter().rev().copied()),
                XmlNode::Text(raw) => out.push_str(&unescape_or_raw(raw)),
                XmlNode::CData(raw) => out.push_str(raw),
                _ => {},
            }
        }
        out
    }

    /// Replace the content of an element with a single text value.
    ///
    /// The value is escaped on insertion. An empty value leaves the element
    /// with no children, serializing as `<name></name>`.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let children = if text.is_empty() {
            Vec::new()
        } else {
            let escaped = escape(text).into_owned();
            vec![self.push_node(XmlNode::Text(escaped))]
        };
        if let XmlNode::Element(el) = &mut self.nodes[id] {
            el.children = children;
            el.self_closing = false;
        }
    }

    /// Replace the child list of an element.
    pub(crate) fn set_children(&mut self, id: NodeId, children: Vec<NodeId>) {
        if let XmlNode::Element(el) = &mut self.nodes[id] {
            el.children = children;
        }
    }

    /// Replace the root list.
    pub(crate) fn set_roots(&mut self, roots: Vec<NodeId>) {
        self.roots = roots;
    }

    fn push_node(&mut self, node: XmlNode) -> NodeId {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    #[inline]
    fn push_element(&mut self, element: Element) -> NodeId {
        self.push_node(XmlNode::Element(element))
    }

    /// Attach a freshly created node to the innermost open element, or to the
    /// root list when no element is open.
    fn attach(&mut self, stack: &[NodeId], id: NodeId) {
        match stack.last() {
            Some(&parent) => {
                if let XmlNode::Element(el) = &mut self.nodes[parent] {
                    el.children.push(id);
                }
            },
            None => self.roots.push(id),
        }
    }

    fn write_node(&self, id: NodeId, out: &mut String) {
        match &self.nodes[id] {
            XmlNode::Element(el) => {
                out.push('<');
                out.push_str(&el.name);
                for (name, value) in &el.attributes {
                    out.push(' ');
                    out.push_str(name);
                    out.push_str("=\"");
                    out.push_str(value);
                    out.push('"');
                }
                if el.self_closing && el.children.is_empty() {
                    out.push_str("/>");
                } else {
                    out.push('>');
                    for &child in &el.children {
                        self.write_node(child, out);
                    }
                    out.push_str("</");
                    out.push_str(&el.name);
                    out.push('>');
                }
            },
            XmlNode::Text(raw) => out.push_str(raw),
            XmlNode::CData(raw) => {
                out.push_str("<![CDATA[");
                out.push_str(raw);
                out.push_str("]]>");
            },
            XmlNode::Comment(raw) => {
                out.push_str("<!--");
                out.push_str(raw);
                out.push_str("-->");
            },
            XmlNode::ProcessingInstruction(raw) => {
                out.push_str("<?");
                out.push_str(raw);
                out.push_str("?>");
            },
            XmlNode::DocType(raw) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(raw);
                out.push('>');
            },
        }
    }
}

/// Get the local part of a qualified name.
pub(crate) fn local_name(qualified: &str) -> &str {
    match qualified.rfind(':') {
        Some(idx) => &qualified[idx + 1..],
        None => qualified,
    }
}

/// Unescape a stored value, falling back to the raw form when it contains
/// references this parser does not resolve.
fn unescape_or_raw(raw: &str) -> String {
    match unescape(raw) {
        Ok(value) => value.into_owned(),
        Err(_) => raw.to_string(),
    }
}

/// Normalize an attribute value to a canonical escaped form that is safe to
/// serialize inside double quotes.
fn normalize_attr(raw: &str) -> String {
    match unescape(raw) {
        Ok(value) => escape(value.as_ref()).into_owned(),
        Err(_) => raw.to_string(),
    }
}

fn read_element(
    e: &quick_xml::events::BytesStart<'_>,
    self_closing: bool,
) -> Result<Element> {
    let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| DocxError::Xml(err.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = normalize_attr(&String::from_utf8_lossy(&attr.value));
        attributes.push((key, value));
    }
    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        self_closing,
    })
}

fn read_decl(e: &quick_xml::events::BytesDecl<'_>) -> Result<XmlDecl> {
    let version = e
        .version()
        .map_err(|err| DocxError::Xml(err.to_string()))?;
    let version = String::from_utf8_lossy(version.as_ref()).into_owned();
    let encoding = match e.encoding() {
        Some(enc) => Some(
            String::from_utf8_lossy(
                enc.map_err(|err| DocxError::Xml(err.to_string()))?.as_ref(),
            )
            .into_owned(),
        ),
        None => None,
    };
    let standalone = match e.standalone() {
        Some(sa) => Some(
            String::from_utf8_lossy(
                sa.map_err(|err| DocxError::Xml(err.to_string()))?.as_ref(),
            )
            .into_owned(),
        ),
        None => None,
    };
    Ok(XmlDecl {
        version,
        encoding,
        standalone,
    })
}
