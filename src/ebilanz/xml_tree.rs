//! Owned XML tree on top of quick-xml events.
//!
//! Templates are merged in place, so the tree keeps everything the template
//! author wrote: comments, processing instructions, CDATA, whitespace and the
//! namespace prefixes used in the source. Every element also carries its
//! resolved [`QualifiedName`].

use std::collections::HashMap;
use std::io::{Cursor, Write};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::Writer;
use quick_xml::escape::partial_escape;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use crate::core::{BilanzError, QualifiedName};

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Deepest element nesting [`XmlDocument::parse`] accepts. ELSTER envelopes
/// nest about a dozen levels; anything past this limit is rejected.
pub const MAX_DEPTH: usize = 512;

/// A node in the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    CData(String),
    Comment(String),
    ProcessingInstruction(String),
}

/// An element with its resolved name, source prefix, attributes and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: QualifiedName,
    /// Prefix to write the element with; `None` means unprefixed.
    prefix: Option<String>,
    /// Attributes in source order, namespace declarations included.
    attributes: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    /// Create an empty element. The prefix is a preference; the serializer
    /// declares it if it is not bound in scope.
    pub fn new(name: QualifiedName, prefix: Option<String>) -> Self {
        Self {
            name,
            prefix: prefix.filter(|p| !p.is_empty()),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn name(&self) -> &QualifiedName {
        &self.name
    }

    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl DoubleEndedIterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(el) => Some(el),
            _ => None,
        })
    }

    /// First direct child with the given name.
    pub fn find_child(&self, name: &QualifiedName) -> Option<&Element> {
        self.child_elements().find(|el| &el.name == name)
    }

    pub fn find_child_mut(&mut self, name: &QualifiedName) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if &el.name == name => Some(el),
            _ => None,
        })
    }

    pub fn append_child(&mut self, child: Element) -> &mut Element {
        self.children.push(Node::Element(child));
        match self.children.last_mut() {
            Some(Node::Element(el)) => el,
            _ => unreachable!("element was just pushed"),
        }
    }

    pub fn push_node(&mut self, node: Node) {
        self.children.push(node);
    }

    /// First element with the given name in depth-first document order,
    /// starting with `self`.
    pub fn find(&self, name: &QualifiedName) -> Option<&Element> {
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            if &el.name == name {
                return Some(el);
            }
            stack.extend(el.child_elements().rev());
        }
        None
    }

    pub fn find_mut(&mut self, name: &QualifiedName) -> Option<&mut Element> {
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            if &el.name == name {
                return Some(el);
            }
            stack.extend(el.children.iter_mut().rev().filter_map(|node| match node {
                Node::Element(child) => Some(child),
                _ => None,
            }));
        }
        None
    }

    /// All elements in depth-first document order, `self` first.
    pub fn descendants(&self) -> Vec<&Element> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(el) = stack.pop() {
            out.push(el);
            stack.extend(el.child_elements().rev());
        }
        out
    }

    /// Text and CDATA before the first child element. Comments and
    /// processing instructions in between are skipped.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for node in self.leading_nodes() {
            if let Node::Text(t) | Node::CData(t) = node {
                out.push_str(t);
            }
        }
        out
    }

    /// Replace the text before the first child element. Comments in that
    /// stretch are kept and follow the new text.
    pub fn set_text(&mut self, text: &str) {
        let leading = self.leading_nodes().count();
        let mut index = 0;
        self.children.retain(|node| {
            index += 1;
            index > leading || !matches!(node, Node::Text(_) | Node::CData(_))
        });
        if !text.is_empty() {
            self.children.insert(0, Node::Text(text.to_string()));
        }
    }

    fn leading_nodes(&self) -> impl Iterator<Item = &Node> {
        self.children
            .iter()
            .take_while(|node| !matches!(node, Node::Element(_)))
    }
}

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    doctype: Option<String>,
    /// Comments and processing instructions before the document element.
    prolog: Vec<Node>,
    root: Element,
    epilog: Vec<Node>,
}

impl XmlDocument {
    pub fn new(root: Element) -> Self {
        Self {
            doctype: None,
            prolog: Vec::new(),
            root,
            epilog: Vec::new(),
        }
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Element {
        &mut self.root
    }

    pub fn from_path(path: &Path) -> Result<Self, BilanzError> {
        let xml = std::fs::read_to_string(path).map_err(|e| BilanzError::io(path, e))?;
        Self::parse(&xml)
    }

    /// Parse a document, resolving every element name against the namespace
    /// declarations in scope.
    pub fn parse(xml: &str) -> Result<Self, BilanzError> {
        let mut reader = Reader::from_str(xml);
        let mut scopes = NamespaceScopes::default();
        let mut stack: Vec<Element> = Vec::new();
        let mut doc = PartialDocument::default();

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(BilanzError::Xml(format!(
                        "parse error at position {}: {e}",
                        reader.buffer_position()
                    )));
                }
            };
            match event {
                Event::Start(ref e) => {
                    check_depth(stack.len())?;
                    let el = open_element(e, &mut scopes)?;
                    stack.push(el);
                }
                Event::Empty(ref e) => {
                    check_depth(stack.len())?;
                    let el = open_element(e, &mut scopes)?;
                    scopes.pop();
                    doc.attach(&mut stack, el)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| BilanzError::Xml("unexpected closing tag".into()))?;
                    scopes.pop();
                    doc.attach(&mut stack, el)?;
                }
                Event::Text(ref e) => {
                    let text = e
                        .unescape()
                        .map_err(|err| BilanzError::Xml(format!("invalid text: {err}")))?
                        .into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text)),
                        None if text.trim().is_empty() => {}
                        None => {
                            return Err(BilanzError::Xml(
                                "text content outside the document element".into(),
                            ));
                        }
                    }
                }
                Event::CData(ref e) => {
                    let text = utf8(e)?;
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::CData(text)),
                        None => {
                            return Err(BilanzError::Xml(
                                "CDATA outside the document element".into(),
                            ));
                        }
                    }
                }
                Event::Comment(ref e) => {
                    let node = Node::Comment(utf8(e)?);
                    doc.push_misc(&mut stack, node);
                }
                Event::PI(ref e) => {
                    let node = Node::ProcessingInstruction(utf8(e)?);
                    doc.push_misc(&mut stack, node);
                }
                Event::DocType(ref e) => doc.doctype = Some(utf8(e)?.trim().to_string()),
                Event::Decl(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(BilanzError::Xml(format!(
                "unexpected end of document inside <{}>",
                open.name
            )));
        }
        let root = doc
            .root
            .ok_or_else(|| BilanzError::Xml("document has no root element".into()))?;
        Ok(Self {
            doctype: doc.doctype,
            prolog: doc.prolog,
            root,
            epilog: doc.epilog,
        })
    }

    /// Serialize as UTF-8 with an XML declaration.
    pub fn to_xml_string(&self) -> Result<String, BilanzError> {
        let mut writer = Writer::new(Cursor::new(Vec::new()));
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(write_err)?;
        newline(&mut writer)?;

        if let Some(doctype) = &self.doctype {
            writer
                .write_event(Event::DocType(BytesText::from_escaped(doctype.as_str())))
                .map_err(write_err)?;
            newline(&mut writer)?;
        }
        for node in &self.prolog {
            write_node(&mut writer, node, &mut NamespaceScopes::default())?;
            newline(&mut writer)?;
        }

        write_element(&mut writer, &self.root, &mut NamespaceScopes::default())?;

        for node in &self.epilog {
            newline(&mut writer)?;
            write_node(&mut writer, node, &mut NamespaceScopes::default())?;
        }

        let buf = writer.into_inner().into_inner();
        String::from_utf8(buf).map_err(|e| BilanzError::Xml(format!("UTF-8 error: {e}")))
    }

    pub fn write_to_path(&self, path: &Path) -> Result<(), BilanzError> {
        let xml = self.to_xml_string()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| BilanzError::io(parent, e))?;
        }
        std::fs::write(path, xml).map_err(|e| BilanzError::io(path, e))
    }
}

#[derive(Default)]
struct PartialDocument {
    doctype: Option<String>,
    prolog: Vec<Node>,
    root: Option<Element>,
    epilog: Vec<Node>,
}

impl PartialDocument {
    fn attach(&mut self, stack: &mut [Element], el: Element) -> Result<(), BilanzError> {
        if let Some(parent) = stack.last_mut() {
            parent.children.push(Node::Element(el));
        } else if self.root.is_none() {
            self.root = Some(el);
        } else {
            return Err(BilanzError::Xml("multiple root elements".into()));
        }
        Ok(())
    }

    fn push_misc(&mut self, stack: &mut [Element], node: Node) {
        match stack.last_mut() {
            Some(parent) => parent.children.push(node),
            None if self.root.is_none() => self.prolog.push(node),
            None => self.epilog.push(node),
        }
    }
}

/// Namespace bindings in scope.
///
/// Each prefix and each URI maps to a stack of bindings, innermost last.
/// `frames` records what every open element declared so `pop` can undo it.
#[derive(Default)]
struct NamespaceScopes {
    by_prefix: HashMap<String, Vec<String>>,
    by_uri: HashMap<String, Vec<String>>,
    frames: Vec<Vec<(String, String)>>,
}

impl NamespaceScopes {
    fn push(&mut self, declarations: Vec<(String, String)>) {
        for (prefix, uri) in &declarations {
            self.declare(prefix, uri);
        }
        self.frames.push(declarations);
    }

    fn pop(&mut self) {
        let Some(declarations) = self.frames.pop() else {
            return;
        };
        for (prefix, uri) in declarations.iter().rev() {
            pop_binding(&mut self.by_prefix, prefix);
            pop_binding(&mut self.by_uri, uri);
        }
    }

    /// Add a declaration to the innermost open element.
    fn bind(&mut self, prefix: &str, uri: &str) {
        self.declare(prefix, uri);
        if let Some(frame) = self.frames.last_mut() {
            frame.push((prefix.to_string(), uri.to_string()));
        }
    }

    fn declare(&mut self, prefix: &str, uri: &str) {
        self.by_prefix
            .entry(prefix.to_string())
            .or_default()
            .push(uri.to_string());
        self.by_uri
            .entry(uri.to_string())
            .or_default()
            .push(prefix.to_string());
    }

    /// URI bound to `prefix` (empty prefix = default namespace).
    fn resolve(&self, prefix: &str) -> Option<&str> {
        if prefix == "xml" {
            return Some(XML_NS);
        }
        let uri = self.by_prefix.get(prefix)?.last()?;
        // xmlns="" undeclares the default namespace
        (!uri.is_empty()).then_some(uri.as_str())
    }

    /// An in-scope, unshadowed prefix bound to `uri`.
    fn prefix_for(&self, uri: &str) -> Option<String> {
        self.by_uri
            .get(uri)?
            .iter()
            .rev()
            .find(|p| self.resolve(p) == Some(uri))
            .cloned()
    }
}

fn pop_binding(map: &mut HashMap<String, Vec<String>>, key: &str) {
    if let Some(stack) = map.get_mut(key) {
        stack.pop();
        if stack.is_empty() {
            map.remove(key);
        }
    }
}

fn check_depth(open: usize) -> Result<(), BilanzError> {
    if open >= MAX_DEPTH {
        return Err(BilanzError::Xml(format!(
            "elements nested deeper than {MAX_DEPTH} levels"
        )));
    }
    Ok(())
}

fn namespace_declarations(attributes: &[(String, String)]) -> Vec<(String, String)> {
    attributes
        .iter()
        .filter_map(|(key, value)| {
            if key == "xmlns" {
                Some((String::new(), value.clone()))
            } else {
                key.strip_prefix("xmlns:")
                    .map(|prefix| (prefix.to_string(), value.clone()))
            }
        })
        .collect()
}

fn open_element(start: &BytesStart, scopes: &mut NamespaceScopes) -> Result<Element, BilanzError> {
    let raw = std::str::from_utf8(start.name().as_ref())
        .map_err(|e| BilanzError::Xml(format!("invalid UTF-8 in element name: {e}")))?
        .to_string();

    let mut attributes = Vec::new();
    for attr in start.attributes() {
        let attr =
            attr.map_err(|e| BilanzError::Xml(format!("invalid attribute in <{raw}>: {e}")))?;
        let key = std::str::from_utf8(attr.key.as_ref())
            .map_err(|e| BilanzError::Xml(format!("invalid UTF-8 in attribute name: {e}")))?
            .to_string();
        let value = attr
            .unescape_value()
            .map_err(|e| BilanzError::Xml(format!("invalid value for '{key}' in <{raw}>: {e}")))?
            .into_owned();
        attributes.push((key, value));
    }
    scopes.push(namespace_declarations(&attributes));

    let (prefix, local) = match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw.as_str()),
    };
    let namespace = scopes.resolve(prefix.unwrap_or("")).map(str::to_string);
    if let (Some(prefix), None) = (prefix, &namespace) {
        return Err(BilanzError::Xml(format!(
            "undeclared namespace prefix '{prefix}' on <{raw}>"
        )));
    }

    Ok(Element {
        name: QualifiedName {
            namespace,
            local: local.to_string(),
        },
        prefix: prefix.map(str::to_string),
        attributes,
        children: Vec::new(),
    })
}

type XmlWriter = Writer<Cursor<Vec<u8>>>;

fn write_err(e: impl std::fmt::Display) -> BilanzError {
    BilanzError::Xml(format!("XML write error: {e}"))
}

fn newline(writer: &mut XmlWriter) -> Result<(), BilanzError> {
    writer.get_mut().write_all(b"\n").map_err(write_err)
}

fn utf8(bytes: &[u8]) -> Result<String, BilanzError> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|e| BilanzError::Xml(format!("invalid UTF-8: {e}")))
}

enum Step<'a> {
    Open(&'a Element),
    Close(String),
    Misc(&'a Node),
}

/// Write `root` and its subtree without recursing.
fn write_element(
    writer: &mut XmlWriter,
    root: &Element,
    scopes: &mut NamespaceScopes,
) -> Result<(), BilanzError> {
    let mut steps = vec![Step::Open(root)];
    while let Some(step) = steps.pop() {
        match step {
            Step::Open(el) => {
                let (name, start) = start_tag(el, scopes);
                if el.children.is_empty() {
                    writer.write_event(Event::Empty(start)).map_err(write_err)?;
                    scopes.pop();
                    continue;
                }
                writer.write_event(Event::Start(start)).map_err(write_err)?;
                steps.push(Step::Close(name));
                steps.extend(el.children.iter().rev().map(|child| match child {
                    Node::Element(child) => Step::Open(child),
                    other => Step::Misc(other),
                }));
            }
            Step::Close(name) => {
                writer
                    .write_event(Event::End(BytesEnd::new(name)))
                    .map_err(write_err)?;
                scopes.pop();
            }
            Step::Misc(node) => write_node(writer, node, scopes)?,
        }
    }
    Ok(())
}

/// Open a scope for `el` and build its start tag, declaring its namespace
/// where the source prefix is not bound.
fn start_tag(el: &Element, scopes: &mut NamespaceScopes) -> (String, BytesStart<'static>) {
    let mut attributes = el.attributes.clone();
    scopes.push(namespace_declarations(&attributes));

    let prefix = match &el.name.namespace {
        Some(uri) => {
            let preferred = el.prefix.as_deref().unwrap_or("");
            if scopes.resolve(preferred) == Some(uri.as_str()) {
                preferred.to_string()
            } else if let Some(bound) = scopes.prefix_for(uri) {
                bound
            } else {
                let key = if preferred.is_empty() {
                    "xmlns".to_string()
                } else {
                    format!("xmlns:{preferred}")
                };
                attributes.push((key, uri.clone()));
                scopes.bind(preferred, uri);
                preferred.to_string()
            }
        }
        None => {
            if scopes.resolve("").is_some() {
                attributes.push(("xmlns".into(), String::new()));
                scopes.bind("", "");
            }
            String::new()
        }
    };
    let name = if prefix.is_empty() {
        el.name.local.clone()
    } else {
        format!("{prefix}:{}", el.name.local)
    };

    let mut start = BytesStart::new(name.clone());
    for (key, value) in &attributes {
        start.push_attribute((key.as_str(), value.as_str()));
    }
    (name, start)
}

fn write_node(
    writer: &mut XmlWriter,
    node: &Node,
    scopes: &mut NamespaceScopes,
) -> Result<(), BilanzError> {
    let event = match node {
        Node::Element(el) => return write_element(writer, el, scopes),
        Node::Text(text) => Event::Text(BytesText::from_escaped(partial_escape(text.as_str()))),
        Node::CData(text) => Event::CData(BytesCData::new(text.as_str())),
        Node::Comment(text) => Event::Comment(BytesText::from_escaped(text.as_str())),
        Node::ProcessingInstruction(text) => Event::PI(BytesPI::new(text.as_str())),
    };
    writer.write_event(event).map_err(write_err)
}
