//! Owned XML node tree.

use serde::{Deserialize, Serialize};

/// A node in the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Node {
    /// Element with attributes and children
    Element(Element),

    /// Character data (already unescaped)
    Text(String),

    /// CDATA section content
    CData(String),

    /// Comment content (without `<!--` / `-->`)
    Comment(String),

    /// Processing instruction content (without `<?` / `?>`)
    ProcessingInstruction(String),
}

impl Node {
    /// Get the element if this node is one.
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(el) => Some(el),
            _ => None,
        }
    }

    /// Get the character data of a text or CDATA node.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(text) | Node::CData(text) => Some(text),
            _ => None,
        }
    }

    /// Whether this node is character data containing something other than
    /// XML whitespace.
    pub fn has_content_text(&self) -> bool {
        self.as_text().is_some_and(|t| !is_blank(t))
    }
}

impl From<Element> for Node {
    fn from(el: Element) -> Self {
        Node::Element(el)
    }
}

/// An XML element.
///
/// Names are kept exactly as written in the source (`seg`, `tei:seg`);
/// lookups compare local names so both spellings match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Qualified element name
    pub name: String,

    /// Attributes in source order, qualified names as keys
    pub attributes: Vec<(String, String)>,

    /// Child nodes in document order
    pub children: Vec<Node>,
}

impl Element {
    /// Create a new empty element.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder: add an attribute.
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(key, value);
        self
    }

    /// Builder: add a text child.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    /// Builder: add an element child.
    pub fn with_child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Local part of the element name.
    pub fn local_name(&self) -> &str {
        local_part(&self.name)
    }

    /// Whether the local name equals `name`.
    pub fn is(&self, name: &str) -> bool {
        self.local_name() == name
    }

    /// Get an attribute value by its exact (qualified) key.
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Set an attribute, replacing any existing value.
    pub fn set_attr(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(slot) => slot.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Namespace declarations (`xmlns`, `xmlns:*`) made on this element.
    pub fn namespace_declarations(&self) -> impl Iterator<Item = &(String, String)> {
        self.attributes
            .iter()
            .filter(|(k, _)| k == "xmlns" || k.starts_with("xmlns:"))
    }

    /// Append an element child.
    pub fn push(&mut self, child: Element) {
        self.children.push(Node::Element(child));
    }

    /// Replace all children with a single text node.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.children = vec![Node::Text(text.into())];
    }

    /// Iterate over child elements.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    /// First child element with the given local name.
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.elements().find(|el| el.is(name))
    }

    /// Mutable first child element with the given local name.
    pub fn child_mut(&mut self, name: &str) -> Option<&mut Element> {
        self.children.iter_mut().find_map(|node| match node {
            Node::Element(el) if el.is(name) => Some(el),
            _ => None,
        })
    }

    /// First child element with the given local name, appending a new empty
    /// one if there is none.
    pub fn child_or_insert(&mut self, name: &str) -> &mut Element {
        if self.child(name).is_none() {
            self.push(Element::new(name));
        }
        self.child_mut(name).expect("child exists after insert")
    }

    /// Follow a path of local names through child elements.
    pub fn find_path(&self, path: &[&str]) -> Option<&Element> {
        path.iter().try_fold(self, |el, name| el.child(name))
    }

    /// Remove and return every child element with the given local name.
    pub fn take_children(&mut self, name: &str) -> Vec<Element> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.children.len());
        for node in self.children.drain(..) {
            match node {
                Node::Element(el) if el.is(name) => taken.push(el),
                other => kept.push(other),
            }
        }
        self.children = kept;
        taken
    }

    /// Iterate over all descendant elements in document order (pre-order),
    /// not including `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Concatenated character data of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    /// Whether the element has no child nodes.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

fn collect_text(el: &Element, out: &mut String) {
    for node in &el.children {
        match node {
            Node::Text(t) | Node::CData(t) => out.push_str(t),
            Node::Element(child) => collect_text(child, out),
            _ => {}
        }
    }
}

/// Pre-order iterator over descendant elements.
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Element;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if let Node::Element(el) = node {
                self.stack.extend(el.children.iter().rev());
                return Some(el);
            }
        }
        None
    }
}

/// Local part of a qualified name (`tei:seg` -> `seg`).
pub fn local_part(name: &str) -> &str {
    name.rsplit_once(':').map_or(name, |(_, local)| local)
}

/// Whether text consists only of XML whitespace (space, tab, CR, LF).
pub fn is_blank(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}
