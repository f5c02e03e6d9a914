//! Document-level types.

use super::Element;
use serde::{Deserialize, Serialize};

/// TEI namespace URI.
pub const TEI_NS: &str = "http://www.tei-c.org/ns/1.0";

/// A parsed TEI document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeiDocument {
    /// The `TEI` root element
    pub root: Element,
}

impl TeiDocument {
    /// Wrap an already-built root element.
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// Assemble a new document from a header and a `text` element.
    ///
    /// The root declares the TEI default namespace plus any extra namespace
    /// declarations given (e.g. prefixes carried over from a source root).
    pub fn assemble(header: Element, text: Element, namespaces: &[(String, String)]) -> Self {
        let mut root = Element::new("TEI").with_attr("xmlns", TEI_NS);
        for (key, value) in namespaces {
            if key != "xmlns" {
                root.set_attr(key.clone(), value.clone());
            }
        }
        root.push(header);
        root.push(text);
        Self { root }
    }

    /// The `teiHeader` element.
    pub fn header(&self) -> Option<&Element> {
        self.root.child("teiHeader")
    }

    /// The `text` element.
    pub fn text(&self) -> Option<&Element> {
        self.root.child("text")
    }

    /// The `text/body` element.
    pub fn body(&self) -> Option<&Element> {
        self.root.find_path(&["text", "body"])
    }

    /// Namespace declarations (`xmlns`, `xmlns:*`) on the root.
    pub fn namespace_declarations(&self) -> Vec<(String, String)> {
        self.root.namespace_declarations().cloned().collect()
    }

    /// Default namespace declared on the root, if any.
    pub fn default_namespace(&self) -> Option<&str> {
        self.root.attr("xmlns")
    }

    /// Plain text of the body.
    pub fn plain_text(&self) -> String {
        self.body().map(Element::text).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assemble() {
        let doc = TeiDocument::assemble(
            Element::new("teiHeader"),
            Element::new("text").with_child(Element::new("body")),
            &[
                ("xmlns".to_string(), "urn:ignored".to_string()),
                ("xmlns:xi".to_string(), "http://www.w3.org/2001/XInclude".to_string()),
            ],
        );
        assert_eq!(doc.default_namespace(), Some(TEI_NS));
        assert_eq!(doc.root.attr("xmlns:xi"), Some("http://www.w3.org/2001/XInclude"));
        assert!(doc.header().is_some());
        assert!(doc.body().is_some());
    }

    #[test]
    fn test_plain_text_without_body() {
        let doc = TeiDocument::from_root(Element::new("TEI"));
        assert_eq!(doc.plain_text(), "");
        assert!(doc.body().is_none());
    }
}
