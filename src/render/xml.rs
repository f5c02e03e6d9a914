//! XML serialization for TEI documents.

use quick_xml::escape::{escape, partial_escape};

use crate::model::{Element, Node, TeiDocument};

/// XML declaration written at the top of every document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

const INDENT: &str = "  ";

/// XML output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum XmlFormat {
    /// Indented output; elements holding text are written as-is
    #[default]
    Pretty,
    /// Source whitespace only, no added indentation
    Compact,
}

/// Serialize a document, with declaration.
pub fn to_xml(doc: &TeiDocument, format: XmlFormat) -> String {
    let mut out = String::with_capacity(4096);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    match format {
        XmlFormat::Pretty => write_pretty(&doc.root, 0, &mut out),
        XmlFormat::Compact => write_inline(&doc.root, &mut out),
    }
    out.push('\n');
    out
}

/// Serialize a single element without declaration.
pub fn element_to_xml(el: &Element, format: XmlFormat) -> String {
    let mut out = String::new();
    match format {
        XmlFormat::Pretty => write_pretty(el, 0, &mut out),
        XmlFormat::Compact => write_inline(el, &mut out),
    }
    out
}

/// An element is indented only when none of its children is content text,
/// so mixed content keeps its exact whitespace.
fn is_structural(el: &Element) -> bool {
    !el.children.iter().any(Node::has_content_text)
}

fn write_pretty(el: &Element, depth: usize, out: &mut String) {
    if el.is_empty() || !is_structural(el) {
        write_inline(el, out);
        return;
    }

    let children: Vec<&Node> = el
        .children
        .iter()
        .filter(|node| node.as_text().is_none())
        .collect();
    if children.is_empty() {
        write_empty_tag(el, out);
        return;
    }

    write_start_tag(el, out);
    for node in children {
        out.push('\n');
        push_indent(depth + 1, out);
        match node {
            Node::Element(child) => write_pretty(child, depth + 1, out),
            other => write_node(other, out),
        }
    }
    out.push('\n');
    push_indent(depth, out);
    write_end_tag(el, out);
}

fn write_inline(el: &Element, out: &mut String) {
    if el.is_empty() {
        write_empty_tag(el, out);
        return;
    }
    write_start_tag(el, out);
    for node in &el.children {
        write_node(node, out);
    }
    write_end_tag(el, out);
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => write_inline(el, out),
        Node::Text(text) => out.push_str(&partial_escape(text.as_str())),
        Node::CData(text) => {
            out.push_str("<![CDATA[");
            out.push_str(text);
            out.push_str("]]>");
        }
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Node::ProcessingInstruction(text) => {
            out.push_str("<?");
            out.push_str(text);
            out.push_str("?>");
        }
    }
}

fn write_attributes(el: &Element, out: &mut String) {
    for (key, value) in &el.attributes {
        out.push(' ');
        out.push_str(key);
        out.push_str("=\"");
        out.push_str(&escape(value.as_str()));
        out.push('"');
    }
}

fn write_start_tag(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    write_attributes(el, out);
    out.push('>');
}

fn write_empty_tag(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.name);
    write_attributes(el, out);
    out.push_str("/>");
}

fn write_end_tag(el: &Element, out: &mut String) {
    out.push_str("</");
    out.push_str(&el.name);
    out.push('>');
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TeiDocument {
        TeiDocument::from_root(
            Element::new("TEI")
                .with_attr("xmlns", "http://www.tei-c.org/ns/1.0")
                .with_child(Element::new("teiHeader").with_text("\n  "))
                .with_child(
                    Element::new("text").with_child(
                        Element::new("body")
                            .with_child(Element::new("gap").with_attr("reason", "omitted"))
                            .with_child(
                                Element::new("ab")
                                    .with_text("a & b ")
                                    .with_child(Element::new("hi").with_text("c"))
                                    .with_text(" <d>"),
                            ),
                    ),
                ),
        )
    }

    #[test]
    fn test_pretty_output() {
        let xml = to_xml(&sample(), XmlFormat::Pretty);
        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<TEI xmlns="http://www.tei-c.org/ns/1.0">
  <teiHeader/>
  <text>
    <body>
      <gap reason="omitted"/>
      <ab>a &amp; b <hi>c</hi> &lt;d&gt;</ab>
    </body>
  </text>
</TEI>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_compact_output() {
        let xml = to_xml(&sample(), XmlFormat::Compact);
        assert!(xml.starts_with(XML_DECLARATION));
        assert!(xml.contains("<teiHeader>\n  </teiHeader><text><body>"));
    }

    #[test]
    fn test_attribute_escaping() {
        let el = Element::new("ref").with_attr("target", r#"a"b<c&d"#);
        assert_eq!(
            element_to_xml(&el, XmlFormat::Compact),
            r#"<ref target="a&quot;b&lt;c&amp;d"/>"#
        );
    }

    #[test]
    fn test_comments_and_cdata() {
        let mut el = Element::new("div").with_child(Element::new("p"));
        el.children.push(Node::Comment(" note ".into()));
        el.children.push(Node::CData("x<y".into()));
        let xml = element_to_xml(&el, XmlFormat::Compact);
        assert_eq!(xml, "<div><p/><!-- note --><![CDATA[x<y]]></div>");
    }
}
