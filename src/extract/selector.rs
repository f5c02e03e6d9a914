//! Excerpt segment selection.

use std::collections::BTreeMap;

use crate::model::{Element, Node, TeiDocument};

use super::options::{ExtractOptions, LeadingGapScope};

/// A selected excerpt segment, with its position relative to the
/// surrounding text.
///
/// `text_before` and `text_after` count the non-whitespace text nodes seen
/// in document order before the segment starts and after it ends. Two
/// segments are separated by source text iff the second one's
/// `text_before` exceeds the first one's `text_after`.
#[derive(Debug, Clone)]
pub struct Segment<'a> {
    /// The source `seg` element
    pub element: &'a Element,

    /// Content text nodes preceding the segment
    pub text_before: usize,

    /// Content text nodes preceding the end of the segment
    pub text_after: usize,

    /// Namespace declarations in scope at the segment, from elements below
    /// the root (the segment's own included), outermost first
    pub namespaces: Vec<(String, String)>,
}

impl Segment<'_> {
    /// Whether any content text precedes this segment.
    pub fn has_preceding_text(&self) -> bool {
        self.text_before > 0
    }

    /// Whether content text lies between `previous` and this segment.
    pub fn is_separated_from(&self, previous: &Segment<'_>) -> bool {
        self.text_before > previous.text_after
    }
}

/// Whether an element is an excerpt segment, ignoring status.
pub fn is_excerpt(el: &Element) -> bool {
    el.is("seg") && el.attr("type") == Some("excerpt")
}

/// Select the excerpt segments of a document's body in document order.
///
/// Preceding-text counts cover the whole document or just the body,
/// depending on [`ExtractOptions::leading_gap_scope`]. A document without
/// a body yields no segments.
pub fn select_excerpts<'a>(doc: &'a TeiDocument, options: &ExtractOptions) -> Vec<Segment<'a>> {
    let Some(body) = doc.body() else {
        return Vec::new();
    };

    let mut walker = Walker::new(options, body);
    walker.count_outside_body = options.leading_gap_scope == LeadingGapScope::Document;
    walker.walk(&doc.root, false);
    walker.selected
}

/// Select the excerpt segments below a body element.
///
/// Only text inside `body` counts as preceding text, and only namespace
/// declarations from `body` down are recorded.
pub fn select_in_body<'a>(body: &'a Element, options: &ExtractOptions) -> Vec<Segment<'a>> {
    let mut walker = Walker::new(options, body);
    walker.namespaces = body.namespace_declarations().cloned().collect();
    walker.walk(body, true);
    walker.selected
}

/// Count excerpt segments in the body by status (`""` for no status),
/// regardless of any filter.
pub fn excerpt_status_counts(doc: &TeiDocument) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    if let Some(body) = doc.body() {
        for el in body.descendants().filter(|el| is_excerpt(el)) {
            let status = el.attr("status").unwrap_or("").to_string();
            *counts.entry(status).or_insert(0) += 1;
        }
    }
    counts
}

struct Walker<'a, 'o> {
    options: &'o ExtractOptions,
    body: &'a Element,
    count_outside_body: bool,
    text_seen: usize,
    namespaces: Vec<(String, String)>,
    selected: Vec<Segment<'a>>,
}

impl<'a, 'o> Walker<'a, 'o> {
    fn new(options: &'o ExtractOptions, body: &'a Element) -> Self {
        Self {
            options,
            body,
            count_outside_body: false,
            text_seen: 0,
            namespaces: Vec::new(),
            selected: Vec::new(),
        }
    }

    fn walk(&mut self, el: &'a Element, in_body: bool) {
        for node in &el.children {
            match node {
                Node::Element(child) => {
                    let scope = self.namespaces.len();
                    self.namespaces
                        .extend(child.namespace_declarations().cloned());

                    if in_body && self.selects(child) {
                        let index = self.selected.len();
                        self.selected.push(Segment {
                            element: child,
                            text_before: self.text_seen,
                            text_after: self.text_seen,
                            namespaces: self.namespaces.clone(),
                        });
                        self.walk(child, true);
                        self.selected[index].text_after = self.text_seen;
                    } else {
                        let child_in_body = in_body || std::ptr::eq(child, self.body);
                        self.walk(child, child_in_body);
                    }

                    self.namespaces.truncate(scope);
                }
                node if node.has_content_text() && (in_body || self.count_outside_body) => {
                    self.text_seen += 1
                }
                _ => {}
            }
        }
    }

    fn selects(&self, el: &Element) -> bool {
        is_excerpt(el) && self.options.accepts_status(el.attr("status"))
    }
}
