//! Body reassembly from selected excerpts.

use crate::model::Element;

use super::options::{ExtractOptions, GapPolicy};
use super::selector::Segment;

/// Reason attribute carried by every synthesized gap.
pub const GAP_REASON: &str = "omitted";

/// Counts of what the reassembler produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BodyStats {
    /// Number of `ab` blocks
    pub blocks: usize,

    /// Number of `gap` markers
    pub gaps: usize,
}

/// A fresh `<gap reason="omitted"/>`.
pub fn gap() -> Element {
    Element::new("gap").with_attr("reason", GAP_REASON)
}

/// Build a `text` element whose `body` holds one `ab` block per segment,
/// with gap markers for the content left out.
///
/// Block children are copies of the segment's child nodes; the source tree
/// is left untouched. Prefixed namespace declarations made below the source
/// root and in scope at a segment are redeclared on its block.
pub fn reassemble_body(segments: &[Segment<'_>], options: &ExtractOptions) -> (Element, BodyStats) {
    let mut body = Element::new("body");
    let mut stats = BodyStats::default();

    if segments.first().is_some_and(Segment::has_preceding_text) {
        body.push(gap());
        stats.gaps += 1;
    }

    for (idx, segment) in segments.iter().enumerate() {
        if idx > 0 {
            let insert = match options.gap_policy {
                GapPolicy::Always => true,
                GapPolicy::WhenSeparated => segment.is_separated_from(&segments[idx - 1]),
            };
            if insert {
                body.push(gap());
                stats.gaps += 1;
            }
        }

        let mut block = Element::new("ab");
        for (key, uri) in &segment.namespaces {
            // The block stays in the TEI default namespace
            if key.starts_with("xmlns:") {
                block.set_attr(key.clone(), uri.clone());
            }
        }
        block.children = segment.element.children.clone();
        body.push(block);
        stats.blocks += 1;
    }

    (Element::new("text").with_child(body), stats)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::selector::select_in_body;
    use crate::model::Node;
    use crate::parser::{ParseOptions, TeiParser};
    use crate::TeiDocument;

    fn doc(body: &str) -> TeiDocument {
        let xml = format!("<TEI><teiHeader/><text><body>{}</body></text></TEI>", body);
        TeiParser::from_str_with_options(&xml, ParseOptions::default())
            .parse()
            .unwrap()
    }

    fn layout(text: &Element) -> Vec<String> {
        text.child("body")
            .unwrap()
            .elements()
            .map(|el| el.local_name().to_string())
            .collect()
    }

    #[test]
    fn test_blocks_and_gaps() {
        let d = doc(
            r#"<p>intro</p><seg type="excerpt" status="finalized">a</seg><seg type="excerpt" status="reviewed">b<hi>c</hi>d</seg><seg type="excerpt" status="edited">e</seg>"#,
        );
        let options = ExtractOptions::default();
        let segments = select_in_body(d.body().unwrap(), &options);
        let (text, stats) = reassemble_body(&segments, &options);

        assert_eq!(layout(&text), vec!["gap", "ab", "gap", "ab", "gap", "ab"]);
        assert_eq!(stats, BodyStats { blocks: 3, gaps: 3 });

        let body = text.child("body").unwrap();
        let second = body.elements().nth(3).unwrap();
        assert_eq!(second.children.len(), 3);
        assert_eq!(second.children[0], Node::Text("b".into()));
        assert_eq!(second.child("hi").unwrap().text(), "c");
        assert_eq!(body.child("gap").unwrap().attr("reason"), Some("omitted"));
    }

    #[test]
    fn test_no_leading_gap_without_preceding_text() {
        let d = doc("\n <seg type=\"excerpt\" status=\"finalized\">a</seg> <seg type=\"excerpt\" status=\"finalized\">b</seg>");
        let options = ExtractOptions::default();
        let segments = select_in_body(d.body().unwrap(), &options);
        let (text, stats) = reassemble_body(&segments, &options);

        // Adjacent in the source, but the default policy still separates them
        assert_eq!(layout(&text), vec!["ab", "gap", "ab"]);
        assert_eq!(stats.gaps, 1);
    }

    #[test]
    fn test_when_separated_policy() {
        let d = doc(
            r#"<seg type="excerpt" status="finalized">a</seg> <seg type="excerpt" status="finalized">b</seg><p>skip</p><seg type="excerpt" status="finalized">c</seg>"#,
        );
        let options = ExtractOptions::new().with_gap_policy(GapPolicy::WhenSeparated);
        let segments = select_in_body(d.body().unwrap(), &options);
        let (text, _) = reassemble_body(&segments, &options);

        assert_eq!(layout(&text), vec!["ab", "ab", "gap", "ab"]);
    }

    #[test]
    fn test_block_redeclares_namespaces() {
        let d = doc(
            r#"<div xmlns:tib="urn:tibschol:x"><seg type="excerpt" status="finalized">a <tib:name>b</tib:name></seg></div>
               <seg type="excerpt" status="finalized" xmlns:tib="urn:tibschol:y" xmlns:x="urn:x"><tib:name>c</tib:name></seg>
               <seg type="excerpt" status="finalized">d</seg>"#,
        );
        let options = ExtractOptions::default();
        let segments = select_in_body(d.body().unwrap(), &options);
        let (text, _) = reassemble_body(&segments, &options);

        let blocks: Vec<_> = text
            .child("body")
            .unwrap()
            .elements()
            .filter(|el| el.is("ab"))
            .collect();
        assert_eq!(blocks[0].attr("xmlns:tib"), Some("urn:tibschol:x"));
        assert_eq!(blocks[1].attr("xmlns:tib"), Some("urn:tibschol:y"));
        assert_eq!(blocks[1].attr("xmlns:x"), Some("urn:x"));
        assert!(blocks[2].attributes.is_empty());
    }

    #[test]
    fn test_source_is_not_mutated() {
        let d = doc(r#"<seg type="excerpt" status="finalized">a<hi>b</hi></seg>"#);
        let before = d.clone();
        let options = ExtractOptions::default();
        let segments = select_in_body(d.body().unwrap(), &options);
        let _ = reassemble_body(&segments, &options);
        assert_eq!(d, before);
    }

    #[test]
    fn test_empty_selection() {
        let (text, stats) = reassemble_body(&[], &ExtractOptions::default());
        assert!(text.child("body").unwrap().is_empty());
        assert_eq!(stats, BodyStats::default());
    }
}
