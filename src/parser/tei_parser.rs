//! TEI document parser using quick-xml.

use std::io::Read;
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::{is_blank, Element, Node, TeiDocument};

use super::options::ParseOptions;

/// TEI document parser.
///
/// Holds the decoded source text; [`TeiParser::parse`] builds the owned tree.
pub struct TeiParser {
    source: String,
    options: ParseOptions,
}

impl TeiParser {
    /// Open an XML file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open an XML file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let data = std::fs::read(path.as_ref())?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Parse from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        let text = std::str::from_utf8(data)
            .map_err(|e| Error::XmlParse(format!("document is not valid UTF-8: {}", e)))?;
        Ok(Self::from_str_with_options(text, options))
    }

    /// Parse from a string.
    pub fn from_str_with_options(text: &str, options: ParseOptions) -> Self {
        let source = text.strip_prefix('\u{feff}').unwrap_or(text).to_string();
        Self { source, options }
    }

    /// Parse from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Self::from_reader_with_options(reader, ParseOptions::default())
    }

    /// Parse from a reader with custom options.
    pub fn from_reader_with_options<R: Read>(mut reader: R, options: ParseOptions) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes_with_options(&data, options)
    }

    /// Build the document tree.
    pub fn parse(&self) -> Result<TeiDocument> {
        let mut reader = Reader::from_str(&self.source);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            let event = match reader.read_event() {
                Ok(event) => event,
                Err(e) => {
                    return Err(Error::XmlParse(format!(
                        "{} (at byte {})",
                        e,
                        reader.buffer_position()
                    )))
                }
            };

            match event {
                Event::Start(start) => stack.push(element_from_start(&start)?),
                Event::Empty(start) => {
                    let el = element_from_start(&start)?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::End(_) => {
                    let el = stack
                        .pop()
                        .ok_or_else(|| Error::XmlParse("unexpected closing tag".into()))?;
                    attach(&mut stack, &mut root, el)?;
                }
                Event::Text(text) => {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::XmlParse(e.to_string()))?
                        .into_owned();
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(Node::Text(text)),
                        None if is_blank(&text) => {}
                        None => {
                            return Err(Error::XmlParse(
                                "character data outside the root element".into(),
                            ))
                        }
                    }
                }
                Event::CData(data) => {
                    let text = String::from_utf8_lossy(&data).into_owned();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(Node::CData(text));
                    }
                }
                Event::Comment(comment) => {
                    if self.options.keep_comments {
                        if let Some(parent) = stack.last_mut() {
                            let text = String::from_utf8_lossy(&comment).into_owned();
                            parent.children.push(Node::Comment(text));
                        }
                    }
                }
                Event::PI(pi) => {
                    if self.options.keep_processing_instructions {
                        if let Some(parent) = stack.last_mut() {
                            let text = String::from_utf8_lossy(&pi).into_owned();
                            parent.children.push(Node::ProcessingInstruction(text));
                        }
                    }
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }

        if let Some(open) = stack.last() {
            return Err(Error::XmlParse(format!(
                "unexpected end of document: <{}> is not closed",
                open.name
            )));
        }

        let root = root.ok_or_else(|| Error::XmlParse("document has no root element".into()))?;

        if self.options.require_tei_root && !root.is("TEI") {
            return Err(Error::NotTei(root.name));
        }

        log::debug!(
            "Parsed <{}> with {} child nodes",
            root.name,
            root.children.len()
        );

        Ok(TeiDocument::from_root(root))
    }
}

fn element_from_start(start: &BytesStart<'_>) -> Result<Element> {
    let mut el = Element::new(String::from_utf8_lossy(start.name().as_ref()).into_owned());
    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::XmlParse(e.to_string()))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::XmlParse(e.to_string()))?
            .into_owned();
        el.attributes.push((key, value));
    }
    Ok(el)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, el: Element) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => {
            parent.push(el);
            Ok(())
        }
        None if root.is_none() => {
            *root = Some(el);
            Ok(())
        }
        None => Err(Error::XmlParse(format!(
            "second root element <{}>",
            el.name
        ))),
    }
}
