//! Header rewriting from resolved metadata.

use crate::error::{Error, Result};
use crate::lookup::MetadataSource;
use crate::model::{Element, ResolvedMetadata};

use super::options::{ExtractOptions, RespStmtPolicy};

/// Text written when a physical-description field is not known.
pub const UNKNOWN: &str = "unknown";

/// A rewritten header together with what was used to build it.
#[derive(Debug, Clone)]
pub struct HeaderOutcome {
    /// The new `teiHeader`
    pub header: Element,

    /// The identifier that resolved
    pub idno: String,

    /// Metadata resolved for `idno`
    pub metadata: ResolvedMetadata,

    /// Candidates rejected before `idno` resolved
    pub rejected: Vec<String>,
}

/// Trimmed, non-empty texts of every `idno` with the given `type` anywhere
/// in the header, in document order.
pub fn collect_idnos(header: &Element, idno_type: &str) -> Vec<String> {
    header
        .descendants()
        .filter(|el| el.is("idno") && el.attr("type") == Some(idno_type))
        .map(|el| el.text().trim().to_string())
        .filter(|text| !text.is_empty())
        .collect()
}

/// Try each candidate in turn until one resolves.
///
/// Returns the winning identifier, its metadata and the rejected candidates.
/// Only candidate-level failures move on to the next candidate; any other
/// error is returned as is.
pub fn resolve_candidates(
    candidates: &[String],
    source: &dyn MetadataSource,
) -> Result<(String, ResolvedMetadata, Vec<String>)> {
    let mut bad = Vec::new();
    for idno in candidates {
        match source.resolve(idno) {
            Ok(metadata) => return Ok((idno.clone(), metadata, bad)),
            Err(e) if e.is_candidate_failure() => {
                log::debug!("Rejected idno {}: {}", idno, e);
                bad.push(idno.clone());
            }
            Err(e) => return Err(e),
        }
    }
    Err(Error::UnresolvedIdentifier { bad })
}

/// Build a new header from `src`, enriched with the metadata its identifier
/// resolves to.
pub fn transform_header(
    src: &Element,
    source: &dyn MetadataSource,
    options: &ExtractOptions,
) -> Result<HeaderOutcome> {
    let mut file_desc = src
        .child("fileDesc")
        .ok_or_else(|| Error::MissingSection("teiHeader/fileDesc".into()))?
        .clone();
    if file_desc.child("titleStmt").is_none() {
        return Err(Error::MissingSection("fileDesc/titleStmt".into()));
    }

    let candidates = collect_idnos(src, &options.idno_type);
    if candidates.is_empty() {
        return Err(Error::MissingIdentifier(options.idno_type.clone()));
    }
    let (idno, metadata, rejected) = resolve_candidates(&candidates, source)?;

    let title_stmt = file_desc.child_or_insert("titleStmt");
    rewrite_title_stmt(title_stmt, &metadata, options);
    let principals = title_stmt.take_children("principal");
    let funders = title_stmt.take_children("funder");

    file_desc
        .child_or_insert("sourceDesc")
        .push(physical_description(&metadata));

    for wrapped in [principals, funders] {
        for stmt in responsibility_statements(wrapped, options.resp_stmt_policy) {
            file_desc.push(stmt);
        }
    }

    let mut header = Element::new(src.name.clone());
    header.attributes = src.attributes.clone();
    header.push(file_desc);
    for section in ["encodingDesc", "profileDesc"] {
        if let Some(el) = src.child(section) {
            header.push(el.clone());
        }
    }

    Ok(HeaderOutcome {
        header,
        idno,
        metadata,
        rejected,
    })
}

fn rewrite_title_stmt(title_stmt: &mut Element, meta: &ResolvedMetadata, options: &ExtractOptions) {
    if let Some(work_name) = &meta.work_name {
        title_stmt.child_or_insert("title").set_text(work_name.clone());
    }

    if meta.has_author() {
        let author = title_stmt.child_or_insert("author");
        author.set_text(meta.author_name.clone().unwrap_or_default());
        author.set_attr(
            "ref",
            format!(
                "{}{}",
                options.author_ref_prefix,
                meta.author_id.as_deref().unwrap_or_default()
            ),
        );
    } else {
        log::warn!(
            "No author resolved for work {:?}; author left unchanged",
            meta.work_id
        );
    }
}

/// Wrap each element in its own `respStmt`.
///
/// With [`RespStmtPolicy::Always`] an absent field still yields one empty
/// `respStmt`.
fn responsibility_statements(elements: Vec<Element>, policy: RespStmtPolicy) -> Vec<Element> {
    if elements.is_empty() {
        return match policy {
            RespStmtPolicy::Always => vec![Element::new("respStmt")],
            RespStmtPolicy::WhenPresent => Vec::new(),
        };
    }
    elements
        .into_iter()
        .map(|el| Element::new("respStmt").with_child(el))
        .collect()
}

/// `physDesc` with dimensions and item description, `unknown` where missing.
pub fn physical_description(meta: &ResolvedMetadata) -> Element {
    let dimensions = Element::new("dimensions")
        .with_attr("unit", "cm")
        .with_attr("scope", "width × height")
        .with_text(meta.dimension.as_deref().unwrap_or(UNKNOWN));

    let object_desc = Element::new("objectDesc").with_child(
        Element::new("supportDesc").with_child(Element::new("support").with_child(dimensions)),
    );

    let description = Element::new("p")
        .with_attr("n", "Item description")
        .with_text(meta.item_description.as_deref().unwrap_or(UNKNOWN));

    Element::new("physDesc")
        .with_child(object_desc)
        .with_child(description)
}
