//! Relation lists embedded in table cells.
//!
//! Cells hold a serialized list of `{label, subj, obj}` objects, either as
//! JSON or as a Python literal (single-quoted strings, `None`, `True`,
//! `False`). Python literals are rewritten token by token into JSON and then
//! parsed strictly; nothing is evaluated.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// One end of a relation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationEnd {
    /// Display label, usually `Name (123)`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,
}

/// A typed relation between two entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    /// Relation label, e.g. "has as an instance"
    #[serde(default, deserialize_with = "null_as_empty")]
    pub label: String,

    /// Subject end
    #[serde(default, alias = "subject", deserialize_with = "null_as_end")]
    pub subj: RelationEnd,

    /// Object end
    #[serde(default, alias = "object", deserialize_with = "null_as_end")]
    pub obj: RelationEnd,
}

impl Relation {
    /// Whether the label contains `needle`.
    pub fn label_contains(&self, needle: &str) -> bool {
        self.label.contains(needle)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_end<'de, D>(deserializer: D) -> std::result::Result<RelationEnd, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<RelationEnd>::deserialize(deserializer)?.unwrap_or_default())
}

/// Parse a relations cell.
///
/// A blank cell is an empty list.
pub fn parse_relations(text: &str) -> Result<Vec<Relation>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Vec<Relation>>(text) {
        Ok(relations) => Ok(relations),
        Err(json_err) => {
            let normalized = python_literal_to_json(text).map_err(|e| {
                Error::RelationParse(format!("{} (as JSON: {})", e, json_err))
            })?;
            serde_json::from_str(&normalized).map_err(Error::from)
        }
    }
}

/// Rewrite a Python literal (lists, dicts, strings, numbers, `None`,
/// `True`, `False`) as JSON text.
///
/// Non-finite floats (`inf`, `-inf`, `nan`) have no JSON form and become
/// `null`.
pub fn python_literal_to_json(text: &str) -> Result<String> {
    let mut out = String::with_capacity(text.len() + 16);
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\'' | '"' => {
                let s = read_python_string(c, &mut chars)?;
                out.push_str(&serde_json::to_string(&s)?);
            }
            '(' => out.push('['),
            ')' => out.push(']'),
            // Exponent of a number literal such as `1e-05`
            c if c.is_ascii_alphabetic() && out.ends_with(|p: char| p.is_ascii_digit() || p == '.') => {
                out.push(c)
            }
            c if c.is_ascii_alphabetic() || c == '_' => {
                let mut word = String::from(c);
                while let Some(&next) = chars.peek() {
                    if next.is_ascii_alphanumeric() || next == '_' {
                        word.push(next);
                        chars.next();
                    } else {
                        break;
                    }
                }
                match word.as_str() {
                    "None" => out.push_str("null"),
                    "True" => out.push_str("true"),
                    "False" => out.push_str("false"),
                    "inf" | "nan" => {
                        if out.ends_with('-') {
                            out.pop();
                        }
                        out.push_str("null");
                    }
                    _ => {
                        return Err(Error::RelationParse(format!(
                            "unexpected identifier '{}'",
                            word
                        )))
                    }
                }
            }
            c => out.push(c),
        }
    }

    Ok(out)
}

fn read_python_string<I>(quote: char, chars: &mut std::iter::Peekable<I>) -> Result<String>
where
    I: Iterator<Item = char>,
{
    let mut s = String::new();
    loop {
        let c = chars
            .next()
            .ok_or_else(|| Error::RelationParse("unterminated string".into()))?;
        if c == quote {
            return Ok(s);
        }
        if c != '\\' {
            s.push(c);
            continue;
        }
        let esc = chars
            .next()
            .ok_or_else(|| Error::RelationParse("unterminated escape".into()))?;
        match esc {
            'n' => s.push('\n'),
            't' => s.push('\t'),
            'r' => s.push('\r'),
            '0' => s.push('\0'),
            '\\' | '\'' | '"' => s.push(esc),
            'x' => s.push(read_code_point(chars, 2)?),
            'u' => s.push(read_code_point(chars, 4)?),
            'U' => s.push(read_code_point(chars, 8)?),
            other => {
                s.push('\\');
                s.push(other);
            }
        }
    }
}

fn read_code_point<I>(chars: &mut I, digits: usize) -> Result<char>
where
    I: Iterator<Item = char>,
{
    let hex: String = chars.take(digits).collect();
    if hex.len() != digits {
        return Err(Error::RelationParse("truncated escape sequence".into()));
    }
    u32::from_str_radix(&hex, 16)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| Error::RelationParse(format!("invalid escape \\{}", hex)))
}
