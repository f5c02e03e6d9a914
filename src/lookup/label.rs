//! Splitting `Name (123)` labels.

use regex::Regex;
use std::sync::OnceLock;

fn label_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(.*)\s*\((\d+)\)\s*$").expect("valid label regex"))
}

/// Split a `Label (123)` string into its trimmed label and numeric id.
///
/// Text not ending in a parenthesised number yields `("", "")`; the mismatch
/// is logged and left to the caller to treat as missing data.
pub fn sep_label_and_id(text: &str) -> (String, String) {
    match label_pattern().captures(text) {
        Some(caps) => (caps[1].trim().to_string(), caps[2].trim().to_string()),
        None => {
            log::warn!("No '<label> (<id>)' match in {:?}", text);
            (String::new(), String::new())
        }
    }
}
