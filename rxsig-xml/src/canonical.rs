// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Exclusive XML canonicalization (the subset used for prescription digests).
//!
//! The canonical form is the byte sequence the original signer hashed, so the
//! serialization rules here are pinned, not configurable:
//!
//! - attributes are sorted by name ascending, except `xmlns`, which is always
//!   emitted first;
//! - attribute values entity-escape `&`, `<`, `>`, `"` and `'`; each tab and
//!   form feed becomes one space and each run of CR/LF characters collapses
//!   to a single space;
//! - element text escapes `&` before `<`/`>`, so a literal `&quot;` in text
//!   serializes as `&amp;quot;` and stays distinguishable from markup;
//! - empty elements are written `<tag></tag>`, never self-closing;
//! - no XML declaration, comments or processing instructions.

use crate::element::{XmlElement, XmlNode};

/// Canonicalization method URI for Exclusive XML Canonicalization.
pub const EXCLUSIVE_C14N: &str = "http://www.w3.org/2001/10/xml-exc-c14n#";

/// Serialize an element subtree to its canonical form.
pub fn canonicalize(element: &XmlElement) -> String {
    let mut out = String::new();
    write_element(element, &mut out);
    out
}

/// Serialize using the canonicalization method declared by a document.
///
/// An unspecified method defaults to Exclusive C14N. Any other method URI is
/// unsupported and returns an error rather than guessing at its rules.
pub fn canonicalize_with_method(element: &XmlElement, method: Option<&str>) -> Result<String, String> {
    match method {
        None => Ok(canonicalize(element)),
        Some(uri) if uri == EXCLUSIVE_C14N => Ok(canonicalize(element)),
        Some(uri) => Err(format!("unsupported canonicalization method: {uri}")),
    }
}

fn write_element(element: &XmlElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.name);

    for attr in sorted_attributes(element) {
        out.push(' ');
        out.push_str(&attr.0);
        out.push_str("=\"");
        escape_attribute_value(&attr.1, out);
        out.push('"');
    }
    out.push('>');

    for child in &element.children {
        match child {
            XmlNode::Element(e) => write_element(e, out),
            XmlNode::Text(t) => escape_text(t, out),
        }
    }

    out.push_str("</");
    out.push_str(&element.name);
    out.push('>');
}

/// Attribute emission order: `xmlns` first, then names ascending.
fn sorted_attributes(element: &XmlElement) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = element
        .attributes
        .iter()
        .map(|a| (a.name.clone(), a.value.clone()))
        .collect();
    attrs.sort_by(|a, b| match (a.0 == "xmlns", b.0 == "xmlns") {
        (true, false) => std::cmp::Ordering::Less,
        (false, true) => std::cmp::Ordering::Greater,
        _ => a.0.cmp(&b.0),
    });
    attrs
}

/// Attribute value escaping with canonical whitespace normalization.
fn escape_attribute_value(value: &str, out: &mut String) {
    let mut in_line_break = false;
    for c in value.chars() {
        if c == '\r' || c == '\n' {
            if !in_line_break {
                out.push(' ');
                in_line_break = true;
            }
            continue;
        }
        in_line_break = false;
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            '\t' | '\u{c}' => out.push(' '),
            _ => out.push(c),
        }
    }
}

/// Element text escaping. Quotes are left alone; only markup characters and
/// the ampersand are escaped.
fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
