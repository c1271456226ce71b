// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Strict XML parsing into [`XmlElement`] trees.
//!
//! Parsing fails closed: malformed markup, mismatched tags and unknown
//! entities are errors rather than best-effort recoveries. Whitespace-only
//! text between elements is dropped (it never contributes to the canonical
//! form); all other character data is kept verbatim.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::element::{XmlAttribute, XmlElement, XmlNode};

/// Parse a complete XML document and return its single document element.
pub fn parse_document(xml: &str) -> Result<XmlElement, String> {
    let mut reader = Reader::from_str(xml);

    let mut stack: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => {
                if stack.is_empty() && root.is_some() {
                    return Err("multiple document elements".to_string());
                }
                stack.push(element_from_start(&start)?);
            }
            Ok(Event::Empty(start)) => {
                if stack.is_empty() && root.is_some() {
                    return Err("multiple document elements".to_string());
                }
                let element = element_from_start(&start)?;
                close_element(&mut stack, &mut root, element);
            }
            Ok(Event::End(_)) => {
                // Name mismatches are already rejected by the reader.
                let element = stack
                    .pop()
                    .ok_or_else(|| "close tag without a matching open tag".to_string())?;
                close_element(&mut stack, &mut root, element);
            }
            Ok(Event::Text(text)) => {
                let text = text
                    .unescape()
                    .map_err(|e| format!("bad character data: {e}"))?;
                append_text(&mut stack, &text)?;
            }
            Ok(Event::CData(cdata)) => {
                let bytes = cdata.into_inner();
                let text = String::from_utf8_lossy(&bytes);
                append_text(&mut stack, &text)?;
            }
            // The canonical form has no declaration, comments or processing
            // instructions, so none of these survive parsing.
            Ok(Event::Decl(_)) | Ok(Event::Comment(_)) | Ok(Event::PI(_)) | Ok(Event::DocType(_)) => {}
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(format!(
                    "malformed XML at byte {}: {e}",
                    reader.buffer_position()
                ))
            }
        }
    }

    if let Some(open) = stack.last() {
        return Err(format!("unexpected end of document inside <{}>", open.name));
    }

    root.ok_or_else(|| "document contains no elements".to_string())
}

fn element_from_start(start: &BytesStart) -> Result<XmlElement, String> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();

    let mut element = XmlElement::new(name);
    for attr in start.attributes() {
        let attr = attr.map_err(|e| format!("bad attribute on <{}>: {e}", element.name))?;
        let value = attr
            .unescape_value()
            .map_err(|e| format!("bad attribute value on <{}>: {e}", element.name))?;
        element.attributes.push(XmlAttribute {
            name: String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            value: value.into_owned(),
        });
    }
    Ok(element)
}

fn close_element(stack: &mut Vec<XmlElement>, root: &mut Option<XmlElement>, element: XmlElement) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(XmlNode::Element(element)),
        None => *root = Some(element),
    }
}

fn append_text(stack: &mut [XmlElement], text: &str) -> Result<(), String> {
    match stack.last_mut() {
        Some(parent) => {
            if !text.trim().is_empty() {
                parent.children.push(XmlNode::Text(text.to_string()));
            }
            Ok(())
        }
        None => {
            if text.trim().is_empty() {
                Ok(())
            } else {
                Err("character data outside the document element".to_string())
            }
        }
    }
}
