//! SVG serialization back to XML.
//!
//! The output keeps the document as it was parsed: prolog, attribute order,
//! text, comments and CDATA. What it normalizes: attribute values are always
//! double-quoted, childless elements are written self-closing, and entity
//! references are re-escaped with the predefined XML entities only.

use std::fmt::Write;

use crate::ast::*;
use crate::error::TintError;

/// Serialize a Document to an SVG string.
pub fn serialize(doc: &Document) -> Result<String, TintError> {
    let mut out = String::new();

    for node in &doc.prolog {
        serialize_node(&mut out, node)?;
    }
    serialize_element(&mut out, &doc.root)?;
    for node in &doc.epilog {
        serialize_node(&mut out, node)?;
    }

    Ok(out)
}

fn serialize_element(out: &mut String, elem: &Element) -> std::fmt::Result {
    let name = elem.name.full_name();
    write!(out, "<{}", name)?;

    for attr in &elem.attributes {
        write!(out, " {}=\"", attr.name.full_name())?;
        push_escaped_attr(out, &attr.value);
        out.push('"');
    }

    if elem.children.is_empty() {
        out.push_str("/>");
        return Ok(());
    }

    out.push('>');
    for child in &elem.children {
        serialize_node(out, child)?;
    }
    write!(out, "</{}>", name)
}

fn serialize_node(out: &mut String, node: &Node) -> std::fmt::Result {
    match node {
        Node::Element(elem) => serialize_element(out, elem)?,
        Node::Text(text) => push_escaped_text(out, text),
        Node::Comment(comment) => write!(out, "<!--{}-->", comment)?,
        Node::CData(data) => write!(out, "<![CDATA[{}]]>", data)?,
        Node::ProcessingInstruction(content) | Node::Declaration(content) => {
            write!(out, "<?{}?>", content)?
        }
        Node::DocType(dt) => write!(out, "<!DOCTYPE {}>", dt)?,
    }
    Ok(())
}

fn push_escaped_attr(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '"' => out.push_str("&quot;"),
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_text(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}
