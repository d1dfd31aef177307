//! SVG parsing from XML.

use std::collections::HashMap;

use quick_xml::Reader;
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::{BytesStart, Event};

use crate::ast::*;
use crate::error::TintError;

/// Parse an SVG string into a Document.
///
/// Fails on anything that is not a single well-formed root element:
/// mismatched or unclosed tags, duplicate attributes, stray text around
/// the root or a second root.
///
/// Entities declared in the DOCTYPE internal subset are expanded.
pub fn parse_svg(svg: &str) -> Result<Document, TintError> {
    let svg = svg.strip_prefix('\u{feff}').unwrap_or(svg);
    let mut reader = Reader::from_str(svg);

    let mut prolog = Vec::new();
    let mut epilog = Vec::new();
    let mut root = None;
    let mut entities = Entities::default();

    loop {
        let event = reader.read_event()?;
        let misc = match event {
            Event::Start(start) => {
                if root.is_some() {
                    return Err(TintError::InvalidSvg("Multiple root elements".into()));
                }
                root = Some(parse_element(&mut reader, &start, &entities)?);
                continue;
            }
            Event::Empty(start) => {
                if root.is_some() {
                    return Err(TintError::InvalidSvg("Multiple root elements".into()));
                }
                root = Some(parse_element_start(&start, &entities)?);
                continue;
            }
            Event::Decl(decl) => {
                if root.is_some() || !prolog.is_empty() {
                    return Err(TintError::InvalidSvg(
                        "XML declaration must come first".into(),
                    ));
                }
                Node::Declaration(String::from_utf8_lossy(&decl).into_owned())
            }
            Event::DocType(dt) => {
                if root.is_some() {
                    return Err(TintError::InvalidSvg("DOCTYPE after root element".into()));
                }
                let doctype = String::from_utf8_lossy(&dt).into_owned();
                entities = Entities::from_doctype(&doctype);
                Node::DocType(doctype)
            }
            Event::Text(text) => {
                let text = text.unescape_with(|name| entities.resolve(name))?;
                if !text.trim().is_empty() {
                    return Err(TintError::InvalidSvg(
                        "Text outside of the root element".into(),
                    ));
                }
                Node::Text(text.into_owned())
            }
            Event::Comment(comment) => {
                Node::Comment(String::from_utf8_lossy(&comment).into_owned())
            }
            Event::PI(pi) => Node::ProcessingInstruction(String::from_utf8_lossy(&pi).into_owned()),
            Event::CData(_) => {
                return Err(TintError::InvalidSvg(
                    "CDATA outside of the root element".into(),
                ));
            }
            Event::End(_) => {
                return Err(TintError::InvalidSvg("Unexpected closing tag".into()));
            }
            Event::Eof => break,
        };

        if root.is_some() {
            epilog.push(misc);
        } else {
            prolog.push(misc);
        }
    }

    let root = root.ok_or_else(|| TintError::InvalidSvg("No root element found".into()))?;

    Ok(Document {
        prolog,
        root,
        epilog,
    })
}

fn parse_element(
    reader: &mut Reader<&[u8]>,
    start: &BytesStart,
    entities: &Entities,
) -> Result<Element, TintError> {
    let mut element = parse_element_start(start, entities)?;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                element
                    .children
                    .push(Node::Element(parse_element(reader, &start, entities)?));
            }
            Event::Empty(start) => {
                element
                    .children
                    .push(Node::Element(parse_element_start(&start, entities)?));
            }
            Event::End(_) => {
                // quick-xml checks that the name matches the open tag
                break;
            }
            Event::Text(text) => {
                let text = text.unescape_with(|name| entities.resolve(name))?;
                element.children.push(Node::Text(text.into_owned()));
            }
            Event::Comment(comment) => {
                element
                    .children
                    .push(Node::Comment(String::from_utf8_lossy(&comment).into_owned()));
            }
            Event::CData(cdata) => {
                element
                    .children
                    .push(Node::CData(String::from_utf8_lossy(&cdata).into_owned()));
            }
            Event::PI(pi) => {
                element.children.push(Node::ProcessingInstruction(
                    String::from_utf8_lossy(&pi).into_owned(),
                ));
            }
            Event::Decl(_) | Event::DocType(_) => {
                return Err(TintError::InvalidSvg(
                    "Declaration inside an element".into(),
                ));
            }
            Event::Eof => {
                return Err(TintError::InvalidSvg(format!(
                    "Unexpected end of file inside <{}>",
                    element.name.full_name()
                )));
            }
        }
    }

    Ok(element)
}

fn parse_element_start(start: &BytesStart, entities: &Entities) -> Result<Element, TintError> {
    let name_bytes = start.name();
    let name = String::from_utf8_lossy(name_bytes.as_ref());

    let mut element = Element {
        name: QName::parse(&name),
        attributes: Vec::new(),
        children: Vec::new(),
    };

    for attr in start.attributes() {
        let attr = attr.map_err(|e| TintError::InvalidSvg(format!("Invalid attribute: {}", e)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref());
        let value = attr.unescape_value_with(|name| entities.resolve(name))?;
        element.attributes.push(Attribute {
            name: QName::parse(&key),
            value: value.into_owned(),
        });
    }

    Ok(element)
}

/// General entities from a DOCTYPE internal subset, on top of the five
/// predefined XML entities.
#[derive(Debug, Default)]
struct Entities(HashMap<String, String>);

impl Entities {
    /// Collect `<!ENTITY name "value">` declarations. Parameter entities and
    /// external entities are not expanded.
    fn from_doctype(doctype: &str) -> Self {
        let mut map = HashMap::new();
        let mut rest = doctype;

        while let Some(at) = rest.find("<!ENTITY") {
            rest = rest[at + "<!ENTITY".len()..].trim_start();
            if rest.starts_with('%') {
                continue;
            }

            let name_end = rest.find(char::is_whitespace).unwrap_or(rest.len());
            let (name, tail) = rest.split_at(name_end);
            let tail = tail.trim_start();
            let Some(quote) = tail.chars().next().filter(|&c| c == '"' || c == '\'') else {
                rest = tail;
                continue;
            };
            let Some(len) = tail[1..].find(quote) else {
                break;
            };

            // The first declaration of a name is binding
            map.entry(name.to_string())
                .or_insert_with(|| tail[1..1 + len].to_string());
            rest = &tail[len + 2..];
        }

        Self(map)
    }

    fn resolve(&self, name: &str) -> Option<&str> {
        self.0
            .get(name)
            .map(String::as_str)
            .or_else(|| resolve_predefined_entity(name))
    }
}
