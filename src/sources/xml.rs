//! Flat reader for item-oriented XML feeds.
//!
//! RDF, RSS 2.0 and Atom all share the same shape as far as the strategies
//! care: a root element, repeated item elements, and simple child elements
//! carrying text or attributes. [`read_entries`] walks the document once and
//! hands back each item as a list of its direct children.

use std::collections::HashMap;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::errors::{DigestError, DigestResult};

/// A direct child element of an item
#[derive(Debug, Clone, Default)]
pub struct XmlNode {
    pub name: String,
    pub attrs: HashMap<String, String>,
    pub text: String,
}

/// One item element with its attributes and direct children in document order
#[derive(Debug, Clone, Default)]
pub struct XmlEntry {
    pub attrs: HashMap<String, String>,
    pub children: Vec<XmlNode>,
}

impl XmlEntry {
    /// Trimmed text of the first non-empty child named `name`
    pub fn text(&self, name: &str) -> Option<String> {
        self.children
            .iter()
            .filter(|n| n.name == name)
            .map(|n| n.text.trim())
            .find(|t| !t.is_empty())
            .map(str::to_string)
    }

    /// Trimmed, non-empty texts of every child named `name`
    pub fn texts(&self, name: &str) -> Vec<String> {
        self.children
            .iter()
            .filter(|n| n.name == name)
            .map(|n| n.text.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Attribute `attr` of every child named `name`
    pub fn attrs_of(&self, name: &str, attr: &str) -> Vec<String> {
        self.children
            .iter()
            .filter(|n| n.name == name)
            .filter_map(|n| n.attrs.get(attr).cloned())
            .collect()
    }

    pub fn nodes<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> + 'a {
        self.children.iter().filter(move |n| n.name == name)
    }
}

fn element_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn element_attrs(e: &BytesStart<'_>) -> DigestResult<HashMap<String, String>> {
    let mut attrs = HashMap::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| DigestError::Parse(format!("XML attribute error: {}", err)))?;
        let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
        let value = attr
            .unescape_value()
            .map_err(|err| DigestError::Parse(format!("XML attribute error: {}", err)))?
            .to_string();
        attrs.insert(key, value);
    }
    Ok(attrs)
}

/// Read every `item_tag` element of a document whose root must be `expected_root`
pub fn read_entries(xml: &[u8], expected_root: &str, item_tag: &str) -> DigestResult<Vec<XmlEntry>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut entries = Vec::new();
    let mut buf = Vec::new();

    let mut depth = 0usize;
    let mut saw_root = false;
    let mut current: Option<(usize, XmlEntry)> = None;
    let mut child_open = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = element_name(&e);

                if depth == 1 {
                    if name != expected_root {
                        return Err(DigestError::Parse(format!(
                            "expected <{}> document, found <{}>",
                            expected_root, name
                        )));
                    }
                    saw_root = true;
                }

                if current.is_none() && name == item_tag {
                    current = Some((depth, XmlEntry {
                        attrs: element_attrs(&e)?,
                        children: Vec::new(),
                    }));
                } else if let Some((entry_depth, entry)) = current.as_mut() {
                    if depth == *entry_depth + 1 {
                        entry.children.push(XmlNode {
                            name,
                            attrs: element_attrs(&e)?,
                            text: String::new(),
                        });
                        child_open = true;
                    }
                }
            }
            Ok(Event::Empty(e)) => {
                if depth == 0 {
                    return Err(DigestError::Parse(format!(
                        "expected <{}> document, found empty <{}/>",
                        expected_root,
                        element_name(&e)
                    )));
                }

                if let Some((entry_depth, entry)) = current.as_mut() {
                    if depth == *entry_depth {
                        entry.children.push(XmlNode {
                            name: element_name(&e),
                            attrs: element_attrs(&e)?,
                            text: String::new(),
                        });
                    }
                }
            }
            Ok(Event::Text(e)) => {
                if child_open {
                    if let Some((_, entry)) = current.as_mut() {
                        let text = e
                            .unescape()
                            .map_err(|err| DigestError::Parse(format!("XML text error: {}", err)))?;
                        if let Some(node) = entry.children.last_mut() {
                            node.text.push_str(&text);
                        }
                    }
                }
            }
            Ok(Event::CData(e)) => {
                if child_open {
                    if let Some((_, entry)) = current.as_mut() {
                        let bytes = e.into_inner();
                        if let Some(node) = entry.children.last_mut() {
                            node.text.push_str(&String::from_utf8_lossy(&bytes));
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                if let Some((entry_depth, _)) = current {
                    if depth == entry_depth + 1 {
                        child_open = false;
                    } else if depth == entry_depth {
                        if let Some((_, entry)) = current.take() {
                            entries.push(entry);
                        }
                    }
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(DigestError::Parse(format!("XML parse error: {}", e))),
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(DigestError::Parse(format!(
            "expected <{}> document, found no root element",
            expected_root
        )));
    }

    Ok(entries)
}
