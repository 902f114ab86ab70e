//! XML source adapter.
//!
//! Expected input:
//!
//! ```xml
//! <root>
//!   <objects>
//!     <object name="D1"><value>a</value><value>b</value></object>
//!     <object name="M1"><value>1</value><value>2</value></object>
//!   </objects>
//! </root>
//! ```
//!
//! Each child of the `objects` container is one column, named by its `name` attribute.
//! Its `value` children are the column values in document order. If the root has no
//! `objects` child, the root itself is the container.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use xml::reader::{EventReader, XmlEvent};

use crate::error::{ReconcileError, ReconcileResult};
use crate::types::{NormalizedTable, Value};

const CONTAINER: &str = "objects";
const NAME_ATTR: &str = "name";
const VALUE_ELEMENT: &str = "value";

#[derive(Debug, Default)]
struct XmlNode {
    name: String,
    attributes: Vec<(String, String)>,
    text: String,
    children: Vec<XmlNode>,
}

impl XmlNode {
    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Load an XML file into a [`NormalizedTable`].
pub fn load_xml_from_path(path: impl AsRef<Path>) -> ReconcileResult<NormalizedTable> {
    let file = File::open(path)?;
    load_xml_from_reader(BufReader::new(file))
}

/// Load XML from an in-memory string into a [`NormalizedTable`].
pub fn load_xml_from_str(input: &str) -> ReconcileResult<NormalizedTable> {
    load_xml_from_reader(input.as_bytes())
}

/// Load XML from any reader into a [`NormalizedTable`].
pub fn load_xml_from_reader<R: Read>(reader: R) -> ReconcileResult<NormalizedTable> {
    let root = parse_tree(reader)?;
    let container = root
        .children
        .iter()
        .find(|c| c.name == CONTAINER)
        .unwrap_or(&root);

    let mut columns: Vec<(String, Vec<Value>)> = Vec::with_capacity(container.children.len());
    for (idx0, column) in container.children.iter().enumerate() {
        let name = column
            .attribute(NAME_ATTR)
            .ok_or_else(|| ReconcileError::SourceFormat {
                message: format!(
                    "element <{}> #{} in <{}> has no '{NAME_ATTR}' attribute",
                    column.name,
                    idx0 + 1,
                    container.name
                ),
            })?;
        let values = column
            .children
            .iter()
            .filter(|c| c.name == VALUE_ELEMENT)
            .map(|c| Value::Text(c.text.clone()))
            .collect();
        columns.push((name.to_owned(), values));
    }

    NormalizedTable::new(columns)
}

fn parse_tree<R: Read>(reader: R) -> ReconcileResult<XmlNode> {
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    for event in EventReader::new(reader) {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                stack.push(XmlNode {
                    name: name.local_name,
                    attributes: attributes
                        .into_iter()
                        .map(|a| (a.name.local_name, a.value))
                        .collect(),
                    ..Default::default()
                });
            }
            XmlEvent::EndElement { .. } => {
                if let Some(node) = stack.pop() {
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(node),
                        None => root = Some(node),
                    }
                }
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if let Some(node) = stack.last_mut() {
                    node.text.push_str(&text);
                }
            }
            _ => {}
        }
    }

    root.ok_or_else(|| ReconcileError::SourceFormat {
        message: "xml document has no root element".to_string(),
    })
}
