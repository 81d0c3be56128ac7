//! Markup (XML) element tree and its flattening

use super::join;
use crate::error::{Error, Result};
use crate::types::FlatRow;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

/// An XML element with namespace prefixes already stripped
///
/// Cloning and dropping walk the tree on a heap stack, so documents nested
/// deeper than the thread stack allows are still safe to hold.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Unqualified tag name
    pub name: String,
    /// Attributes in document order, unqualified names
    pub attributes: Vec<(String, String)>,
    /// Concatenated character data directly inside this element
    pub text: String,
    /// Child elements in document order
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Copy of this element without its children
    fn shell(&self) -> Self {
        Self {
            name: self.name.clone(),
            attributes: self.attributes.clone(),
            text: self.text.clone(),
            children: Vec::with_capacity(self.children.len()),
        }
    }

    /// Add an attribute
    #[must_use]
    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((key.into(), value.into()));
        self
    }

    /// Set the text content
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Add a child element
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Get an attribute value
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// First direct child with the given tag name
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|c| c.name == name)
    }

    /// All descendants (excluding `self`) with the given tag name, in
    /// document order
    pub fn descendants(&self, name: &str) -> Vec<&XmlElement> {
        let mut found = Vec::new();
        let mut stack: Vec<&XmlElement> = self.children.iter().rev().collect();
        while let Some(element) = stack.pop() {
            if element.name == name {
                found.push(element);
            }
            stack.extend(element.children.iter().rev());
        }
        found
    }

    /// First descendant (excluding `self`) with the given tag name
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        let mut stack: Vec<&XmlElement> = self.children.iter().rev().collect();
        while let Some(element) = stack.pop() {
            if element.name == name {
                return Some(element);
            }
            stack.extend(element.children.iter().rev());
        }
        None
    }
}

impl Clone for XmlElement {
    fn clone(&self) -> Self {
        // Each frame pairs a source element with its copy; the copy's child
        // count is the index of the next source child to visit.
        let mut stack: Vec<(&XmlElement, XmlElement)> = vec![(self, self.shell())];

        loop {
            let next = match stack.last() {
                Some(&(source, ref copy)) => source.children.get(copy.children.len()),
                None => return XmlElement::default(),
            };
            if let Some(child) = next {
                stack.push((child, child.shell()));
                continue;
            }

            let Some((_, done)) = stack.pop() else {
                return XmlElement::default();
            };
            match stack.last_mut() {
                Some((_, parent)) => parent.children.push(done),
                None => return done,
            }
        }
    }
}

impl Drop for XmlElement {
    fn drop(&mut self) {
        if self.children.is_empty() {
            return;
        }
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut element) = pending.pop() {
            pending.append(&mut element.children);
        }
    }
}

/// Flatten an element into a row
///
/// Attributes land under the current prefix, trimmed text of a childless
/// element lands under `<prefix>.text`, and children recurse with their tag
/// name as the next path segment. Repeated sibling tags share a key, so the
/// last sibling wins.
pub fn flatten_markup(element: &XmlElement, prefix: &str) -> FlatRow {
    let mut row = FlatRow::new();
    let mut stack: Vec<(String, &XmlElement)> = vec![(prefix.to_string(), element)];

    while let Some((path, element)) = stack.pop() {
        for (key, value) in &element.attributes {
            row.insert(join(&path, key), value.as_str());
        }

        let text = element.text.trim();
        if !text.is_empty() && element.children.is_empty() {
            row.insert(join(&path, "text"), text);
        }

        for child in element.children.iter().rev() {
            stack.push((join(&path, &child.name), child));
        }
    }

    row
}

/// Parse an XML document into its root element
pub fn parse_markup(xml: &str) -> Result<XmlElement> {
    let mut reader = Reader::from_str(xml);
    let mut open: Vec<XmlElement> = Vec::new();
    let mut root: Option<XmlElement> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => open.push(element_from_start(&start)?),
            Ok(Event::Empty(start)) => {
                let element = element_from_start(&start)?;
                attach(&mut open, &mut root, element)?;
            }
            Ok(Event::End(_)) => {
                let element = open
                    .pop()
                    .ok_or_else(|| Error::xml("closing tag without matching opening tag"))?;
                attach(&mut open, &mut root, element)?;
            }
            Ok(Event::Text(text)) => {
                if let Some(current) = open.last_mut() {
                    let text = text
                        .unescape()
                        .map_err(|e| Error::xml(format!("invalid text content: {e}")))?;
                    current.text.push_str(&text);
                }
            }
            Ok(Event::CData(data)) => {
                if let Some(current) = open.last_mut() {
                    current
                        .text
                        .push_str(&String::from_utf8_lossy(&data.into_inner()));
                }
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(Error::xml(format!(
                    "at position {}: {e}",
                    reader.buffer_position()
                )))
            }
        }
    }

    if let Some(unclosed) = open.last() {
        return Err(Error::xml(format!("unclosed element <{}>", unclosed.name)));
    }

    root.ok_or_else(|| Error::xml("document has no root element"))
}

fn element_from_start(start: &BytesStart<'_>) -> Result<XmlElement> {
    let name = String::from_utf8_lossy(start.local_name().as_ref()).into_owned();
    let mut element = XmlElement::new(name);

    for attr in start.attributes() {
        let attr = attr.map_err(|e| Error::xml(format!("invalid attribute: {e}")))?;
        // xmlns declarations are not data
        if attr.key.as_namespace_binding().is_some() {
            continue;
        }
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = attr
            .unescape_value()
            .map_err(|e| Error::xml(format!("invalid attribute value for '{key}': {e}")))?
            .into_owned();
        element.attributes.push((key, value));
    }

    Ok(element)
}

fn attach(
    open: &mut [XmlElement],
    root: &mut Option<XmlElement>,
    element: XmlElement,
) -> Result<()> {
    if let Some(parent) = open.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    } else {
        return Err(Error::xml(format!(
            "multiple root elements, found <{}> after the root",
            element.name
        )));
    }
    Ok(())
}
