use std::collections::BTreeMap;

use serde::Serialize;

use super::OmeXmlError;

/// Prefix that addresses an attribute instead of a child element
pub const ATTRIBUTE_PREFIX: char = '@';

/// Key that addresses the text content of a node
pub const TEXT_KEY: &str = "#text";

/// One XML element: attributes, child elements grouped by name, and text.
///
/// Children that share a name are grouped into one [`Element`], which keeps
/// the single-vs-repeated shape of the source document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Node {
    /// Attribute name to raw value
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,

    /// Child element local name to its occurrence(s)
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub children: BTreeMap<String, Element>,

    /// Concatenated text content, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// A child element that may occur once or many times
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Element {
    /// Exactly one occurrence
    Single(Node),
    /// Two or more occurrences, in document order
    Repeated(Vec<Node>),
}

/// A value selected from a node by key; always an owned copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Value {
    /// Attribute value or text content
    Text(String),
    /// A child element subtree
    Element(Element),
}

impl Element {
    /// Coerce to a sequence of nodes; a single occurrence gives length one
    pub fn as_slice(&self) -> &[Node] {
        match self {
            Element::Single(node) => std::slice::from_ref(node),
            Element::Repeated(nodes) => nodes,
        }
    }

    /// Owned copy of [`Element::as_slice`]
    pub fn to_vec(&self) -> Vec<Node> {
        self.as_slice().to_vec()
    }

    /// Consume into a sequence of nodes
    pub fn into_vec(self) -> Vec<Node> {
        match self {
            Element::Single(node) => vec![node],
            Element::Repeated(nodes) => nodes,
        }
    }

    /// Number of occurrences
    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    /// Whether there are no occurrences
    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// First occurrence
    pub fn first(&self) -> Option<&Node> {
        self.as_slice().first()
    }

    fn push(&mut self, node: Node) {
        match self {
            Element::Single(_) => {
                if let Element::Single(first) = std::mem::replace(self, Element::Repeated(Vec::new())) {
                    *self = Element::Repeated(vec![first, node]);
                }
            }
            Element::Repeated(nodes) => nodes.push(node),
        }
    }
}

impl Value {
    /// Text of an attribute, or of a child element that carries text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            Value::Element(element) => element.first().and_then(Node::text),
        }
    }

    /// The element subtree, if this value is one
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Value::Element(element) => Some(element),
            Value::Text(_) => None,
        }
    }

    /// Coerce to a sequence of nodes.
    ///
    /// Text becomes a single text-only node so the function is total.
    pub fn into_nodes(self) -> Vec<Node> {
        match self {
            Value::Element(element) => element.into_vec(),
            Value::Text(text) => vec![Node {
                text: Some(text),
                ..Default::default()
            }],
        }
    }
}

impl Node {
    /// Attribute value by name (without the `@` prefix)
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    /// Child element by local name
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children.get(name)
    }

    /// First occurrence of a child element
    pub fn first_child(&self, name: &str) -> Option<&Node> {
        self.child(name).and_then(Element::first)
    }

    /// Text content
    pub fn text(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Remove an attribute, returning its value
    pub fn remove_attribute(&mut self, name: &str) -> Option<String> {
        self.attributes.remove(name)
    }

    /// Tolerant single-key lookup.
    ///
    /// `@Name` addresses an attribute, `#text` the text content, and a bare
    /// `Name` a child element, falling back to an attribute of that name.
    pub fn get(&self, key: &str) -> Option<Value> {
        if key == TEXT_KEY {
            return self.text.clone().map(Value::Text);
        }
        if let Some(name) = key.strip_prefix(ATTRIBUTE_PREFIX) {
            return self.attributes.get(name).cloned().map(Value::Text);
        }
        match self.children.get(key) {
            Some(element) => Some(Value::Element(element.clone())),
            None => self.attributes.get(key).cloned().map(Value::Text),
        }
    }

    /// Strict single-key lookup; an absent key is an error
    pub fn select_key(&self, key: &str) -> Result<Value, OmeXmlError> {
        self.get(key).ok_or_else(|| OmeXmlError::missing(key))
    }

    /// Tolerant multi-key lookup; absent keys map to `None` positionally
    pub fn select_keys(&self, keys: &[&str]) -> Vec<Option<Value>> {
        keys.iter().map(|key| self.get(key)).collect()
    }

    /// Borrow a required child element, naming `path` in the error
    pub(crate) fn require_child(&self, name: &str, path: &str) -> Result<&Element, OmeXmlError> {
        self.child(name).ok_or_else(|| OmeXmlError::missing(path))
    }

    pub(crate) fn push_child(&mut self, name: String, node: Node) {
        match self.children.get_mut(&name) {
            Some(element) => element.push(node),
            None => {
                self.children.insert(name, Element::Single(node));
            }
        }
    }

    pub(crate) fn push_text(&mut self, text: &str) {
        match &mut self.text {
            Some(existing) => existing.push_str(text),
            None => self.text = Some(text.to_string()),
        }
    }
}
