//! reconstructed attribute tree
//!
//! The flat state encoding only knows strings, so the tree has three shapes
//! - scalar (a string, integers are recognized when rendering)
//! - object (sorted "map" from path segment to node)
//! - collection (ordered sequence of index key and node)
//!
//! The reconstructor only ever produces scalars and objects. Collections are
//! for callers that already know a value is an ordered list.
use serde::{
    ser::{SerializeMap, SerializeSeq},
    Serializer,
};
use std::collections::BTreeMap;

/// Children of an [AttributeNode::Object], iterated in lexicographic key order
pub type Object = BTreeMap<String, AttributeNode>;

/// All possible node shapes
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeNode {
    Scalar(String),
    Object(Object),
    Collection(Vec<(String, AttributeNode)>),
}

/// Node shape without its content, used in error messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Scalar,
    Object,
    Collection,
}

impl AttributeNode {
    pub fn kind(&self) -> NodeKind {
        match self {
            AttributeNode::Scalar(_) => NodeKind::Scalar,
            AttributeNode::Object(_) => NodeKind::Object,
            AttributeNode::Collection(_) => NodeKind::Collection,
        }
    }

    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            AttributeNode::Scalar(value) => Some(value),
            _ => None,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeKind::Scalar => f.write_str("scalar"),
            NodeKind::Object => f.write_str("object"),
            NodeKind::Collection => f.write_str("collection"),
        }
    }
}

impl From<String> for AttributeNode {
    fn from(value: String) -> Self {
        AttributeNode::Scalar(value)
    }
}

impl From<&str> for AttributeNode {
    fn from(value: &str) -> Self {
        AttributeNode::Scalar(value.to_string())
    }
}

impl From<Object> for AttributeNode {
    fn from(value: Object) -> Self {
        AttributeNode::Object(value)
    }
}

/// Builds a [AttributeNode::Collection] indexed `0..n`
impl<T: Into<AttributeNode>> From<Vec<T>> for AttributeNode {
    fn from(value: Vec<T>) -> Self {
        AttributeNode::Collection(
            value
                .into_iter()
                .enumerate()
                .map(|(index, element)| (index.to_string(), element.into()))
                .collect(),
        )
    }
}

impl<K: ToString, V: Into<AttributeNode>> FromIterator<(K, V)> for AttributeNode {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        AttributeNode::Object(
            iter.into_iter()
                .map(|(k, v)| (k.to_string(), v.into()))
                .collect(),
        )
    }
}

impl serde::ser::Serialize for AttributeNode {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            AttributeNode::Scalar(value) => serializer.serialize_str(value),
            AttributeNode::Object(value) => {
                let mut ser = serializer.serialize_map(Some(value.len()))?;
                for (element_key, element_value) in value {
                    ser.serialize_entry(element_key, element_value)?;
                }
                ser.end()
            }
            AttributeNode::Collection(value) => {
                let mut ser = serializer.serialize_seq(Some(value.len()))?;
                for (_index, element) in value {
                    ser.serialize_element(element)?;
                }
                ser.end()
            }
        }
    }
}
