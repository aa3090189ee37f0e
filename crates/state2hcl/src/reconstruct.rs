//! Rebuild the nested attribute tree from flat state attributes
//!
//! State stores every attribute of a resource as `path = value` where nested
//! values are addressed by dot separated segments:
//!
//! ```text
//! ami               = ami-123
//! tags.%            = 1
//! tags.Name         = web1
//! ingress.#         = 1
//! ingress.0.port    = 22
//! ```
//!
//! Each segment except the last one becomes an [AttributeNode::Object], the
//! last one holds the [AttributeNode::Scalar]. Count (`#`) and size (`%`)
//! markers are dropped. Numeric segments are kept as plain keys, deciding
//! between list, set and block is left to [crate::render].
use crate::keys;
use crate::node::{AttributeNode, NodeKind, Object};
use std::collections::BTreeMap;

/// Reconstructs the attribute tree of one resource
pub fn reconstruct<K, V>(
    flat: impl IntoIterator<Item = (K, V)>,
) -> Result<Object, ReconstructError>
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut root = Object::new();

    for (path, value) in flat {
        let path = path.as_ref();
        // `set.1234.` addresses the same element as `set.1234`
        let trimmed = path.strip_suffix('.').unwrap_or(path);
        let segments: Vec<&str> = trimmed.split('.').collect();

        insert(&mut root, &segments, 0, value.as_ref())?;
    }

    Ok(root)
}

fn insert(
    object: &mut Object,
    segments: &[&str],
    depth: usize,
    value: &str,
) -> Result<(), ReconstructError> {
    let key = segments[depth];

    if keys::is_marker(key) {
        tracing::debug!(path = %segments.join("."), "discard collection marker");
        return Ok(());
    }

    let Some(next) = segments.get(depth + 1) else {
        if let Some(existing @ (AttributeNode::Object(_) | AttributeNode::Collection(_))) =
            object.get(key)
        {
            return Err(ReconstructError::StructuralConflict {
                key: segments.join("."),
                existing: existing.kind(),
                attempted: NodeKind::Scalar,
            });
        }

        tracing::trace!(path = %segments.join("."), "insert scalar");
        object.insert(key.to_string(), value.into());
        return Ok(());
    };

    // a marker only counts elements, the container itself is implied by its elements
    if keys::is_marker(next) {
        tracing::debug!(path = %segments.join("."), "discard collection marker");
        return Ok(());
    }

    let child = object
        .entry(key.to_string())
        .or_insert_with(|| AttributeNode::Object(Object::new()));

    match child {
        AttributeNode::Object(children) => insert(children, segments, depth + 1, value),
        existing => Err(ReconstructError::StructuralConflict {
            key: segments[..=depth].join("."),
            existing: existing.kind(),
            attempted: NodeKind::Object,
        }),
    }
}

/// Flattens a tree back into `path = value` pairs
///
/// Inverse of [reconstruct] except for the markers it dropped.
pub fn flatten(object: &Object) -> BTreeMap<String, String> {
    let mut flat = BTreeMap::new();
    for (key, node) in object {
        flatten_node(&mut flat, key.clone(), node);
    }
    flat
}

fn flatten_node(flat: &mut BTreeMap<String, String>, path: String, node: &AttributeNode) {
    match node {
        AttributeNode::Scalar(value) => {
            flat.insert(path, value.clone());
        }
        AttributeNode::Object(children) => {
            for (key, child) in children {
                flatten_node(flat, format!("{path}.{key}"), child);
            }
        }
        AttributeNode::Collection(elements) => {
            for (index, element) in elements {
                flatten_node(flat, format!("{path}.{index}"), element);
            }
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ReconstructError {
    #[error("`{key}` is used as {existing} and as {attempted}")]
    StructuralConflict {
        key: String,
        existing: NodeKind,
        attempted: NodeKind,
    },
}
