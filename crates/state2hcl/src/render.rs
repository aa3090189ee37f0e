//! Write an attribute tree as raw hcl block text
//!
//! Output is not indented, one attribute or block delimiter per line. See
//! [crate::format] for the pretty printed version.
//!
//! Objects are written according to their content:
//!
//! | children                                         | written as                 |
//! |--------------------------------------------------|----------------------------|
//! | any `<n> = value` where `n` is the hash of value | `key = ["a", "b"]`         |
//! | keys are exactly `0..n`, all of one kind         | list literal or blocks     |
//! | only numeric keys holding objects                | one `key { }` per element  |
//! | anything else                                    | nested `key { }`           |
use crate::keys;
use crate::node::{AttributeNode, NodeKind, Object};
use std::fmt::Write;

/// Renders a managed resource block
pub fn render(
    type_name: &str,
    local_name: &str,
    attributes: &Object,
) -> Result<String, RenderError> {
    render_block("resource", &[type_name, local_name], attributes)
}

/// Renders any block with the given identifier and labels
pub fn render_block(ident: &str, labels: &[&str], body: &Object) -> Result<String, RenderError> {
    let mut renderer = Renderer::default();
    renderer.block(ident, labels, body)?;
    Ok(renderer.buffer)
}

#[derive(Default)]
struct Renderer {
    buffer: String,
    /// keys leading to the entry currently written
    path: Vec<String>,
}

#[derive(Debug)]
enum Shape<'a> {
    StringSet,
    Sequence(Vec<(&'a str, &'a AttributeNode)>),
    BlockSet(Vec<(&'a str, &'a AttributeNode)>),
    Block,
}

impl Renderer {
    fn block(&mut self, ident: &str, labels: &[&str], body: &Object) -> Result<(), RenderError> {
        self.buffer.push_str(ident);
        for label in labels {
            write!(self.buffer, " {}", keys::quote(label))?;
        }
        self.buffer.push_str(" {\n");
        self.body(body)?;
        self.buffer.push_str("}\n");
        Ok(())
    }

    fn body(&mut self, body: &Object) -> Result<(), RenderError> {
        for (key, node) in body {
            self.path.push(key.clone());
            let result = self.entry(key, node);
            self.path.pop();
            result?;
        }
        Ok(())
    }

    fn entry(&mut self, key: &str, node: &AttributeNode) -> Result<(), RenderError> {
        match node {
            AttributeNode::Scalar(value) => {
                writeln!(self.buffer, "{} = {}", keys::key(key), keys::scalar(value))?;
                Ok(())
            }
            AttributeNode::Object(children) => {
                let shape = classify(children);
                tracing::trace!(key = %self.path.join("."), ?shape, "object shape");

                match shape {
                    Shape::StringSet => self.string_set(key, children),
                    Shape::Sequence(elements) => self.sequence(key, elements),
                    Shape::BlockSet(elements) => self.sequence(key, elements),
                    Shape::Block => self.nested_block(key, children),
                }
            }
            AttributeNode::Collection(elements) => self.sequence(
                key,
                elements
                    .iter()
                    .map(|(index, element)| (index.as_str(), element))
                    .collect(),
            ),
        }
    }

    fn nested_block(&mut self, key: &str, body: &Object) -> Result<(), RenderError> {
        writeln!(self.buffer, "{} {{", keys::key(key))?;
        self.body(body)?;
        self.buffer.push_str("}\n");
        Ok(())
    }

    /// Set members are always strings, the hash is taken over the string form
    fn string_set(&mut self, key: &str, members: &Object) -> Result<(), RenderError> {
        let mut values = Vec::with_capacity(members.len());
        for (index, member) in members {
            let AttributeNode::Scalar(value) = member else {
                return Err(self.unsupported(index, member.kind()));
            };
            values.push(keys::quote(value));
        }

        writeln!(self.buffer, "{} = [{}]", keys::key(key), values.join(", "))?;
        Ok(())
    }

    /// Scalars become one list literal, objects become repeated blocks
    fn sequence(
        &mut self,
        key: &str,
        elements: Vec<(&str, &AttributeNode)>,
    ) -> Result<(), RenderError> {
        let expected = elements
            .first()
            .map(|(_, element)| element.kind())
            .unwrap_or(NodeKind::Scalar);

        if let Some((index, element)) = elements
            .iter()
            .find(|(_, element)| element.kind() != expected || expected == NodeKind::Collection)
        {
            return Err(self.unsupported(index, element.kind()));
        }

        if expected == NodeKind::Scalar {
            let values: Vec<String> = elements
                .iter()
                .filter_map(|(_, element)| element.as_scalar())
                .map(keys::scalar)
                .collect();
            writeln!(self.buffer, "{} = [{}]", keys::key(key), values.join(", "))?;
            return Ok(());
        }

        for (index, element) in elements {
            let AttributeNode::Object(body) = element else {
                continue;
            };
            self.path.push(index.to_string());
            let result = self.nested_block(key, body);
            self.path.pop();
            result?;
        }

        Ok(())
    }

    fn unsupported(&self, index: &str, kind: NodeKind) -> RenderError {
        RenderError::UnsupportedScalarType {
            key: format!("{}.{}", self.path.join("."), index),
            kind,
        }
    }
}

fn classify(children: &Object) -> Shape<'_> {
    let is_string_set = children.iter().any(|(key, child)| {
        child
            .as_scalar()
            .is_some_and(|value| keys::is_set_key(key, value))
    });
    if is_string_set {
        return Shape::StringSet;
    }

    let mut indexed = Vec::with_capacity(children.len());
    for (key, child) in children {
        let Some(index) = keys::parse_index(key) else {
            return Shape::Block;
        };
        indexed.push((index, key.as_str(), child));
    }

    if indexed.is_empty() {
        return Shape::Block;
    }

    indexed.sort_by_key(|(index, _, _)| *index);
    let elements: Vec<_> = indexed.iter().map(|(_, key, child)| (*key, *child)).collect();

    let only_objects = elements
        .iter()
        .all(|(_, child)| matches!(child, AttributeNode::Object(_)));
    let only_scalars = elements
        .iter()
        .all(|(_, child)| matches!(child, AttributeNode::Scalar(_)));

    // a map which happens to use 0..n as keys but mixes kinds stays a block
    let is_sequence = indexed
        .iter()
        .enumerate()
        .all(|(position, (index, _, _))| *index == position as u64);
    if is_sequence && (only_objects || only_scalars) {
        return Shape::Sequence(elements);
    }

    if only_objects {
        return Shape::BlockSet(elements);
    }

    Shape::Block
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RenderError {
    #[error("`{key}` is a {kind} which can not be written here")]
    UnsupportedScalarType { key: String, kind: NodeKind },
    #[error("unable to write block text")]
    Write(#[from] std::fmt::Error),
}
