use serde_yaml::Value;
use serde_yaml::value::TaggedValue;

use crate::error::{CiDiffError, Result};

use super::{Document, Mapping, Node, REFERENCE_TAG};

/// Parse YAML text into a configuration document.
///
/// Anchors and aliases are expanded and `<<` merge keys applied. An empty
/// input yields an empty document.
///
/// # Errors
/// Returns [`CiDiffError::Parse`] when the content is not well-formed YAML,
/// uses an unsupported tag, or its top level is not a mapping.
pub fn parse_document(content: &str, source_id: &str) -> Result<Document> {
    match parse_node(content, source_id)? {
        Node::Null => Ok(Document::new()),
        Node::Mapping(map) => Ok(map),
        other => Err(CiDiffError::parse(
            source_id,
            format!("expected a mapping at the top level, found a {}", other.kind()),
        )),
    }
}

/// Parse YAML text into a single node of any shape.
///
/// # Errors
/// Returns [`CiDiffError::Parse`] when the content is not well-formed YAML or
/// uses an unsupported tag.
pub fn parse_node(content: &str, source_id: &str) -> Result<Node> {
    let mut value: Value =
        serde_yaml::from_str(content).map_err(|e| CiDiffError::parse(source_id, e))?;
    value
        .apply_merge()
        .map_err(|e| CiDiffError::parse(source_id, e))?;
    from_value(value, source_id)
}

fn from_value(value: Value, source_id: &str) -> Result<Node> {
    let node = match value {
        Value::Null => Node::Null,
        Value::Bool(b) => Node::Bool(b),
        Value::Number(n) => Node::Number(n),
        Value::String(s) => Node::String(s),
        Value::Sequence(seq) => Node::Sequence(
            seq.into_iter()
                .map(|item| from_value(item, source_id))
                .collect::<Result<_>>()?,
        ),
        Value::Mapping(map) => {
            let mut out = Mapping::with_capacity(map.len());
            for (key, item) in map {
                out.insert(key_to_string(key, source_id)?, from_value(item, source_id)?);
            }
            Node::Mapping(out)
        }
        Value::Tagged(tagged) => from_tagged(*tagged, source_id)?,
    };
    Ok(node)
}

fn from_tagged(tagged: TaggedValue, source_id: &str) -> Result<Node> {
    if tagged.tag != REFERENCE_TAG {
        return Err(CiDiffError::parse(
            source_id,
            format!("unsupported tag {}", tagged.tag),
        ));
    }

    let Value::Sequence(items) = tagged.value else {
        return Err(CiDiffError::parse(
            source_id,
            format!("{REFERENCE_TAG} expects a sequence"),
        ));
    };

    let references = items
        .into_iter()
        .map(|item| {
            scalar_to_string(&item).ok_or_else(|| {
                CiDiffError::parse(
                    source_id,
                    format!("{REFERENCE_TAG} entries must be scalars"),
                )
            })
        })
        .collect::<Result<_>>()?;

    Ok(Node::Reference(references))
}

fn key_to_string(key: Value, source_id: &str) -> Result<String> {
    match key {
        Value::String(s) => Ok(s),
        Value::Null => Ok("null".to_string()),
        other => scalar_to_string(&other)
            .ok_or_else(|| CiDiffError::parse(source_id, "mapping keys must be scalars")),
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
