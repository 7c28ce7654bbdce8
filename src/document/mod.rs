//! Generic configuration document tree.
//!
//! CI configuration files are parsed into [`Node`] trees, a closed set of
//! variants that the normalizer and diff engine pattern-match on. The
//! `!reference` tag gets its own variant so that it survives a
//! parse/emit round-trip untouched.

mod emit;
mod parse;

pub use emit::{EmitOptions, YamlEmitter};
pub use parse::{parse_document, parse_node};

use indexmap::IndexMap;

/// Ordered mapping from key to node. Key order is the order of appearance.
pub type Mapping = IndexMap<String, Node>;

/// A resolved configuration: unit name to unit body.
pub type Document = IndexMap<String, Node>;

/// YAML tag used by GitLab for cross-job references.
pub const REFERENCE_TAG: &str = "!reference";

/// One node of a parsed configuration tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Number(serde_yaml::Number),
    String(String),
    Sequence(Vec<Node>),
    Mapping(Mapping),
    /// `!reference [job, key, ...]`
    Reference(Vec<String>),
}

impl Node {
    /// Human readable name of the variant, used in error messages.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "sequence",
            Self::Mapping(_) => "mapping",
            Self::Reference(_) => "reference",
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub const fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Self]> {
        match self {
            Self::Sequence(seq) => Some(seq),
            _ => None,
        }
    }

    /// Looks up `key` when this node is a mapping.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        self.as_mapping().and_then(|map| map.get(key))
    }

    /// Returns true when this node is a mapping containing `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

impl From<&str> for Node {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Node {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for Node {
    fn from(value: i64) -> Self {
        Self::Number(value.into())
    }
}

impl From<bool> for Node {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl<T: Into<Node>> From<Vec<T>> for Node {
    fn from(value: Vec<T>) -> Self {
        Self::Sequence(value.into_iter().map(Into::into).collect())
    }
}

impl From<Mapping> for Node {
    fn from(value: Mapping) -> Self {
        Self::Mapping(value)
    }
}

#[cfg(test)]
#[path = "document_tests.rs"]
mod tests;
