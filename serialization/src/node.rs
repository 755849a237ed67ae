use super::*;
use indexmap::IndexMap;
use rust_decimal::Decimal;
use time::OffsetDateTime;
use uuid::Uuid;

/// One decoded CBOR item.
///
/// Trees are immutable once built and share sub-trees through [`Arc`], so a
/// child handed out by a [`ParseNode`] is part of its parent's tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    UInt64(u64),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    Decimal(Decimal),
    Text(String),
    Guid(Uuid),
    Timestamp {
        value: OffsetDateTime,
        /// The source text, when the timestamp was promoted from a text string.
        text: Option<String>,
    },
    Array(Vec<Arc<Node>>),
    Map(IndexMap<String, Arc<Node>>),
}

impl Node {
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Null => "Null",
            Node::Bool(_) => "Bool",
            Node::UInt64(_) => "UInt64",
            Node::Int64(_) => "Int64",
            Node::Float32(_) => "Float32",
            Node::Float64(_) => "Float64",
            Node::Decimal(_) => "Decimal",
            Node::Text(_) => "Text",
            Node::Guid(_) => "Guid",
            Node::Timestamp { .. } => "Timestamp",
            Node::Array(_) => "Array",
            Node::Map(_) => "Map",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null)
    }

    /// The text of a string node, including the source text of a promoted timestamp.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Node::Text(s) => Some(s),
            Node::Timestamp { text: Some(s), .. } => Some(s),
            _ => None,
        }
    }

    /// The elements of an array node, empty for any other node.
    pub fn elements(&self) -> &[Arc<Node>] {
        match self {
            Node::Array(items) => items,
            _ => &[],
        }
    }

    pub fn get(&self, key: &str) -> Option<&Arc<Node>> {
        match self {
            Node::Map(entries) => entries.get(key),
            _ => None,
        }
    }
}
