//! Minimal syntax tree handed over by the JSON parser, and the property
//! mapper that turns an object node's children into an ordered key → value map.
//!
//! An object node's children are `Property` nodes; each property has exactly
//! two children, the key (a `String` leaf) and the value.
use indexmap::IndexMap;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxKind {
    Object,
    Array,
    Property,
    String,
    Number,
    Boolean,
    Null,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxNode {
    pub kind: SyntaxKind,
    /// Literal value of a leaf; `None` for containers and properties.
    pub value: Option<Value>,
    pub children: Vec<SyntaxNode>,
}

/// One `key: value` pair pulled out of a property node.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyNode<'a> {
    /// Quoted as `'a-b'` when it isn't usable as a bare identifier.
    pub key: String,
    pub value: &'a SyntaxNode,
}

impl SyntaxNode {
    pub fn leaf(kind: SyntaxKind, value: Value) -> Self {
        Self { kind, value: Some(value), children: Vec::new() }
    }

    pub fn property(key: &str, value: SyntaxNode) -> Self {
        Self {
            kind: SyntaxKind::Property,
            value: None,
            children: vec![Self::leaf(SyntaxKind::String, Value::from(key)), value],
        }
    }

    /// Build the tree shape a parser would hand over for an already parsed document.
    pub fn from_value(v: &Value) -> Self {
        match v {
            Value::Null => Self::leaf(SyntaxKind::Null, Value::Null),
            Value::Bool(_) => Self::leaf(SyntaxKind::Boolean, v.clone()),
            Value::Number(_) => Self::leaf(SyntaxKind::Number, v.clone()),
            Value::String(_) => Self::leaf(SyntaxKind::String, v.clone()),
            Value::Array(xs) => Self {
                kind: SyntaxKind::Array,
                value: None,
                children: xs.iter().map(Self::from_value).collect(),
            },
            Value::Object(m) => Self {
                kind: SyntaxKind::Object,
                value: None,
                children: m.iter().map(|(k, v)| Self::property(k, Self::from_value(v))).collect(),
            },
        }
    }
}

/// Key/value of a two-child property node. `None` when the node isn't one.
pub fn property_to_tuple(node: &SyntaxNode) -> Option<PropertyNode<'_>> {
    let [key, value] = node.children.as_slice() else { return None };
    let key = key.value.as_ref()?.as_str()?;
    let key = if key.contains('-') { format!("'{key}'") } else { key.to_string() };
    Some(PropertyNode { key, value })
}

/// Children of `node` keyed by property name. Duplicate keys: last one wins.
pub fn make_property_map(node: &SyntaxNode) -> IndexMap<String, &SyntaxNode> {
    let mut m = IndexMap::new();
    for property in node.children.iter().filter_map(property_to_tuple) {
        m.insert(property.key, property.value);
    }
    m
}
