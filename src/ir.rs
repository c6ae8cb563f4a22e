// Strongly-typed XLR node model. Serializes 1:1 with the JSON wire shape.

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};

/// A structural type, tagged on `type`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeType {
    Any(PrimitiveType),
    Unknown(PrimitiveType),
    Undefined(PrimitiveType),
    Null(PrimitiveType),
    Void(PrimitiveType),
    Never(PrimitiveType),
    String(PrimitiveType),
    Number(PrimitiveType),
    Boolean(PrimitiveType),
    Object(ObjectType),
    Array(ArrayType),
    Tuple(TupleType),
    Record(RecordType),
    Ref(RefType),
    Or(OrType),
    And(AndType),
    Conditional(ConditionalType),
}

/// The primitive family, without payload. Handy for tag comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PrimitiveKind {
    Any,
    Unknown,
    Undefined,
    Null,
    Void,
    Never,
    String,
    Number,
    Boolean,
}

/// Annotations every node may carry. Only `generic_tokens` has semantics here.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub generic_tokens: Vec<GenericToken>,
    /// Any other annotation (`examples`, `default`, `see`, `comment`, `source`...), passed through as-is.
    #[serde(flatten)]
    pub extra: IndexMap<String, serde_json::Value>,
}

/// A declared generic parameter, e.g. `T extends string = "a"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericToken {
    pub symbol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Box<NodeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Box<NodeType>>,
}

/// Literal carried by a primitive's `const`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Literal {
    Boolean(bool),
    Integer(i64),
    Number(OrderedFloat<f64>),
    String(String),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveType {
    #[serde(flatten)]
    pub meta: Meta,
    #[serde(rename = "const", default, skip_serializing_if = "Option::is_none")]
    pub literal: Option<Literal>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObjectType {
    #[serde(flatten)]
    pub meta: Meta,
    #[serde(default)]
    pub properties: IndexMap<String, ObjectProperty>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extends: Option<Box<NodeType>>,
    /// `None` is the closed shape (`false` on the wire).
    #[serde(default, with = "closable")]
    pub additional_properties: Option<Box<NodeType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectProperty {
    #[serde(default)]
    pub required: bool,
    pub node: NodeType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayType {
    #[serde(flatten)]
    pub meta: Meta,
    pub element_type: Box<NodeType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TupleType {
    #[serde(flatten)]
    pub meta: Meta,
    pub element_types: Vec<TupleMember>,
    #[serde(default, with = "closable")]
    pub additional_items: Option<Box<NodeType>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TupleMember {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node: NodeType,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordType {
    #[serde(flatten)]
    pub meta: Meta,
    pub key_type: Box<NodeType>,
    pub value_type: Box<NodeType>,
}

/// `Name<Args>['property']`. A bare generic symbol is a ref with no arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefType {
    #[serde(flatten)]
    pub meta: Meta,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_arguments: Option<Vec<NodeType>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrType {
    #[serde(flatten)]
    pub meta: Meta,
    pub or: Vec<NodeType>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AndType {
    #[serde(flatten)]
    pub meta: Meta,
    pub and: Vec<NodeType>,
}

/// `left extends right ? true : false`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalType {
    #[serde(flatten)]
    pub meta: Meta,
    pub check: ConditionalCheck,
    pub value: ConditionalValue,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalCheck {
    pub left: Box<NodeType>,
    pub right: Box<NodeType>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalValue {
    #[serde(rename = "true")]
    pub when_true: Box<NodeType>,
    #[serde(rename = "false")]
    pub when_false: Box<NodeType>,
}

// ------------------------------- Accessors -------------------------------- //

impl NodeType {
    pub fn any() -> Self { NodeType::Any(PrimitiveType::default()) }
    pub fn undefined() -> Self { NodeType::Undefined(PrimitiveType::default()) }

    /// The wire tag, e.g. `"object"` or `"ref"`.
    pub fn kind_name(&self) -> &'static str {
        match self {
            NodeType::Any(_) => "any",
            NodeType::Unknown(_) => "unknown",
            NodeType::Undefined(_) => "undefined",
            NodeType::Null(_) => "null",
            NodeType::Void(_) => "void",
            NodeType::Never(_) => "never",
            NodeType::String(_) => "string",
            NodeType::Number(_) => "number",
            NodeType::Boolean(_) => "boolean",
            NodeType::Object(_) => "object",
            NodeType::Array(_) => "array",
            NodeType::Tuple(_) => "tuple",
            NodeType::Record(_) => "record",
            NodeType::Ref(_) => "ref",
            NodeType::Or(_) => "or",
            NodeType::And(_) => "and",
            NodeType::Conditional(_) => "conditional",
        }
    }

    pub fn as_primitive(&self) -> Option<(PrimitiveKind, &PrimitiveType)> {
        match self {
            NodeType::Any(p) => Some((PrimitiveKind::Any, p)),
            NodeType::Unknown(p) => Some((PrimitiveKind::Unknown, p)),
            NodeType::Undefined(p) => Some((PrimitiveKind::Undefined, p)),
            NodeType::Null(p) => Some((PrimitiveKind::Null, p)),
            NodeType::Void(p) => Some((PrimitiveKind::Void, p)),
            NodeType::Never(p) => Some((PrimitiveKind::Never, p)),
            NodeType::String(p) => Some((PrimitiveKind::String, p)),
            NodeType::Number(p) => Some((PrimitiveKind::Number, p)),
            NodeType::Boolean(p) => Some((PrimitiveKind::Boolean, p)),
            NodeType::Object(_)
            | NodeType::Array(_)
            | NodeType::Tuple(_)
            | NodeType::Record(_)
            | NodeType::Ref(_)
            | NodeType::Or(_)
            | NodeType::And(_)
            | NodeType::Conditional(_) => None,
        }
    }

    pub fn meta(&self) -> &Meta {
        match self {
            NodeType::Any(p)
            | NodeType::Unknown(p)
            | NodeType::Undefined(p)
            | NodeType::Null(p)
            | NodeType::Void(p)
            | NodeType::Never(p)
            | NodeType::String(p)
            | NodeType::Number(p)
            | NodeType::Boolean(p) => &p.meta,
            NodeType::Object(o) => &o.meta,
            NodeType::Array(a) => &a.meta,
            NodeType::Tuple(t) => &t.meta,
            NodeType::Record(r) => &r.meta,
            NodeType::Ref(r) => &r.meta,
            NodeType::Or(o) => &o.meta,
            NodeType::And(a) => &a.meta,
            NodeType::Conditional(c) => &c.meta,
        }
    }

    pub fn meta_mut(&mut self) -> &mut Meta {
        match self {
            NodeType::Any(p)
            | NodeType::Unknown(p)
            | NodeType::Undefined(p)
            | NodeType::Null(p)
            | NodeType::Void(p)
            | NodeType::Never(p)
            | NodeType::String(p)
            | NodeType::Number(p)
            | NodeType::Boolean(p) => &mut p.meta,
            NodeType::Object(o) => &mut o.meta,
            NodeType::Array(a) => &mut a.meta,
            NodeType::Tuple(t) => &mut t.meta,
            NodeType::Record(r) => &mut r.meta,
            NodeType::Ref(r) => &mut r.meta,
            NodeType::Or(o) => &mut o.meta,
            NodeType::And(a) => &mut a.meta,
            NodeType::Conditional(c) => &mut c.meta,
        }
    }

    pub fn generic_tokens(&self) -> &[GenericToken] { &self.meta().generic_tokens }
}

impl Meta {
    pub fn is_generic(&self) -> bool { !self.generic_tokens.is_empty() }
}

impl Literal {
    /// Equality with `3` and `3.0` treated as the same number.
    pub fn same_value(&self, other: &Literal) -> bool {
        match (self, other) {
            (Literal::Integer(a), Literal::Number(b)) | (Literal::Number(b), Literal::Integer(a)) => {
                (*a as f64) == b.into_inner()
            }
            _ => self == other,
        }
    }
}

impl GenericToken {
    /// `default ?? constraints`
    pub fn fallback(&self) -> Option<&NodeType> {
        self.default.as_deref().or(self.constraints.as_deref())
    }
}

// `false | NodeType` on the wire; `true` reads as `any`.
mod closable {
    use super::NodeType;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Closable {
        Flag(bool),
        Node(Box<NodeType>),
    }

    pub fn serialize<S: Serializer>(value: &Option<Box<NodeType>>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(node) => node.serialize(serializer),
            None => serializer.serialize_bool(false),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Box<NodeType>>, D::Error> {
        Ok(match Closable::deserialize(deserializer)? {
            Closable::Flag(false) => None,
            Closable::Flag(true) => Some(Box::new(NodeType::any())),
            Closable::Node(node) => Some(node),
        })
    }
}

// ------------------------------- Tests ------------------------------------ //
