//! Structural resolution and composition over XLR type nodes.
//!
//! Pure functions over [`ir::NodeType`]: merge object shapes, evaluate
//! conditional types, instantiate generic references, substitute generics.
pub mod error;
pub mod ir;
pub mod predicates;
pub mod recursion;
pub mod resolve;
pub mod syntax;

pub use error::{Error, Result};
pub use ir::{ConditionalType, GenericToken, Literal, Meta, NodeType, ObjectType, RefType};
pub use predicates::{is_generic_node_type, is_primitive_type_node};
pub use resolve::{
    compute_effective_object, fill_in_generics, fill_in_own_generics, resolve_conditional, resolve_reference_node,
    GenericMap,
};
pub use syntax::{make_property_map, property_to_tuple, PropertyNode, SyntaxNode};
