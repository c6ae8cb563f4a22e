//! Capability checks over [`NodeType`].

use crate::ir::NodeType;

/// True for the primitive family (`any`, `unknown`, `null`, `string`, ...).
pub fn is_primitive_type_node(node: &NodeType) -> bool {
    node.as_primitive().is_some()
}

/// True iff the node declares at least one generic token.
pub fn is_generic_node_type(node: &NodeType) -> bool {
    node.meta().is_generic()
}
