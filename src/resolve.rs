//! Resolution and composition over XLR nodes.
//!
//! Everything here is a pure function from borrowed nodes to fresh nodes:
//! - `generics`: substitute generic symbols with bound types.
//! - `conditional`: pick a branch of `left extends right ? a : b` once both
//!   operands are primitives.
//! - `reference`: instantiate `Name<Args>` against its target, trim consumed
//!   tokens, apply `['property']` access.
//! - `effective`: merge an interface with the one it extends.
//!
//! Anything that can't be decided yet is returned as-is; callers retry once
//! more bindings are known. The only failure is a merge conflict.
pub mod generics;
pub mod conditional;
pub mod reference;
pub mod effective;

pub use generics::{fill_in_generics, fill_in_own_generics, GenericMap};
pub use conditional::resolve_conditional;
pub use reference::resolve_reference_node;
pub use effective::compute_effective_object;
