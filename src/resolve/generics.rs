//! Generic substitution: replace `ref` nodes naming a bound symbol.
//!
//! Bound values are inserted verbatim and never walked again, so a symbol in
//! a bound value always belongs to the caller's scope. Unbound symbols stay as
//! refs. A conditional whose operands stop being refs after substitution is
//! resolved on the spot.
use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::ir::{
    AndType, ArrayType, ConditionalCheck, ConditionalType, ConditionalValue, GenericToken, Meta, NodeType,
    ObjectProperty, ObjectType, OrType, RecordType, RefType, TupleMember, TupleType,
};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use super::{conditional, reference};

/// Symbol → bound type.
pub type GenericMap = IndexMap<String, NodeType>;

pub fn fill_in_generics(node: &NodeType, generics: &GenericMap) -> NodeType {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::Substitution);
    fill_guarded(node, generics, &mut guard)
}

/// Substitute using the node's own tokens (`default ?? constraints ?? any`).
pub fn fill_in_own_generics(node: &NodeType) -> NodeType {
    fill_in_generics(node, &token_defaults(node.generic_tokens()))
}

pub(crate) fn token_defaults(tokens: &[GenericToken]) -> GenericMap {
    tokens
        .iter()
        .map(|token| (token.symbol.clone(), token.fallback().cloned().unwrap_or_else(NodeType::any)))
        .collect()
}

pub(crate) fn fill_guarded(node: &NodeType, generics: &GenericMap, guard: &mut RecursionGuard) -> NodeType {
    let already_exceeded = guard.is_exceeded();
    match guard.enter() {
        RecursionResult::Entered => {
            let filled = fill_node(node, generics, guard);
            guard.leave();
            filled
        }
        denied => {
            if !already_exceeded {
                warn!(
                    kind = node.kind_name(),
                    ?denied,
                    depth = guard.depth(),
                    "substitution limit reached, leaving subtree unresolved"
                );
            }
            node.clone()
        }
    }
}

fn fill_node(node: &NodeType, generics: &GenericMap, guard: &mut RecursionGuard) -> NodeType {
    match node {
        NodeType::Ref(r) => fill_ref(r, generics, guard),
        NodeType::Conditional(c) => fill_conditional(c, generics, guard),

        NodeType::Object(o) => NodeType::Object(ObjectType {
            meta: fill_meta(&o.meta, generics, guard),
            properties: o
                .properties
                .iter()
                .map(|(name, property)| {
                    let node = fill_guarded(&property.node, generics, guard);
                    (name.clone(), ObjectProperty { required: property.required, node })
                })
                .collect(),
            extends: fill_opt(o.extends.as_deref(), generics, guard),
            additional_properties: fill_opt(o.additional_properties.as_deref(), generics, guard),
        }),

        NodeType::Array(a) => NodeType::Array(ArrayType {
            meta: fill_meta(&a.meta, generics, guard),
            element_type: Box::new(fill_guarded(&a.element_type, generics, guard)),
        }),

        NodeType::Tuple(t) => NodeType::Tuple(TupleType {
            meta: fill_meta(&t.meta, generics, guard),
            element_types: t
                .element_types
                .iter()
                .map(|member| TupleMember {
                    name: member.name.clone(),
                    node: fill_guarded(&member.node, generics, guard),
                    optional: member.optional,
                })
                .collect(),
            additional_items: fill_opt(t.additional_items.as_deref(), generics, guard),
        }),

        NodeType::Record(r) => NodeType::Record(RecordType {
            meta: fill_meta(&r.meta, generics, guard),
            key_type: Box::new(fill_guarded(&r.key_type, generics, guard)),
            value_type: Box::new(fill_guarded(&r.value_type, generics, guard)),
        }),

        NodeType::Or(o) => NodeType::Or(OrType {
            meta: fill_meta(&o.meta, generics, guard),
            or: fill_all(&o.or, generics, guard),
        }),

        NodeType::And(a) => NodeType::And(AndType {
            meta: fill_meta(&a.meta, generics, guard),
            and: fill_all(&a.and, generics, guard),
        }),

        NodeType::Any(_)
        | NodeType::Unknown(_)
        | NodeType::Undefined(_)
        | NodeType::Null(_)
        | NodeType::Void(_)
        | NodeType::Never(_)
        | NodeType::String(_)
        | NodeType::Number(_)
        | NodeType::Boolean(_) => node.clone(),
    }
}

fn fill_ref(r: &RefType, generics: &GenericMap, guard: &mut RecursionGuard) -> NodeType {
    let generic_arguments = r.generic_arguments.as_ref().map(|args| fill_all(args, generics, guard));

    let Some(bound) = generics.get(&r.reference) else {
        return NodeType::Ref(RefType {
            meta: r.meta.clone(),
            reference: r.reference.clone(),
            generic_arguments,
            property: r.property.clone(),
        });
    };
    trace!(symbol = %r.reference, bound = bound.kind_name(), "substituting generic");

    // `T['key']` with `T` bound to an object collapses right here
    let mut replacement = match (bound, &r.property) {
        (NodeType::Object(object), Some(property)) => reference::index_access(object, property),
        _ => bound.clone(),
    };

    if let NodeType::Ref(target) = &mut replacement {
        if generic_arguments.is_some() {
            target.generic_arguments = generic_arguments;
        }
        if target.property.is_none() {
            target.property = r.property.clone();
        }
    }

    let meta = replacement.meta_mut();
    if r.meta.name.is_some() {
        meta.name = r.meta.name.clone();
    }
    if r.meta.title.is_some() {
        meta.title = r.meta.title.clone();
    }
    if r.meta.description.is_some() {
        meta.description = r.meta.description.clone();
    }
    replacement
}

fn fill_conditional(c: &ConditionalType, generics: &GenericMap, guard: &mut RecursionGuard) -> NodeType {
    let filled = ConditionalType {
        meta: fill_meta(&c.meta, generics, guard),
        check: ConditionalCheck {
            left: Box::new(fill_guarded(&c.check.left, generics, guard)),
            right: Box::new(fill_guarded(&c.check.right, generics, guard)),
        },
        value: ConditionalValue {
            when_true: Box::new(fill_guarded(&c.value.when_true, generics, guard)),
            when_false: Box::new(fill_guarded(&c.value.when_false, generics, guard)),
        },
    };

    let operands_known = !matches!(filled.check.left.as_ref(), NodeType::Ref(_))
        && !matches!(filled.check.right.as_ref(), NodeType::Ref(_));
    if operands_known {
        conditional::resolve_guarded(&filled, guard)
    } else {
        NodeType::Conditional(filled)
    }
}

fn fill_meta(meta: &Meta, generics: &GenericMap, guard: &mut RecursionGuard) -> Meta {
    Meta {
        name: meta.name.clone(),
        title: meta.title.clone(),
        description: meta.description.clone(),
        generic_tokens: meta
            .generic_tokens
            .iter()
            .map(|token| GenericToken {
                symbol: token.symbol.clone(),
                constraints: fill_opt(token.constraints.as_deref(), generics, guard),
                default: fill_opt(token.default.as_deref(), generics, guard),
            })
            .collect(),
        extra: meta.extra.clone(),
    }
}

fn fill_opt(node: Option<&NodeType>, generics: &GenericMap, guard: &mut RecursionGuard) -> Option<Box<NodeType>> {
    node.map(|n| Box::new(fill_guarded(n, generics, guard)))
}

fn fill_all(nodes: &[NodeType], generics: &GenericMap, guard: &mut RecursionGuard) -> Vec<NodeType> {
    nodes.iter().map(|n| fill_guarded(n, generics, guard)).collect()
}

// ------------------------------- Tests ------------------------------------ //
