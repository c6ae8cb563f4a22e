//! `left extends right ? true : false` over primitive operands.
use tracing::{debug, warn};

use crate::ir::{ConditionalType, NodeType, PrimitiveKind, PrimitiveType};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use super::generics::{fill_guarded, token_defaults};

/// Pick a branch once both operands are primitives, otherwise hand the
/// conditional back unchanged so the caller can retry with more bindings.
pub fn resolve_conditional(conditional: &ConditionalType) -> NodeType {
    let mut guard = RecursionGuard::with_profile(RecursionProfile::Substitution);
    resolve_guarded(conditional, &mut guard)
}

pub(crate) fn resolve_guarded(conditional: &ConditionalType, guard: &mut RecursionGuard) -> NodeType {
    let (Some(left), Some(right)) = (conditional.check.left.as_primitive(), conditional.check.right.as_primitive())
    else {
        debug!(
            left = conditional.check.left.kind_name(),
            right = conditional.check.right.kind_name(),
            "conditional operands not both primitive, deferring"
        );
        return NodeType::Conditional(conditional.clone());
    };

    let holds = extends(left, right);
    debug!(left = ?left.0, right = ?right.0, holds, "resolved conditional");
    let branch = if holds { &conditional.value.when_true } else { &conditional.value.when_false };

    // the branch doesn't carry the conditional's own tokens, materialize them here
    if conditional.meta.is_generic() {
        let already_exceeded = guard.is_exceeded();
        return match guard.tick() {
            RecursionResult::Entered => fill_guarded(branch, &token_defaults(&conditional.meta.generic_tokens), guard),
            denied => {
                if !already_exceeded {
                    warn!(?denied, iterations = guard.iterations(), "conditional re-entry budget spent, branch left unfilled");
                }
                branch.as_ref().clone()
            }
        };
    }
    branch.as_ref().clone()
}

fn extends((left, l): (PrimitiveKind, &PrimitiveType), (right, r): (PrimitiveKind, &PrimitiveType)) -> bool {
    use PrimitiveKind::{Any, Null, Undefined, Unknown};
    match (left, right) {
        (Any | Unknown, Any | Unknown) => true,
        (Null | Undefined, Null | Undefined) => true,
        _ if left == right => match (&l.literal, &r.literal) {
            (Some(a), Some(b)) => a.same_value(b),
            _ => true,
        },
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn conditional(left: Value, right: Value) -> ConditionalType {
        serde_json::from_value(json!({
            "check": { "left": left, "right": right },
            "value": { "true": { "type": "string", "const": "T" }, "false": { "type": "string", "const": "F" } }
        }))
        .unwrap()
    }

    fn branch(left: Value, right: Value) -> Value {
        serde_json::to_value(resolve_conditional(&conditional(left, right))).unwrap()
    }

    const TRUE: &str = "T";
    const FALSE: &str = "F";

    #[test]
    fn top_types_are_interchangeable() {
        assert_eq!(branch(json!({ "type": "any" }), json!({ "type": "unknown" }))["const"], TRUE);
        assert_eq!(branch(json!({ "type": "unknown" }), json!({ "type": "any" }))["const"], TRUE);
        assert_eq!(branch(json!({ "type": "any" }), json!({ "type": "any" }))["const"], TRUE);
    }

    #[test]
    fn empty_types_are_interchangeable() {
        assert_eq!(branch(json!({ "type": "null" }), json!({ "type": "undefined" }))["const"], TRUE);
        assert_eq!(branch(json!({ "type": "undefined" }), json!({ "type": "null" }))["const"], TRUE);
    }

    #[test]
    fn same_tag_compares_literals_only_when_both_have_one() {
        let a = json!({ "type": "string", "const": "a" });
        let b = json!({ "type": "string", "const": "b" });
        let plain = json!({ "type": "string" });
        assert_eq!(branch(a.clone(), a.clone())["const"], TRUE);
        assert_eq!(branch(a.clone(), b)["const"], FALSE);
        assert_eq!(branch(a.clone(), plain.clone())["const"], TRUE);
        assert_eq!(branch(plain.clone(), a)["const"], TRUE);
        assert_eq!(branch(plain.clone(), plain)["const"], TRUE);
    }

    #[test]
    fn falsy_literals_still_count() {
        assert_eq!(branch(json!({ "type": "number", "const": 0 }), json!({ "type": "number", "const": 1 }))["const"], FALSE);
        assert_eq!(branch(json!({ "type": "boolean", "const": false }), json!({ "type": "boolean", "const": false }))["const"], TRUE);
    }

    #[test]
    fn integer_and_float_consts_are_the_same_number() {
        assert_eq!(branch(json!({ "type": "number", "const": 3 }), json!({ "type": "number", "const": 3.0 }))["const"], TRUE);
        assert_eq!(branch(json!({ "type": "number", "const": 3 }), json!({ "type": "number", "const": 3.5 }))["const"], FALSE);
    }

    #[test]
    fn different_tags_take_false() {
        assert_eq!(branch(json!({ "type": "string" }), json!({ "type": "number" }))["const"], FALSE);
        assert_eq!(branch(json!({ "type": "any" }), json!({ "type": "string" }))["const"], FALSE);
        assert_eq!(branch(json!({ "type": "null" }), json!({ "type": "void" }))["const"], FALSE);
    }

    #[test]
    fn non_primitive_operand_defers() {
        let c = conditional(json!({ "type": "object", "properties": {} }), json!({ "type": "string" }));
        assert_eq!(resolve_conditional(&c), NodeType::Conditional(c.clone()));

        let c = conditional(json!({ "type": "string" }), json!({ "type": "ref", "ref": "T" }));
        assert_eq!(resolve_conditional(&c), NodeType::Conditional(c.clone()));
    }

    #[test]
    fn own_tokens_are_materialized_in_the_branch() {
        let c: ConditionalType = serde_json::from_value(json!({
            "genericTokens": [
                { "symbol": "T", "default": { "type": "boolean" } },
                { "symbol": "U", "constraints": { "type": "number" } },
                { "symbol": "V" }
            ],
            "check": { "left": { "type": "string" }, "right": { "type": "string" } },
            "value": {
                "true": { "type": "or", "or": [
                    { "type": "ref", "ref": "T" },
                    { "type": "ref", "ref": "U" },
                    { "type": "ref", "ref": "V" }
                ] },
                "false": { "type": "never" }
            }
        }))
        .unwrap();
        let out = serde_json::to_value(resolve_conditional(&c)).unwrap();
        assert_eq!(out, json!({ "type": "or", "or": [{ "type": "boolean" }, { "type": "number" }, { "type": "any" }] }));
    }

    #[test]
    fn spent_budget_leaves_the_branch_unfilled() {
        let c: ConditionalType = serde_json::from_value(json!({
            "genericTokens": [{ "symbol": "T", "default": { "type": "boolean" } }],
            "check": { "left": { "type": "string" }, "right": { "type": "string" } },
            "value": { "true": { "type": "ref", "ref": "T" }, "false": { "type": "never" } }
        }))
        .unwrap();
        let mut guard = RecursionGuard::with_profile(RecursionProfile::Custom { max_depth: 10, max_iterations: 1 });
        assert_eq!(serde_json::to_value(resolve_guarded(&c, &mut guard)).unwrap(), json!({ "type": "boolean" }));
        assert_eq!(resolve_guarded(&c, &mut guard), *c.value.when_true);
        assert!(guard.is_exceeded());
    }

    #[test]
    fn non_generic_branch_is_returned_verbatim() {
        let c: ConditionalType = serde_json::from_value(json!({
            "check": { "left": { "type": "number" }, "right": { "type": "number" } },
            "value": { "true": { "type": "ref", "ref": "T" }, "false": { "type": "never" } }
        }))
        .unwrap();
        assert_eq!(resolve_conditional(&c), *c.value.when_true);
    }
}
