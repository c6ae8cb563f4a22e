//! Instantiate `Name<Args>['property']` against the type `Name` points at.
use tracing::{debug, trace};

use crate::ir::{NodeType, ObjectType, RefType};
use crate::predicates::is_generic_node_type;
use super::generics::{fill_in_generics, GenericMap};

/// Bind `reference`'s arguments to `target`'s tokens by position, substitute,
/// drop the tokens that got consumed, then apply indexed access if asked for.
pub fn resolve_reference_node(reference: &RefType, target: &NodeType) -> NodeType {
    let arguments = reference.generic_arguments.as_deref();

    let mut generics = GenericMap::new();
    if let Some(arguments) = arguments {
        if is_generic_node_type(target) {
            for (index, token) in target.generic_tokens().iter().enumerate() {
                match arguments.get(index).or_else(|| token.fallback()) {
                    Some(bound) => {
                        generics.insert(token.symbol.clone(), bound.clone());
                    }
                    None => debug!(symbol = %token.symbol, "no argument, default or constraint; leaving unbound"),
                }
            }
        }
    }

    let mut filled = fill_in_generics(target, &generics);

    let supplied = arguments.map_or(0, <[NodeType]>::len);
    if supplied > 0 && is_generic_node_type(&filled) {
        let tokens = &mut filled.meta_mut().generic_tokens;
        if supplied < tokens.len() {
            tokens.drain(..supplied);
        } else if supplied == tokens.len() {
            tokens.clear();
        }
        trace!(reference = %reference.reference, supplied, remaining = tokens.len(), "trimmed generic tokens");
    }

    if let (Some(property), NodeType::Object(object)) = (&reference.property, &filled) {
        return index_access(object, property);
    }
    filled
}

/// `Object['property']`: the property, else the catch-all, else `undefined`.
pub(crate) fn index_access(object: &ObjectType, property: &str) -> NodeType {
    object
        .properties
        .get(property)
        .map(|p| p.node.clone())
        .or_else(|| object.additional_properties.as_deref().cloned())
        .unwrap_or_else(NodeType::undefined)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};

    fn node(v: Value) -> NodeType { serde_json::from_value(v).unwrap() }
    fn reference(v: Value) -> RefType { serde_json::from_value(v).unwrap() }
    fn to_json(n: &NodeType) -> Value { serde_json::to_value(n).unwrap() }

    fn pair() -> NodeType {
        node(json!({
            "type": "object",
            "name": "Pair",
            "genericTokens": [
                { "symbol": "A" },
                { "symbol": "B", "default": { "type": "boolean" } }
            ],
            "properties": {
                "first": { "required": true, "node": { "type": "ref", "ref": "A" } },
                "second": { "required": true, "node": { "type": "ref", "ref": "B" } }
            },
            "additionalProperties": false
        }))
    }

    #[test]
    fn partial_arguments_leave_the_trailing_token() {
        let r = reference(json!({ "ref": "Pair", "genericArguments": [{ "type": "string" }] }));
        let out = resolve_reference_node(&r, &pair());
        let tokens = out.generic_tokens();
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens[0].symbol, "B");

        // B had a default, so it was still substituted
        let out = to_json(&out);
        assert_eq!(out["properties"]["first"]["node"], json!({ "type": "string" }));
        assert_eq!(out["properties"]["second"]["node"], json!({ "type": "boolean" }));
    }

    #[test]
    fn full_arguments_clear_the_tokens() {
        let r = reference(json!({ "ref": "Pair", "genericArguments": [{ "type": "string" }, { "type": "number" }] }));
        let out = resolve_reference_node(&r, &pair());
        assert!(out.generic_tokens().is_empty());
        assert_eq!(to_json(&out)["properties"]["second"]["node"], json!({ "type": "number" }));
    }

    #[test]
    fn extra_arguments_leave_tokens_untouched() {
        let r = reference(json!({
            "ref": "Pair",
            "genericArguments": [{ "type": "string" }, { "type": "number" }, { "type": "null" }]
        }));
        assert_eq!(resolve_reference_node(&r, &pair()).generic_tokens().len(), 2);
    }

    #[test]
    fn no_arguments_means_no_binding() {
        let r = reference(json!({ "ref": "Pair" }));
        let out = resolve_reference_node(&r, &pair());
        assert_eq!(out, pair());
    }

    #[test]
    fn token_without_any_fallback_stays_unbound() {
        let target = node(json!({
            "type": "array",
            "genericTokens": [{ "symbol": "A" }, { "symbol": "B" }],
            "elementType": { "type": "or", "or": [{ "type": "ref", "ref": "A" }, { "type": "ref", "ref": "B" }] }
        }));
        let r = reference(json!({ "ref": "List", "genericArguments": [{ "type": "string" }] }));
        let out = to_json(&resolve_reference_node(&r, &target));
        assert_eq!(out["elementType"]["or"], json!([{ "type": "string" }, { "type": "ref", "ref": "B" }]));
        assert_eq!(out["genericTokens"], json!([{ "symbol": "B" }]));
    }

    #[test]
    fn indexed_access_falls_back_in_order() {
        let target = node(json!({
            "type": "object",
            "genericTokens": [{ "symbol": "T" }],
            "properties": { "value": { "required": true, "node": { "type": "ref", "ref": "T" } } },
            "additionalProperties": { "type": "number" }
        }));

        let hit = reference(json!({ "ref": "Box", "genericArguments": [{ "type": "string" }], "property": "value" }));
        assert_eq!(to_json(&resolve_reference_node(&hit, &target)), json!({ "type": "string" }));

        let extra = reference(json!({ "ref": "Box", "genericArguments": [{ "type": "string" }], "property": "other" }));
        assert_eq!(to_json(&resolve_reference_node(&extra, &target)), json!({ "type": "number" }));

        let closed = node(json!({ "type": "object", "properties": {}, "additionalProperties": false }));
        let miss = reference(json!({ "ref": "Empty", "property": "other" }));
        assert_eq!(resolve_reference_node(&miss, &closed), NodeType::undefined());
    }

    #[test]
    fn indexed_access_on_non_object_is_a_no_op() {
        let target = node(json!({ "type": "array", "elementType": { "type": "string" } }));
        let r = reference(json!({ "ref": "Strings", "property": "length" }));
        assert_eq!(resolve_reference_node(&r, &target), target);
    }

    #[test]
    fn target_is_not_modified() {
        let target = pair();
        let r = reference(json!({ "ref": "Pair", "genericArguments": [{ "type": "string" }, { "type": "number" }] }));
        let _ = resolve_reference_node(&r, &target);
        assert_eq!(target, pair());
    }
}
