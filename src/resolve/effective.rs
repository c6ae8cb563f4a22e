//! Effective shape of an interface extending another: `base` refined by `operand`.
use tracing::debug;

use crate::error::{Error, Result};
use crate::ir::{AndType, Meta, NodeType, ObjectType};

const OBJECT_LITERAL: &str = "object literal";

/// Merge `operand` into a copy of `base`. Operand properties always win; with
/// `error_on_overlap` a property whose structural tag differs between the two
/// is a [`Error::MergeConflict`] instead.
pub fn compute_effective_object(base: &ObjectType, operand: &ObjectType, error_on_overlap: bool) -> Result<ObjectType> {
    let base_name = base.meta.name.as_deref().unwrap_or(OBJECT_LITERAL);
    let operand_name = operand.meta.name.as_deref().unwrap_or(OBJECT_LITERAL);

    let mut effective = base.clone();
    effective.meta.name = Some(format!("{base_name} & {operand_name}"));
    effective.meta.description = Some(format!("Effective type combining {base_name} and {operand_name}"));
    // no dedup by symbol
    effective.meta.generic_tokens.extend(operand.meta.generic_tokens.iter().cloned());

    for (property, descriptor) in &operand.properties {
        if let Some(existing) = effective.properties.get(property) {
            let (ours, theirs) = (existing.node.kind_name(), descriptor.node.kind_name());
            if ours != theirs {
                if error_on_overlap {
                    debug!(%property, ours, theirs, "conflicting property");
                    return Err(Error::MergeConflict {
                        base: base_name.to_string(),
                        operand: operand_name.to_string(),
                        property: property.clone(),
                    });
                }
                debug!(%property, ours, theirs, "conflicting property, operand wins");
            }
        }
        effective.properties.insert(property.clone(), descriptor.clone());
    }

    effective.additional_properties = match (base.additional_properties.as_deref(), operand.additional_properties.as_deref()) {
        (Some(ours), Some(theirs)) => Some(Box::new(NodeType::And(AndType {
            meta: Meta::default(),
            and: vec![ours.clone(), theirs.clone()],
        }))),
        (None, Some(theirs)) => Some(Box::new(theirs.clone())),
        (ours, None) => ours.cloned().map(Box::new),
    };

    Ok(effective)
}
