//! Resource extraction.
//!
//! Turns a [`Declaration`] into a [`Resource`] when it has a recognised
//! shape: a known resource type, a string-literal identifier, and a body
//! containing at least one attribute call that matters for that kind.
//! Everything else is skipped without error.

use crate::declaration::{Declaration, Expr};
use crate::resource::{Resource, ResourceKind, Value};

/// Extracts a [`Resource`] from a parsed declaration.
///
/// Attributes are located among the body statements by name, independent of
/// their order and of unrelated statements. When an attribute appears more
/// than once the first occurrence wins. Attributes absent from the body are
/// never filled in.
///
/// # Examples
///
/// ```
/// use oxidized_iac_smells::declaration::{DeclarationNode, Expr};
/// use oxidized_iac_smells::extract::extract;
/// use oxidized_iac_smells::resource::{ResourceKind, Value, VERSION};
///
/// let node = DeclarationNode::new("package", "nginx")
///     .call("action", Expr::Raw(":install".into()))
///     .call("version", Expr::Str("1.14.0".into()));
///
/// let resource = extract(&node).unwrap();
/// assert_eq!(resource.kind, ResourceKind::Package);
/// assert_eq!(resource.attribute(VERSION), Some(&Value::Literal("1.14.0".into())));
/// ```
pub fn extract<D: Declaration + ?Sized>(node: &D) -> Option<Resource> {
    let resource_type = node.resource_type();
    let Some(kind) = ResourceKind::from_type_name(resource_type) else {
        tracing::trace!(resource_type, "skipping unrecognised resource type");
        return None;
    };

    let identifier = match node.identifier() {
        Some(Expr::Str(name)) => name.clone(),
        _ => {
            tracing::debug!(
                resource_type,
                location = %node.location(),
                "skipping declaration without a literal identifier"
            );
            return None;
        }
    };

    let Some(body) = node.body() else {
        tracing::debug!(resource_type, %identifier, "skipping declaration without a body");
        return None;
    };

    let mut resource = Resource::new(kind, identifier, node.location());
    let keys = kind.attribute_keys();

    for statement in &body {
        if !keys.contains(&statement.method) || resource.attributes.contains_key(statement.method) {
            continue;
        }
        let value = match statement.argument {
            Some(Expr::Str(s)) => Value::Literal(s.clone()),
            Some(Expr::Raw(src)) => Value::Raw(src.clone()),
            Some(Expr::Nil) | None => Value::Unset,
        };
        resource.attributes.insert(statement.method.to_string(), value);
    }

    if resource.attributes.is_empty() {
        tracing::debug!(
            resource_type,
            identifier = %resource.identifier,
            "skipping declaration with no security-relevant attributes"
        );
        return None;
    }

    Some(resource)
}

/// Extracts every recognised resource from `nodes`, preserving input order.
pub fn extract_all<D: Declaration>(nodes: &[D]) -> Vec<Resource> {
    nodes.iter().filter_map(|n| extract(n)).collect()
}
