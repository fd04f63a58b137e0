//! Destination registry
//!
//! Target trees are registered up front. Registering a tree also discovers
//! every destination target nested inside it; each one becomes
//! independently selectable.

use crate::error::{Error, Result};
use crate::target::Target;
use regex::Regex;
use std::collections::HashMap;
use std::sync::{LazyLock, OnceLock};
use tracing::debug;

/// Destination ids double as file stems
static DESTINATION_ID_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    // Pattern is a literal; compilation cannot fail
    #[allow(clippy::unwrap_used)]
    Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-]*$").unwrap()
});

/// Check that `id` is usable as a destination id
///
/// # Errors
///
/// Returns [`Error::InvalidDestinationId`] otherwise.
pub fn validate_destination_id(id: &str) -> Result<()> {
    if DESTINATION_ID_REGEX.is_match(id) {
        Ok(())
    } else {
        Err(Error::InvalidDestinationId(id.to_string()))
    }
}

/// Location of a destination: root index, then child indices
type TargetPath = (usize, Vec<usize>);

/// Registry of destination targets
#[derive(Debug, Default)]
pub struct Registry {
    roots: Vec<Target>,
    index: HashMap<String, TargetPath>,
    order: Vec<String>,
}

impl Registry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the bundled suites
    ///
    /// # Errors
    ///
    /// Returns an error if the bundled definitions are inconsistent.
    pub fn with_defaults() -> Result<Self> {
        let mut registry = Self::new();
        crate::suites::register_defaults(&mut registry)?;
        Ok(registry)
    }

    /// Register a target tree
    ///
    /// The root must be a destination target. Destinations nested anywhere
    /// below it are registered as well, in pre-order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteTarget`] if the root has no destination id,
    /// [`Error::InvalidDestinationId`] or [`Error::DuplicateDestination`] for
    /// bad ids. On error the registry is left unchanged.
    pub fn register(&mut self, target: Target) -> Result<()> {
        if target.destination_id().is_none() {
            return Err(Error::IncompleteTarget {
                target: target.name().to_string(),
                missing: "destination_id",
            });
        }

        let root = self.roots.len();
        let mut found = Vec::new();
        discover(&target, &mut Vec::new(), &mut found);

        for (i, (id, _)) in found.iter().enumerate() {
            validate_destination_id(id)?;
            let repeated = found[..i].iter().any(|(other, _)| other == id);
            if repeated || self.index.contains_key(id) {
                return Err(Error::DuplicateDestination(id.clone()));
            }
        }

        for (id, path) in found {
            debug!(destination = %id, depth = path.len(), "registered destination");
            self.order.push(id.clone());
            self.index.insert(id, (root, path));
        }
        self.roots.push(target);
        Ok(())
    }

    /// Look up a destination target
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownDestination`] if `id` is not registered.
    pub fn resolve(&self, id: &str) -> Result<&Target> {
        let (root, path) = self
            .index
            .get(id)
            .ok_or_else(|| Error::UnknownDestination(id.to_string()))?;
        let mut target = &self.roots[*root];
        for &child in path {
            target = &target.children()[child];
        }
        Ok(target)
    }

    /// Whether `id` is registered
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    /// All destination ids in registration order
    #[must_use]
    pub fn list_destinations(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }

    /// Number of registered destinations
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Check if registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

fn discover(target: &Target, path: &mut Vec<usize>, found: &mut Vec<(String, Vec<usize>)>) {
    if let Some(id) = target.destination_id() {
        found.push((id.to_string(), path.clone()));
    }
    for (i, child) in target.children().iter().enumerate() {
        path.push(i);
        discover(child, path, found);
        path.pop();
    }
}

/// Process-wide registry of the bundled suites, built on first use
///
/// # Errors
///
/// Returns an error if the bundled definitions are inconsistent.
pub fn global() -> Result<&'static Registry> {
    static GLOBAL: OnceLock<Registry> = OnceLock::new();
    if let Some(registry) = GLOBAL.get() {
        return Ok(registry);
    }
    let registry = Registry::with_defaults()?;
    Ok(GLOBAL.get_or_init(|| registry))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::target::CaseInstance;

    fn leaf(name: &str) -> Target {
        Target::concrete(name, "f", vec![CaseInstance::new(Vec::new(), "x")])
    }

    #[test]
    fn test_register_and_resolve() {
        let mut registry = Registry::new();
        registry
            .register(Target::destination("test_suite_a").with_child(leaf("A")))
            .unwrap();
        let target = registry.resolve("test_suite_a").unwrap();
        assert_eq!(target.name(), "test_suite_a");
        assert_eq!(target.children().len(), 1);
        assert!(registry.contains("test_suite_a"));
    }

    #[test]
    fn test_resolve_unknown() {
        let registry = Registry::new();
        let err = registry.resolve("nope").unwrap_err();
        assert!(matches!(err, Error::UnknownDestination(ref id) if id == "nope"));
    }

    #[test]
    fn test_list_two_unrelated_destinations() {
        let mut registry = Registry::new();
        registry
            .register(
                Target::destination("test_suite_b")
                    .with_children([leaf("B1"), leaf("B2"), leaf("B3")]),
            )
            .unwrap();
        registry
            .register(Target::destination("test_suite_a").with_child(leaf("A1")))
            .unwrap();
        assert_eq!(registry.list_destinations(), vec!["test_suite_b", "test_suite_a"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_nested_destination_discovered() {
        let mut registry = Registry::new();
        let tree = Target::destination("outer").with_child(
            Target::group("shared").with_child(Target::destination("inner").with_child(leaf("I"))),
        );
        registry.register(tree).unwrap();
        assert_eq!(registry.list_destinations(), vec!["outer", "inner"]);
        let inner = registry.resolve("inner").unwrap();
        assert_eq!(inner.children()[0].name(), "I");
    }

    #[test]
    fn test_register_duplicate_rejected() {
        let mut registry = Registry::new();
        registry.register(Target::destination("dup")).unwrap();
        let err = registry.register(Target::destination("dup")).unwrap_err();
        assert!(matches!(err, Error::DuplicateDestination(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_register_duplicate_within_tree_leaves_registry_unchanged() {
        let mut registry = Registry::new();
        let tree = Target::destination("x").with_child(Target::destination("x"));
        assert!(registry.register(tree).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_register_requires_destination_root() {
        let mut registry = Registry::new();
        let err = registry.register(Target::group("loose")).unwrap_err();
        assert!(matches!(
            err,
            Error::IncompleteTarget {
                missing: "destination_id",
                ..
            }
        ));
    }

    #[test]
    fn test_validate_destination_id() {
        assert!(validate_destination_id("test_suite_bignum.generated").is_ok());
        assert!(validate_destination_id("a-b_c.d").is_ok());
        assert!(validate_destination_id("").is_err());
        assert!(validate_destination_id("../escape").is_err());
        assert!(validate_destination_id("has space").is_err());
        assert!(validate_destination_id(".hidden").is_err());
    }

    #[test]
    fn test_global_is_shared() {
        let a = global().unwrap();
        let b = global().unwrap();
        assert!(std::ptr::eq(a, b));
        assert!(!a.is_empty());
    }
}
