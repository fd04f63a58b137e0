//! Generation engine
//!
//! Collects the cases of one destination by walking its target tree
//! depth-first in declaration order. Nested destination targets are not
//! entered: they own their subtrees and are generated on their own.

use crate::error::Result;
use crate::registry::Registry;
use crate::target::{CaseCounter, Target, TargetKind};
use crate::test_case::TestCase;
use tracing::{debug, info_span};

/// Pre-order walk over the targets that write to one destination
#[derive(Debug)]
pub struct Walk<'a> {
    root: &'a Target,
    stack: Vec<&'a Target>,
}

impl<'a> Walk<'a> {
    /// Walk rooted at `root`
    #[must_use]
    pub fn new(root: &'a Target) -> Self {
        Self {
            root,
            stack: vec![root],
        }
    }
}

impl<'a> Iterator for Walk<'a> {
    type Item = &'a Target;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(
            node.children()
                .iter()
                .rev()
                .filter(|child| child.destination_id().is_none()),
        );
        // The root itself may be a destination; nested ones were filtered above.
        debug_assert!(std::ptr::eq(node, self.root) || node.destination_id().is_none());
        Some(node)
    }
}

/// Concrete targets writing to `root`'s destination, in generation order
pub fn concrete_targets(root: &Target) -> impl Iterator<Item = &Target> {
    Walk::new(root).filter(|t| t.kind() == TargetKind::Concrete)
}

/// All cases of the destination rooted at `root`
///
/// Every call starts from scratch; case numbers restart at
/// `first_case_number` for each concrete target.
///
/// # Errors
///
/// Stops at the first failing target and returns its error.
pub fn enumerate_all(root: &Target, first_case_number: usize) -> Result<Vec<TestCase>> {
    let mut counter = CaseCounter::new(first_case_number);
    let mut cases = Vec::new();
    for target in concrete_targets(root) {
        let own = target.enumerate_own(&mut counter)?;
        debug!(name = target.name(), cases = own.len(), "enumerated target");
        cases.extend(own);
    }
    Ok(cases)
}

/// Generates destinations out of a registry
#[derive(Debug, Clone, Copy)]
pub struct Generator<'r> {
    registry: &'r Registry,
    first_case_number: usize,
}

impl<'r> Generator<'r> {
    /// Create a generator numbering cases from 0
    #[must_use]
    pub const fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            first_case_number: 0,
        }
    }

    /// Set the number of the first case of every target
    #[must_use]
    pub const fn with_first_case_number(mut self, n: usize) -> Self {
        self.first_case_number = n;
        self
    }

    /// Registry this generator reads from
    #[must_use]
    pub const fn registry(&self) -> &'r Registry {
        self.registry
    }

    /// Generate every case of `destination`
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::UnknownDestination`] if `destination` is not
    /// registered, otherwise the first error raised while enumerating.
    pub fn generate(&self, destination: &str) -> Result<Vec<TestCase>> {
        let span = info_span!("generate", destination);
        let _guard = span.enter();
        let root = self.registry.resolve(destination)?;
        let cases = enumerate_all(root, self.first_case_number)?;
        debug!(cases = cases.len(), "destination complete");
        Ok(cases)
    }
}
