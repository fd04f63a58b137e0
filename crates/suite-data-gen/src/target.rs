//! Target contract
//!
//! A [`Target`] is one node of the generation hierarchy. What it is follows
//! from the fields it carries:
//!
//! | kind        | `destination_id` | `function_id` | enumeration |
//! |-------------|------------------|---------------|-------------|
//! | Destination | yes              | -             | -           |
//! | Grouping    | -                | -             | -           |
//! | Concrete    | inherited        | yes           | yes         |
//!
//! Shared behavior between concrete targets lives in ordinary helper types
//! (see [`crate::inputs`] and [`Variant`]), not in the tree. Grouping nodes
//! only name and order their children.

use crate::error::{Error, Result};
use crate::test_case::TestCase;
use std::fmt;
use std::sync::Arc;

/// One parameter combination of a concrete target, before it becomes a
/// [`TestCase`]
///
/// The engine calls [`Self::case_detail`], then [`Self::arguments`], then
/// [`Self::dependencies`]. Anything `arguments` learns about the inputs can
/// therefore still change the capability flags of the case.
pub trait TestInstance {
    /// Text appended to `"{display_name} #{n}"` in the description
    fn case_detail(&mut self) -> String;

    /// Formatted arguments, expected result included
    ///
    /// # Errors
    ///
    /// Returns an error when the inputs cannot be turned into a case.
    fn arguments(&mut self) -> Result<Vec<String>>;

    /// Capability flags this case needs beyond the target's own
    fn dependencies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Comment lines written above the case
    fn comments(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Enumeration logic of a concrete target
pub trait CaseSource: Send + Sync {
    /// Build every instance of the target's parameter space, in order
    ///
    /// # Errors
    ///
    /// Returns an error when the parameter space cannot be built.
    fn instances(&self) -> Result<Vec<Box<dyn TestInstance>>>;
}

/// An instance with everything spelled out
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaseInstance {
    /// Formatted arguments
    pub arguments: Vec<String>,
    /// Description detail
    pub detail: String,
    /// Extra capability flags
    pub dependencies: Vec<String>,
    /// Comment lines
    pub comments: Vec<String>,
}

impl CaseInstance {
    /// Create an instance from arguments and detail
    #[must_use]
    pub fn new(arguments: Vec<String>, detail: impl Into<String>) -> Self {
        Self {
            arguments,
            detail: detail.into(),
            ..Self::default()
        }
    }

    /// Set extra capability flags
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    /// Set comment lines
    #[must_use]
    pub fn with_comments(mut self, comments: Vec<String>) -> Self {
        self.comments = comments;
        self
    }
}

impl TestInstance for CaseInstance {
    fn case_detail(&mut self) -> String {
        self.detail.clone()
    }

    fn arguments(&mut self) -> Result<Vec<String>> {
        Ok(self.arguments.clone())
    }

    fn dependencies(&self) -> Vec<String> {
        self.dependencies.clone()
    }

    fn comments(&self) -> Vec<String> {
        self.comments.clone()
    }
}

/// Literal cases
impl CaseSource for Vec<CaseInstance> {
    fn instances(&self) -> Result<Vec<Box<dyn TestInstance>>> {
        Ok(self
            .iter()
            .cloned()
            .map(|c| Box::new(c) as Box<dyn TestInstance>)
            .collect())
    }
}

/// Case source backed by a closure
pub struct FromFn<F>(F);

/// Wrap a closure returning literal instances as a [`CaseSource`]
pub fn from_fn<F>(f: F) -> FromFn<F>
where
    F: Fn() -> Result<Vec<CaseInstance>> + Send + Sync,
{
    FromFn(f)
}

impl<F> CaseSource for FromFn<F>
where
    F: Fn() -> Result<Vec<CaseInstance>> + Send + Sync,
{
    fn instances(&self) -> Result<Vec<Box<dyn TestInstance>>> {
        Ok((self.0)()?
            .into_iter()
            .map(|c| Box::new(c) as Box<dyn TestInstance>)
            .collect())
    }
}

type ArgumentMap = dyn Fn(Vec<String>) -> Result<Vec<String>> + Send + Sync;

/// A source that reuses another source's enumeration and post-processes
/// each instance
pub struct Variant<S> {
    base: S,
    map_arguments: Option<Arc<ArgumentMap>>,
    detail_suffix: Option<String>,
    dependencies: Vec<String>,
}

impl<S: CaseSource> Variant<S> {
    /// Wrap `base` without changes
    #[must_use]
    pub fn new(base: S) -> Self {
        Self {
            base,
            map_arguments: None,
            detail_suffix: None,
            dependencies: Vec::new(),
        }
    }

    /// Rewrite the arguments of every base instance
    #[must_use]
    pub fn map_arguments<F>(mut self, f: F) -> Self
    where
        F: Fn(Vec<String>) -> Result<Vec<String>> + Send + Sync + 'static,
    {
        self.map_arguments = Some(Arc::new(f));
        self
    }

    /// Append `suffix` to every description detail
    #[must_use]
    pub fn with_detail_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.detail_suffix = Some(suffix.into());
        self
    }

    /// Add capability flags to every case
    #[must_use]
    pub fn with_dependencies(mut self, dependencies: Vec<String>) -> Self {
        self.dependencies = dependencies;
        self
    }
}

impl<S: CaseSource> CaseSource for Variant<S> {
    fn instances(&self) -> Result<Vec<Box<dyn TestInstance>>> {
        Ok(self
            .base
            .instances()?
            .into_iter()
            .map(|inner| {
                Box::new(VariantInstance {
                    inner,
                    map_arguments: self.map_arguments.clone(),
                    detail_suffix: self.detail_suffix.clone(),
                    dependencies: self.dependencies.clone(),
                }) as Box<dyn TestInstance>
            })
            .collect())
    }
}

struct VariantInstance {
    inner: Box<dyn TestInstance>,
    map_arguments: Option<Arc<ArgumentMap>>,
    detail_suffix: Option<String>,
    dependencies: Vec<String>,
}

impl TestInstance for VariantInstance {
    fn case_detail(&mut self) -> String {
        let detail = self.inner.case_detail();
        match &self.detail_suffix {
            Some(suffix) if detail.is_empty() => suffix.clone(),
            Some(suffix) => format!("{detail} {suffix}"),
            None => detail,
        }
    }

    fn arguments(&mut self) -> Result<Vec<String>> {
        let args = self.inner.arguments()?;
        match &self.map_arguments {
            Some(map) => map(args),
            None => Ok(args),
        }
    }

    fn dependencies(&self) -> Vec<String> {
        merge_dependencies(&self.inner.dependencies(), self.dependencies.clone())
    }

    fn comments(&self) -> Vec<String> {
        self.inner.comments()
    }
}

/// Per-target case numbering
///
/// One counter is threaded through a traversal; it is reset at the start of
/// every concrete target's own enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CaseCounter {
    start: usize,
    // `None` once `usize::MAX` has been handed out
    next: Option<usize>,
}

impl CaseCounter {
    /// Counter whose first number is `start`
    #[must_use]
    pub const fn new(start: usize) -> Self {
        Self {
            start,
            next: Some(start),
        }
    }

    /// Rewind to the start value
    pub fn reset(&mut self) {
        self.next = Some(self.start);
    }

    /// Number the next description will carry, if any is left
    #[must_use]
    pub const fn peek(&self) -> Option<usize> {
        self.next
    }

    /// `"{display_name} #{n} {detail}"`, advancing the counter
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when case numbers run past `usize::MAX`,
    /// which only a huge first case number can cause.
    pub fn build_description(&mut self, display_name: &str, detail: &str) -> Result<String> {
        let n = self.next.ok_or_else(|| {
            Error::Config(format!(
                "case numbers of '{display_name}' starting at {} overflow",
                self.start
            ))
        })?;
        self.next = n.checked_add(1);
        if detail.is_empty() {
            Ok(format!("{display_name} #{n}"))
        } else {
            Ok(format!("{display_name} #{n} {detail}"))
        }
    }
}

impl Default for CaseCounter {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Ordered union: `base` first, then new entries of `extra`
#[must_use]
pub fn merge_dependencies(base: &[String], extra: Vec<String>) -> Vec<String> {
    let mut merged = base.to_vec();
    for dep in extra {
        if !merged.contains(&dep) {
            merged.push(dep);
        }
    }
    merged
}

/// Role of a target in the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
    /// Names an output destination
    Destination,
    /// Orders children, produces nothing itself
    Grouping,
    /// Enumerates cases for one test function
    Concrete,
}

impl fmt::Display for TargetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Destination => write!(f, "destination"),
            Self::Grouping => write!(f, "grouping"),
            Self::Concrete => write!(f, "concrete"),
        }
    }
}

/// A node of the generation hierarchy
pub struct Target {
    name: String,
    destination: Option<String>,
    function: Option<String>,
    dependencies: Vec<String>,
    source: Option<Box<dyn CaseSource>>,
    children: Vec<Target>,
}

impl Target {
    /// Bare target; kind follows from the fields set later
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            destination: None,
            function: None,
            dependencies: Vec::new(),
            source: None,
            children: Vec::new(),
        }
    }

    /// Destination target; its display name is its id
    #[must_use]
    pub fn destination(id: impl Into<String>) -> Self {
        let id = id.into();
        Self::new(id.clone()).with_destination(id)
    }

    /// Grouping target
    #[must_use]
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name)
    }

    /// Concrete target for `function`
    #[must_use]
    pub fn concrete(
        name: impl Into<String>,
        function: impl Into<String>,
        source: impl CaseSource + 'static,
    ) -> Self {
        Self::new(name).with_function(function).with_source(source)
    }

    /// Set the destination id
    #[must_use]
    pub fn with_destination(mut self, id: impl Into<String>) -> Self {
        self.destination = Some(id.into());
        self
    }

    /// Set the test function id
    #[must_use]
    pub fn with_function(mut self, function: impl Into<String>) -> Self {
        self.function = Some(function.into());
        self
    }

    /// Set the enumeration logic
    #[must_use]
    pub fn with_source(mut self, source: impl CaseSource + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Set capability flags shared by every case of this target
    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Append a child
    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.children.push(child);
        self
    }

    /// Append children in order
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.children.extend(children);
        self
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Own destination id, if this is a destination target
    #[must_use]
    pub fn destination_id(&self) -> Option<&str> {
        self.destination.as_deref()
    }

    /// Test function id
    #[must_use]
    pub fn function_id(&self) -> Option<&str> {
        self.function.as_deref()
    }

    /// Fixed capability flags
    #[must_use]
    pub fn dependencies(&self) -> &[String] {
        &self.dependencies
    }

    /// Children in declaration order
    #[must_use]
    pub fn children(&self) -> &[Self] {
        &self.children
    }

    /// Role of this target
    #[must_use]
    pub const fn kind(&self) -> TargetKind {
        if self.function.is_some() || self.source.is_some() {
            TargetKind::Concrete
        } else if self.destination.is_some() {
            TargetKind::Destination
        } else {
            TargetKind::Grouping
        }
    }

    /// Cases defined directly by this target
    ///
    /// Resets `counter` first, so every concrete target numbers its own
    /// cases from the counter's start value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteTarget`] if the target has no function id
    /// or no enumeration logic; errors raised by the enumeration logic are
    /// returned unchanged.
    pub fn enumerate_own(&self, counter: &mut CaseCounter) -> Result<Vec<TestCase>> {
        let function = self.function.as_deref().ok_or_else(|| Error::IncompleteTarget {
            target: self.name.clone(),
            missing: "function_id",
        })?;
        let source = self.source.as_ref().ok_or_else(|| Error::IncompleteTarget {
            target: self.name.clone(),
            missing: "enumeration",
        })?;

        counter.reset();
        let mut cases = Vec::new();
        for mut instance in source.instances()? {
            let description = counter.build_description(&self.name, &instance.case_detail())?;
            let arguments = instance.arguments()?;
            let dependencies = merge_dependencies(&self.dependencies, instance.dependencies());
            cases.push(
                TestCase::new(function, arguments, description)
                    .with_dependencies(dependencies)
                    .with_comments(instance.comments()),
            );
        }
        Ok(cases)
    }
}

impl fmt::Debug for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Target")
            .field("name", &self.name)
            .field("kind", &self.kind())
            .field("destination", &self.destination)
            .field("function", &self.function)
            .field("dependencies", &self.dependencies)
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}
