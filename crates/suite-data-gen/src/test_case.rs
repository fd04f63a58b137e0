//! Test case records
//!
//! A [`TestCase`] is the unit handed to a writer: one call of one test
//! function with a fixed argument list.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;

/// One generated test case
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    /// Human-readable description, first line of the record
    pub description: String,
    /// Capability flags the case requires
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub dependencies: Vec<String>,
    /// Test function identifier
    pub function: String,
    /// Arguments, already formatted for the data file
    pub arguments: Vec<String>,
    /// Comment lines emitted above the case
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub comments: Vec<String>,
}

impl TestCase {
    /// Create a test case
    #[must_use]
    pub fn new(
        function: impl Into<String>,
        arguments: Vec<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            description: description.into(),
            dependencies: Vec::new(),
            function: function.into(),
            arguments,
            comments: Vec::new(),
        }
    }

    /// Set dependencies
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

    /// Check that the case can be serialized
    ///
    /// # Errors
    ///
    /// Returns [`Error::IncompleteCase`] if the description or function is empty.
    pub fn check_completeness(&self) -> Result<()> {
        if self.description.is_empty() {
            return Err(Error::IncompleteCase("description"));
        }
        if self.function.is_empty() {
            return Err(Error::IncompleteCase("function"));
        }
        Ok(())
    }

    /// Append this case in `.data` syntax to `out`
    pub fn write_data(&self, out: &mut String) {
        if !self.comments.is_empty() {
            out.push('\n');
        }
        for line in &self.comments {
            let _ = writeln!(out, "# {line}");
        }
        let _ = writeln!(out, "\n{}", self.description);
        if !self.dependencies.is_empty() {
            let _ = writeln!(out, "depends_on:{}", self.dependencies.join(":"));
        }
        out.push_str(&self.function);
        for arg in &self.arguments {
            out.push(':');
            out.push_str(arg);
        }
        out.push('\n');
    }
}

/// Render a whole `.data` file
///
/// # Errors
///
/// Returns [`Error::IncompleteCase`] if any case is incomplete; nothing is
/// rendered in that case.
pub fn render_data_file(caller: &str, cases: &[TestCase]) -> Result<String> {
    for case in cases {
        case.check_completeness()?;
    }
    let mut out = format!("# Automatically generated by {caller}. Do not edit!\n");
    for case in cases {
        case.write_data(&mut out);
    }
    out.push_str("\n# End of automatically generated file.\n");
    Ok(out)
}

/// Wrap `value` in double quotes
#[must_use]
pub fn quote_str(value: &str) -> String {
    format!("\"{value}\"")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> TestCase {
        TestCase::new(
            "mpi_add_mpi",
            vec![quote_str(""), quote_str("123"), quote_str("7b")],
            "MPI add #3 0 (null) + 123",
        )
    }

    #[test]
    fn test_quote_str() {
        assert_eq!(quote_str(""), "\"\"");
        assert_eq!(quote_str("7b"), "\"7b\"");
    }

    #[test]
    fn test_write_data_without_dependencies() {
        let mut out = String::new();
        sample().write_data(&mut out);
        assert_eq!(
            out,
            "\nMPI add #3 0 (null) + 123\nmpi_add_mpi:\"\":\"123\":\"7b\"\n"
        );
    }

    #[test]
    fn test_write_data_with_dependencies_and_comments() {
        let case = sample()
            .with_dependencies(vec!["MBEDTLS_HAVE_INT64".to_string(), "FOO".to_string()])
            .with_comments(vec!["edge cases".to_string()]);
        let mut out = String::new();
        case.write_data(&mut out);
        assert_eq!(
            out,
            "\n# edge cases\n\nMPI add #3 0 (null) + 123\ndepends_on:MBEDTLS_HAVE_INT64:FOO\nmpi_add_mpi:\"\":\"123\":\"7b\"\n"
        );
    }

    #[test]
    fn test_write_data_no_arguments() {
        let case = TestCase::new("self_test", Vec::new(), "Self test");
        let mut out = String::new();
        case.write_data(&mut out);
        assert_eq!(out, "\nSelf test\nself_test\n");
    }

    #[test]
    fn test_check_completeness() {
        assert!(sample().check_completeness().is_ok());

        let no_desc = TestCase::new("f", Vec::new(), "");
        assert!(matches!(
            no_desc.check_completeness(),
            Err(Error::IncompleteCase("description"))
        ));

        let no_func = TestCase::new("", Vec::new(), "desc");
        assert!(matches!(
            no_func.check_completeness(),
            Err(Error::IncompleteCase("function"))
        ));
    }

    #[test]
    fn test_render_data_file() {
        let rendered = render_data_file("suite-data", &[sample()]).unwrap();
        assert!(rendered.starts_with("# Automatically generated by suite-data. Do not edit!\n"));
        assert!(rendered.ends_with("\n# End of automatically generated file.\n"));
        assert!(rendered.contains("mpi_add_mpi:\"\":\"123\":\"7b\"\n"));
    }

    #[test]
    fn test_render_data_file_empty() {
        let rendered = render_data_file("gen", &[]).unwrap();
        assert_eq!(
            rendered,
            "# Automatically generated by gen. Do not edit!\n\n# End of automatically generated file.\n"
        );
    }

    #[test]
    fn test_render_rejects_incomplete_case() {
        let bad = TestCase::new("", Vec::new(), "desc");
        assert!(render_data_file("gen", &[sample(), bad]).is_err());
    }

    #[test]
    fn test_serialize_skips_empty_lists() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert!(!json.contains("dependencies"));
        assert!(!json.contains("comments"));
        assert!(json.contains("\"function\":\"mpi_add_mpi\""));
    }
}
