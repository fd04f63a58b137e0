//! Bignum arithmetic suites
//!
//! Inputs are decimal strings, as a test author would write them; expected
//! results are lowercase hex without a `0x` marker. The empty string stands
//! for zero with no digits at all and is described as `0 (null)`.

use crate::error::{Error, Result};
use crate::inputs::{InputSpace, Pairing};
use crate::target::{CaseSource, Target, TestInstance, Variant};
use crate::test_case::quote_str;

/// Destination of the MPI operation cases
pub const BIGNUM_DESTINATION: &str = "test_suite_bignum.generated";

/// Destination of the core comparison cases
pub const CORE_DESTINATION: &str = "test_suite_bignum_core.generated";

/// Capability needed once an operand or result exceeds 32 bits
pub const WIDE_CAPABILITY: &str = "MBEDTLS_HAVE_INT64";

/// Base input set shared by the MPI operations
pub const INPUT_VALUES: &[&str] = &[
    "",
    "0",
    "1",
    "123",
    "-123",
    "4294967296",
    "-18446744073709551615",
];

/// Parse a decimal input; `""` and `"-"` are zero
///
/// # Errors
///
/// Returns a message describing the bad input.
pub fn parse_decimal(value: &str) -> std::result::Result<i128, String> {
    match value {
        "" | "-" => Ok(0),
        _ => value
            .parse::<i128>()
            .map_err(|e| format!("bad decimal input {value:?}: {e}")),
    }
}

/// Lowercase hex with a leading `-` for negatives
#[must_use]
pub fn format_hex(value: i128) -> String {
    if value < 0 {
        format!("-{:x}", value.unsigned_abs())
    } else {
        format!("{value:x}")
    }
}

/// Description of one input
#[must_use]
pub fn describe_value(value: &str) -> String {
    match value {
        "" => "0 (null)".to_string(),
        "-" => "negative 0 (null)".to_string(),
        _ => value.to_string(),
    }
}

fn is_wide(value: i128) -> bool {
    value.unsigned_abs() > u128::from(u32::MAX)
}

/// Binary operations on two decimal inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// Sign of `a - b` as `-1`, `0` or `1`
    Cmp,
}

impl BinaryOp {
    /// Symbol used in descriptions
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Cmp => "<=>",
        }
    }

    fn apply(self, a: i128, b: i128) -> Option<i128> {
        match self {
            Self::Add => a.checked_add(b),
            Self::Sub => a.checked_sub(b),
            Self::Cmp => Some(i128::from(a.cmp(&b) as i8)),
        }
    }

    fn format_result(self, value: i128) -> String {
        match self {
            Self::Add | Self::Sub => quote_str(&format_hex(value)),
            Self::Cmp => value.to_string(),
        }
    }
}

/// Enumeration logic shared by every two-operand target
#[derive(Debug, Clone)]
pub struct BinaryOperation {
    name: String,
    op: BinaryOp,
    space: InputSpace<String>,
}

impl BinaryOperation {
    /// Operation over `space`; `name` labels enumeration errors
    #[must_use]
    pub fn new(name: impl Into<String>, op: BinaryOp, space: InputSpace<String>) -> Self {
        Self {
            name: name.into(),
            op,
            space,
        }
    }
}

impl CaseSource for BinaryOperation {
    fn instances(&self) -> Result<Vec<Box<dyn TestInstance>>> {
        Ok(self
            .space
            .pairs()
            .into_iter()
            .map(|(a, b)| {
                Box::new(BinaryCase {
                    name: self.name.clone(),
                    op: self.op,
                    a,
                    b,
                    wide: false,
                }) as Box<dyn TestInstance>
            })
            .collect())
    }
}

struct BinaryCase {
    name: String,
    op: BinaryOp,
    a: String,
    b: String,
    wide: bool,
}

impl TestInstance for BinaryCase {
    fn case_detail(&mut self) -> String {
        format!(
            "{} {} {}",
            describe_value(&self.a),
            self.op.symbol(),
            describe_value(&self.b)
        )
    }

    fn arguments(&mut self) -> Result<Vec<String>> {
        let a = parse_decimal(&self.a).map_err(|e| Error::enumeration(&self.name, e))?;
        let b = parse_decimal(&self.b).map_err(|e| Error::enumeration(&self.name, e))?;
        let result = self.op.apply(a, b).ok_or_else(|| {
            Error::enumeration(
                &self.name,
                format!("{} {} {} overflows", self.a, self.op.symbol(), self.b),
            )
        })?;
        self.wide = is_wide(a) || is_wide(b) || is_wide(result);
        Ok(vec![
            quote_str(&self.a),
            quote_str(&self.b),
            self.op.format_result(result),
        ])
    }

    fn dependencies(&self) -> Vec<String> {
        if self.wide {
            vec![WIDE_CAPABILITY.to_string()]
        } else {
            Vec::new()
        }
    }
}

fn strip_quotes(arg: &str) -> &str {
    arg.strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(arg)
}

/// Rewrite the expected result of `[a, b, a + b]` as `|a| + |b|`
///
/// The operands keep their signs; the test function takes the absolute
/// values itself.
fn absolute_sum(args: Vec<String>) -> Result<Vec<String>> {
    let [a, b, _] = <[String; 3]>::try_from(args).map_err(|args| {
        Error::enumeration("MPI add abs", format!("expected 3 arguments, got {}", args.len()))
    })?;
    let magnitude = |arg: &str| -> Result<u128> {
        parse_decimal(strip_quotes(arg))
            .map(i128::unsigned_abs)
            .map_err(|e| Error::enumeration("MPI add abs", e))
    };
    let sum = magnitude(a.as_str())?
        .checked_add(magnitude(b.as_str())?)
        .and_then(|sum| i128::try_from(sum).ok())
        .ok_or_else(|| Error::enumeration("MPI add abs", format!("|{a}| + |{b}| overflows")))?;
    let expected = quote_str(&format_hex(sum));
    Ok(vec![a, b, expected])
}

fn input_values() -> Vec<String> {
    INPUT_VALUES.iter().map(ToString::to_string).collect()
}

/// `a + b` over unordered pairs of the base inputs
#[must_use]
pub fn add_target(name: &str, inputs: Vec<String>) -> Target {
    Target::concrete(
        name,
        "mpi_add_mpi",
        BinaryOperation::new(name, BinaryOp::Add, InputSpace::new(inputs)),
    )
}

/// `a - b` over every ordered pair of the base inputs
#[must_use]
pub fn sub_target(name: &str, inputs: Vec<String>) -> Target {
    Target::concrete(
        name,
        "mpi_sub_mpi",
        BinaryOperation::new(
            name,
            BinaryOp::Sub,
            InputSpace::new(inputs).with_pairing(Pairing::Ordered),
        ),
    )
}

/// `|a| + |b|`, reusing the addition enumeration
#[must_use]
pub fn add_abs_target(name: &str, inputs: Vec<String>) -> Target {
    let base = BinaryOperation::new(name, BinaryOp::Add, InputSpace::new(inputs));
    Target::concrete(
        name,
        "mpi_add_abs",
        Variant::new(base)
            .map_arguments(absolute_sum)
            .with_detail_suffix("(absolute)"),
    )
}

/// Destination tree of the MPI operations
#[must_use]
pub fn bignum_suite() -> Target {
    Target::destination(BIGNUM_DESTINATION).with_child(
        Target::group("MPI operation").with_children([
            add_target("MPI add", input_values()),
            sub_target("MPI sub", input_values()),
            add_abs_target("MPI add abs", input_values()),
        ]),
    )
}

/// Destination tree of the core comparison
#[must_use]
pub fn core_suite() -> Target {
    let curated = [("0", ""), ("", "0"), ("-", "0")]
        .into_iter()
        .map(|(a, b)| (a.to_string(), b.to_string()))
        .collect();
    let space = InputSpace::new(vec!["0".to_string(), "1".to_string(), "-1".to_string()])
        .with_pairing(Pairing::Ordered)
        .with_curated(curated);
    Target::destination(CORE_DESTINATION).with_child(
        Target::concrete(
            "Core cmp",
            "mpi_core_cmp",
            BinaryOperation::new("Core cmp", BinaryOp::Cmp, space),
        )
        .with_dependencies(["MBEDTLS_BIGNUM_C"]),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Generator;
    use crate::registry::Registry;
    use crate::target::CaseCounter;

    fn small_inputs() -> Vec<String> {
        ["", "0", "1", "123"].iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal(""), Ok(0));
        assert_eq!(parse_decimal("-"), Ok(0));
        assert_eq!(parse_decimal("123"), Ok(123));
        assert_eq!(parse_decimal("-0000123"), Ok(-123));
        assert!(parse_decimal("12a").is_err());
    }

    #[test]
    fn test_format_hex() {
        assert_eq!(format_hex(0), "0");
        assert_eq!(format_hex(123), "7b");
        assert_eq!(format_hex(-123), "-7b");
    }

    #[test]
    fn test_describe_value() {
        assert_eq!(describe_value(""), "0 (null)");
        assert_eq!(describe_value("-"), "negative 0 (null)");
        assert_eq!(describe_value("123"), "123");
    }

    #[test]
    fn test_add_four_inputs_yields_ten_cases() {
        let target = add_target("MPI add", small_inputs());
        let cases = target.enumerate_own(&mut CaseCounter::default()).unwrap();
        assert_eq!(cases.len(), 10);

        let case = cases
            .iter()
            .find(|c| c.arguments[..2] == [quote_str(""), quote_str("123")])
            .unwrap();
        assert_eq!(case.description, "MPI add #3 0 (null) + 123");
        assert_eq!(case.arguments, vec!["\"\"", "\"123\"", "\"7b\""]);
        assert_eq!(case.function, "mpi_add_mpi");
        assert!(case.dependencies.is_empty());
    }

    #[test]
    fn test_sub_uses_ordered_pairs() {
        let target = sub_target("MPI sub", small_inputs());
        let cases = target.enumerate_own(&mut CaseCounter::default()).unwrap();
        assert_eq!(cases.len(), 16);
        assert!(cases.iter().any(|c| c.arguments == ["\"1\"", "\"123\"", "\"-7a\""]));
        assert!(cases.iter().any(|c| c.arguments == ["\"123\"", "\"1\"", "\"7a\""]));
    }

    #[test]
    fn test_add_abs_variant() {
        let inputs = vec!["-123".to_string(), "1".to_string()];
        let target = add_abs_target("MPI add abs", inputs);
        let cases = target.enumerate_own(&mut CaseCounter::default()).unwrap();
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].description, "MPI add abs #0 -123 + -123 (absolute)");
        assert_eq!(cases[0].arguments, vec!["\"-123\"", "\"-123\"", "\"f6\""]);
        assert_eq!(cases[1].description, "MPI add abs #1 -123 + 1 (absolute)");
        assert_eq!(cases[1].arguments, vec!["\"-123\"", "\"1\"", "\"7c\""]);
        assert_eq!(cases[0].function, "mpi_add_abs");
    }

    #[test]
    fn test_add_abs_cases_are_distinct() {
        let cases = add_abs_target("MPI add abs", input_values())
            .enumerate_own(&mut CaseCounter::default())
            .unwrap();
        let n = INPUT_VALUES.len();
        assert_eq!(cases.len(), n * (n + 1) / 2);

        let mut seen = std::collections::HashSet::new();
        for case in &cases {
            assert!(
                seen.insert(case.arguments.clone()),
                "repeated arguments in {}",
                case.description
            );
        }
        let case = cases
            .iter()
            .find(|c| c.description.ends_with("0 (null) + -123 (absolute)"))
            .unwrap();
        assert_eq!(case.arguments, vec!["\"\"", "\"-123\"", "\"7b\""]);
    }

    #[test]
    fn test_wide_operands_need_int64() {
        let inputs = vec!["1".to_string(), "4294967296".to_string()];
        let cases = add_target("MPI add", inputs)
            .enumerate_own(&mut CaseCounter::default())
            .unwrap();
        assert!(cases[0].dependencies.is_empty());
        assert_eq!(cases[1].dependencies, vec![WIDE_CAPABILITY.to_string()]);
        assert_eq!(cases[2].dependencies, vec![WIDE_CAPABILITY.to_string()]);
    }

    #[test]
    fn test_bad_input_is_enumeration_error() {
        let cases = add_target("MPI add", vec!["x".to_string()])
            .enumerate_own(&mut CaseCounter::default());
        assert!(matches!(cases, Err(Error::Enumeration { .. })));
    }

    #[test]
    fn test_overflow_is_enumeration_error() {
        let max = i128::MAX.to_string();
        let err = add_target("MPI add", vec![max])
            .enumerate_own(&mut CaseCounter::default())
            .unwrap_err();
        assert!(err.to_string().contains("overflows"));
    }

    #[test]
    fn test_core_cmp_curated_first() {
        let mut registry = Registry::new();
        registry.register(core_suite()).unwrap();
        let cases = Generator::new(&registry).generate(CORE_DESTINATION).unwrap();
        // 3 curated + 9 ordered pairs
        assert_eq!(cases.len(), 12);
        assert_eq!(cases[0].description, "Core cmp #0 0 <=> 0 (null)");
        assert_eq!(cases[0].arguments, vec!["\"0\"", "\"\"", "0"]);
        assert_eq!(cases[2].description, "Core cmp #2 negative 0 (null) <=> 0");
        assert!(cases.iter().any(|c| c.arguments == ["\"-1\"", "\"1\"", "-1"]));
        assert!(
            cases
                .iter()
                .all(|c| c.dependencies == ["MBEDTLS_BIGNUM_C".to_string()])
        );
    }

    #[test]
    fn test_bignum_suite_generates() {
        let mut registry = Registry::new();
        registry.register(bignum_suite()).unwrap();
        let cases = Generator::new(&registry).generate(BIGNUM_DESTINATION).unwrap();
        let n = INPUT_VALUES.len();
        assert_eq!(cases.len(), n * (n + 1) / 2 + n * n + n * (n + 1) / 2);
    }
}
