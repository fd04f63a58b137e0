//! Suite Data Generator
//!
//! Declarative generation of test-case data files. Test authors describe
//! targets (which function, which inputs, which capabilities) and the engine
//! turns every destination's target tree into an ordered, deterministic list
//! of [`TestCase`] records for a [`Writer`].
//!
//! ```text
//! Registry ── resolve(id) ──▶ Target tree ── Walk ──▶ concrete targets
//!                                                        │ enumerate_own
//!                                                        ▼
//!                                   Writer ◀── Vec<TestCase>
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
// Allow common patterns
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::needless_pass_by_value)]
// Allow common patterns in test code
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::redundant_closure_for_method_calls))]
#![cfg_attr(test, allow(clippy::redundant_clone))]

pub mod check;
pub mod config;
pub mod engine;
pub mod error;
pub mod inputs;
pub mod registry;
pub mod suites;
pub mod target;
pub mod test_case;
pub mod writer;

pub use check::{Freshness, check_destination, file_sha256, sha256_hex};
pub use config::GeneratorConfig;
pub use engine::{Generator, Walk, concrete_targets, enumerate_all};
pub use error::{Error, Result};
pub use inputs::{InputSpace, Pairing, combination_pairs, ordered_pairs};
pub use registry::{Registry, validate_destination_id};
pub use target::{
    CaseCounter, CaseInstance, CaseSource, FromFn, Target, TargetKind, TestInstance, Variant,
    from_fn, merge_dependencies,
};
pub use test_case::{TestCase, quote_str, render_data_file};
pub use writer::{FileWriter, OutputFormat, Writer, atomic_write, render};
