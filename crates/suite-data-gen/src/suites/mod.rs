//! Bundled suites
//!
//! Each suite module exposes its destination trees; [`register_defaults`]
//! is the single place that makes them visible to the registry.

pub mod bignum;

use crate::error::Result;
use crate::registry::Registry;

/// Register every bundled destination
///
/// # Errors
///
/// Returns an error if two suites claim the same destination id.
pub fn register_defaults(registry: &mut Registry) -> Result<()> {
    registry.register(bignum::bignum_suite())?;
    registry.register(bignum::core_suite())?;
    Ok(())
}
