//! Composite target construction.
//!
//! Composition only records names. Whether each required name refers to a
//! declared target is checked at resolution time, so composites may be
//! declared before the targets they group.

use tracing::debug;

use crate::error::PlanError;
use crate::registry::TargetRegistry;
use crate::target::{CompositeTarget, TargetName};

/// Build a composite target from `required` (in source order) and register it.
///
/// Repeated names are dropped, keeping the first occurrence.
///
/// # Errors
///
/// - `EmptyComposite` if `required` is empty
/// - `DuplicateTarget` if `name` is already declared with a different definition
pub fn compose<I, N>(registry: &mut TargetRegistry, name: impl Into<TargetName>, required: I) -> Result<(), PlanError>
where
  I: IntoIterator<Item = N>,
  N: Into<TargetName>,
{
  let composite = CompositeTarget::new(name, required)?;
  debug!(
    target_name = %composite.name(),
    requirements = composite.required().len(),
    "composed target"
  );
  registry.register(composite)
}
