//! Error taxonomy for declaration and resolution.

use thiserror::Error;

use crate::target::TargetName;

/// Errors raised while declaring targets or resolving a build plan.
///
/// Every variant is fatal to the current operation. There is no partial
/// success: the declaration set has to be fixed and the operation re-run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlanError {
  /// A target name was redeclared with a different definition.
  #[error("target '{name}' is already declared with a different definition")]
  DuplicateTarget { name: TargetName },

  /// A composite target was declared without any requirements.
  #[error("composite target '{name}' must require at least one target")]
  EmptyComposite { name: TargetName },

  /// A required name was never registered.
  #[error("unknown target '{name}'{}", required_by_suffix(.required_by))]
  UnknownTarget {
    name: TargetName,
    required_by: Option<TargetName>,
  },

  /// A target transitively requires itself.
  ///
  /// `cycle` starts and ends with the same name.
  #[error("dependency cycle detected: {}", format_cycle(.cycle))]
  CyclicDependency { cycle: Vec<TargetName> },
}

fn required_by_suffix(required_by: &Option<TargetName>) -> String {
  match required_by {
    Some(parent) => format!(" (required by '{}')", parent),
    None => String::new(),
  }
}

fn format_cycle(cycle: &[TargetName]) -> String {
  cycle.iter().map(TargetName::as_str).collect::<Vec<_>>().join(" -> ")
}
