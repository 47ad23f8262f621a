//! The target registry.
//!
//! Holds the authoritative mapping from [`TargetName`] to the declared
//! descriptor. Declarations are processed sequentially, in file order, and the
//! registry remembers that order so listings and default roots are stable.

use std::collections::{HashMap, HashSet};

use tracing::debug;

use crate::error::PlanError;
use crate::target::{CompositeTarget, TargetDescriptor, TargetName};

/// Name -> descriptor mapping for a single build invocation.
#[derive(Debug, Clone, Default)]
pub struct TargetRegistry {
  targets: HashMap<TargetName, TargetDescriptor>,
  order: Vec<TargetName>,
}

impl TargetRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  /// Register a descriptor under its own name.
  ///
  /// Registering an identical descriptor again is a no-op.
  ///
  /// # Errors
  ///
  /// Returns `DuplicateTarget` if the name is taken by a different descriptor.
  pub fn register(&mut self, descriptor: impl Into<TargetDescriptor>) -> Result<(), PlanError> {
    let descriptor = descriptor.into();
    let name = descriptor.name().clone();

    if let Some(existing) = self.targets.get(&name) {
      if *existing == descriptor {
        debug!(target_name = %name, "ignoring identical redeclaration");
        return Ok(());
      }
      return Err(PlanError::DuplicateTarget { name });
    }

    debug!(target_name = %name, kind = %descriptor.kind(), "registered target");
    self.order.push(name.clone());
    self.targets.insert(name, descriptor);
    Ok(())
  }

  /// Look up a descriptor.
  ///
  /// # Errors
  ///
  /// Returns `UnknownTarget` if nothing is registered under `name`.
  pub fn lookup(&self, name: &str) -> Result<&TargetDescriptor, PlanError> {
    self.get(name).ok_or_else(|| PlanError::UnknownTarget {
      name: name.into(),
      required_by: None,
    })
  }

  pub fn get(&self, name: &str) -> Option<&TargetDescriptor> {
    self.targets.get(name)
  }

  pub fn contains(&self, name: &str) -> bool {
    self.targets.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }

  /// All descriptors in declaration order.
  pub fn iter(&self) -> impl Iterator<Item = &TargetDescriptor> {
    self.order.iter().filter_map(|name| self.targets.get(name))
  }

  /// Composite targets in declaration order.
  pub fn composites(&self) -> impl Iterator<Item = &CompositeTarget> {
    self.iter().filter_map(|descriptor| match descriptor {
      TargetDescriptor::Composite(composite) => Some(composite),
      TargetDescriptor::Project(_) => None,
    })
  }

  /// Targets that no other declared target requires, in declaration order.
  pub fn top_level(&self) -> Vec<TargetName> {
    let required: HashSet<&TargetName> = self.iter().flat_map(TargetDescriptor::requirements).collect();

    self
      .order
      .iter()
      .filter(|name| !required.contains(name))
      .cloned()
      .collect()
  }
}
