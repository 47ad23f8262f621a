use std::collections::BTreeMap;

use serde::Serialize;

use super::dag::PlanDag;
use crate::target::TargetName;
use crate::util::hash::Hashable;

/// A flat, dependency-ordered list of leaf targets.
///
/// Plans are produced by [`crate::resolve::resolve`] and never change
/// afterwards. A change to the declarations requires resolving again.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BuildPlan {
  /// Leaf targets, dependencies first.
  targets: Vec<TargetName>,

  /// Leaf -> leaves it directly depends on, with composites flattened.
  dependencies: BTreeMap<TargetName, Vec<TargetName>>,
}

impl Hashable for BuildPlan {}

impl BuildPlan {
  pub(crate) fn new(targets: Vec<TargetName>, dependencies: BTreeMap<TargetName, Vec<TargetName>>) -> Self {
    Self { targets, dependencies }
  }

  /// Leaf targets in build order.
  pub fn targets(&self) -> &[TargetName] {
    &self.targets
  }

  pub fn iter(&self) -> impl Iterator<Item = &TargetName> {
    self.targets.iter()
  }

  pub fn len(&self) -> usize {
    self.targets.len()
  }

  pub fn is_empty(&self) -> bool {
    self.targets.is_empty()
  }

  pub fn contains(&self, name: &str) -> bool {
    self.dependencies.contains_key(name)
  }

  /// Index of `name` in build order.
  pub fn position(&self, name: &str) -> Option<usize> {
    self.targets.iter().position(|target| target.as_str() == name)
  }

  /// The leaves `name` directly depends on.
  ///
  /// A requirement on a composite shows up as a dependency on each of the
  /// composite's leaves. Empty for leaves without requirements and for names
  /// outside the plan.
  pub fn dependencies(&self, name: &str) -> &[TargetName] {
    self.dependencies.get(name).map(Vec::as_slice).unwrap_or_default()
  }

  pub fn all_dependencies(&self) -> &BTreeMap<TargetName, Vec<TargetName>> {
    &self.dependencies
  }

  /// Leaves that directly depend on `name`, in build order.
  pub fn dependents(&self, name: &str) -> Vec<TargetName> {
    PlanDag::from_plan(self).dependents(name)
  }

  /// Group leaves into waves that can be built in parallel.
  ///
  /// Every leaf's dependencies live in earlier waves. Within a wave, leaves
  /// keep their plan order.
  pub fn waves(&self) -> Vec<Vec<TargetName>> {
    PlanDag::from_plan(self).waves()
  }
}

impl<'a> IntoIterator for &'a BuildPlan {
  type Item = &'a TargetName;
  type IntoIter = std::slice::Iter<'a, TargetName>;

  fn into_iter(self) -> Self::IntoIter {
    self.targets.iter()
  }
}
