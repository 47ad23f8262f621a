use std::borrow::Borrow;
use std::collections::{BTreeSet, HashSet};
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlanError;

/// Unique identifier of a target within a registry.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetName(String);

impl TargetName {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for TargetName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

impl From<&str> for TargetName {
  fn from(name: &str) -> Self {
    Self(name.to_string())
  }
}

impl From<String> for TargetName {
  fn from(name: String) -> Self {
    Self(name)
  }
}

impl From<&String> for TargetName {
  fn from(name: &String) -> Self {
    Self(name.clone())
  }
}

impl From<&TargetName> for TargetName {
  fn from(name: &TargetName) -> Self {
    name.clone()
  }
}

impl AsRef<str> for TargetName {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl Borrow<str> for TargetName {
  fn borrow(&self) -> &str {
    &self.0
  }
}

/// A leaf target: one buildable unit and the targets it needs.
///
/// Requirements form a set. Listing order does not matter, so two descriptors
/// built from the same names in a different order compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectDescriptor {
  name: TargetName,
  requires: BTreeSet<TargetName>,
}

impl ProjectDescriptor {
  pub fn new(name: impl Into<TargetName>) -> Self {
    Self {
      name: name.into(),
      requires: BTreeSet::new(),
    }
  }

  pub fn with_requires<I, N>(mut self, requires: I) -> Self
  where
    I: IntoIterator<Item = N>,
    N: Into<TargetName>,
  {
    self.requires.extend(requires.into_iter().map(Into::into));
    self
  }

  pub fn name(&self) -> &TargetName {
    &self.name
  }

  /// Direct requirements, in name order.
  pub fn requires(&self) -> &BTreeSet<TargetName> {
    &self.requires
  }
}

/// A target that exists only to aggregate other targets.
///
/// Requirements keep their first-occurrence order; repeated names are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositeTarget {
  name: TargetName,
  required: Vec<TargetName>,
}

impl CompositeTarget {
  /// Build a composite from requirements in source order.
  ///
  /// # Errors
  ///
  /// Returns `EmptyComposite` if `required` yields no names.
  pub fn new<I, N>(name: impl Into<TargetName>, required: I) -> Result<Self, PlanError>
  where
    I: IntoIterator<Item = N>,
    N: Into<TargetName>,
  {
    let name = name.into();
    let mut seen = HashSet::new();
    let mut deduped = Vec::new();

    for requirement in required.into_iter().map(Into::into) {
      if seen.insert(requirement.clone()) {
        deduped.push(requirement);
      } else {
        debug!(target_name = %name, requirement = %requirement, "dropping repeated requirement");
      }
    }

    if deduped.is_empty() {
      return Err(PlanError::EmptyComposite { name });
    }

    Ok(Self { name, required: deduped })
  }

  pub fn name(&self) -> &TargetName {
    &self.name
  }

  /// Requirements in first-occurrence order.
  pub fn required(&self) -> &[TargetName] {
    &self.required
  }
}

/// Whether a target is a leaf project or a composite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetKind {
  Project,
  Composite,
}

impl TargetKind {
  pub fn as_str(self) -> &'static str {
    match self {
      TargetKind::Project => "project",
      TargetKind::Composite => "composite",
    }
  }
}

impl fmt::Display for TargetKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

/// Anything that can be stored in the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TargetDescriptor {
  Project(ProjectDescriptor),
  Composite(CompositeTarget),
}

impl TargetDescriptor {
  pub fn name(&self) -> &TargetName {
    match self {
      TargetDescriptor::Project(project) => project.name(),
      TargetDescriptor::Composite(composite) => composite.name(),
    }
  }

  pub fn kind(&self) -> TargetKind {
    match self {
      TargetDescriptor::Project(_) => TargetKind::Project,
      TargetDescriptor::Composite(_) => TargetKind::Composite,
    }
  }

  /// Direct requirements in the order the resolver visits them.
  pub fn requirements(&self) -> Box<dyn Iterator<Item = &TargetName> + '_> {
    match self {
      TargetDescriptor::Project(project) => Box::new(project.requires().iter()),
      TargetDescriptor::Composite(composite) => Box::new(composite.required().iter()),
    }
  }
}

impl From<ProjectDescriptor> for TargetDescriptor {
  fn from(project: ProjectDescriptor) -> Self {
    TargetDescriptor::Project(project)
  }
}

impl From<CompositeTarget> for TargetDescriptor {
  fn from(composite: CompositeTarget) -> Self {
    TargetDescriptor::Composite(composite)
  }
}
