//! Dependency resolution.
//!
//! Expands root targets into a [`BuildPlan`] with a depth-first, post-order
//! walk over the registry:
//!
//! 1. A name that is already resolved is skipped (first discovery wins)
//! 2. A name that is on the current DFS stack closes a cycle
//! 3. Otherwise the name is looked up, its requirements are resolved in
//!    declared order, and a leaf is appended to the plan after them
//!
//! Composites never appear in the plan; they only contribute their leaves.
//! Resolution is all-or-nothing: on error no plan is returned.

use std::collections::{BTreeMap, HashMap, HashSet};

use tracing::{debug, trace};

use crate::error::PlanError;
use crate::plan::BuildPlan;
use crate::registry::TargetRegistry;
use crate::target::{TargetDescriptor, TargetName};

/// Resolve `roots` into a flat, dependency-ordered build plan.
///
/// Roots are processed in the given order. A root already satisfied by an
/// earlier root is a no-op, as is a requirement that was already resolved.
///
/// # Errors
///
/// - `UnknownTarget` if a root or requirement was never registered
/// - `CyclicDependency` if a target transitively requires itself
pub fn resolve<I, N>(registry: &TargetRegistry, roots: I) -> Result<BuildPlan, PlanError>
where
  I: IntoIterator<Item = N>,
  N: Into<TargetName>,
{
  let mut resolver = Resolver::new(registry);

  for root in roots {
    let root = root.into();
    resolver.visit(&root)?;
  }

  let plan = resolver.finish();
  debug!(targets = plan.len(), "resolved build plan");
  Ok(plan)
}

/// A target whose requirements are being walked.
struct Frame<'a> {
  descriptor: &'a TargetDescriptor,
  pending: Box<dyn Iterator<Item = &'a TargetName> + 'a>,
}

/// DFS state for a single resolution.
///
/// The walk keeps its own frame stack, so chain depth is bounded by memory
/// rather than by the thread's call stack.
struct Resolver<'a> {
  registry: &'a TargetRegistry,

  /// Names on the current DFS stack, outermost first.
  stack: Vec<TargetName>,
  on_stack: HashSet<TargetName>,

  /// Fully expanded names mapped to the leaves they stand for: a leaf maps
  /// to itself, a composite to the union of its requirements' leaves.
  resolved: HashMap<TargetName, Vec<TargetName>>,

  plan: Vec<TargetName>,
  dependencies: BTreeMap<TargetName, Vec<TargetName>>,
}

impl<'a> Resolver<'a> {
  fn new(registry: &'a TargetRegistry) -> Self {
    Self {
      registry,
      stack: Vec::new(),
      on_stack: HashSet::new(),
      resolved: HashMap::new(),
      plan: Vec::new(),
      dependencies: BTreeMap::new(),
    }
  }

  fn visit(&mut self, root: &TargetName) -> Result<(), PlanError> {
    let mut frames: Vec<Frame<'a>> = Vec::new();
    if let Some(frame) = self.enter(root, None)? {
      frames.push(frame);
    }

    while let Some(frame) = frames.last_mut() {
      match frame.pending.next() {
        Some(requirement) => {
          let parent = frame.descriptor.name();
          if let Some(next) = self.enter(requirement, Some(parent))? {
            frames.push(next);
          }
        }
        None => {
          let descriptor = frame.descriptor;
          frames.pop();
          self.leave(descriptor);
        }
      }
    }

    Ok(())
  }

  /// Push `name` onto the DFS stack, or `None` if it is already resolved.
  fn enter(&mut self, name: &TargetName, required_by: Option<&TargetName>) -> Result<Option<Frame<'a>>, PlanError> {
    if self.resolved.contains_key(name) {
      return Ok(None);
    }

    if self.on_stack.contains(name) {
      let start = self.stack.iter().position(|entry| entry == name).unwrap_or(0);
      let mut cycle = self.stack[start..].to_vec();
      cycle.push(name.clone());
      return Err(PlanError::CyclicDependency { cycle });
    }

    let registry = self.registry;
    let descriptor = registry.get(name.as_str()).ok_or_else(|| PlanError::UnknownTarget {
      name: name.clone(),
      required_by: required_by.cloned(),
    })?;

    trace!(target_name = %name, kind = %descriptor.kind(), depth = self.stack.len(), "visiting");

    self.stack.push(name.clone());
    self.on_stack.insert(name.clone());

    Ok(Some(Frame {
      descriptor,
      pending: descriptor.requirements(),
    }))
  }

  /// Pop a target whose requirements are all resolved and record it.
  fn leave(&mut self, descriptor: &'a TargetDescriptor) {
    let name = descriptor.name();
    self.stack.pop();
    self.on_stack.remove(name);

    let leaves = self.leaves_of(descriptor.requirements());
    match descriptor {
      TargetDescriptor::Project(_) => {
        self.dependencies.insert(name.clone(), leaves);
        self.plan.push(name.clone());
        self.resolved.insert(name.clone(), vec![name.clone()]);
      }
      TargetDescriptor::Composite(_) => {
        self.resolved.insert(name.clone(), leaves);
      }
    }
  }

  /// Union of the leaves behind already-resolved requirements, first
  /// occurrence first.
  fn leaves_of<'n>(&self, requirements: impl Iterator<Item = &'n TargetName>) -> Vec<TargetName> {
    let mut seen = HashSet::new();
    let mut leaves = Vec::new();

    for requirement in requirements {
      if let Some(expanded) = self.resolved.get(requirement) {
        for leaf in expanded {
          if seen.insert(leaf) {
            leaves.push(leaf.clone());
          }
        }
      }
    }

    leaves
  }

  fn finish(self) -> BuildPlan {
    BuildPlan::new(self.plan, self.dependencies)
  }
}
