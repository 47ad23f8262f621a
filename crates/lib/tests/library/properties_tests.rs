//! Property tests for the resolver's plan invariants.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use proptest::sample::Index;

use trellis_lib::util::hash::Hashable;
use trellis_lib::{BuildPlan, ProjectDescriptor, TargetName, TargetRegistry, compose, resolve};

/// An acyclic declaration set over leaves and composites.
///
/// Node `i` may only require nodes `< i`, so leaves can require composites
/// and composites can nest. Node 0 is always a leaf, and every composite
/// requires at least one node.
#[derive(Debug, Clone)]
struct Declarations {
  composite: Vec<bool>,
  requires: Vec<Vec<usize>>,
  root: Vec<usize>,
}

impl Declarations {
  fn name(&self, i: usize) -> String {
    if self.composite[i] {
      format!("group_{:02}", i)
    } else {
      format!("leaf_{:02}", i)
    }
  }

  fn index_of(&self, name: &str) -> usize {
    (0..self.requires.len()).find(|&i| self.name(i) == name).unwrap()
  }

  /// Leaves reachable from `roots`, computed without the resolver.
  fn closure(&self, roots: &[usize]) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    let mut stack: Vec<usize> = roots.to_vec();
    while let Some(i) = stack.pop() {
      if seen.insert(i) {
        stack.extend(self.requires[i].iter().copied());
      }
    }
    seen.into_iter().filter(|&i| !self.composite[i]).map(|i| self.name(i)).collect()
  }

  /// Leaves `roots` stand for when composites are expanded but leaves are not.
  fn flattened(&self, roots: &[usize]) -> BTreeSet<String> {
    let mut seen = HashSet::new();
    let mut leaves = BTreeSet::new();
    let mut stack: Vec<usize> = roots.to_vec();
    while let Some(i) = stack.pop() {
      if !seen.insert(i) {
        continue;
      }
      if self.composite[i] {
        stack.extend(self.requires[i].iter().copied());
      } else {
        leaves.insert(self.name(i));
      }
    }
    leaves
  }
}

fn declarations() -> impl Strategy<Value = Declarations> {
  (
    prop::collection::vec((any::<bool>(), prop::collection::vec(any::<Index>(), 1..4)), 1..20),
    prop::collection::vec(any::<Index>(), 1..8),
  )
    .prop_map(|(raw_nodes, raw_root)| {
      let count = raw_nodes.len();
      let mut composite = Vec::with_capacity(count);
      let mut requires = Vec::with_capacity(count);

      for (i, (is_composite, picks)) in raw_nodes.iter().enumerate() {
        if i == 0 {
          composite.push(false);
          requires.push(Vec::new());
        } else {
          composite.push(*is_composite);
          requires.push(picks.iter().map(|pick| pick.index(i)).collect());
        }
      }

      let root = raw_root.iter().map(|pick| pick.index(count)).collect();
      Declarations {
        composite,
        requires,
        root,
      }
    })
}

fn registry_for(decls: &Declarations) -> TargetRegistry {
  let mut registry = TargetRegistry::new();
  // Declared last-to-first: every requirement is a forward reference
  compose(&mut registry, "all", decls.root.iter().map(|&i| decls.name(i))).unwrap();
  for i in (0..decls.requires.len()).rev() {
    let required = decls.requires[i].iter().map(|&r| decls.name(r));
    if decls.composite[i] {
      compose(&mut registry, decls.name(i), required).unwrap();
    } else {
      registry.register(ProjectDescriptor::new(decls.name(i)).with_requires(required)).unwrap();
    }
  }
  registry
}

fn plan_names(plan: &BuildPlan) -> Vec<String> {
  plan.iter().map(TargetName::to_string).collect()
}

proptest! {
  #[test]
  fn plan_is_exactly_the_transitive_closure(decls in declarations()) {
    let registry = registry_for(&decls);
    let plan = resolve(&registry, ["all"]).unwrap();

    let names = plan_names(&plan);
    let unique: BTreeSet<String> = names.iter().cloned().collect();

    prop_assert_eq!(unique.len(), names.len());
    prop_assert_eq!(unique, decls.closure(&decls.root));
  }

  #[test]
  fn composites_never_enter_the_plan(decls in declarations()) {
    let registry = registry_for(&decls);
    let plan = resolve(&registry, ["all"]).unwrap();

    for name in plan.iter() {
      prop_assert!(name.as_str().starts_with("leaf_"), "composite {} in plan", name);
    }
  }

  #[test]
  fn requirements_precede_dependents(decls in declarations()) {
    let registry = registry_for(&decls);
    let plan = resolve(&registry, ["all"]).unwrap();

    for name in plan.iter() {
      let idx = decls.index_of(name.as_str());
      let position = plan.position(name.as_str()).unwrap();
      for required in decls.closure(&decls.requires[idx]) {
        prop_assert!(plan.position(&required).unwrap() < position);
      }
    }
  }

  #[test]
  fn dependencies_flatten_composites(decls in declarations()) {
    let registry = registry_for(&decls);
    let plan = resolve(&registry, ["all"]).unwrap();

    for name in plan.iter() {
      let idx = decls.index_of(name.as_str());
      let dependencies: Vec<String> = plan.dependencies(name.as_str()).iter().map(TargetName::to_string).collect();
      let unique: BTreeSet<String> = dependencies.iter().cloned().collect();

      prop_assert_eq!(unique.len(), dependencies.len());
      prop_assert_eq!(unique, decls.flattened(&decls.requires[idx]));
    }
  }

  #[test]
  fn resolution_is_deterministic(decls in declarations()) {
    let registry = registry_for(&decls);
    let first = resolve(&registry, ["all"]).unwrap();
    let second = resolve(&registry, ["all"]).unwrap();

    prop_assert_eq!(plan_names(&first), plan_names(&second));
    prop_assert_eq!(first.compute_hash().unwrap(), second.compute_hash().unwrap());
  }

  #[test]
  fn waves_respect_dependencies(decls in declarations()) {
    let registry = registry_for(&decls);
    let plan = resolve(&registry, ["all"]).unwrap();
    let waves = plan.waves();

    let wave_of = |name: &str| waves.iter().position(|wave| wave.iter().any(|n| n.as_str() == name)).unwrap();
    prop_assert_eq!(waves.iter().map(Vec::len).sum::<usize>(), plan.len());
    for name in plan.iter() {
      for dependency in plan.dependencies(name.as_str()) {
        prop_assert!(wave_of(dependency.as_str()) < wave_of(name.as_str()));
      }
    }
  }
}
