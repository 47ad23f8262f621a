//! Plan graph for parallel drivers.
//!
//! Nodes are the plan's leaves, edges run from a dependency to its dependent.
//! Because the plan is already topologically ordered, node indices follow
//! build order and levels can be assigned in a single forward pass.

use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex};

use super::types::BuildPlan;
use crate::target::TargetName;

/// A DAG over the leaves of a [`BuildPlan`].
pub struct PlanDag {
  graph: DiGraph<TargetName, ()>,
  nodes: HashMap<TargetName, NodeIndex>,
}

impl PlanDag {
  /// Build the graph for a plan.
  ///
  /// Dependencies that are not part of the plan are ignored.
  pub fn from_plan(plan: &BuildPlan) -> Self {
    let mut graph = DiGraph::new();
    let mut nodes = HashMap::new();

    for target in plan.targets() {
      let idx = graph.add_node(target.clone());
      nodes.insert(target.clone(), idx);
    }

    for target in plan.targets() {
      let dependent_idx = nodes[target];
      for dependency in plan.dependencies(target.as_str()) {
        if let Some(&dependency_idx) = nodes.get(dependency) {
          graph.add_edge(dependency_idx, dependent_idx, ());
        }
      }
    }

    Self { graph, nodes }
  }

  pub fn node_count(&self) -> usize {
    self.graph.node_count()
  }

  pub fn edge_count(&self) -> usize {
    self.graph.edge_count()
  }

  /// Leaves that directly depend on `name`, in build order.
  pub fn dependents(&self, name: &str) -> Vec<TargetName> {
    let Some(&idx) = self.nodes.get(name) else {
      return Vec::new();
    };

    let mut dependents: Vec<NodeIndex> = self.graph.neighbors_directed(idx, Direction::Outgoing).collect();
    dependents.sort();
    dependents.into_iter().map(|idx| self.graph[idx].clone()).collect()
  }

  /// Group leaves into parallel waves.
  ///
  /// A leaf's wave is one past the latest wave of its dependencies; leaves
  /// without dependencies form the first wave.
  pub fn waves(&self) -> Vec<Vec<TargetName>> {
    let mut node_level: HashMap<NodeIndex, usize> = HashMap::new();
    let mut waves: Vec<Vec<TargetName>> = Vec::new();

    for idx in self.graph.node_indices() {
      let level = self
        .graph
        .neighbors_directed(idx, Direction::Incoming)
        .filter_map(|dependency| node_level.get(&dependency))
        .map(|level| level + 1)
        .max()
        .unwrap_or(0);

      node_level.insert(idx, level);
      if waves.len() <= level {
        waves.resize_with(level + 1, Vec::new);
      }
      waves[level].push(self.graph[idx].clone());
    }

    waves
  }
}
