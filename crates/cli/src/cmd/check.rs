//! Implementation of the `trellis check` command.
//!
//! Resolves every declared target, which surfaces unknown requirements and
//! cycles anywhere in the declaration set, not just under the default roots.

use std::path::Path;

use anyhow::{Context, Result};

use trellis_lib::eval::evaluate_declarations;
use trellis_lib::{TargetKind, resolve};

use crate::output::{print_stat, print_success};

pub fn cmd_check(file: &Path) -> Result<()> {
  let registry = evaluate_declarations(file)
    .with_context(|| format!("Failed to evaluate declarations: {}", file.display()))?;

  let all_targets = registry.iter().map(|descriptor| descriptor.name().clone());
  let plan = resolve(&registry, all_targets).context("Declarations do not resolve")?;

  let projects = registry.iter().filter(|d| d.kind() == TargetKind::Project).count();
  let composites = registry.len() - projects;

  print_success(&format!("{} declares a consistent build", file.display()));
  print_stat("Targets", &registry.len().to_string());
  print_stat("Projects", &projects.to_string());
  print_stat("Composites", &composites.to_string());
  print_stat("Top-level", &registry.top_level().len().to_string());
  print_stat("Plan length", &plan.len().to_string());

  Ok(())
}
