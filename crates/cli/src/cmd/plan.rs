//! Implementation of the `trellis plan` command.
//!
//! Evaluates a declaration file, resolves the requested roots and prints the
//! resulting build plan.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use trellis_lib::TargetName;
use trellis_lib::eval::evaluate_declarations;
use trellis_lib::resolve;
use trellis_lib::util::hash::Hashable;

use crate::output::{OutputFormat, print_detail, print_info, print_json, print_stat, symbols, truncate_hash};

#[derive(Serialize)]
struct PlanReport<'a> {
  digest: String,
  roots: &'a [TargetName],
  targets: &'a [TargetName],
  dependencies: &'a BTreeMap<TargetName, Vec<TargetName>>,
  waves: Vec<Vec<TargetName>>,
}

pub fn cmd_plan(file: &Path, roots: &[String], show_waves: bool, output: OutputFormat) -> Result<()> {
  let registry = evaluate_declarations(file)
    .with_context(|| format!("Failed to evaluate declarations: {}", file.display()))?;

  // Default roots skip targets that are only required from inside a cycle,
  // so the whole declaration set has to resolve first.
  let roots: Vec<TargetName> = if roots.is_empty() {
    let all_targets = registry.iter().map(|descriptor| descriptor.name().clone());
    resolve(&registry, all_targets).context("Declarations do not resolve")?;
    registry.top_level()
  } else {
    roots.iter().map(TargetName::from).collect()
  };

  let plan = resolve(&registry, &roots).context("Failed to resolve build plan")?;
  let digest = plan.compute_hash().context("Failed to compute plan digest")?;
  let waves = plan.waves();

  if output.is_json() {
    return print_json(&PlanReport {
      digest: digest.0,
      roots: &roots,
      targets: plan.targets(),
      dependencies: plan.all_dependencies(),
      waves,
    });
  }

  print_info(&format!(
    "Plan {} ({} target(s) from {} root(s))",
    truncate_hash(&digest.0),
    plan.len(),
    roots.len()
  ));

  let width = plan.len().to_string().len();
  for (i, target) in plan.iter().enumerate() {
    println!("  {:>width$}. {}", i + 1, target, width = width);
  }

  if show_waves {
    println!();
    print_info(&format!("{} parallel wave(s)", waves.len()));
    for (i, wave) in waves.iter().enumerate() {
      print_stat(&format!("wave {}", i + 1), &format!("{} target(s)", wave.len()));
      for target in wave {
        let dependents = plan.dependents(target.as_str());
        if dependents.is_empty() {
          print_detail(target.as_str());
        } else {
          let names: Vec<&str> = dependents.iter().map(TargetName::as_str).collect();
          print_detail(&format!("{} {} {}", target, symbols::ARROW, names.join(", ")));
        }
      }
    }
  }

  Ok(())
}
