//! Implementation of the `trellis targets` command.

use std::path::Path;

use anyhow::{Context, Result};
use owo_colors::{OwoColorize, Stream};

use trellis_lib::TargetDescriptor;
use trellis_lib::eval::evaluate_declarations;

use crate::output::{OutputFormat, print_info, print_json, symbols};

pub fn cmd_targets(file: &Path, output: OutputFormat) -> Result<()> {
  let registry = evaluate_declarations(file)
    .with_context(|| format!("Failed to evaluate declarations: {}", file.display()))?;

  let descriptors: Vec<&TargetDescriptor> = registry.iter().collect();

  if output.is_json() {
    return print_json(&descriptors);
  }

  print_info(&format!("{} target(s) declared in {}", descriptors.len(), file.display()));

  for descriptor in descriptors {
    let requirements: Vec<&str> = descriptor.requirements().map(|name| name.as_str()).collect();
    let kind = format!("[{}]", descriptor.kind());

    if requirements.is_empty() {
      println!(
        "  {} {}",
        descriptor.name(),
        kind.if_supports_color(Stream::Stdout, |s| s.dimmed())
      );
    } else {
      println!(
        "  {} {} {} {}",
        descriptor.name(),
        kind.if_supports_color(Stream::Stdout, |s| s.dimmed()),
        symbols::ARROW,
        requirements.join(", ")
      );
    }
  }

  Ok(())
}
