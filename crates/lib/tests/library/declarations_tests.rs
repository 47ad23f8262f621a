//! End-to-end tests: declaration files in, build plans out.

use trellis_lib::eval::{EvalError, evaluate_declarations};
use trellis_lib::util::hash::Hashable;
use trellis_lib::{PlanError, TargetName, resolve};

use super::common::DeclarationDir;

fn names(targets: &[TargetName]) -> Vec<&str> {
  targets.iter().map(TargetName::as_str).collect()
}

#[test]
fn composite_over_leaves() {
  let dir = DeclarationDir::new();
  let file = dir.write(
    "build.lua",
    r#"
    project { name = "a" }
    project { name = "b" }
    project { name = "c" }
    composite_target { name = "all", required = { "a", "b", "a", "c" } }
    "#,
  );

  let registry = evaluate_declarations(&file).unwrap();
  let plan = resolve(&registry, ["all"]).unwrap();

  assert_eq!(names(plan.targets()), vec!["a", "b", "c"]);
}

#[test]
fn composite_may_precede_its_leaves() {
  let dir = DeclarationDir::new();
  let file = dir.write(
    "build.lua",
    r#"
    composite_target {
      name = "samples",
      required = {
        "sample/hello_world/prj.lua",
        "sample/ping_pong/prj.lua",
      },
    }
    project { name = "so_5/prj.lua" }
    project { name = "sample/hello_world/prj.lua", requires = { "so_5/prj.lua" } }
    project { name = "sample/ping_pong/prj.lua", requires = { "so_5/prj.lua" } }
    "#,
  );

  let registry = evaluate_declarations(&file).unwrap();
  let plan = resolve(&registry, registry.top_level()).unwrap();

  assert_eq!(
    names(plan.targets()),
    vec!["so_5/prj.lua", "sample/hello_world/prj.lua", "sample/ping_pong/prj.lua"]
  );
  assert_eq!(plan.waves().len(), 2);
}

#[test]
fn include_resolves_relative_to_including_file() {
  let dir = DeclarationDir::new();
  dir.write(
    "sample/hello/prj.lua",
    r#"project { name = "hello", requires = { "runtime" } }"#,
  );
  dir.write("runtime/prj.lua", r#"project { name = "runtime" }"#);
  dir.write(
    "sample/build_samples.lua",
    r#"
    include("hello/prj.lua")
    include("../runtime/prj.lua")
    composite_target { name = "samples", required = { "hello" } }
    "#,
  );
  let root = dir.write("build.lua", r#"include("sample/build_samples.lua")"#);

  let registry = evaluate_declarations(&root).unwrap();
  assert_eq!(registry.len(), 3);

  let plan = resolve(&registry, ["samples"]).unwrap();
  assert_eq!(names(plan.targets()), vec!["runtime", "hello"]);
}

#[test]
fn including_the_same_file_twice_is_idempotent() {
  let dir = DeclarationDir::new();
  dir.write("core.lua", r#"project { name = "core" }"#);
  let root = dir.write(
    "build.lua",
    r#"
    include("core.lua")
    include("core.lua")
    "#,
  );

  let registry = evaluate_declarations(&root).unwrap();
  assert_eq!(registry.len(), 1);
}

#[test]
fn include_cycle_is_rejected() {
  let dir = DeclarationDir::new();
  dir.write("a.lua", r#"include("b.lua")"#);
  dir.write("b.lua", r#"include("a.lua")"#);

  let err = evaluate_declarations(&dir.path().join("a.lua")).unwrap_err();
  assert!(matches!(err, EvalError::Lua(_)));
  assert!(err.to_string().contains("include cycle"));
}

#[test]
fn conflicting_declarations_across_files() {
  let dir = DeclarationDir::new();
  dir.write("one.lua", r#"project { name = "core" }"#);
  dir.write("two.lua", r#"project { name = "core", requires = { "libc" } }"#);
  let root = dir.write(
    "build.lua",
    r#"
    include("one.lua")
    include("two.lua")
    "#,
  );

  let err = evaluate_declarations(&root).unwrap_err();
  assert_eq!(err.plan_error(), Some(&PlanError::DuplicateTarget { name: "core".into() }));
}

#[test]
fn unknown_target_surfaces_at_resolution() {
  let dir = DeclarationDir::new();
  let file = dir.write(
    "build.lua",
    r#"composite_target { name = "x", required = { "ghost" } }"#,
  );

  let registry = evaluate_declarations(&file).unwrap();
  let err = resolve(&registry, ["x"]).unwrap_err();

  assert!(matches!(err, PlanError::UnknownTarget { ref name, .. } if name.as_str() == "ghost"));
}

#[test]
fn declared_cycle_surfaces_at_resolution() {
  let dir = DeclarationDir::new();
  let file = dir.write(
    "build.lua",
    r#"
    project { name = "a", requires = { "b" } }
    project { name = "b", requires = { "a" } }
    "#,
  );

  let registry = evaluate_declarations(&file).unwrap();
  let err = resolve(&registry, ["a"]).unwrap_err();

  assert!(matches!(err, PlanError::CyclicDependency { .. }));
}

#[test]
fn plan_digest_is_stable_across_evaluations() {
  let dir = DeclarationDir::new();
  let file = dir.write(
    "build.lua",
    r#"
    project { name = "core" }
    project { name = "net", requires = { "core" } }
    project { name = "app", requires = { "net", "core" } }
    composite_target { name = "all", required = { "app", "net" } }
    "#,
  );

  let first = resolve(&evaluate_declarations(&file).unwrap(), ["all"]).unwrap();
  let second = resolve(&evaluate_declarations(&file).unwrap(), ["all"]).unwrap();

  assert_eq!(first, second);
  assert_eq!(first.compute_hash().unwrap(), second.compute_hash().unwrap());
}
