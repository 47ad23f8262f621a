//! trellis-lib: Composite build targets and build-plan resolution
//!
//! This crate provides the declaration and resolution core of trellis:
//! - `TargetName`, `ProjectDescriptor`, `CompositeTarget`: the declared targets
//! - `TargetRegistry`: the name -> descriptor mapping populated during declaration
//! - `compose`: builds and registers composite targets
//! - `resolve`: expands roots into a flat, dependency-ordered `BuildPlan`
//! - `eval`: loads declarations from Lua files

pub mod compose;
pub mod consts;
pub mod error;
pub mod eval;
pub mod lua;
pub mod plan;
pub mod registry;
pub mod resolve;
pub mod target;
pub mod util;

pub use compose::compose;
pub use error::PlanError;
pub use plan::BuildPlan;
pub use registry::TargetRegistry;
pub use resolve::resolve;
pub use target::{CompositeTarget, ProjectDescriptor, TargetDescriptor, TargetKind, TargetName};
