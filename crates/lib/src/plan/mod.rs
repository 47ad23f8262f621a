//! Build plans.
//!
//! A [`BuildPlan`] is the resolver's output: the distinct leaf targets of one
//! resolution, ordered so that every target comes after everything it
//! transitively requires. The [`dag`] submodule turns a plan into a graph for
//! drivers that want to build independent leaves in parallel.

pub mod dag;
mod types;

pub use dag::PlanDag;
pub use types::*;
