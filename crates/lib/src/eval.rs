//! Declaration file evaluation.
//!
//! This module provides `evaluate_declarations`, which runs a Lua declaration
//! file and returns the populated [`TargetRegistry`].

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::info;

use crate::error::PlanError;
use crate::lua::runtime;
use crate::registry::TargetRegistry;

/// Errors that can occur while evaluating declarations.
#[derive(Debug, thiserror::Error)]
pub enum EvalError {
  /// A declaration was rejected by the registry or the composite builder.
  #[error("declaration error: {0}")]
  Declaration(PlanError),

  /// Lua evaluation error.
  #[error("lua error: {0}")]
  Lua(LuaError),
}

impl EvalError {
  /// The typed declaration error behind this failure, if any.
  pub fn plan_error(&self) -> Option<&PlanError> {
    match self {
      EvalError::Declaration(err) => Some(err),
      EvalError::Lua(_) => None,
    }
  }
}

impl From<LuaError> for EvalError {
  fn from(err: LuaError) -> Self {
    match find_plan_error(&err) {
      Some(plan_err) => EvalError::Declaration(plan_err.clone()),
      None => EvalError::Lua(err),
    }
  }
}

/// Walk a Lua error chain looking for a `PlanError` raised by a declaration.
fn find_plan_error(err: &LuaError) -> Option<&PlanError> {
  match err {
    LuaError::ExternalError(inner) => inner.downcast_ref::<PlanError>(),
    LuaError::CallbackError { cause, .. } => find_plan_error(cause),
    LuaError::WithContext { cause, .. } => find_plan_error(cause),
    _ => None,
  }
}

/// Evaluate a declaration file and return the registry it populated.
///
/// Declarations are applied in evaluation order, including those of files
/// pulled in with `include()`.
///
/// # Example
/// ```ignore
/// use std::path::Path;
/// use trellis_lib::eval::evaluate_declarations;
///
/// let registry = evaluate_declarations(Path::new("build.lua"))?;
/// println!("Targets: {}", registry.len());
/// ```
pub fn evaluate_declarations(path: &Path) -> Result<TargetRegistry, EvalError> {
  let registry = Rc::new(RefCell::new(TargetRegistry::new()));
  let lua = runtime::create_runtime(registry.clone())?;

  runtime::load_file(&lua, path)?;
  drop(lua);

  let registry = registry.take();
  info!(path = %path.display(), targets = registry.len(), "evaluated declarations");
  Ok(registry)
}

/// Evaluate an in-memory declaration chunk.
pub fn evaluate_declarations_str(source: &str, chunk_name: &str) -> Result<TargetRegistry, EvalError> {
  let registry = Rc::new(RefCell::new(TargetRegistry::new()));
  let lua = runtime::create_runtime(registry.clone())?;

  runtime::load_str(&lua, source, chunk_name)?;
  drop(lua);

  Ok(registry.take())
}
