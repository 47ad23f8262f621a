//! Global Lua functions for declaring targets.
//!
//! This module registers:
//! - `project { name = "...", requires = { ... } }` - Declare a leaf project
//! - `composite_target { name = "...", required = { ... } }` - Declare a composite target
//! - `include("path.lua")` - Evaluate another declaration file relative to the current one
//! - `trellis.dir` - Directory of the file being evaluated

use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;

use super::runtime;
use crate::compose::compose;
use crate::consts::{LOADING_REGISTRY_KEY, LUA_GLOBAL_TABLE};
use crate::registry::TargetRegistry;
use crate::target::ProjectDescriptor;

/// Register the declaration globals in the Lua runtime.
pub fn register_globals(lua: &Lua, registry: Rc<RefCell<TargetRegistry>>) -> LuaResult<()> {
  let trellis = lua.create_table()?;
  trellis.set("dir", ".")?;
  trellis.set("version", env!("CARGO_PKG_VERSION"))?;
  lua.globals().set(LUA_GLOBAL_TABLE, trellis)?;

  // Files currently being evaluated, for include cycle detection
  lua.set_named_registry_value(LOADING_REGISTRY_KEY, lua.create_table()?)?;

  register_project(lua, registry.clone())?;
  register_composite_target(lua, registry)?;
  register_include(lua)?;

  Ok(())
}

fn register_project(lua: &Lua, registry: Rc<RefCell<TargetRegistry>>) -> LuaResult<()> {
  let project_fn = lua.create_function(move |_, spec: LuaTable| {
    let name = parse_target_name(&spec, "project")?;
    let requires = match spec.get::<LuaValue>("requires")? {
      LuaValue::Nil => Vec::new(),
      LuaValue::Table(t) => parse_name_list(&t, "requires", &name)?,
      other => {
        return Err(LuaError::external(format!(
          "project '{}': 'requires' must be a table, got {}",
          name,
          other.type_name()
        )));
      }
    };

    let descriptor = ProjectDescriptor::new(name).with_requires(requires);
    registry.borrow_mut().register(descriptor).map_err(LuaError::external)
  })?;

  lua.globals().set("project", project_fn)
}

fn register_composite_target(lua: &Lua, registry: Rc<RefCell<TargetRegistry>>) -> LuaResult<()> {
  let composite_fn = lua.create_function(move |_, spec: LuaTable| {
    let name = parse_target_name(&spec, "composite_target")?;
    let required = match spec.get::<LuaValue>("required")? {
      LuaValue::Table(t) => parse_name_list(&t, "required", &name)?,
      LuaValue::Nil => {
        return Err(LuaError::external(format!(
          "composite_target '{}' requires a 'required' table",
          name
        )));
      }
      other => {
        return Err(LuaError::external(format!(
          "composite_target '{}': 'required' must be a table, got {}",
          name,
          other.type_name()
        )));
      }
    };

    compose(&mut registry.borrow_mut(), name, required).map_err(LuaError::external)
  })?;

  lua.globals().set("composite_target", composite_fn)
}

fn register_include(lua: &Lua) -> LuaResult<()> {
  let include_fn = lua.create_function(|lua, relative: String| {
    let trellis: LuaTable = lua.globals().get(LUA_GLOBAL_TABLE)?;
    let dir: String = trellis.get("dir")?;
    let path = Path::new(&dir).join(&relative);
    runtime::load_file(lua, &path)?;
    Ok(())
  })?;

  lua.globals().set("include", include_fn)
}

/// Read the mandatory, non-empty `name` field of a declaration table.
fn parse_target_name(spec: &LuaTable, function: &str) -> LuaResult<String> {
  let name: Option<String> = spec
    .get("name")
    .map_err(|_| LuaError::external(format!("{} 'name' must be a string", function)))?;

  match name {
    Some(name) if !name.trim().is_empty() => Ok(name),
    Some(_) => Err(LuaError::external(format!("{} 'name' cannot be empty", function))),
    None => Err(LuaError::external(format!("{} requires 'name' field", function))),
  }
}

/// Read an array of target names, in order.
fn parse_name_list(table: &LuaTable, field: &str, owner: &str) -> LuaResult<Vec<String>> {
  let mut names = Vec::with_capacity(table.raw_len());

  for value in table.sequence_values::<LuaValue>() {
    match value? {
      LuaValue::String(s) => names.push(s.to_str()?.to_string()),
      other => {
        return Err(LuaError::external(format!(
          "'{}' of '{}' must contain only strings, got {}",
          field,
          owner,
          other.type_name()
        )));
      }
    }
  }

  Ok(names)
}
