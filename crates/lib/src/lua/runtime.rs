use std::cell::RefCell;
use std::path::Path;
use std::rc::Rc;

use mlua::prelude::*;
use tracing::debug;

use crate::consts::{LOADING_REGISTRY_KEY, LUA_GLOBAL_TABLE};
use crate::lua::globals;
use crate::registry::TargetRegistry;

/// Create a new Lua runtime whose declaration functions write into `registry`.
pub fn create_runtime(registry: Rc<RefCell<TargetRegistry>>) -> LuaResult<Lua> {
  let lua = Lua::new();

  // Register global declaration functions and the `trellis` table
  globals::register_globals(&lua, registry)?;

  Ok(lua)
}

/// Load and execute a declaration file.
///
/// `trellis.dir` points at the file's directory while it runs and is restored
/// afterwards, so nested `include()` calls resolve relative paths correctly.
/// A file that is already being evaluated further up the include chain is
/// rejected.
pub fn load_file(lua: &Lua, path: &Path) -> LuaResult<LuaValue> {
  let canonical_path = path
    .canonicalize()
    .map_err(|e| LuaError::external(format!("cannot canonicalize '{}': {}", path.display(), e)))?;
  let content = std::fs::read_to_string(&canonical_path)
    .map_err(|e| LuaError::external(format!("cannot read '{}': {}", canonical_path.display(), e)))?;

  let key = canonical_path.to_string_lossy().to_string();
  let loading: LuaTable = lua.named_registry_value(LOADING_REGISTRY_KEY)?;
  if loading.contains_key(key.as_str())? {
    return Err(LuaError::external(format!(
      "include cycle: '{}' is already being evaluated",
      canonical_path.display()
    )));
  }

  let dir = canonical_path
    .parent()
    .unwrap_or(Path::new(""))
    .to_string_lossy()
    .to_string();

  debug!(path = %canonical_path.display(), "evaluating declaration file");

  let trellis = lua.globals().get::<LuaTable>(LUA_GLOBAL_TABLE)?;
  let previous_dir: LuaValue = trellis.get("dir")?;

  loading.set(key.as_str(), true)?;
  trellis.set("dir", dir)?;

  let result = lua
    .load(&content)
    .set_name(format!("@{}", canonical_path.display()))
    .eval::<LuaValue>();

  trellis.set("dir", previous_dir)?;
  loading.set(key.as_str(), LuaValue::Nil)?;

  result
}

/// Execute an in-memory declaration chunk.
///
/// Relative `include()` paths resolve against the process working directory.
pub fn load_str(lua: &Lua, source: &str, chunk_name: &str) -> LuaResult<LuaValue> {
  lua.load(source).set_name(format!("={}", chunk_name)).eval::<LuaValue>()
}
