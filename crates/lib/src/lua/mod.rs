//! Lua runtime for declaration files.
//!
//! Declaration files are plain Lua scripts that call global functions to
//! declare targets, in file order, into a shared [`crate::registry::TargetRegistry`].
//!
//! # Submodules
//!
//! - [`globals`] - Global Lua functions (`project{}`, `composite_target{}`, `include()`)
//! - [`runtime`] - Low-level Lua VM management and file loading

pub mod globals;
pub mod runtime;
