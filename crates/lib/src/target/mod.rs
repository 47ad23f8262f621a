//! Declared targets.
//!
//! A target is either a leaf project (one real buildable artifact) or a
//! composite that only groups other targets. Both are addressed by a
//! [`TargetName`] and stored in the [`crate::registry::TargetRegistry`].

mod types;

pub use types::*;
