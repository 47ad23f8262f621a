//! Integration tests for trellis-lib.

mod common;
mod declarations_tests;
mod properties_tests;
