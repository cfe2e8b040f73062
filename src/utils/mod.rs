//! Cross-platform utilities and helpers
//!
//! - [`platform`] - variable expansion, extension substitution and path helpers

pub mod platform;

pub use platform::{expand_vars, is_absolute_name, process_env, replace_extension};
