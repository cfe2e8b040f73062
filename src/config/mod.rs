//! Configuration for webload-ci.
//!
//! Job-level settings arrive on the command line (see [`crate::cli`]); the
//! only persisted settings are global ones kept in [`GlobalConfig`].

pub mod global;

pub use global::{GlobalConfig, GlobalConfigManager};
