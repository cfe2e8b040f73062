//! Integration test suite for webload-ci
//!
//! These tests drive the compiled binary end to end. The WebLOAD executables
//! are replaced by `/bin/sh` scripts (see
//! [`FakeInstallation`](webload_ci::test_utils::FakeInstallation)), so the
//! scenarios that launch a tool only run on Unix hosts.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **cli**: argument handling and the commands that launch nothing
//! - **config**: the `config` command and configured installation paths
//! - **report**: report publishing and comparison with previous builds
//! - **session**: session runs, results interpretation and archiving

mod common;

mod cli;
mod config;
#[cfg(unix)]
mod report;
#[cfg(unix)]
mod session;
