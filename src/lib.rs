//! webload-ci - WebLOAD build steps for CI jobs
//!
//! Drives two WebLOAD tools from a continuous-integration build step:
//!
//! - the **console** (`webload.exe`) runs a load session template, writes a
//!   results file and a family of session files
//! - **Analytics** (`WLAnalyticsCmd.exe`) publishes a report over a primary
//!   load session and sessions to compare it against
//!
//! # Architecture Overview
//!
//! A build step resolves the installation, validates its inputs, builds an
//! immutable command line, launches it and maps what the tool left behind to
//! a [`BuildResult`](core::BuildResult):
//!
//! ```text
//! installation ──► tool::invocation ──► tool::launcher ──► extract / archive
//!                        ▲
//!                 history::walker
//! ```
//!
//! # Core Modules
//!
//! ## Build Steps
//! - [`steps`] - execute-session and generate-report orchestration
//! - [`cli`] - command-line interface
//!
//! ## Tool Integration
//! - [`installation`] - installation root resolution (`WL_HOME`, config, Program Files)
//! - [`tool`] - argument lists for both tools and the process launcher
//! - [`extract`] - scraping the console's pseudo-XML results file
//!
//! ## Build History
//! - [`history`] - prior build records and comparison session collection
//! - [`archive`] - archiving session files for later builds
//!
//! ## Supporting Modules
//! - [`config`] - global configuration (`~/.webload-ci/config.toml`)
//! - [`core`] - errors and step outcomes
//! - [`validation`] - field checks for job settings
//! - [`utils`] - variable expansion and file name helpers
//!
//! # Command-Line Usage
//!
//! ```bash
//! # Run a session; the build is unstable unless the session passed
//! webload-ci session --template load.tpl --session-file 'ls${BUILD_NUMBER}.ls'
//!
//! # Publish a report comparing against the last three builds
//! webload-ci report --session 'ls${BUILD_NUMBER}.ls' --compare-builds 3 --format pdf
//!
//! # Persist the installation root for this agent
//! webload-ci config set-install-path 'D:\RadView\WebLOAD'
//! ```

// Build steps
pub mod cli;
pub mod steps;

// Tool integration
pub mod extract;
pub mod installation;
pub mod tool;

// Build history
pub mod archive;
pub mod history;

// Supporting modules
pub mod config;
pub mod constants;
pub mod core;
pub mod utils;
pub mod validation;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
