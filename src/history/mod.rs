//! Build history for the job running the step.
//!
//! A CI server keeps one record per completed build: the environment the
//! build ran with and a directory of archived artifacts. Locally the records
//! live under a job directory:
//!
//! ```text
//! <job-dir>/
//! └── builds/
//!     ├── 41/
//!     │   ├── build.toml      # [environment] table
//!     │   └── archive/        # archived session files
//!     └── 42/
//!         └── ...
//! ```
//!
//! [`BuildHistory`] exposes prior records newest first; [`FsBuildHistory`]
//! reads the layout above and an in-memory `Vec<BuildRecord>` serves tests
//! and jobs without a job directory.

pub mod walker;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::constants::{ARCHIVE_DIR, BUILD_NUMBER_VAR, BUILD_RECORD_FILE, BUILDS_DIR};

pub use walker::{SessionHistoryWalker, SessionOrigin, SessionReference};

/// One completed build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildRecord {
    /// Build number
    pub number: u64,
    /// Environment the build ran with
    pub environment: BTreeMap<String, String>,
    /// Directory holding the build's archived artifacts
    pub artifact_dir: PathBuf,
}

/// On-disk shape of `build.toml`.
#[derive(Debug, Default, Serialize, Deserialize)]
struct BuildRecordFile {
    #[serde(default)]
    environment: BTreeMap<String, String>,
}

impl BuildRecord {
    /// A record for build `number` of the job in `job_dir`.
    #[must_use]
    pub fn new(job_dir: &Path, number: u64, environment: BTreeMap<String, String>) -> Self {
        let mut record = Self {
            number,
            environment,
            artifact_dir: artifact_dir(job_dir, number),
        };
        record.inject_build_number();
        record
    }

    /// Load build `number` from `job_dir`. A missing `build.toml` yields an
    /// empty environment.
    pub fn load(job_dir: &Path, number: u64) -> Result<Self> {
        let path = build_dir(job_dir, number).join(BUILD_RECORD_FILE);
        let file = if path.exists() {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read build record: {}", path.display()))?;
            toml::from_str::<BuildRecordFile>(&content)
                .with_context(|| format!("Failed to parse build record: {}", path.display()))?
        } else {
            BuildRecordFile::default()
        };
        Ok(Self::new(job_dir, number, file.environment))
    }

    /// Write `build.toml` for this record under `job_dir`.
    pub fn save(&self, job_dir: &Path) -> Result<PathBuf> {
        let dir = build_dir(job_dir, self.number);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create build directory: {}", dir.display()))?;

        let file = BuildRecordFile {
            environment: self.environment.clone(),
        };
        let content = toml::to_string_pretty(&file).context("Failed to serialize build record")?;
        let path = dir.join(BUILD_RECORD_FILE);
        std::fs::write(&path, content)
            .with_context(|| format!("Failed to write build record: {}", path.display()))?;
        Ok(path)
    }

    fn inject_build_number(&mut self) {
        let number = self.number.to_string();
        self.environment.entry(BUILD_NUMBER_VAR.to_string()).or_insert(number);
    }
}

/// `<job-dir>/builds/<number>`.
#[must_use]
pub fn build_dir(job_dir: &Path, number: u64) -> PathBuf {
    job_dir.join(BUILDS_DIR).join(number.to_string())
}

/// `<job-dir>/builds/<number>/archive`.
#[must_use]
pub fn artifact_dir(job_dir: &Path, number: u64) -> PathBuf {
    build_dir(job_dir, number).join(ARCHIVE_DIR)
}

/// Completed builds preceding the current one.
pub trait BuildHistory {
    /// Prior builds, newest first.
    fn prior_builds(&self) -> Box<dyn Iterator<Item = BuildRecord> + '_>;
}

impl BuildHistory for Vec<BuildRecord> {
    fn prior_builds(&self) -> Box<dyn Iterator<Item = BuildRecord> + '_> {
        Box::new(self.iter().cloned())
    }
}

/// Build history read from a job directory.
#[derive(Debug, Clone)]
pub struct FsBuildHistory {
    job_dir: PathBuf,
    current_build: Option<u64>,
}

impl FsBuildHistory {
    /// History of the job in `job_dir`. Only builds numbered below
    /// `current_build` are considered; with `None`, every build is.
    #[must_use]
    pub fn new(job_dir: impl Into<PathBuf>, current_build: Option<u64>) -> Self {
        Self {
            job_dir: job_dir.into(),
            current_build,
        }
    }

    /// Prior build numbers, newest first.
    ///
    /// Non-numeric entries are ignored. A missing `builds/` directory is an
    /// empty history.
    #[must_use]
    pub fn build_numbers(&self) -> Vec<u64> {
        let builds = self.job_dir.join(BUILDS_DIR);
        let entries = match std::fs::read_dir(&builds) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Vec::new(),
            Err(e) => {
                tracing::warn!(target: "webload::history", "Cannot list {}: {}", builds.display(), e);
                return Vec::new();
            }
        };

        let mut numbers: Vec<u64> = entries
            .filter_map(Result::ok)
            .filter(|entry| entry.path().is_dir())
            .filter_map(|entry| entry.file_name().to_str().and_then(|name| name.parse::<u64>().ok()))
            .filter(|number| self.current_build.is_none_or(|current| *number < current))
            .collect();
        numbers.sort_unstable_by(|a, b| b.cmp(a));
        numbers
    }
}

impl BuildHistory for FsBuildHistory {
    fn prior_builds(&self) -> Box<dyn Iterator<Item = BuildRecord> + '_> {
        Box::new(self.build_numbers().into_iter().map(|number| {
            BuildRecord::load(&self.job_dir, number).unwrap_or_else(|e| {
                tracing::warn!(
                    target: "webload::history",
                    "Ignoring unreadable record of build #{}: {:#}",
                    number,
                    e
                );
                BuildRecord::new(&self.job_dir, number, BTreeMap::new())
            })
        }))
    }
}
