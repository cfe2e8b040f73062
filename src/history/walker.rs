//! Collecting comparison sessions for a report.
//!
//! Comparison sessions come from two places and are emitted in this order:
//!
//! 1. The explicit, comma separated list the job was configured with. Entries
//!    are trimmed and blank ones dropped; every non-empty entry is emitted
//!    even when the file is missing.
//! 2. Up to `max_prior_builds` prior builds, newest first. For each build the
//!    primary session name is expanded against *that* build's environment and
//!    looked up in the build's artifact directory, then in the workspace.
//!
//! Nothing is deduplicated.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use super::{BuildHistory, BuildRecord};
use crate::utils::expand_vars;

/// Where a comparison session was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SessionOrigin {
    /// Listed in the job configuration
    ExplicitConfig,
    /// Archived by a prior build
    PriorBuildArtifact,
    /// Left in the workspace by a prior build
    PriorBuildWorkspace,
}

/// A session file selected for comparison.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionReference {
    /// Path passed to the analytics tool
    pub path: PathBuf,
    /// Where the path came from
    pub origin: SessionOrigin,
}

/// Collects comparison sessions relative to one workspace and job environment.
#[derive(Debug, Clone, Copy)]
pub struct SessionHistoryWalker<'a> {
    workspace: &'a Path,
    env: &'a BTreeMap<String, String>,
}

impl<'a> SessionHistoryWalker<'a> {
    #[must_use]
    pub const fn new(workspace: &'a Path, env: &'a BTreeMap<String, String>) -> Self {
        Self { workspace, env }
    }

    /// Explicit comparisons followed by sessions from prior builds.
    ///
    /// `naming_template` is the unexpanded primary session name, for example
    /// `ls${BUILD_NUMBER}.ls`.
    pub fn collect<H>(
        &self,
        explicit: Option<&str>,
        naming_template: &str,
        max_prior_builds: usize,
        history: &H,
    ) -> Vec<SessionReference>
    where
        H: BuildHistory + ?Sized,
    {
        let mut sessions = self.explicit_sessions(explicit.unwrap_or_default());
        sessions.extend(self.prior_sessions(naming_template, max_prior_builds, history));
        sessions
    }

    /// One reference per non-empty entry of a comma separated list.
    #[must_use]
    pub fn explicit_sessions(&self, explicit: &str) -> Vec<SessionReference> {
        explicit
            .split(',')
            .map(str::trim)
            .filter(|entry| !entry.is_empty())
            .map(|entry| {
                let path = self.workspace.join(expand_vars(entry, self.env));
                if path.exists() {
                    tracing::info!(target: "webload::history", "Add LS for comparison {}", path.display());
                } else {
                    tracing::warn!(target: "webload::history", "LS for comparison not found {}", path.display());
                }
                SessionReference {
                    path,
                    origin: SessionOrigin::ExplicitConfig,
                }
            })
            .collect()
    }

    /// Sessions found for at most `max_prior_builds` prior builds.
    pub fn prior_sessions<H>(
        &self,
        naming_template: &str,
        max_prior_builds: usize,
        history: &H,
    ) -> Vec<SessionReference>
    where
        H: BuildHistory + ?Sized,
    {
        history
            .prior_builds()
            .take(max_prior_builds)
            .filter_map(|record| self.find_prior_session(naming_template, &record))
            .collect()
    }

    fn find_prior_session(&self, naming_template: &str, record: &BuildRecord) -> Option<SessionReference> {
        let name = expand_vars(naming_template, &self.build_environment(record));
        tracing::info!(target: "webload::history", "Looking for {} from build #{}", name, record.number);

        let archived = record.artifact_dir.join(&name);
        if archived.exists() {
            tracing::info!(
                target: "webload::history",
                "Add previous LS for comparison from artifacts {}",
                archived.display()
            );
            return Some(SessionReference {
                path: archived,
                origin: SessionOrigin::PriorBuildArtifact,
            });
        }

        let in_workspace = self.workspace.join(&name);
        if in_workspace.exists() {
            tracing::info!(
                target: "webload::history",
                "Add previous LS for comparison from workspace {}",
                in_workspace.display()
            );
            return Some(SessionReference {
                path: in_workspace,
                origin: SessionOrigin::PriorBuildWorkspace,
            });
        }

        tracing::info!(target: "webload::history", "Not found previous LS from build #{}", record.number);
        None
    }

    /// The job environment overlaid with the prior build's own values.
    fn build_environment(&self, record: &BuildRecord) -> BTreeMap<String, String> {
        let mut env = self.env.clone();
        env.extend(record.environment.iter().map(|(k, v)| (k.clone(), v.clone())));
        env
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::BuildRecord;
    use tempfile::TempDir;

    struct Fixture {
        _temp: TempDir,
        workspace: PathBuf,
        job_dir: PathBuf,
        env: BTreeMap<String, String>,
    }

    impl Fixture {
        fn new() -> Self {
            let temp = TempDir::new().unwrap();
            let workspace = temp.path().join("ws");
            let job_dir = temp.path().join("job");
            std::fs::create_dir_all(&workspace).unwrap();
            let mut env = BTreeMap::new();
            env.insert("BUILD_NUMBER".to_string(), "10".to_string());
            Self {
                _temp: temp,
                workspace,
                job_dir,
                env,
            }
        }

        fn walker(&self) -> SessionHistoryWalker<'_> {
            SessionHistoryWalker::new(&self.workspace, &self.env)
        }

        fn record(&self, number: u64) -> BuildRecord {
            BuildRecord::new(&self.job_dir, number, BTreeMap::new())
        }

        fn archive(&self, record: &BuildRecord, name: &str) {
            std::fs::create_dir_all(&record.artifact_dir).unwrap();
            std::fs::write(record.artifact_dir.join(name), "").unwrap();
        }

        fn touch(&self, name: &str) {
            std::fs::write(self.workspace.join(name), "").unwrap();
        }
    }

    #[test]
    fn test_explicit_entries_kept_in_order_even_when_missing() {
        let fx = Fixture::new();
        fx.touch("a.ls");

        let sessions = fx.walker().collect(Some("a.ls, b.ls,,${BUILD_NUMBER}.ls"), "x.ls", 0, &Vec::<BuildRecord>::new());
        let paths: Vec<PathBuf> = sessions.iter().map(|s| s.path.clone()).collect();
        assert_eq!(
            paths,
            vec![fx.workspace.join("a.ls"), fx.workspace.join("b.ls"), fx.workspace.join("10.ls")]
        );
        assert!(sessions.iter().all(|s| s.origin == SessionOrigin::ExplicitConfig));
    }

    #[test]
    fn test_blank_explicit_entries_dropped() {
        let fx = Fixture::new();
        let sessions = fx.walker().explicit_sessions(" , a.ls ,\t,");
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].path, fx.workspace.join("a.ls"));
    }

    #[test]
    fn test_explicit_duplicates_not_removed() {
        let fx = Fixture::new();
        let sessions = fx.walker().explicit_sessions("a.ls,a.ls");
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0], sessions[1]);
    }

    #[test]
    fn test_no_explicit_list() {
        let fx = Fixture::new();
        assert!(fx.walker().collect(None, "x.ls", 3, &Vec::<BuildRecord>::new()).is_empty());
    }

    #[test]
    fn test_prior_build_name_uses_that_builds_environment() {
        let fx = Fixture::new();
        let nine = fx.record(9);
        fx.archive(&nine, "ls9.ls");

        let sessions = fx.walker().prior_sessions("ls${BUILD_NUMBER}.ls", 5, &vec![nine.clone()]);
        assert_eq!(
            sessions,
            vec![SessionReference {
                path: nine.artifact_dir.join("ls9.ls"),
                origin: SessionOrigin::PriorBuildArtifact,
            }]
        );
    }

    #[test]
    fn test_artifact_preferred_over_workspace() {
        let fx = Fixture::new();
        let nine = fx.record(9);
        fx.archive(&nine, "ls9.ls");
        fx.touch("ls9.ls");
        let eight = fx.record(8);
        fx.touch("ls8.ls");

        let sessions = fx.walker().prior_sessions("ls${BUILD_NUMBER}.ls", 5, &vec![nine, eight]);
        let origins: Vec<SessionOrigin> = sessions.iter().map(|s| s.origin).collect();
        assert_eq!(origins, vec![SessionOrigin::PriorBuildArtifact, SessionOrigin::PriorBuildWorkspace]);
        assert_eq!(sessions[1].path, fx.workspace.join("ls8.ls"));
    }

    #[test]
    fn test_missing_prior_session_skipped() {
        let fx = Fixture::new();
        let nine = fx.record(9);
        let eight = fx.record(8);
        fx.archive(&eight, "ls8.ls");

        let sessions = fx.walker().prior_sessions("ls${BUILD_NUMBER}.ls", 5, &vec![nine, eight]);
        assert_eq!(sessions.len(), 1);
        assert!(sessions[0].path.ends_with("ls8.ls"));
    }

    #[test]
    fn test_prior_builds_capped() {
        let fx = Fixture::new();
        let records: Vec<BuildRecord> = (1..=9).rev().map(|n| fx.record(n)).collect();
        for record in &records {
            fx.archive(record, &format!("ls{}.ls", record.number));
        }

        let sessions = fx.walker().prior_sessions("ls${BUILD_NUMBER}.ls", 3, &records);
        let names: Vec<String> = sessions
            .iter()
            .map(|s| s.path.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["ls9.ls", "ls8.ls", "ls7.ls"]);
    }

    #[test]
    fn test_cap_counts_builds_not_hits() {
        let fx = Fixture::new();
        let nine = fx.record(9);
        let eight = fx.record(8);
        fx.archive(&eight, "ls8.ls");

        let sessions = fx.walker().prior_sessions("ls${BUILD_NUMBER}.ls", 1, &vec![nine, eight]);
        assert!(sessions.is_empty());
    }

    #[test]
    fn test_explicit_before_history() {
        let fx = Fixture::new();
        let nine = fx.record(9);
        fx.archive(&nine, "ls9.ls");

        let sessions = fx.walker().collect(Some("base.ls"), "ls${BUILD_NUMBER}.ls", 2, &vec![nine]);
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0].origin, SessionOrigin::ExplicitConfig);
        assert_eq!(sessions[1].origin, SessionOrigin::PriorBuildArtifact);
    }

    #[test]
    fn test_walks_fs_history() {
        let fx = Fixture::new();
        for n in [7, 8, 9, 10] {
            let record = fx.record(n);
            record.save(&fx.job_dir).unwrap();
            fx.archive(&record, &format!("ls{n}.ls"));
        }

        let history = crate::history::FsBuildHistory::new(&fx.job_dir, Some(10));
        let sessions = fx.walker().prior_sessions("ls${BUILD_NUMBER}.ls", 2, &history);
        assert_eq!(sessions.len(), 2);
        assert!(sessions[0].path.ends_with("builds/9/archive/ls9.ls"));
        assert!(sessions[1].path.ends_with("builds/8/archive/ls8.ls"));
    }
}
