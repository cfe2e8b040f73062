//! Constants shared across the webload-ci codebase.
//!
//! Tool names, well-known environment variables, the results file name and
//! the session file family all live here so the modules that build command
//! lines, walk build history and archive artifacts agree on them.

/// Environment variable that overrides the WebLOAD installation root.
pub const WL_HOME_VAR: &str = "WL_HOME";

/// 32-bit Program Files location on 64-bit Windows hosts. Checked first.
pub const PROGRAM_FILES_X86_VAR: &str = "ProgramFiles(x86)";

/// Generic Program Files location.
pub const PROGRAM_FILES_VAR: &str = "ProgramFiles";

/// Used when neither Program Files variable is present.
pub const DEFAULT_PROGRAM_FILES: &str = "C:\\Program Files";

/// Installation directory below the Program Files root.
pub const DEFAULT_INSTALL_SUFFIX: &str = "RadView\\WebLOAD";

/// Console executable that runs a load session template.
pub const CONSOLE_EXECUTABLE: &str = "webload.exe";

/// Command line analytics tool that publishes reports.
pub const ANALYTICS_EXECUTABLE: &str = "WLAnalyticsCmd.exe";

/// Directory below the installation root holding the executables.
pub const BIN_DIR: &str = "bin";

/// Results file written by the console when invoked with `/rc`.
pub const RESULTS_FILE_NAME: &str = "results.xml";

/// Extension of load session files.
pub const SESSION_EXTENSION: &str = "ls";

/// Extension expected on load session templates.
pub const TEMPLATE_EXTENSION: &str = "tpl";

/// Files produced next to a load session, archived together.
pub const SESSION_EXTENSIONS: [&str; 5] = ["ls", "dat", "isd", "mdb", "sdb"];

/// Portfolio used for reports when none is configured.
pub const DEFAULT_PORTFOLIO: &str = "Summary Portfolio";

/// Portfolios shipped with WebLOAD Analytics.
pub const KNOWN_PORTFOLIOS: [&str; 3] =
    ["Summary Portfolio", "Session Comparison Portfolio", "Extended Summary Portfolio"];

/// Value of `SessionReturnCode` for a passing session (compared case-insensitively).
pub const PASSED_RETURN_CODE: &str = "Passed";

/// Environment variable carrying the build number of the running job.
pub const BUILD_NUMBER_VAR: &str = "BUILD_NUMBER";

/// Per-build record file inside `<job-dir>/builds/<N>/`.
pub const BUILD_RECORD_FILE: &str = "build.toml";

/// Directory holding per-build records inside the job directory.
pub const BUILDS_DIR: &str = "builds";

/// Artifact archive directory inside `<job-dir>/builds/<N>/`.
pub const ARCHIVE_DIR: &str = "archive";
