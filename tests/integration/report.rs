use predicates::prelude::*;
use webload_ci::test_utils::installation::ANALYTICS_ARGS_FILE;

use super::common::TestAgent;

fn recorded_args(agent: &TestAgent) -> Vec<String> {
    std::fs::read_to_string(agent.workspace().join(ANALYTICS_ARGS_FILE))
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

fn report_cmd(agent: &TestAgent) -> assert_cmd::Command {
    let mut cmd = agent.cmd_with_home();
    cmd.arg("report")
        .arg("--workspace")
        .arg(agent.workspace())
        .arg("--job-dir")
        .arg(agent.job_dir());
    cmd
}

#[test]
fn test_minimal_report_arguments() {
    let agent = TestAgent::new().with_installation(|i| i.with_analytics(0));
    let primary = agent.touch("demo.ls");

    report_cmd(&agent)
        .args(["--session", "demo.ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));

    let workspace = agent.workspace().display().to_string();
    let primary = primary.display().to_string();
    assert_eq!(
        recorded_args(&agent),
        vec!["-m", "U", "-p", "Summary Portfolio", "-ls", primary.as_str(), "-l", workspace.as_str()]
    );
}

#[test]
fn test_report_ignores_non_unicode_environment() {
    use std::ffi::OsStr;
    use std::os::unix::ffi::OsStrExt;

    let agent = TestAgent::new().with_installation(|i| i.with_analytics(0));
    agent.touch("demo.ls");

    report_cmd(&agent)
        .env("JUNK", OsStr::from_bytes(b"\xff"))
        .args(["--session", "demo.ls"])
        .assert()
        .success()
        .stdout(predicate::str::contains("SUCCESS"));
}

#[test]
fn test_report_options_and_comparisons() {
    let agent = TestAgent::new().with_installation(|i| i.with_analytics(0));
    agent.touch("ls7.ls");
    agent.touch("baseline.ls");
    let six = agent.archive_previous(6, "ls6.ls");
    agent.touch("ls5.ls");
    std::fs::create_dir_all(agent.job_dir().join("builds/5")).unwrap();
    agent.archive_previous(4, "ls4.ls");
    agent.archive_previous(8, "ls8.ls");

    report_cmd(&agent)
        .args([
            "--session",
            "ls${BUILD_NUMBER}.ls",
            "--build-number",
            "7",
            "--portfolio",
            "Session Comparison Portfolio",
            "--format",
            "html",
            "--report-name",
            "trend",
            "--location",
            "reports",
            "--compare",
            "baseline.ls, missing.ls",
            "--compare-builds",
            "2",
        ])
        .assert()
        .success();

    let ws = agent.workspace();
    let expect = |p: std::path::PathBuf| p.display().to_string();
    assert_eq!(
        recorded_args(&agent),
        vec![
            "-m".to_string(),
            "U".to_string(),
            "-p".to_string(),
            "Session Comparison Portfolio".to_string(),
            "-ls".to_string(),
            expect(ws.join("ls7.ls")),
            "-ls".to_string(),
            expect(ws.join("baseline.ls")),
            "-ls".to_string(),
            expect(ws.join("missing.ls")),
            "-ls".to_string(),
            expect(six),
            "-ls".to_string(),
            expect(ws.join("ls5.ls")),
            "-f".to_string(),
            "HTML".to_string(),
            "-l".to_string(),
            "reports".to_string(),
            "-n".to_string(),
            "trend".to_string(),
        ]
    );
}

#[test]
fn test_analytics_failure_fails_build() {
    let agent = TestAgent::new().with_installation(|i| i.with_analytics(5));
    agent.touch("demo.ls");

    report_cmd(&agent)
        .args(["--session", "demo.ls"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILURE"));
}

#[test]
fn test_session_then_report_compares_against_archive() {
    let agent = TestAgent::new()
        .with_installation(|i| i.with_console("Passed", true, 0).with_analytics(0));

    for build in ["1", "2"] {
        agent
            .cmd_with_home()
            .args(["session", "--template", "load.tpl", "--session-file", "run${BUILD_NUMBER}.ls"])
            .args(["--build-number", build, "--workspace"])
            .arg(agent.workspace())
            .arg("--job-dir")
            .arg(agent.job_dir())
            .assert()
            .success();
    }
    std::fs::remove_file(agent.workspace().join("run1.ls")).unwrap();

    report_cmd(&agent)
        .args(["--session", "run${BUILD_NUMBER}.ls", "--build-number", "2", "--compare-builds", "5"])
        .assert()
        .success();

    let archived = agent.job_dir().join("builds/1/archive/run1.ls").display().to_string();
    let args = recorded_args(&agent);
    let sessions: Vec<&String> = args
        .iter()
        .zip(args.iter().skip(1))
        .filter(|(flag, _)| flag.as_str() == "-ls")
        .map(|(_, value)| value)
        .collect();
    assert_eq!(sessions.len(), 2);
    assert!(sessions[0].ends_with("run2.ls"));
    assert_eq!(sessions[1], &archived);
}
