use predicates::prelude::*;

use super::common::TestAgent;

fn session_cmd(agent: &TestAgent) -> assert_cmd::Command {
    let mut cmd = agent.cmd_with_home();
    cmd.arg("session")
        .arg("--workspace")
        .arg(agent.workspace())
        .arg("--job-dir")
        .arg(agent.job_dir());
    cmd
}

#[test]
fn test_passed_session_succeeds_and_archives() {
    let agent = TestAgent::new().with_installation(|i| i.with_console("Passed", true, 0));

    session_cmd(&agent)
        .args(["--template", "load.tpl", "--build-number", "5", "--var", "RUN=nightly"])
        .assert()
        .success()
        .stdout(predicate::str::contains("console: running session"))
        .stdout(predicate::str::contains("SUCCESS"));

    assert!(agent.workspace().join("load.ls").is_file());
    assert!(agent.workspace().join("results.xml").is_file());
    assert!(agent.job_dir().join("builds/5/archive/load.ls").is_file());

    let record = std::fs::read_to_string(agent.job_dir().join("builds/5/build.toml")).unwrap();
    assert!(record.contains("RUN = \"nightly\""));
    assert!(record.contains("BUILD_NUMBER = \"5\""));
}

#[test]
fn test_session_file_name_expanded() {
    let agent = TestAgent::new().with_installation(|i| i.with_console("Passed", true, 0));

    session_cmd(&agent)
        .args(["--template", "load.tpl", "--session-file", "ls${BUILD_NUMBER}", "--build-number", "9"])
        .assert()
        .success();

    assert!(agent.workspace().join("ls9.ls").is_file());
    assert!(agent.job_dir().join("builds/9/archive/ls9.ls").is_file());
}

#[test]
fn test_not_passed_is_unstable() {
    let agent = TestAgent::new().with_installation(|i| i.with_console("Failed", true, 0));

    session_cmd(&agent)
        .args(["--template", "load.tpl"])
        .assert()
        .code(0)
        .stdout(predicate::str::contains("UNSTABLE"));

    session_cmd(&agent)
        .args(["--template", "load.tpl", "--unstable-exit-code", "3"])
        .assert()
        .code(3);
}

#[test]
fn test_nonzero_console_exit_fails() {
    let agent = TestAgent::new().with_installation(|i| i.with_console("Passed", true, 2));

    session_cmd(&agent)
        .args(["--template", "load.tpl"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("FAILURE"));
}

#[test]
fn test_missing_results_file() {
    let agent = TestAgent::new().with_installation(|i| i.with_silent_console(0));
    std::fs::write(agent.workspace().join("results.xml"), "stale").unwrap();

    session_cmd(&agent)
        .args(["--template", "load.tpl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("results file not created"));

    assert!(!agent.workspace().join("results.xml").exists());
}

#[test]
fn test_missing_session_file() {
    let agent = TestAgent::new().with_installation(|i| i.with_console("Passed", false, 0));

    session_cmd(&agent)
        .args(["--template", "load.tpl"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Load session file not found"));
}

#[test]
fn test_json_outcome() {
    let agent = TestAgent::new().with_installation(|i| i.with_console("Failed", true, 0));

    let output = session_cmd(&agent)
        .args(["--template", "load.tpl", "--output-format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let last = stdout.lines().last().unwrap();
    let outcome: serde_json::Value = serde_json::from_str(last).unwrap();
    assert_eq!(outcome["mode"], "execute-session");
    assert_eq!(outcome["result"], "unstable");
    assert_eq!(outcome["exit_code"], 0);
    assert_eq!(outcome["extraction"]["session_return_code"], "Failed");
    assert_eq!(outcome["extraction"]["error_description"], "scripted run");
    assert_eq!(outcome["states"][0], "resolve-path");
    assert_eq!(outcome["states"][7], "done");
}
