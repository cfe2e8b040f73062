use predicates::prelude::*;

use super::common::TestAgent;

#[test]
fn test_help_lists_commands() {
    let agent = TestAgent::new();
    agent
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("session"))
        .stdout(predicate::str::contains("report"))
        .stdout(predicate::str::contains("portfolios"));
}

#[test]
fn test_portfolios() {
    let agent = TestAgent::new();
    agent
        .cmd()
        .arg("portfolios")
        .assert()
        .success()
        .stdout(predicate::str::contains("Summary Portfolio (default)"))
        .stdout(predicate::str::contains("Session Comparison Portfolio"))
        .stdout(predicate::str::contains("Extended Summary Portfolio"));
}

#[test]
fn test_session_without_template_is_usage_error() {
    let agent = TestAgent::new();
    agent
        .cmd()
        .arg("session")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--template"));
}

#[test]
fn test_invalid_var_rejected() {
    let agent = TestAgent::new();
    agent
        .cmd()
        .args(["report", "--session", "demo.ls", "--var", "NOEQUALS"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("KEY=VALUE"));
}

#[test]
fn test_missing_installation_reported() {
    let agent = TestAgent::new();
    agent
        .cmd()
        .env("WL_HOME", agent.root().join("not-installed"))
        .args(["session", "--template", "load.tpl", "--workspace"])
        .arg(agent.workspace())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Can't find installation at"))
        .stderr(predicate::str::contains("webload.exe"));
}

#[test]
fn test_report_missing_primary_session() {
    let agent = TestAgent::new().with_installation(|i| i.with_analytics(0));
    agent
        .cmd_with_home()
        .args(["report", "--session", "ls${BUILD_NUMBER}.ls", "--build-number", "4", "--workspace"])
        .arg(agent.workspace())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Load session file not found"))
        .stderr(predicate::str::contains("ls4.ls"));
}
