use predicates::prelude::*;

use super::common::TestAgent;

#[test]
fn test_config_path_honours_flag() {
    let agent = TestAgent::new();
    agent
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains(agent.config_path().display().to_string()));
}

#[test]
fn test_set_show_and_clear_install_path() {
    let agent = TestAgent::new();
    let install = agent.root().join("custom-webload").display().to_string();

    agent.cmd().args(["config", "set-install-path", install.as_str()]).assert().success();
    let content = std::fs::read_to_string(agent.config_path()).unwrap();
    assert!(content.contains("installation_path"));

    agent
        .cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains(install.as_str()))
        .stdout(predicate::str::contains("global config"));

    agent
        .cmd()
        .args(["config", "clear-install-path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Installation path cleared"));
    agent
        .cmd()
        .arg("config")
        .assert()
        .success()
        .stdout(predicate::str::contains("(not set)"));
}

#[test]
fn test_wl_home_shown_as_source() {
    let agent = TestAgent::new();
    agent
        .cmd_with_home()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("WL_HOME"));
}

#[test]
fn test_init_refuses_to_overwrite() {
    let agent = TestAgent::new();
    agent.cmd().args(["config", "init"]).assert().success();
    assert!(agent.config_path().is_file());

    agent
        .cmd()
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
    agent.cmd().args(["config", "init", "--force"]).assert().success();
}

#[test]
#[cfg(unix)]
fn test_configured_install_path_used_by_session() {
    let agent = TestAgent::new().with_installation(|i| i.with_console("Passed", true, 0));
    let install = agent.installation.root().display().to_string();
    agent.cmd().args(["config", "set-install-path", install.as_str()]).assert().success();

    agent
        .cmd()
        .args(["session", "--template", "load.tpl", "--workspace"])
        .arg(agent.workspace())
        .assert()
        .success()
        .stderr(predicate::str::contains("Using configured installation path"));
}
