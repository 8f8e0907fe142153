use std::io::Write;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::NamedTempFile;

fn binscout() -> Command {
    let mut cmd = Command::cargo_bin("binscout").expect("binary built");
    cmd.env_remove("RUST_LOG");
    cmd
}

/// Config whose only source cannot be reached, so nothing touches the network.
fn offline_config() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(
        br#"
[fetch]
delay_base_ms = 0
delay_jitter_ms = 0
timeout_ms = 200
connect_timeout_ms = 200

[[sources]]
id = "local"
bases = ["http://127.0.0.1:9"]
listing = ["/players"]
price = ["/players/{id}"]
"#,
    )
    .expect("write config");
    file
}

#[test]
fn query_without_mode_exits_with_bad_request() {
    let config = offline_config();
    binscout()
        .args(["--json", "--config"])
        .arg(config.path())
        .args(["query", "size=5"])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"ok\": false"))
        .stdout(predicate::str::contains("missing parameter: mode"));
}

#[test]
fn unknown_mode_exits_with_bad_request() {
    let config = offline_config();
    binscout()
        .arg("--config")
        .arg(config.path())
        .args(["query", "mode=dance"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown mode"));
}

#[test]
fn unreachable_sources_degrade_to_not_ok() {
    let config = offline_config();
    binscout()
        .args(["--json", "--config"])
        .arg(config.path())
        .args(["list", "--limit", "3"])
        .assert()
        .code(1)
        .stdout(predicate::str::contains("\"items\": []"))
        .stdout(predicate::str::contains("\"kind\": \"network\""));
}

#[test]
fn invalid_config_fails_before_any_request() {
    let mut file = NamedTempFile::new().expect("temp file");
    file.write_all(b"[policy]\ntax_rate = 2\n").expect("write config");
    binscout()
        .arg("--config")
        .arg(file.path())
        .arg("status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("tax_rate"));
}
