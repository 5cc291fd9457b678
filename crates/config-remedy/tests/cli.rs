//! CLI integration tests

use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;

fn write_temp(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{content}").expect("write");
    file
}

#[test]
fn remediate_prints_interface_replacement() {
    let running = write_temp("interface Vlan2\n ip address 10.0.0.1 255.255.255.0\n");
    let generated = write_temp("interface Vlan2\n ip address 10.0.0.2 255.255.255.0\n");

    let mut cmd = Command::cargo_bin("config-remedy").expect("binary");
    cmd.args([
        "remediate",
        "cisco_ios",
        running.path().to_str().unwrap(),
        generated.path().to_str().unwrap(),
    ]);
    cmd.assert().success().stdout(predicate::eq(
        "interface Vlan2\n  ip address 10.0.0.2 255.255.255.0\n",
    ));
}

#[test]
fn rollback_prints_reverse_commands() {
    let running = write_temp("");
    let generated = write_temp("logging console emergencies\n");

    let mut cmd = Command::cargo_bin("config-remedy").expect("binary");
    cmd.args([
        "rollback",
        "cisco_ios",
        running.path().to_str().unwrap(),
        generated.path().to_str().unwrap(),
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::eq("logging console debugging\n"));
}

#[test]
fn dump_emits_json() {
    let config = write_temp("hostname test\n");

    let mut cmd = Command::cargo_bin("config-remedy").expect("binary");
    cmd.args(["dump", "generic", config.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"hostname test\""));
}

#[test]
fn unused_reports_unreferenced_acl() {
    let config = write_temp(
        "ip access-list extended UNUSED_ACL\n permit ip any any\ninterface GigabitEthernet0/1\n description no acl here\n",
    );

    let mut cmd = Command::cargo_bin("config-remedy").expect("binary");
    cmd.args(["unused", "cisco_ios", config.path().to_str().unwrap()]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("no ip access-list extended UNUSED_ACL"));
}

#[test]
fn unknown_platform_fails() {
    let config = write_temp("hostname test\n");

    let mut cmd = Command::cargo_bin("config-remedy").expect("binary");
    cmd.args(["dump", "net_os_9000", config.path().to_str().unwrap()]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported platform"));
}

#[test]
fn tags_file_filters_remediation() {
    let running = write_temp("");
    let generated = write_temp("ntp server 10.0.0.1\nvlan 3\n name three\n");
    let tags = write_temp("- match_rules:\n    - startswith: ntp\n  apply_tags: [safe]\n");

    let mut cmd = Command::cargo_bin("config-remedy").expect("binary");
    cmd.args([
        "remediate",
        "cisco_ios",
        running.path().to_str().unwrap(),
        generated.path().to_str().unwrap(),
        "--tags-file",
        tags.path().to_str().unwrap(),
        "--include-tag",
        "safe",
    ]);
    cmd.assert()
        .success()
        .stdout(predicate::eq("ntp server 10.0.0.1\n"));
}
