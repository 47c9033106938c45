use assert_cmd::cargo_bin;
use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::process::Command;

mod common;

fn dry_run() -> Command {
    let mut cmd = Command::new(cargo_bin!("payroll-disburser"));
    cmd.env_remove("CDP_API_KEY_ID")
        .env_remove("CDP_API_KEY_SECRET")
        .env("RUST_LOG", "info")
        .arg("--dry-run")
        .arg("--pacing-ms")
        .arg("0");
    cmd
}

#[test]
fn test_pay_all_end_to_end() -> Result<(), Box<dyn std::error::Error>> {
    let mut cmd = dry_run();
    cmd.arg("pay").arg("tests/fixtures/employees.csv");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "employeeId,transactionHash,amount,success,error",
        ))
        .stdout(predicate::str::contains(format!(
            "1,{},5000,true,",
            common::dry_run_hash(1)
        )))
        .stdout(predicate::str::contains(format!(
            "2,{},1250.5,true,",
            common::dry_run_hash(2)
        )))
        .stdout(predicate::str::contains(format!(
            "3,{},0.75,true,",
            common::dry_run_hash(3)
        )))
        .stderr(predicate::str::contains("Payroll processed"));

    Ok(())
}

#[test]
fn test_pay_selected_keeps_roster_order() {
    let output = dry_run()
        .arg("pay")
        .arg("tests/fixtures/employees.csv")
        .arg("--ids")
        .arg("3,1")
        .output()
        .expect("Failed to execute command");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    let rows: Vec<&str> = stdout.lines().skip(1).collect();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].starts_with("1,"));
    assert!(rows[1].starts_with("3,"));
}

#[test]
fn test_account_is_printed() {
    dry_run()
        .arg("account")
        .assert()
        .success()
        .stdout(predicate::str::is_match("^0x[0-9a-f]{40}\n$").unwrap());
}

#[test]
fn test_live_mode_requires_credentials() {
    let mut cmd = Command::new(cargo_bin!("payroll-disburser"));
    cmd.env_remove("CDP_API_KEY_ID")
        .env_remove("CDP_API_KEY_SECRET")
        .arg("account");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("CDP_API_KEY_ID"));
}

#[test]
fn test_live_mode_requires_gateway_url() {
    let mut cmd = Command::new(cargo_bin!("payroll-disburser"));
    cmd.env("CDP_API_KEY_ID", "test-key")
        .env("CDP_API_KEY_SECRET", "test-secret")
        .env_remove("PAYROLL_API_URL")
        .arg("account");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("PAYROLL_API_URL must be set"));
}
