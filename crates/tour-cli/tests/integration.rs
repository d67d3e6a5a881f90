#![allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;

fn tour_fn() -> Command {
    let mut cmd = Command::cargo_bin("tour-fn").unwrap();
    cmd.env_remove("SUPABASE_URL")
        .env_remove("SUPABASE_SERVICE_ROLE_KEY");
    cmd
}

#[test]
fn help_lists_commands() {
    tour_fn()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("fix-order-status"))
        .stdout(predicate::str::contains("migrate-credentials"));
}

#[test]
fn fix_order_status_requires_database() {
    tour_fn()
        .arg("fix-order-status")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not configured"));
}

#[test]
fn migrate_credentials_requires_database() {
    tour_fn()
        .arg("migrate-credentials")
        .env("SUPABASE_URL", "https://db.example")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Database not configured"));
}

#[test]
fn unknown_command_fails() {
    tour_fn().arg("deploy").assert().failure();
}
