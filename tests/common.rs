#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Binary under test with an isolated config home, so a developer's own
/// `rworkforce.conf` never leaks into the run.
pub fn rwf() -> Command {
    let mut cmd = cargo_bin_cmd!("rworkforce");
    cmd.env("RWORKFORCE_HOME", test_home());
    cmd.env_remove("RWORKFORCE_LLM_API_KEY");
    cmd.env_remove("SENDGRID_API_KEY");
    cmd
}

pub fn test_home() -> PathBuf {
    let mut path = env::temp_dir();
    path.push("rworkforce_test_home");
    fs::create_dir_all(&path).ok();
    path
}

/// A config home of its own holding `rworkforce.conf` with `yaml`.
/// Pass it with `.env("RWORKFORCE_HOME", ..)` after `rwf()`.
pub fn config_home(name: &str, yaml: &str) -> PathBuf {
    let mut path = env::temp_dir();
    path.push(format!("rworkforce_home_{}", name));
    fs::create_dir_all(&path).expect("create config home");
    fs::write(path.join("rworkforce.conf"), yaml).expect("write config");
    path
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rworkforce.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Write `content` to a temp file and return its path.
pub fn temp_file(name: &str, content: &str) -> String {
    let p = temp_out(name, "json");
    fs::write(&p, content).expect("write temp file");
    p
}

/// Initialize the DB (default organization #1) and add two employees:
/// #1 Ann (member) and #2 Bob (manager).
pub fn init_db_with_staff(db_path: &str) {
    rwf()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    rwf()
        .args([
            "--db",
            db_path,
            "employee",
            "add",
            "Ann",
            "--email",
            "ann@example.com",
        ])
        .assert()
        .success();

    rwf()
        .args([
            "--db",
            db_path,
            "employee",
            "add",
            "Bob",
            "--email",
            "bob@example.com",
            "--role",
            "manager",
        ])
        .assert()
        .success();
}
