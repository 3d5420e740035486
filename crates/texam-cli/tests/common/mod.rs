//! Shared test harness for texam-cli integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::process::Command;

/// Captured output from running a command.
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

/// Run the texam binary in `dir` with the given arguments.
pub fn texam(dir: &Path, args: &[&str]) -> CommandResult {
    let output = Command::new(env!("CARGO_BIN_EXE_texam"))
        .args(args)
        .current_dir(dir)
        .env("HOSTNAME", "lab-01")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run texam");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(128),
    }
}

/// Run texam and assert it succeeded. Returns stdout.
pub fn texam_ok(dir: &Path, args: &[&str]) -> String {
    let result = texam(dir, args);
    assert_eq!(
        result.exit_code, 0,
        "texam {:?} failed\nstdout: {}\nstderr: {}",
        args, result.stdout, result.stderr
    );
    result.stdout
}

/// Initialize a repository in `dir` with fixed credentials.
pub fn init_repo(dir: &Path) {
    texam_ok(dir, &["init", "-q", "-u", "20231234", "-p", "secret"]);
}

/// Write `content` to `dir/rel`, creating parent directories.
pub fn write_file(dir: &Path, rel: &str, content: &str) {
    let path = dir.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}

/// `a.txt` and `sub/b.txt`, committed for test "final" on host "lab-01".
pub fn setup_committed(dir: &Path) -> String {
    init_repo(dir);
    write_file(dir, "a.txt", "alpha\n");
    write_file(dir, "sub/b.txt", "beta\n");
    texam_ok(dir, &["commit", "-q", "--test", "final"])
        .trim()
        .to_string()
}

pub const A_BLOB: &str = "4a58007052a65fbc2fc3f910f2855f45a4058e74";
pub const B_BLOB: &str = "65b2df87f7df3aeedef04be96703e55ac19c2cfb";
pub const SUB_TREE: &str = "1b3b12c4c31cf483c43f1e3919d8bca635c427bb";
pub const ROOT_TREE: &str = "4dce6553ac48dad036fb38a9fc84a182b21e1a58";
pub const COMMIT: &str = "f790de6c42eeaa64d88afe0e88ac77fc58a85d01";
