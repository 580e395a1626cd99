use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::OnceLock;

static BUILD_MCTL: OnceLock<Result<(), String>> = OnceLock::new();

/// Endpoint nothing listens on; any request against it fails with a transport error.
pub const UNREACHABLE_ENDPOINT: &str = "http://127.0.0.1:9";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub command_line: String,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl RunResult {
    #[must_use]
    pub fn transcript(&self) -> String {
        format!(
            "$ {}\n[exit: {}]\n[stdout]\n{}[stderr]\n{}",
            self.command_line, self.exit_code, self.stdout, self.stderr
        )
    }
}

/// Run `mctl` as an external process.
///
/// Connection settings are cleared from the environment and the config file
/// is pointed at `config` so host configuration never leaks into a run.
///
/// # Errors
///
/// Returns an error if building/running the `mctl` binary fails.
pub fn run_mctl(args: &[&str], config: &Path) -> Result<RunResult, String> {
    ensure_mctl_built()?;
    let bin = mctl_bin()?;

    let mut command = Command::new(bin);
    command.env_remove("MCTL_ENDPOINT");
    command.env_remove("MCTL_TOKEN");
    command.env_remove("RUST_LOG");
    command.env("MCTL_CONFIG", config);
    command.args(args);

    let mut command_parts = vec!["mctl".to_string()];
    command_parts.extend(args.iter().map(|arg| (*arg).to_string()));

    let output = command
        .output()
        .map_err(|error| format!("failed to run mctl: {error}"))?;

    Ok(RunResult {
        command_line: command_parts.join(" "),
        exit_code: output.status.code().unwrap_or(1),
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    })
}

/// Write a text file, creating parent directories if needed.
///
/// # Errors
///
/// Returns an error if directories or file contents cannot be written.
pub fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)
}

fn ensure_mctl_built() -> Result<(), String> {
    match BUILD_MCTL.get_or_init(|| {
        let status = Command::new("cargo")
            .arg("build")
            .arg("-q")
            .arg("-p")
            .arg("mctl")
            .status()
            .map_err(|error| format!("failed to build mctl binary: {error}"))?;

        if status.success() {
            Ok(())
        } else {
            Err(format!(
                "failed to build mctl binary: cargo exited with status {status}"
            ))
        }
    }) {
        Ok(()) => Ok(()),
        Err(error) => Err(error.clone()),
    }
}

fn mctl_bin() -> Result<PathBuf, String> {
    let mut path = std::env::current_exe()
        .map_err(|error| format!("failed to determine current executable: {error}"))?;
    if !path.pop() {
        return Err("failed to resolve test executable directory".to_string());
    }
    if path.ends_with("deps") {
        let _ = path.pop();
    }
    Ok(path.join(format!("mctl{}", std::env::consts::EXE_SUFFIX)))
}
