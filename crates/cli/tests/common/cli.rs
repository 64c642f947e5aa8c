//! CLI command execution helpers
//!
//! Wraps the `stepprune` binary with stdin support, an isolated config
//! directory and convenient assertion methods.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

/// CLI command builder
pub struct SpCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    stdin_data: Option<String>,
}

impl SpCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        let working_dir = working_dir.as_ref().to_path_buf();

        // Keep the user's real config out of the way
        let mut env = HashMap::new();
        let config_home = working_dir.join(".config-home");
        env.insert("XDG_CONFIG_HOME".to_string(), config_home.display().to_string());
        env.insert("HOME".to_string(), config_home.display().to_string());

        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_stepprune")),
            working_dir,
            args: Vec::new(),
            env,
            stdin_data: None,
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Provide stdin data
    pub fn stdin(&mut self, data: &str) -> &mut Self {
        self.stdin_data = Some(data.to_string());
        self
    }

    /// Execute command and capture its output
    pub fn execute(&self) -> Result<CommandResult> {
        let mut command = Command::new(&self.binary_path);
        command
            .args(&self.args)
            .current_dir(&self.working_dir)
            .env_remove("STEPPRUNE_CONFIG")
            .envs(&self.env)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = command.spawn().context("Failed to spawn stepprune")?;

        // Dropping stdin without data gives the prompt an immediate EOF
        if let Some(mut stdin) = child.stdin.take() {
            if let Some(data) = &self.stdin_data {
                stdin.write_all(data.as_bytes())?;
            }
        }

        let output = child
            .wait_with_output()
            .context("Failed to wait for stepprune")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Command execution result
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// Path printed after "Cleanup plan saved to: "
    pub fn log_path(&self) -> Option<PathBuf> {
        self.stdout
            .lines()
            .find_map(|line| line.strip_prefix("Cleanup plan saved to: "))
            .map(|path| PathBuf::from(path.trim()))
    }

    /// File names printed as "Deleted: <name>"
    ///
    /// The first one may share a line with the confirmation prompt, since
    /// piped stdin is not echoed.
    pub fn deleted_names(&self) -> Vec<String> {
        self.stdout
            .lines()
            .filter_map(|line| line.rsplit_once("Deleted: "))
            .map(|(_, name)| name.to_string())
            .collect()
    }
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// sp!(dir, "--model_dir", run_dir, "--dry_run").assert_success()?;
/// sp!(dir, "--model_dir", run_dir).stdin("yes\n").assert_success()?;
/// ```
#[macro_export]
macro_rules! sp {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::SpCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}
