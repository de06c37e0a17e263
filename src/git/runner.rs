//! External command execution for git queries.
//!
//! The resolver only talks to git through [`CommandRunner`], so it can be
//! driven by [`SystemRunner`] in production and [`ScriptedRunner`] in tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of running an external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code (None if killed by signal).
    pub exit_code: Option<i32>,
    /// Standard output with trailing newlines removed.
    pub stdout: String,
    /// Standard error with trailing newlines removed.
    pub stderr: String,
}

impl CommandOutput {
    /// A successful run with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed run with the given exit code and stderr.
    pub fn failure(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stdout: String::new(),
            stderr: stderr.into(),
        }
    }

    /// Whether the command exited with status 0.
    pub fn succeeded(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Capability to locate and run external programs.
pub trait CommandRunner {
    /// Whether `program` can be found on the search path.
    fn is_available(&self, program: &str) -> bool;

    /// Run `program` with `args` to completion, capturing its output.
    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<CommandOutput>;
}

/// Runs real processes, optionally in a fixed working directory.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    cwd: Option<PathBuf>,
    env: HashMap<String, String>,
}

impl SystemRunner {
    /// Run commands in the current directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Run commands in `dir`.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            cwd: Some(dir.into()),
            env: HashMap::new(),
        }
    }

    /// Set an extra environment variable for spawned commands.
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    /// The working directory commands run in, if overridden.
    pub fn cwd(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }
}

impl CommandRunner for SystemRunner {
    fn is_available(&self, program: &str) -> bool {
        resolve_tool_path(&executable_name(program), &parse_system_path()).is_some()
    }

    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<CommandOutput> {
        let mut cmd = Command::new(program);
        cmd.args(args);

        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }

        for (key, value) in &self.env {
            cmd.env(key, value);
        }

        let output = cmd.output()?;

        Ok(CommandOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout)
                .trim_end_matches(['\n', '\r'])
                .to_string(),
            stderr: String::from_utf8_lossy(&output.stderr)
                .trim_end_matches(['\n', '\r'])
                .to_string(),
        })
    }
}

/// Platform-specific executable file name for `program`.
pub fn executable_name(program: &str) -> String {
    if cfg!(target_os = "windows") {
        format!("{}.exe", program)
    } else {
        program.to_string()
    }
}

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(_path: &Path) -> bool {
    true
}

/// Resolve a tool's binary path by iterating over PATH entries.
///
/// Returns the first match that exists and is executable.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    path_entries
        .iter()
        .map(|dir| dir.join(tool))
        .find(|candidate| candidate.is_file() && is_executable(candidate))
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Replays scripted command output.
///
/// Each response is keyed by program and exact argument list. Commands with
/// no scripted response fail with exit code 128, the way git does for bad
/// queries. Every invocation is recorded for later assertion.
///
/// # Example
///
/// ```
/// use waldo::git::{CommandOutput, CommandRunner, ScriptedRunner};
///
/// let runner = ScriptedRunner::new()
///     .respond("git", &["rev-parse"], CommandOutput::success(""));
///
/// assert!(runner.run("git", &["rev-parse"]).unwrap().succeeded());
/// assert!(!runner.run("git", &["status"]).unwrap().succeeded());
/// assert_eq!(runner.calls().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    available: bool,
    responses: HashMap<(String, Vec<String>), CommandOutput>,
    calls: RefCell<Vec<Vec<String>>>,
}

impl ScriptedRunner {
    /// A runner on which every program is available.
    pub fn new() -> Self {
        Self {
            available: true,
            ..Default::default()
        }
    }

    /// A runner on which no program can be found.
    pub fn without_programs() -> Self {
        Self {
            available: false,
            ..Default::default()
        }
    }

    /// Script the output for one exact invocation.
    pub fn respond(mut self, program: &str, args: &[&str], output: CommandOutput) -> Self {
        let key = (
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        );
        self.responses.insert(key, output);
        self
    }

    /// Every invocation so far, as `[program, args...]`.
    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.borrow().clone()
    }

    /// Whether any invocation had `arg` as its first argument.
    pub fn was_called_with(&self, arg: &str) -> bool {
        self.calls
            .borrow()
            .iter()
            .any(|call| call.get(1).map(String::as_str) == Some(arg))
    }
}

impl CommandRunner for ScriptedRunner {
    fn is_available(&self, _program: &str) -> bool {
        self.available
    }

    fn run(&self, program: &str, args: &[&str]) -> std::io::Result<CommandOutput> {
        let mut call = vec![program.to_string()];
        call.extend(args.iter().map(|a| a.to_string()));
        self.calls.borrow_mut().push(call);

        if !self.available {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{} not found", program),
            ));
        }

        let key = (
            program.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        );
        Ok(self
            .responses
            .get(&key)
            .cloned()
            .unwrap_or_else(|| CommandOutput::failure(128, "fatal: unscripted command")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn command_output_success() {
        let output = CommandOutput::success("abc");
        assert!(output.succeeded());
        assert_eq!(output.stdout, "abc");
    }

    #[test]
    fn command_output_failure() {
        let output = CommandOutput::failure(128, "fatal");
        assert!(!output.succeeded());
        assert_eq!(output.exit_code, Some(128));
        assert_eq!(output.stderr, "fatal");
    }

    #[cfg(unix)]
    #[test]
    fn executable_name_is_bare_on_unix() {
        assert_eq!(executable_name("git"), "git");
    }

    #[test]
    fn resolve_tool_path_finds_nothing_in_empty_path() {
        assert!(resolve_tool_path("git", &[]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_requires_executable_bit() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let tool = temp.path().join("faketool");
        std::fs::write(&tool, "#!/bin/sh\n").unwrap();

        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o644)).unwrap();
        assert!(resolve_tool_path("faketool", &[temp.path().to_path_buf()]).is_none());

        std::fs::set_permissions(&tool, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert_eq!(
            resolve_tool_path("faketool", &[temp.path().to_path_buf()]),
            Some(tool)
        );
    }

    #[test]
    fn resolve_tool_path_skips_directories() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir(temp.path().join("git")).unwrap();
        assert!(resolve_tool_path("git", &[temp.path().to_path_buf()]).is_none());
    }

    #[test]
    fn system_runner_in_dir() {
        let runner = SystemRunner::in_dir("/tmp");
        assert_eq!(runner.cwd(), Some(Path::new("/tmp")));
        assert!(SystemRunner::new().cwd().is_none());
    }

    #[test]
    fn system_runner_missing_program_is_io_error() {
        let runner = SystemRunner::new();
        assert!(runner.run("this-command-does-not-exist-12345", &[]).is_err());
        assert!(!runner.is_available("this-command-does-not-exist-12345"));
    }

    #[test]
    fn scripted_runner_replays_exact_args() {
        let runner = ScriptedRunner::new().respond(
            "git",
            &["log", "-1"],
            CommandOutput::success("deadbeef"),
        );

        let hit = runner.run("git", &["log", "-1"]).unwrap();
        assert_eq!(hit.stdout, "deadbeef");

        let miss = runner.run("git", &["log", "-2"]).unwrap();
        assert_eq!(miss.exit_code, Some(128));
        assert!(runner.was_called_with("log"));
        assert!(!runner.was_called_with("status"));
    }

    #[test]
    fn scripted_runner_without_programs() {
        let runner = ScriptedRunner::without_programs();
        assert!(!runner.is_available("git"));
        assert!(runner.run("git", &["rev-parse"]).is_err());
    }
}
