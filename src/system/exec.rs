//! Structured process execution
//!
//! An [`Invocation`] is a program plus an argument vector; nothing is ever
//! passed through a local shell. The [`CommandRunner`] executes invocations,
//! or in dry-run mode narrates the mutating ones instead of running them.

use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use zeroize::Zeroizing;

use crate::display::progress::Narrator;
use crate::error::{ZborgError, ZborgResult};

/// One external program call
pub struct Invocation {
    program: String,
    args: Vec<String>,
    envs: Vec<(String, Zeroizing<String>)>,
    current_dir: Option<PathBuf>,
    read_only: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            envs: Vec::new(),
            current_dir: None,
            read_only: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child only. Values are never
    /// rendered by `Display`.
    pub fn env(mut self, key: impl Into<String>, value: &str) -> Self {
        self.envs.push((key.into(), Zeroizing::new(value.to_string())));
        self
    }

    pub fn current_dir(mut self, dir: &Path) -> Self {
        self.current_dir = Some(dir.to_path_buf());
        self
    }

    /// Mark the call as free of side effects; dry runs still execute it
    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn arg_list(&self) -> &[String] {
        &self.args
    }

    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        for (key, value) in &self.envs {
            command.env(key, value.as_str());
        }
        if let Some(dir) = &self.current_dir {
            command.current_dir(dir);
        }
        command
    }

    fn spawn_error(&self, err: std::io::Error) -> ZborgError {
        ZborgError::Spawn {
            program: self.program.clone(),
            reason: err.to_string(),
        }
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || c == '\'') {
                write!(f, " {:?}", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        if let Some(dir) = &self.current_dir {
            write!(f, " (in {})", dir.display())?;
        }
        Ok(())
    }
}

/// Captured result of a finished program
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` if the program was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit status in words, for error messages
    pub fn status_text(&self) -> String {
        match self.code {
            Some(code) => format!("exit status {}", code),
            None => "termination by signal".to_string(),
        }
    }
}

/// Runs invocations, honouring dry-run mode
#[derive(Debug, Clone, Copy)]
pub struct CommandRunner {
    dry_run: bool,
    narrator: Narrator,
}

impl CommandRunner {
    pub fn new(dry_run: bool, narrator: Narrator) -> Self {
        Self { dry_run, narrator }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn narrator(&self) -> Narrator {
        self.narrator
    }

    /// Run and capture output without judging the exit status
    pub fn output(&self, invocation: &Invocation) -> ZborgResult<CommandOutput> {
        if self.skip(invocation) {
            return Ok(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            });
        }

        let output = invocation
            .to_command()
            .stdin(Stdio::null())
            .output()
            .map_err(|e| invocation.spawn_error(e))?;

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }

    /// Run, capture output, and fail unless the program exited with 0
    pub fn run(&self, invocation: &Invocation) -> ZborgResult<CommandOutput> {
        let output = self.output(invocation)?;
        if !output.success() {
            return Err(ZborgError::command_failed(
                invocation.to_string(),
                output.status_text(),
                output.stderr.trim(),
            ));
        }
        Ok(output)
    }

    /// Run with the operator's terminal attached, failing on non-zero exit
    ///
    /// Used for the archive tool, whose progress and statistics are meant
    /// to be read by the operator.
    pub fn run_attached(&self, invocation: &Invocation) -> ZborgResult<()> {
        if self.skip(invocation) {
            return Ok(());
        }

        let status = invocation
            .to_command()
            .stdin(Stdio::null())
            .status()
            .map_err(|e| invocation.spawn_error(e))?;

        if !status.success() {
            return Err(ZborgError::command_failed(
                invocation.to_string(),
                status.to_string(),
                "see output above",
            ));
        }
        Ok(())
    }

    fn skip(&self, invocation: &Invocation) -> bool {
        if self.dry_run && !invocation.is_read_only() {
            self.narrator.step(&format!("would run: {}", invocation));
            return true;
        }
        false
    }
}
