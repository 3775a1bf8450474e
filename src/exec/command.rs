// src/exec/command.rs

//! Single command execution with the output capture policy.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tracing::{debug, info};

use crate::exec::output::OutputSink;
use crate::exec::placeholders::substitute_placeholders;
use crate::types::ShellSpec;

/// Environment variable carrying the absolute path that triggered a run.
pub const CHANGED_ENV: &str = "CHANGED";

/// One shell command and how to run it.
///
/// `command` may contain `$N` placeholders; they are substituted per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub command: String,
    pub dir: Option<PathBuf>,
    pub shell: ShellSpec,
}

impl CommandSpec {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            dir: None,
            shell: ShellSpec::default(),
        }
    }

    pub fn with_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dir = dir;
        self
    }

    pub fn with_shell(mut self, shell: ShellSpec) -> Self {
        self.shell = shell;
        self
    }
}

/// Run one command in a fresh shell process and wait for it.
///
/// - `changed` is exported as `CHANGED`; when absent the variable is removed
///   so a value inherited from our own environment can't leak in.
/// - With `show_output`, stdout streams to the sink as it arrives. Without
///   it, stdout is buffered and replayed on the sink's error channel only if
///   the command fails, behind a `sizzle: output of ...` header.
/// - Stderr is always captured and written to the error channel after the
///   command's stdout.
///
/// `Err` means the process could not be spawned or waited on.
pub async fn run_command(
    spec: &CommandSpec,
    args: &[String],
    changed: Option<&Path>,
    show_output: bool,
    sink: &dyn OutputSink,
) -> Result<ExitStatus> {
    let script = substitute_placeholders(&spec.command, args);

    info!(
        cmd = %script,
        shell = spec.shell.program(),
        "starting command"
    );

    let mut cmd = Command::new(spec.shell.program());
    cmd.arg(spec.shell.command_flag()).arg(&script);

    if let Some(dir) = &spec.dir {
        cmd.current_dir(dir);
    }
    match changed {
        Some(path) => {
            cmd.env(CHANGED_ENV, path);
        }
        None => {
            cmd.env_remove(CHANGED_ENV);
        }
    }

    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning `{}` with shell `{}`", script, spec.shell.program()))?;

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    // Drain both pipes while waiting so a chatty child never blocks on a
    // full buffer.
    let (out_buf, err_buf, status) = tokio::try_join!(
        drain(stdout, show_output.then_some(sink)),
        drain(stderr, None),
        child.wait(),
    )
    .with_context(|| format!("waiting for `{}`", script))?;

    debug!(
        cmd = %script,
        exit_code = status.code().unwrap_or(-1),
        success = status.success(),
        "command exited"
    );

    if !status.success() && !show_output && !out_buf.is_empty() {
        sink.stderr(replay_header(&script).as_bytes());
        sink.stderr(&out_buf);
    }
    sink.stderr(&err_buf);

    Ok(status)
}

fn replay_header(script: &str) -> String {
    format!("sizzle: output of `{script}`:\n")
}

/// Read a pipe to the end, forwarding chunks live to `live` if given and
/// buffering them otherwise.
async fn drain<R>(pipe: Option<R>, live: Option<&dyn OutputSink>) -> std::io::Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    let Some(mut pipe) = pipe else {
        return Ok(buf);
    };

    let mut chunk = [0u8; 8192];
    loop {
        let n = pipe.read(&mut chunk).await?;
        if n == 0 {
            break;
        }
        match live {
            Some(sink) => sink.stdout(&chunk[..n]),
            None => buf.extend_from_slice(&chunk[..n]),
        }
    }
    Ok(buf)
}
