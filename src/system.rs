use thiserror::Error;
use tokio::process::Command;
use tokio::time::{Duration, timeout};

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub stderr: String,
    pub status: i32,
}

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command line")]
    Empty,
    #[error("command timed out after {timeout_secs}s: {cmd}")]
    Timeout { cmd: String, timeout_secs: u64 },
    #[error("failed to execute command {cmd}: {source}")]
    Io { cmd: String, source: std::io::Error },
}

pub async fn run_cmd(argv: &[String], timeout_secs: u64) -> Result<CommandOutput, CommandError> {
    let (cmd, args) = argv.split_first().ok_or(CommandError::Empty)?;
    let mut child = Command::new(cmd);
    child.args(args).kill_on_drop(true);

    let output = timeout(Duration::from_secs(timeout_secs), child.output())
        .await
        .map_err(|_| CommandError::Timeout {
            cmd: cmd.to_string(),
            timeout_secs,
        })?
        .map_err(|source| CommandError::Io {
            cmd: cmd.to_string(),
            source,
        })?;

    Ok(CommandOutput {
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        status: output.status.code().unwrap_or(-1),
    })
}

/// Substitutes `{name}` placeholders in every argument.
pub fn expand_args(template: &[String], replacements: &[(&str, &str)]) -> Vec<String> {
    template
        .iter()
        .map(|arg| {
            replacements
                .iter()
                .fold(arg.clone(), |acc, (name, value)| {
                    acc.replace(&format!("{{{}}}", name), value)
                })
        })
        .collect()
}
