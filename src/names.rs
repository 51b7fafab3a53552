use std::collections::HashSet;
use std::future::Future;
use std::path::PathBuf;

use tokio::process::Command;
use tracing::debug;

use crate::error::{CheckResult, RemoteExecutionError};

/// Where the web-server configuration lives and how to reach it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteSource {
    pub host: String,
    pub user: String,
    pub private_key_file: PathBuf,
    pub config_path: String,
}

impl RemoteSource {
    /// Shell pipeline run on the remote host: every `server_name` token under
    /// `config_path`, case-insensitive, deduplicated and sorted.
    pub fn extraction_command(&self) -> String {
        format!(
            "grep -hri -Poe 'server_name \\K[^; ]+' {} | sort -u",
            self.config_path
        )
    }

    /// `user@host` destination argument for ssh.
    pub fn destination(&self) -> String {
        format!("{}@{}", self.user, self.host)
    }
}

/// Runs one command on a remote host and returns its standard output.
pub trait RemoteExecutor {
    fn execute(
        &self,
        source: &RemoteSource,
        command: &str,
    ) -> impl Future<Output = CheckResult<String>> + Send;
}

/// Executes remote commands through the system `ssh` client, which owns
/// authentication and host key handling.
#[derive(Debug, Clone, Default)]
pub struct SshExecutor;

impl RemoteExecutor for SshExecutor {
    async fn execute(&self, source: &RemoteSource, command: &str) -> CheckResult<String> {
        let mut cmd = Command::new("ssh");
        cmd.arg("-i")
            .arg(&source.private_key_file)
            .arg(source.destination())
            .arg(command)
            .kill_on_drop(true);

        debug!(destination = %source.destination(), "running remote extraction command");

        let output = cmd.output().await.map_err(RemoteExecutionError::Spawn)?;
        if !output.status.success() {
            return Err(RemoteExecutionError::NonZeroExit {
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// Parse newline-delimited command output into distinct server names.
///
/// The remote `sort -u` decides the order; it is kept as printed. Surrounding
/// whitespace is trimmed, blank lines are ignored and only the first
/// occurrence of a repeated name is kept.
pub fn parse_server_names(output: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && seen.insert(*line))
        .map(str::to_owned)
        .collect()
}

/// Run the extraction command through `executor` and parse the names it prints.
pub async fn fetch_server_names<E: RemoteExecutor>(
    executor: &E,
    source: &RemoteSource,
) -> CheckResult<Vec<String>> {
    let output = executor
        .execute(source, &source.extraction_command())
        .await?;
    Ok(parse_server_names(&output))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> RemoteSource {
        RemoteSource {
            host: "web1.internal".into(),
            user: "deploy".into(),
            private_key_file: PathBuf::from("/keys/id_ed25519"),
            config_path: "/etc/nginx/sites-enabled".into(),
        }
    }

    #[test]
    fn extraction_command_targets_config_path() {
        assert_eq!(
            source().extraction_command(),
            "grep -hri -Poe 'server_name \\K[^; ]+' /etc/nginx/sites-enabled | sort -u"
        );
        assert_eq!(source().destination(), "deploy@web1.internal");
    }

    #[test]
    fn parse_dedups_and_skips_blanks() {
        let names = parse_server_names("b.com\n\n  a.com \r\nb.com\n");
        assert_eq!(names, vec!["b.com", "a.com"]);
        assert!(parse_server_names("").is_empty());
    }

    #[test]
    fn parse_keeps_remote_locale_order() {
        // `sort -u` under a UTF-8 locale folds case; byte order would put `B` first.
        let names = parse_server_names("a.example.com\nB.example.com\nc.example.com\n");
        assert_eq!(names, vec!["a.example.com", "B.example.com", "c.example.com"]);
    }
}
