use std::process::ExitStatus;

use thiserror::Error;

/// Failure to obtain output from the remote extraction command.
#[derive(Debug, Error)]
pub enum RemoteExecutionError {
    #[error("failed to spawn ssh: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("remote command exited with {status}: {stderr}")]
    NonZeroExit { status: ExitStatus, stderr: String },
}

/// Errors raised while sweeping server names.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("remote execution failed: {0}")]
    RemoteExecution(#[from] RemoteExecutionError),

    #[error("probe of {url} failed: {source}")]
    Probe {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("received non-200 response code: {status}")]
    Notification { status: u16, body: String },

    #[error("http request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type CheckResult<T> = Result<T, CheckError>;
