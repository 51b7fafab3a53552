use std::path::PathBuf;
use std::time::Duration;

use vhost_sweep::checker::Checker;
use vhost_sweep::config::{default_batch_size, default_client_id, Config, NotifySettings, ProbeSettings};
use vhost_sweep::error::CheckError;
use vhost_sweep::names::{RemoteSource, SshExecutor};
use vhost_sweep::prober::DEFAULT_PROBE_USER_AGENT;
use vhost_sweep::report::write_report_json;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// vhost-sweep: check every virtual host of a remote web server and push the report.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "vhost-sweep",
    version,
    about = "Pull server names over ssh, probe them over HTTP/HTTPS and push the results.",
    long_about = None
)]
struct Cli {
    /// Host holding the web-server configuration.
    #[arg(long, env = "SSH_HOST")]
    ssh_host: String,

    /// Remote user to log in as.
    #[arg(long, env = "SSH_USER")]
    ssh_user: String,

    /// Private key passed to `ssh -i`.
    #[arg(long, env = "PRIVATE_KEY_FILE")]
    private_key_file: PathBuf,

    /// Remote file or directory searched for `server_name` directives.
    #[arg(long, env = "CONFIG_PATH")]
    config_path: String,

    /// Notification URL; `%s` is replaced by the escaped message.
    #[arg(long, env = "PUSH_TEMPlATE")]
    push_template: String,

    /// Lines per notification message.
    #[arg(long, default_value_t = default_batch_size())]
    batch_size: usize,

    /// User-Agent sent with probe requests.
    #[arg(long, default_value = DEFAULT_PROBE_USER_AGENT)]
    probe_user_agent: String,

    /// User-Agent sent with notification requests.
    #[arg(long, default_value_t = default_client_id())]
    client_id: String,

    /// Per-request probe timeout in milliseconds (transport default if omitted).
    #[arg(long = "timeout-ms")]
    timeout_ms: Option<u64>,

    /// Print batches instead of sending them.
    #[arg(long, default_value_t = false)]
    dry_run: bool,

    /// Write the run report as pretty JSON to this path (optional).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Send a notification when the server name list cannot be fetched.
    #[arg(long, default_value_t = false)]
    alert_on_source_failure: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config, CheckError> {
        Config {
            remote: RemoteSource {
                host: self.ssh_host,
                user: self.ssh_user,
                private_key_file: self.private_key_file,
                config_path: self.config_path,
            },
            probe: ProbeSettings {
                user_agent: self.probe_user_agent,
                timeout: self.timeout_ms.map(Duration::from_millis),
            },
            notify: NotifySettings {
                template: self.push_template,
                client_id: self.client_id,
                batch_size: self.batch_size,
                dry_run: self.dry_run,
                alert_on_source_failure: self.alert_on_source_failure,
            },
            output: self.output,
        }
        .validate()
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Cli::parse().into_config()?;
    info!(
        host = %config.remote.host,
        config_path = %config.remote.config_path,
        batch_size = config.notify.batch_size,
        dry_run = config.notify.dry_run,
        "starting sweep"
    );

    let output = config.output.clone();
    let checker = Checker::new(config, SshExecutor).context("failed to build HTTP clients")?;

    let report = match checker.run().await {
        Ok(report) => report,
        Err(e) => {
            // Nothing to check without names; the run still ends normally.
            error!("Error getting server names: {e}");
            return Ok(());
        }
    };
    info!(
        names = report.names_checked,
        lines = report.lines,
        sent = report.batches_sent,
        failed = report.batches_failed,
        "sweep finished"
    );

    if let Some(path) = output.as_deref() {
        if let Err(e) = write_report_json(path, &report) {
            error!("Failed to write JSON to {}: {}", path.display(), e);
        } else {
            info!("Wrote JSON report to {}", path.display());
        }
    }

    Ok(())
}
