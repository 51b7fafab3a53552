use std::io::Write;

use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::{CheckError, CheckResult};
use crate::names::{fetch_server_names, RemoteExecutor};
use crate::notifier::Notifier;
use crate::prober::Prober;
use crate::report::{banner, chunk, report_lines, today};
use crate::types::{ProbeResult, RunReport, Scheme};

/// Drives one sweep: fetch names, probe, format, chunk, push.
pub struct Checker<E> {
    config: Config,
    executor: E,
    prober: Prober,
    notifier: Notifier,
}

impl<E: RemoteExecutor> Checker<E> {
    pub fn new(config: Config, executor: E) -> CheckResult<Self> {
        let prober = Prober::new(&config.probe.user_agent, config.probe.timeout)?;
        let notifier = Notifier::new(config.notify.template.clone(), &config.notify.client_id)?;
        Ok(Self {
            config,
            executor,
            prober,
            notifier,
        })
    }

    /// Run the whole pipeline once.
    ///
    /// Only a name source failure is returned as an error. Probe and
    /// notification failures are logged and counted in the report.
    pub async fn run(&self) -> CheckResult<RunReport> {
        let date = today();
        let names = match fetch_server_names(&self.executor, &self.config.remote).await {
            Ok(names) => names,
            Err(e) => {
                if self.config.notify.alert_on_source_failure {
                    self.alert_source_failure(&e, banner(date)).await;
                }
                return Err(e);
            }
        };
        info!(count = names.len(), "fetched server names");

        let results = self.probe_all(&names).await;
        let lines = report_lines(date, &results);
        println!("\n\n\n==============\n\n\n");

        let mut report = RunReport {
            date: date.to_string(),
            names_checked: names.len() as u64,
            lines: lines.len() as u64,
            results,
            ..RunReport::default()
        };
        self.push(&lines, &mut report).await;
        Ok(report)
    }

    /// Probe every name over HTTP then HTTPS, in the order given.
    pub async fn probe_all(&self, names: &[String]) -> Vec<ProbeResult> {
        let total = names.len();
        let mut results = Vec::with_capacity(total * Scheme::ALL.len());
        for (idx, name) in names.iter().enumerate() {
            print!("Checking {}/{} {}...\r", idx + 1, total, name);
            let _ = std::io::stdout().flush();

            for scheme in Scheme::ALL {
                let result = self.prober.probe(name, scheme).await;
                if let Some(err) = result.error.as_deref() {
                    warn!(server = %name, %scheme, error = %err, "no response");
                }
                results.push(result);
            }
        }
        results
    }

    /// Chunk `lines` and deliver each batch in order, continuing past failures.
    pub async fn push(&self, lines: &[String], report: &mut RunReport) {
        for (idx, batch) in chunk(lines, self.config.notify.batch_size)
            .into_iter()
            .enumerate()
        {
            if self.config.notify.dry_run {
                println!("Batch {}:\n{}", idx + 1, batch.concat());
                continue;
            }
            match self.notifier.send(&batch).await {
                Ok(body) => {
                    report.batches_sent += 1;
                    println!("Result: {body}");
                }
                Err(e) => {
                    report.batches_failed += 1;
                    if let CheckError::Notification { body, .. } = &e {
                        error!(batch = idx + 1, error = %e, %body, "failed to send batch");
                    } else {
                        error!(batch = idx + 1, error = %e, "failed to send batch");
                    }
                }
            }
        }
    }

    async fn alert_source_failure(&self, err: &CheckError, banner: String) {
        let batch = [banner, format!("name source failed: {err}\n")];
        if self.config.notify.dry_run {
            println!("Alert:\n{}", batch.concat());
            return;
        }
        if let Err(e) = self.notifier.send(&batch).await {
            error!(error = %e, "failed to send name source alert");
        }
    }
}
