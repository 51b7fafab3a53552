use std::path::PathBuf;
use std::time::Duration;

use crate::error::{CheckError, CheckResult};
use crate::names::RemoteSource;
use crate::notifier::PLACEHOLDER;
use crate::prober::DEFAULT_PROBE_USER_AGENT;
use crate::report::DEFAULT_BATCH_SIZE;

/// Probe request settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeSettings {
    pub user_agent: String,
    pub timeout: Option<Duration>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_PROBE_USER_AGENT.to_string(),
            timeout: None,
        }
    }
}

/// Notification delivery settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotifySettings {
    pub template: String,
    pub client_id: String,
    pub batch_size: usize,
    pub dry_run: bool,
    pub alert_on_source_failure: bool,
}

/// Everything one sweep needs, resolved once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub remote: RemoteSource,
    pub probe: ProbeSettings,
    pub notify: NotifySettings,
    pub output: Option<PathBuf>,
}

impl Config {
    /// Check cross-field constraints the argument parser cannot express.
    pub fn validate(self) -> CheckResult<Self> {
        if !self.notify.template.contains(PLACEHOLDER) {
            return Err(CheckError::Config(format!(
                "push template must contain {PLACEHOLDER}"
            )));
        }
        if self.notify.batch_size == 0 {
            return Err(CheckError::Config("batch size must be at least 1".into()));
        }
        for (field, value) in [
            ("ssh host", &self.remote.host),
            ("ssh user", &self.remote.user),
            ("config path", &self.remote.config_path),
        ] {
            if value.trim().is_empty() {
                return Err(CheckError::Config(format!("{field} is empty")));
            }
        }
        Ok(self)
    }
}

pub fn default_client_id() -> String {
    format!("{}/{}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"))
}

pub fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            remote: RemoteSource {
                host: "web1".into(),
                user: "ops".into(),
                private_key_file: PathBuf::from("/k"),
                config_path: "/etc/nginx".into(),
            },
            probe: ProbeSettings::default(),
            notify: NotifySettings {
                template: "https://push.example/?m=%s".into(),
                client_id: default_client_id(),
                batch_size: default_batch_size(),
                dry_run: false,
                alert_on_source_failure: false,
            },
            output: None,
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(config().validate().is_ok());
    }

    #[test]
    fn rejects_missing_placeholder_and_zero_batch() {
        let mut c = config();
        c.notify.template = "https://push.example/".into();
        assert!(c.validate().is_err());

        let mut c = config();
        c.notify.batch_size = 0;
        assert!(c.validate().is_err());

        let mut c = config();
        c.remote.host = " ".into();
        assert!(c.validate().is_err());
    }

    #[test]
    fn client_id_names_crate() {
        assert!(default_client_id().starts_with("vhost-sweep/"));
    }
}
