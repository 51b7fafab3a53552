use std::fmt;

use serde::{Deserialize, Serialize};

/// URL scheme a server name is probed on. Probes run in declaration order.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub const ALL: [Scheme; 2] = [Scheme::Http, Scheme::Https];

    pub fn as_str(self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }

    /// Build the probe URL for `name`, e.g. `https://example.org`.
    pub fn url_for(self, name: &str) -> String {
        format!("{}://{}", self.as_str(), name)
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of probing one server name on one scheme.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ProbeResult {
    pub server_name: String,
    pub scheme: Scheme,
    /// `None` when no response was received.
    pub status: Option<u16>,
    pub error: Option<String>,
}

/// Summary of one sweep, written out with `--output`.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct RunReport {
    pub date: String,
    pub names_checked: u64,
    pub lines: u64,
    pub batches_sent: u64,
    pub batches_failed: u64,
    pub results: Vec<ProbeResult>,
}
