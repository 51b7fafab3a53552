use std::time::Duration;

use reqwest::{redirect, Client};
use tracing::debug;

use crate::error::{CheckError, CheckResult};
use crate::types::{ProbeResult, Scheme};

pub const DEFAULT_PROBE_USER_AGENT: &str = "curl/7.68.0";

/// A status is worth reporting when a response arrived and it is not an
/// authentication challenge.
pub fn is_valid_status(code: u16) -> bool {
    code > 0 && code != 401
}

/// Issues HEAD requests without following redirects.
#[derive(Debug, Clone)]
pub struct Prober {
    client: Client,
}

impl Prober {
    /// Build a prober sending `user_agent`. `timeout` of `None` keeps the
    /// transport default.
    pub fn new(user_agent: &str, timeout: Option<Duration>) -> CheckResult<Self> {
        let mut builder = Client::builder()
            .redirect(redirect::Policy::none())
            .user_agent(user_agent);
        if let Some(t) = timeout {
            builder = builder.timeout(t);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Send one HEAD request to `url` and return the status of the first response.
    pub async fn status_code(&self, url: &str) -> CheckResult<u16> {
        let resp = self
            .client
            .head(url)
            .send()
            .await
            .map_err(|source| CheckError::Probe {
                url: url.to_string(),
                source,
            })?;
        Ok(resp.status().as_u16())
    }

    /// Probe `name` on `scheme`. Network errors are folded into the result.
    pub async fn probe(&self, name: &str, scheme: Scheme) -> ProbeResult {
        let url = scheme.url_for(name);
        match self.status_code(&url).await {
            Ok(code) => ProbeResult {
                server_name: name.to_string(),
                scheme,
                status: Some(code),
                error: None,
            },
            Err(e) => {
                debug!(%url, error = %e, "probe failed");
                ProbeResult {
                    server_name: name.to_string(),
                    scheme,
                    status: None,
                    error: Some(e.to_string()),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_status_predicate() {
        assert!(is_valid_status(200));
        assert!(is_valid_status(301));
        assert!(is_valid_status(500));
        assert!(!is_valid_status(401));
        assert!(!is_valid_status(0));
    }
}
