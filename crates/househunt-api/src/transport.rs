//! Builds the one `reqwest::Client` both front ends share.

use std::time::Duration;

use crate::Error;

const USER_AGENT: &str = concat!("househunt/", env!("CARGO_PKG_VERSION"));

/// Knobs applied to every request the client sends.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    pub timeout: Duration,
    pub user_agent: String,
}

impl HttpSettings {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            user_agent: USER_AGENT.to_owned(),
        }
    }

    pub fn client(&self) -> Result<reqwest::Client, Error> {
        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(|e| Error::ClientSetup(e.to_string()))
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}
