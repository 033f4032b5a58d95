//! Remote sources for `INCLUDE http...` directives.

use std::collections::HashMap;
use std::time::Duration;

use crate::{wlog_debug, Error, Result};

/// Fetches the body of a URL.
pub trait UrlFetcher {
    fn fetch(&self, url: &str) -> Result<String>;
}

/// Blocking HTTP GET. A render waits for the response; the only bound on
/// that wait is the optional timeout given at construction.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        // reqwest's blocking client defaults to a 30s timeout; `None` lifts it.
        builder = builder.timeout(timeout);
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl UrlFetcher for HttpFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        wlog_debug!("HttpFetcher::fetch url={}", url);
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                reason: format!("HTTP {}", status),
            });
        }
        Ok(response.text()?)
    }
}

/// Serves fixed bodies from memory; any other URL fails.
///
/// Used for offline renders, where every remote include degrades inline.
#[derive(Debug, Default, Clone)]
pub struct StaticFetcher {
    bodies: HashMap<String, String>,
}

impl StaticFetcher {
    pub fn with_body(mut self, url: &str, body: &str) -> Self {
        self.bodies.insert(url.to_string(), body.to_string());
        self
    }
}

impl UrlFetcher for StaticFetcher {
    fn fetch(&self, url: &str) -> Result<String> {
        self.bodies.get(url).cloned().ok_or_else(|| Error::Fetch {
            url: url.to_string(),
            reason: "offline".to_string(),
        })
    }
}
