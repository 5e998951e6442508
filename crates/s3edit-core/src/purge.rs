//! Edge-cache purge for object paths
//!
//! After a failed write the downstream edge cache may hold a copy that no
//! longer matches the store, so a purge is sent for the object's path. The
//! purge is fire-and-forget with respect to the caller's exit status: the
//! response is awaited, but its outcome only shows up in the logs.

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, warn};

use crate::error::Result;

/// The fixed edge-cache host fronting the bucket's objects
pub const CACHE_HOST: &str = "www.stg.nytimes.com";

/// Static prefix prepended to the object path on the cache
pub const PURGE_PATH_PREFIX: &str = "/interactive";

/// Environment variable supplying the purge API key
pub const API_KEY_ENV: &str = "FASTLY_API_KEY";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Sends header-override purge requests to the edge cache
#[derive(Debug)]
pub struct CachePurger {
    http: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl CachePurger {
    /// Create a purger against the fixed cache host, reading the API key
    /// from the environment
    pub fn new() -> Result<Self> {
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            endpoint: format!("https://{}", CACHE_HOST),
            api_key: std::env::var(API_KEY_ENV).ok(),
        })
    }

    /// Point the purger at a different endpoint (staging and test rigs)
    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.trim_end_matches('/').to_string();
        self
    }

    /// Purge the cached copy of an object path.
    ///
    /// The request carries the provider's header-override purge form: a GET
    /// with `Method: PURGE` plus the API key header. Failures are logged
    /// and swallowed; the caller's exit status never depends on them.
    pub async fn purge(&self, path: &str) {
        let url = self.purge_url(path);
        debug!("purging edge cache: {}", url);

        let mut request = self.http.get(&url).header("Method", "PURGE");
        if let Some(key) = &self.api_key {
            request = request.header("Fastly-Key", key);
        } else {
            warn!("{} is not set, purging without an API key", API_KEY_ENV);
        }

        match request.send().await {
            Ok(response) => debug!("purge for {} returned {}", path, response.status()),
            Err(source) => warn!("cache purge for {} failed: {}", path, source),
        }
    }

    fn purge_url(&self, path: &str) -> String {
        format!("{}{}{}", self.endpoint, PURGE_PATH_PREFIX, path)
    }
}
