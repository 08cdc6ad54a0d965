//! Outbound HTTP client.

use std::time::Duration;

use reqwest::redirect::Policy;

use crate::config::TimeoutConfig;

/// Redirect hops followed before the exchange is treated as failed.
pub const MAX_REDIRECTS: usize = 10;

/// Build the single process-wide upstream client.
///
/// Connection pooling is reqwest's default. Proxy environment variables are
/// ignored since the upstreams are addressed directly.
pub fn build_client(timeouts: &TimeoutConfig) -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(timeouts.connect_secs))
        .timeout(Duration::from_secs(timeouts.upstream_secs))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .no_proxy()
        .build()
}
