//! Polite HTTP fetching: robots.txt enforcement, per-host pacing, and
//! conditional requests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, StatusCode, Url};
use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::error::ScraperError;
use crate::robots::RobotsPolicy;

/// Result of one polite GET.
///
/// `body` is `None` when the URL was denied by robots policy or the server
/// answered 304 Not Modified — "nothing new", not an error. On a 304 the
/// passed-in validators are echoed back unchanged.
#[derive(Debug)]
pub struct FetchOutcome {
    pub body: Option<String>,
    pub etag: Option<String>,
    pub last_modified: Option<String>,
}

impl FetchOutcome {
    fn empty() -> Self {
        Self {
            body: None,
            etag: None,
            last_modified: None,
        }
    }
}

/// HTTP fetcher with a per-process robots cache and per-host rate limiting.
///
/// robots.txt is fetched lazily, once per host, at `<scheme>://<host>/robots.txt`;
/// any fetch failure or non-2xx status is treated as an empty policy
/// (allow-all). Requests to the same host are serialized behind a per-host
/// async mutex so the minimum inter-request gap holds even with concurrent
/// callers; requests to different hosts never wait on each other.
pub struct Fetcher {
    client: Client,
    agent: String,
    min_gap: Duration,
    robots: Mutex<HashMap<String, Arc<Mutex<Option<Arc<RobotsPolicy>>>>>>,
    throttle: Mutex<HashMap<String, Arc<Mutex<Option<Instant>>>>>,
}

impl Fetcher {
    /// Creates a `Fetcher` with a bounded connection pool, redirect
    /// following, and the configured User-Agent and timeout.
    ///
    /// `max_rps_per_host` sets the per-host pacing: the minimum gap between
    /// two requests to one host is `1 / max_rps_per_host` seconds.
    ///
    /// # Errors
    ///
    /// Returns [`ScraperError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        timeout_secs: u64,
        user_agent: &str,
        max_rps_per_host: f64,
    ) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .pool_max_idle_per_host(10)
            .redirect(reqwest::redirect::Policy::limited(10))
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            agent: user_agent.to_string(),
            min_gap: Duration::from_secs_f64(1.0 / max_rps_per_host),
            robots: Mutex::new(HashMap::new()),
            throttle: Mutex::new(HashMap::new()),
        })
    }

    /// Polite GET with optional conditional validators.
    ///
    /// 1. Denies immediately (empty outcome) when robots policy disallows
    ///    the path for this worker.
    /// 2. Waits out the per-host throttle gap.
    /// 3. Sends the GET with `If-None-Match` / `If-Modified-Since` when
    ///    validators are supplied.
    /// 4. Echoes the validators back on 304; otherwise returns the body
    ///    text with the response's own validators.
    ///
    /// # Errors
    ///
    /// - [`ScraperError::InvalidUrl`] — `url` does not parse or has no host.
    /// - [`ScraperError::UnexpectedStatus`] — non-2xx, non-304 response.
    /// - [`ScraperError::Http`] — network or timeout failure.
    pub async fn get(
        &self,
        url: &str,
        etag: Option<&str>,
        last_modified: Option<&str>,
    ) -> Result<FetchOutcome, ScraperError> {
        let parsed = Url::parse(url).map_err(|e| ScraperError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        let host = host_key(&parsed).ok_or_else(|| ScraperError::InvalidUrl {
            url: url.to_string(),
            reason: "URL has no host".to_string(),
        })?;

        let policy = self.policy_for(parsed.scheme(), &host).await;
        if !policy.allowed(parsed.path(), &self.agent) {
            tracing::debug!(url, "robots policy disallows URL — skipping");
            return Ok(FetchOutcome::empty());
        }

        self.wait_for_host_slot(&host).await;

        let mut request = self.client.get(parsed);
        if let Some(etag) = etag {
            request = request.header(reqwest::header::IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = last_modified {
            request = request.header(reqwest::header::IF_MODIFIED_SINCE, last_modified);
        }

        let response = request.send().await?;
        let status = response.status();

        if status == StatusCode::NOT_MODIFIED {
            return Ok(FetchOutcome {
                body: None,
                etag: etag.map(str::to_string),
                last_modified: last_modified.map(str::to_string),
            });
        }

        if !status.is_success() {
            return Err(ScraperError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        let new_etag = header_value(&response, reqwest::header::ETAG);
        let new_last_modified = header_value(&response, reqwest::header::LAST_MODIFIED);
        let body = response.text().await?;

        Ok(FetchOutcome {
            body: Some(body),
            etag: new_etag,
            last_modified: new_last_modified,
        })
    }

    /// Look up (or lazily fetch) the robots policy for `host`.
    ///
    /// A failed or non-2xx robots fetch caches an empty allow-all policy, so
    /// each host is asked for robots.txt at most once per process. The
    /// per-host slot lock is held across the fetch, so concurrent first
    /// requests to one host share a single robots fetch; other hosts are
    /// unaffected because the outer map lock is released first.
    async fn policy_for(&self, scheme: &str, host: &str) -> Arc<RobotsPolicy> {
        let slot = {
            let mut cache = self.robots.lock().await;
            Arc::clone(cache.entry(host.to_string()).or_default())
        };

        let mut entry = slot.lock().await;
        if let Some(policy) = entry.as_ref() {
            return Arc::clone(policy);
        }

        let robots_url = format!("{scheme}://{host}/robots.txt");
        let text = match self.client.get(&robots_url).send().await {
            Ok(response) if response.status().is_success() => {
                response.text().await.unwrap_or_default()
            }
            Ok(response) => {
                tracing::debug!(
                    host,
                    status = response.status().as_u16(),
                    "robots.txt not available — allowing all"
                );
                String::new()
            }
            Err(e) => {
                tracing::debug!(host, error = %e, "robots.txt fetch failed — allowing all");
                String::new()
            }
        };

        let policy = Arc::new(RobotsPolicy::parse(&text));
        *entry = Some(Arc::clone(&policy));
        policy
    }

    /// Enforce the minimum inter-request gap for `host`.
    ///
    /// The per-host mutex is held across the sleep, so the
    /// read-timestamp → sleep → write-timestamp sequence cannot interleave
    /// with a concurrent fetch to the same host. The outer map lock is
    /// released before sleeping; other hosts proceed unhindered.
    async fn wait_for_host_slot(&self, host: &str) {
        let slot = {
            let mut map = self.throttle.lock().await;
            Arc::clone(map.entry(host.to_string()).or_default())
        };

        let mut last = slot.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_gap {
                tokio::time::sleep(self.min_gap - elapsed).await;
            }
        }
        // Record the slot only after the wait, so the gap is measured
        // between consecutive request starts.
        *last = Some(Instant::now());
    }
}

/// Host key for throttle and robots maps: `host` or `host:port` when the
/// URL carries a non-default port.
fn host_key(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    })
}

fn header_value(response: &reqwest::Response, name: reqwest::header::HeaderName) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
