//! Process-wide gateway URL cache.
//!
//! Discovering the gateway URL costs a REST request, and the server tells
//! us how long the answer stays valid through the response's cache-control
//! hint. The cache is shared by every session in the process and guarded by
//! one async lock held across the discovery request, so concurrent
//! connectors share a single in-flight discovery.

use accord_http::{Client, Error};
use std::time::Duration;
use tokio::{sync::Mutex, time::Instant};

/// URL used when discovery fails outright.
const FALLBACK_URL: &str = "wss://gateway.discord.gg";

/// Cache lifetime applied when the response carries no usable hint.
const DEFAULT_MAX_AGE: Duration = Duration::from_secs(300);

static CACHE: Mutex<Option<CachedUrl>> = Mutex::const_new(None);

#[derive(Debug)]
struct CachedUrl {
    expires_at: Instant,
    url: Box<str>,
}

/// Fetch the gateway URL, reusing the cached answer while it is fresh.
///
/// Discovery failure is not fatal: the hardcoded default URL is returned
/// instead, and nothing is cached so the next connector retries discovery.
pub(crate) async fn gateway_url(http: &Client) -> Box<str> {
    let mut cache = CACHE.lock().await;

    if let Some(cached) = cache.as_ref() {
        if cached.expires_at > Instant::now() {
            return cached.url.clone();
        }
    }

    match discover(http).await {
        Ok((url, max_age)) => {
            tracing::debug!(%url, ?max_age, "discovered gateway url");

            let url: Box<str> = url.into();
            cache.replace(CachedUrl {
                expires_at: Instant::now() + max_age,
                url: url.clone(),
            });

            url
        }
        Err(source) => {
            tracing::warn!("gateway url discovery failed, using the default: {source}");

            FALLBACK_URL.into()
        }
    }
}

async fn discover(http: &Client) -> Result<(String, Duration), Error> {
    let response = http.gateway().exec().await?;

    let max_age = response
        .headers()
        .get("cache-control")
        .and_then(|value| value.to_str().ok())
        .and_then(parse_max_age)
        .unwrap_or(DEFAULT_MAX_AGE);

    let info = response.model().await?;

    Ok((info.url, max_age))
}

/// Extract the `max-age` directive from a cache-control header value.
fn parse_max_age(value: &str) -> Option<Duration> {
    value.split(',').find_map(|directive| {
        let (name, seconds) = directive.trim().split_once('=')?;

        if name.eq_ignore_ascii_case("max-age") {
            seconds.trim().parse().ok().map(Duration::from_secs)
        } else {
            None
        }
    })
}
