use std::path::PathBuf;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use http_cache_reqwest::{CACacheManager, Cache, CacheManager, CacheMode, HttpCache, HttpCacheOptions};
use reqwest::Client;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};

use crate::errors::{HttpError, Result};

fn past_ttl_floor(last_fetch: Option<Instant>, ttl: Duration) -> bool {
    match last_fetch {
        Some(last) => last.elapsed() >= ttl,
        None => true,
    }
}

/// A `reqwest` client wrapped with a disk-backed response cache, in the same
/// shape the proxy route builds one per call -- except here it's built once
/// and shared, since every transport and every fetcher needs the same
/// stale-if-error behavior against the same handful of upstream hosts.
///
/// Caching is GET-only (`reqwest_middleware`'s `Cache` layer never touches
/// non-GET requests). Freshness normally follows each response's own
/// `Cache-Control` header; `default_ttl` is an additional floor this client
/// enforces itself -- a cached entry is evicted and force-refetched once
/// `default_ttl` has elapsed since the last network fetch, regardless of
/// what the upstream's own headers say.
pub struct CachedHttp {
    client: ClientWithMiddleware,
    manager: CACacheManager,
    default_ttl: Duration,
    last_fetched: DashMap<String, Instant>,
}

impl CachedHttp {
    pub fn new(cache_dir: impl Into<PathBuf>, default_ttl: Duration, timeout: Duration) -> Self {
        let cache_dir = cache_dir.into();
        let manager = CACacheManager {
            path: cache_dir,
            remove_opts: Default::default(),
        };
        let base = Client::builder()
            .timeout(timeout)
            .build()
            .expect("reqwest client configuration is static and always valid");

        let client = ClientBuilder::new(base)
            .with(Cache(HttpCache {
                mode: CacheMode::Default,
                manager: manager.clone(),
                options: HttpCacheOptions::default(),
            }))
            .build();

        CachedHttp {
            client,
            manager,
            default_ttl,
            last_fetched: DashMap::new(),
        }
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// GET `url` and return the response body as text. On network failure
    /// (timeout, connection refused, non-2xx), fall back to whatever this
    /// cache last stored for the same request -- even if stale -- before
    /// giving up. This is the Rust shape of `requests_cache`'s
    /// `stale_if_error=True`.
    pub async fn get_text(&self, url: &str) -> Result<String> {
        match self.fetch(url).await {
            Ok(body) => Ok(body),
            Err(err) => match self.stale_fallback(url).await {
                Some(body) => {
                    tracing::warn!(url, error = %err, "serving stale cached response after fetch failure");
                    Ok(body)
                }
                None => Err(err),
            },
        }
    }

    /// Evict this URL's cached entry once `default_ttl` has elapsed since we
    /// last went to the network for it, so a long-lived origin `max-age`
    /// can never keep us on a response older than our own floor.
    async fn enforce_ttl_floor(&self, url: &str) {
        let is_stale = past_ttl_floor(self.last_fetched.get(url).map(|last| *last), self.default_ttl);

        if is_stale {
            let key = format!("GET:{url}");
            let _ = self.manager.delete(&key).await;
        }
        self.last_fetched.insert(url.to_string(), Instant::now());
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        self.enforce_ttl_floor(url).await;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| HttpError::Network {
                url: url.to_string(),
                source,
            })?;

        if !response.status().is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        response.text().await.map_err(|source| HttpError::Body {
            url: url.to_string(),
            source,
        })
    }

    /// Stream `url`'s body straight to `dest`, bypassing the text cache --
    /// used by the refresh job for large binary shapefile archives that have
    /// no business living in the response cache alongside small JSON bodies.
    pub async fn download_to_file(&self, url: &str, dest: &std::path::Path) -> Result<()> {
        let response = self.client.get(url).send().await.map_err(|source| HttpError::Network {
            url: url.to_string(),
            source,
        })?;

        if !response.status().is_success() {
            return Err(HttpError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes().await.map_err(|source| HttpError::Body {
            url: url.to_string(),
            source,
        })?;

        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(|source| HttpError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        tokio::fs::write(dest, &bytes).await.map_err(|source| HttpError::Io {
            path: dest.to_path_buf(),
            source,
        })
    }

    async fn stale_fallback(&self, url: &str) -> Option<String> {
        let key = format!("GET:{url}");
        let (response, _policy) = self.manager.get(&key).await.ok().flatten()?;
        std::str::from_utf8(&response.body).ok().map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_ttl_is_stored_verbatim() {
        let dir = std::env::temp_dir().join("treksafer-http-cache-test");
        let http = CachedHttp::new(dir, Duration::from_secs(14_400), Duration::from_secs(30));
        assert_eq!(http.default_ttl(), Duration::from_secs(14_400));
    }

    #[test]
    fn never_fetched_is_past_the_floor() {
        assert!(past_ttl_floor(None, Duration::from_secs(14_400)));
    }

    #[test]
    fn recent_fetch_is_within_the_floor() {
        let last = Instant::now();
        assert!(!past_ttl_floor(Some(last), Duration::from_secs(14_400)));
    }

    #[test]
    fn fetch_older_than_ttl_is_past_the_floor() {
        let last = Instant::now() - Duration::from_secs(100);
        assert!(past_ttl_floor(Some(last), Duration::from_secs(10)));
    }
}
