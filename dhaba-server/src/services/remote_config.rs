//! Remote configuration fetch
//!
//! The image host API key is not stored on the device. It is fetched from
//! the remote config endpoint on demand and cached for a short window so
//! repeated uploads do not hammer the endpoint.

use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Deserialize;

use crate::utils::{AppError, AppResult};

/// Cache lifetime before refetching
const CACHE_TTL: Duration = Duration::from_secs(300);
/// Remote endpoint timeout
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct RemoteConfigPayload {
    imgbb_api_key: String,
}

struct CachedKey {
    value: String,
    fetched_at: Instant,
}

/// Remote config client with a small in-process cache
pub struct RemoteConfigService {
    client: reqwest::Client,
    url: String,
    cache: RwLock<Option<CachedKey>>,
}

impl RemoteConfigService {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            url,
            cache: RwLock::new(None),
        }
    }

    /// Image host API key, from cache or the remote endpoint
    ///
    /// `IMGBB_API_KEY` in the environment short-circuits the remote fetch,
    /// for development and for deployments without a config service.
    pub async fn imgbb_api_key(&self) -> AppResult<String> {
        if let Ok(key) = std::env::var("IMGBB_API_KEY")
            && !key.is_empty()
        {
            return Ok(key);
        }

        if let Some(cached) = self.cache.read().as_ref()
            && cached.fetched_at.elapsed() < CACHE_TTL
        {
            return Ok(cached.value.clone());
        }

        if self.url.is_empty() {
            return Err(AppError::Upstream(
                "Remote config URL not configured".to_string(),
            ));
        }

        let resp = self
            .client
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await
            .map_err(|e| AppError::Upstream(format!("Remote config fetch failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Remote config returned {}",
                resp.status()
            )));
        }

        let payload: RemoteConfigPayload = resp
            .json()
            .await
            .map_err(|e| AppError::Upstream(format!("Remote config parse failed: {e}")))?;

        let mut cache = self.cache.write();
        *cache = Some(CachedKey {
            value: payload.imgbb_api_key.clone(),
            fetched_at: Instant::now(),
        });
        tracing::debug!("Remote config refreshed");

        Ok(payload.imgbb_api_key)
    }
}
