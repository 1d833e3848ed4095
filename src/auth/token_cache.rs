//! Best-effort caching layer over a [`TokenProvider`].
//!
//! The platform token stays valid for hours; fetching one per send would be
//! wasteful and rate-limited. The cache is an optimization only: a failing
//! store never fails the call, and a cold cache hit by several tasks at once
//! simply results in redundant fetches (last write wins, the tokens are
//! equivalent).

use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::TokenProvider;

/// Conservatively below DingTalk's 7200 s token lifetime, so a cached token
/// is always returned with some validity left.
pub const DEFAULT_TTL: Duration = Duration::from_secs(7000);

/// Where cached tokens live. One value slot per key; a write replaces the
/// prior value, and expiry is the store's business (a read after the TTL
/// reports a miss).
pub trait TokenStore: Send + Sync {
    type Error: std::error::Error + Send + Sync;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error>;
    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error>;
}

/// In-process [`TokenStore`] with a fixed TTL chosen at construction.
pub struct MemoryStore {
    entries: Mutex<HashMap<String, Entry>>,
    ttl: Duration,
}

struct Entry {
    value: String,
    expires_at: Instant,
}

impl MemoryStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            ttl,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl TokenStore for MemoryStore {
    type Error = Infallible;

    fn get(&self, key: &str) -> Result<Option<String>, Self::Error> {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        let value = entries
            .get(key)
            .filter(|entry| entry.expires_at > Instant::now())
            .map(|entry| entry.value.clone());
        Ok(value)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), Self::Error> {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key.to_owned(),
            Entry {
                value: value.to_owned(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum Error<FetchError> {
    #[error("token fetch: {0}")]
    Fetch(#[source] FetchError),
}

/// [`TokenProvider`] that consults `store` before delegating to `provider`.
pub struct CachedTokenProvider<Provider, Store> {
    provider: Provider,
    store: Store,
    cache_key: String,
}

impl<Provider, Store> CachedTokenProvider<Provider, Store>
where
    Provider: TokenProvider,
    Store: TokenStore,
{
    pub fn new(provider: Provider, store: Store, cache_key: impl Into<String>) -> Self {
        Self {
            provider,
            store,
            cache_key: cache_key.into(),
        }
    }

    pub async fn get_token(&self) -> Result<String, Error<Provider::Error>> {
        match self.store.get(&self.cache_key) {
            Ok(Some(token)) => {
                debug!(message = "Using cached access token", cache_key = %self.cache_key);
                return Ok(token);
            }
            Ok(None) => {}
            // A broken store is treated as a miss.
            Err(err) => {
                warn!(message = "Token cache read failed", error = %err);
            }
        }

        debug!(message = "No cached access token, fetching a fresh one", cache_key = %self.cache_key);
        let token = self
            .provider
            .access_token()
            .await
            .map_err(Error::Fetch)?;

        // Best effort: the caller gets the token either way.
        if let Err(err) = self.store.put(&self.cache_key, &token) {
            warn!(message = "Failed to cache access token", error = %err);
        }

        Ok(token)
    }
}

#[async_trait::async_trait]
impl<Provider, Store> TokenProvider for CachedTokenProvider<Provider, Store>
where
    Provider: TokenProvider,
    Store: TokenStore,
{
    type Error = Error<Provider::Error>;

    async fn access_token(&self) -> Result<String, Self::Error> {
        self.get_token().await
    }
}
