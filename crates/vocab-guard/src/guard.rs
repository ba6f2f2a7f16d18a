//! Fail-fast mutual exclusion: acquire, run once, release.
//!
//! A guard never waits. If another holder owns the key, the caller gets
//! [`GuardOutcome::Skipped`] and decides for itself what to do. A holder that
//! dies without releasing blocks the key only until its TTL runs out.

use crate::config::GuardConfig;
use crate::error::GuardError;
use crate::key::LogicalKey;
use crate::store::CoordinationStore;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Proof of ownership of one key, valid until released or expired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuardToken {
    key: String,
    value: String,
}

impl GuardToken {
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    Ran(T),
    /// The key was held elsewhere; the body did not run.
    Skipped,
}

impl<T> GuardOutcome<T> {
    pub fn is_skipped(&self) -> bool {
        matches!(self, Self::Skipped)
    }

    pub fn ran(self) -> Option<T> {
        match self {
            Self::Ran(value) => Some(value),
            Self::Skipped => None,
        }
    }
}

#[derive(Clone)]
pub struct MutationGuard {
    store: Arc<dyn CoordinationStore>,
    config: GuardConfig,
}

impl MutationGuard {
    pub fn new(store: Arc<dyn CoordinationStore>, config: GuardConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    /// Store key for `key` under the configured prefix.
    pub fn key_for(&self, key: &LogicalKey) -> String {
        key.render(&self.config.key_prefix)
    }

    /// Claim `key` for `ttl` with a fresh random token, or `None` if it is held.
    pub fn try_acquire(&self, key: &str, ttl: Duration) -> Result<Option<GuardToken>, GuardError> {
        let value = Uuid::new_v4().to_string();
        if self.store.set_if_absent(key, &value, ttl)? {
            tracing::debug!(key = %key, ttl_secs = ttl.as_secs(), "guard acquired");
            Ok(Some(GuardToken {
                key: key.to_string(),
                value,
            }))
        } else {
            tracing::debug!(key = %key, "guard held elsewhere");
            Ok(None)
        }
    }

    /// Drop `token`'s claim. `false` when the key expired or now belongs to someone else.
    pub fn release(&self, token: &GuardToken) -> Result<bool, GuardError> {
        let released = self.store.compare_and_delete(&token.key, &token.value)?;
        tracing::debug!(key = %token.key, released, "guard release");
        Ok(released)
    }

    /// Run `body` while holding `key`, or skip it if the key is held.
    ///
    /// The claim is released whether `body` succeeds or fails; the body's
    /// error is returned as is. A failed release is only logged, since the
    /// TTL reclaims the key anyway.
    pub fn with_guard<T, E, F>(&self, key: &LogicalKey, body: F) -> Result<GuardOutcome<T>, E>
    where
        F: FnOnce() -> Result<T, E>,
        E: From<GuardError>,
    {
        let store_key = self.key_for(key);
        let Some(token) = self.try_acquire(&store_key, self.config.default_ttl)? else {
            tracing::debug!(key = %store_key, operation = %key.operation(), "skipped");
            return Ok(GuardOutcome::Skipped);
        };

        let result = body();

        match self.release(&token) {
            Ok(true) => {}
            Ok(false) => {
                tracing::warn!(key = %store_key, "guard expired before release")
            }
            Err(e) => tracing::warn!(key = %store_key, error = %e, "guard release failed"),
        }

        result.map(GuardOutcome::Ran)
    }
}
