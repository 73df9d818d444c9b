//! Background check for newer releases.
//!
//! The result of a successful check is cached in the config store for a day
//! so ordinary commands do not hit the network on every run. Every failure
//! is swallowed: a broken network must never break an unrelated command.

use chrono::{DateTime, Duration, Utc};

use crate::config::{keys, ConfigStore};

use super::release::ReleaseSource;
use super::version::{clean, is_dev_version};

/// How long a cached check stays valid.
pub const CHECK_INTERVAL: Duration = Duration::hours(24);

/// Source of the current time.
pub trait Clock {
    /// The current time.
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] reading the system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Outcome of an update check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStatus {
    /// Whether a different release than the running one is available.
    pub available: bool,
    /// Running version, as passed in.
    pub current: String,
    /// Latest known release tag; empty when unknown.
    pub latest: String,
}

impl UpdateStatus {
    fn unavailable(current: &str) -> Self {
        Self {
            available: false,
            current: current.to_string(),
            latest: String::new(),
        }
    }
}

/// Best-effort, TTL-cached "is there a newer version" query.
pub struct UpdateChecker<'a> {
    store: &'a mut dyn ConfigStore,
    releases: &'a dyn ReleaseSource,
    clock: &'a dyn Clock,
}

impl<'a> UpdateChecker<'a> {
    /// Create a checker.
    ///
    /// `releases` should be configured with a short timeout; it is the only
    /// latency the check adds to a command.
    pub fn new(
        store: &'a mut dyn ConfigStore,
        releases: &'a dyn ReleaseSource,
        clock: &'a dyn Clock,
    ) -> Self {
        Self {
            store,
            releases,
            clock,
        }
    }

    /// Check whether a release other than `current` is available.
    pub fn check(&mut self, current: &str) -> UpdateStatus {
        if is_dev_version(current) {
            return UpdateStatus::unavailable(current);
        }

        let normalized = clean(current);

        if let Some(cached_latest) = self.fresh_cached_latest() {
            tracing::debug!("Using cached update check (latest: {:?})", cached_latest);
            let available = !cached_latest.is_empty() && cached_latest != normalized;
            return UpdateStatus {
                available,
                current: current.to_string(),
                latest: cached_latest,
            };
        }

        let latest = match self.releases.fetch("") {
            Ok(release) => release.tag,
            Err(e) => {
                tracing::debug!("Update check failed: {}", e);
                return UpdateStatus::unavailable(current);
            }
        };

        self.save(&latest);

        UpdateStatus {
            available: !latest.is_empty() && latest != normalized,
            current: current.to_string(),
            latest,
        }
    }

    /// Cached latest tag if the last check is younger than [`CHECK_INTERVAL`].
    fn fresh_cached_latest(&self) -> Option<String> {
        let raw = self.store.get(keys::LAST_CHECK)?;
        let checked_at = match DateTime::parse_from_rfc3339(raw.trim()) {
            Ok(t) => t.with_timezone(&Utc),
            Err(e) => {
                tracing::debug!("Ignoring malformed update check timestamp {:?}: {}", raw, e);
                return None;
            }
        };

        if self.clock.now().signed_duration_since(checked_at) >= CHECK_INTERVAL {
            return None;
        }

        Some(self.store.get(keys::LATEST_VERSION).unwrap_or_default())
    }

    fn save(&mut self, latest: &str) {
        let now = self.clock.now().to_rfc3339();
        let result = self
            .store
            .set(keys::LAST_CHECK, &now)
            .and_then(|_| self.store.set(keys::LATEST_VERSION, latest));

        if let Err(e) = result {
            tracing::debug!("Failed to cache update check: {}", e);
        }
    }
}
