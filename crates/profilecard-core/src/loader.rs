//! Cache-first loading of the displayed user.
//!
//! `UserLoader` owns the single `LoadState` the UI renders. On startup it
//! trusts a readable cache record and only fetches when there is none; a
//! refresh always drops the record and fetches again.
//!
//! At most one fetch is in flight per loader. While one is pending, `load()`
//! and `refresh()` return without doing anything, so the last state written
//! is always the result of the most recent fetch.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::api::Fetcher;
use crate::cache::{CacheManager, Store};
use crate::models::{LoadState, User};

/// Message shown for any failed fetch. Raw errors only go to the log.
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching user. Please try again.";

/// What a call to [`UserLoader::refresh`] did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Cache cleared and a fetch ran to completion
    Completed,
    /// A fetch was already in flight; nothing was changed
    AlreadyLoading,
}

pub struct UserLoader {
    fetcher: Arc<dyn Fetcher>,
    cache: CacheManager,
    state: watch::Sender<LoadState>,
    in_flight: AtomicBool,
    initialized: AtomicBool,
    closed: AtomicBool,
}

/// Releases the in-flight slot when dropped, on every exit path.
struct InFlightGuard<'a> {
    flag: &'a AtomicBool,
}

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self { flag })
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}

impl UserLoader {
    pub fn new(fetcher: Arc<dyn Fetcher>, store: Arc<dyn Store>) -> Self {
        let (state, _) = watch::channel(LoadState::Loading);
        Self {
            fetcher,
            cache: CacheManager::new(store),
            state,
            in_flight: AtomicBool::new(false),
            initialized: AtomicBool::new(false),
            closed: AtomicBool::new(false),
        }
    }

    /// Snapshot of the current state
    pub fn state(&self) -> LoadState {
        self.state.borrow().clone()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<LoadState> {
        self.state.subscribe()
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// True while a fetch is outstanding
    pub fn is_fetching(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }

    /// Show the cached user if there is one, otherwise fetch.
    ///
    /// Only the first call does anything.
    pub async fn initialize(&self) {
        if self.initialized.swap(true, Ordering::AcqRel) {
            warn!("UserLoader already initialized, ignoring");
            return;
        }

        match self.cache.load_user() {
            Ok(Some(cached)) => {
                info!(cached_at = ?cached.cached_at, "Using cached user");
                self.set_state(LoadState::Ready(cached.data));
                return;
            }
            Ok(None) => debug!("No cached user"),
            Err(e) => warn!(error = %e, "Failed to read cached user, fetching instead"),
        }

        self.load().await;
    }

    /// Fetch a user and publish the result.
    ///
    /// No-op if another fetch is already in flight.
    pub async fn load(&self) {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Fetch already in flight, skipping load");
            return;
        };
        self.fetch_and_apply().await;
    }

    /// Drop the cached user and fetch a fresh one.
    pub async fn refresh(&self) -> RefreshOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            debug!("Fetch already in flight, ignoring refresh");
            return RefreshOutcome::AlreadyLoading;
        };

        info!("Refreshing user");
        if let Err(e) = self.cache.clear_user() {
            warn!(error = %e, "Failed to clear cached user");
        }
        self.set_state(LoadState::Loading);

        self.fetch_and_apply().await;
        RefreshOutcome::Completed
    }

    /// Stop applying results. Pending fetches finish without touching state
    /// or cache.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    /// Caller must hold the in-flight guard.
    async fn fetch_and_apply(&self) {
        self.set_state_if_changed(LoadState::Loading);

        let result = self.fetcher.fetch_user().await;

        if self.is_closed() {
            debug!("Loader closed while fetching, discarding result");
            return;
        }

        match result {
            Ok(user) => self.apply_user(user),
            Err(e) => {
                error!(error = %e, "Error fetching user");
                self.set_state(LoadState::Failed(FETCH_ERROR_MESSAGE.to_string()));
            }
        }
    }

    fn apply_user(&self, user: User) {
        // Best effort; a failed write must not hide the fetched user
        if let Err(e) = self.cache.save_user(&user) {
            warn!(error = %e, "Failed to cache user");
        }
        self.set_state(LoadState::Ready(user));
    }

    fn set_state(&self, state: LoadState) {
        if self.is_closed() {
            return;
        }
        self.state.send_replace(state);
    }

    fn set_state_if_changed(&self, state: LoadState) {
        if self.is_closed() {
            return;
        }
        self.state.send_if_modified(|current| {
            if *current == state {
                false
            } else {
                *current = state;
                true
            }
        });
    }
}
