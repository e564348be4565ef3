//! Application state management for the profile card.
//!
//! `App` holds the UI state and a shared `UserLoader`. Loader operations run
//! as background tasks; their results reach the UI through the loader's
//! watch channel, which `check_background_tasks` drains once per frame.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use profilecard_core::{
    ApiClient, Config, FileStore, LoadState, MemoryStore, RefreshOutcome, Store, UserLoader,
};

// ============================================================================
// Constants
// ============================================================================

/// Frames of the loading spinner, advanced once per tick
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    loader: Arc<UserLoader>,
    state_rx: watch::Receiver<LoadState>,

    // UI State
    pub state: AppState,
    /// Last state seen from the loader
    pub load_state: LoadState,
    pub status_message: Option<String>,
    /// Age of the cached user for the status bar
    pub cache_age: Option<String>,
    pub tick: usize,
}

impl App {
    /// Create a new application instance wired to the real API and cache
    pub fn new(config: &Config) -> Result<Self> {
        let api_url = config.api_url();
        debug!(%api_url, timeout = ?config.request_timeout(), "Config loaded");

        let api = ApiClient::new(api_url, config.request_timeout())
            .context("Failed to create API client")?;
        let store = Self::open_store(config);

        let loader = Arc::new(UserLoader::new(Arc::new(api), store));
        Ok(Self::with_loader(loader))
    }

    /// Create an application around an existing loader
    pub fn with_loader(loader: Arc<UserLoader>) -> Self {
        let state_rx = loader.subscribe();
        let load_state = state_rx.borrow().clone();
        let cache_age = loader.cache().user_age();

        Self {
            loader,
            state_rx,
            state: AppState::Normal,
            load_state,
            status_message: None,
            cache_age,
            tick: 0,
        }
    }

    /// File store in the cache directory, or an in-memory store if that
    /// directory can't be used
    fn open_store(config: &Config) -> Arc<dyn Store> {
        let cache_dir = config.cache_dir().unwrap_or_else(|_| PathBuf::from("./cache"));
        debug!(?cache_dir, "Cache directory configured");

        match FileStore::new(&cache_dir) {
            Ok(store) => Arc::new(store),
            Err(e) => {
                warn!(error = %e, ?cache_dir, "Cache directory unavailable, not persisting");
                Arc::new(MemoryStore::new())
            }
        }
    }

    // =========================================================================
    // Background Loading
    // =========================================================================

    /// Show the cached user or start the first fetch
    pub fn start(&self) {
        info!("Loading user");
        let loader = self.loader.clone();
        tokio::spawn(async move {
            loader.initialize().await;
        });
    }

    /// Whether the refresh action is available
    pub fn can_refresh(&self) -> bool {
        !self.load_state.is_loading() && !self.loader.is_fetching()
    }

    /// Drop the cached user and fetch a new one in the background
    pub fn refresh(&mut self) {
        if !self.can_refresh() {
            self.status_message = Some("Already loading...".to_string());
            return;
        }

        let loader = self.loader.clone();
        tokio::spawn(async move {
            if loader.refresh().await == RefreshOutcome::AlreadyLoading {
                debug!("Refresh skipped, fetch already in flight");
            }
        });

        // The loader switches to Loading as soon as the task runs; mirror it
        // now so a second keypress in the same frame is ignored.
        self.load_state = LoadState::Loading;
        self.status_message = Some("Refreshing...".to_string());
    }

    /// Pick up state changes published by the loader
    pub fn check_background_tasks(&mut self) {
        match self.state_rx.has_changed() {
            Ok(true) => {}
            Ok(false) => return,
            Err(_) => {
                warn!("Loader state channel closed");
                return;
            }
        }

        self.load_state = self.state_rx.borrow_and_update().clone();
        debug!(loading = self.load_state.is_loading(), "Load state changed");

        if !self.load_state.is_loading() {
            self.status_message = None;
            self.cache_age = self.loader.cache().user_age();
        }
    }

    /// Advance animations
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    pub fn spinner_frame(&self) -> &'static str {
        SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]
    }

    /// Stop applying results from fetches still in flight
    pub fn shutdown(&self) {
        self.loader.close();
    }
}

// ============================================================================
// Tests
// ============================================================================
