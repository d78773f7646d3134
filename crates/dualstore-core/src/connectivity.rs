//! Connectivity provider
//!
//! The router reads connectivity through this interface on every call and
//! never caches the answers.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::OfflineConfig;

/// Read-only view of process-wide connectivity state
pub trait ConnectivityProvider: Send + Sync {
    /// Whether offline support is enabled at all
    fn is_offline_enabled(&self) -> bool;

    /// Whether the process is currently online
    fn is_online(&self) -> bool;
}

/// Default provider backed by atomics, flipped by the host application
#[derive(Debug)]
pub struct OfflineGlobals {
    offline_enabled: AtomicBool,
    online: AtomicBool,
}

impl OfflineGlobals {
    pub fn new(offline_enabled: bool, online: bool) -> Self {
        Self {
            offline_enabled: AtomicBool::new(offline_enabled),
            online: AtomicBool::new(online),
        }
    }

    pub fn from_config(config: &OfflineConfig) -> Self {
        Self::new(config.offline_enabled, config.start_online)
    }

    pub fn set_online(&self, online: bool) {
        let previous = self.online.swap(online, Ordering::SeqCst);
        if previous != online {
            tracing::info!(online, "connectivity changed");
        }
    }

    pub fn set_offline_enabled(&self, enabled: bool) {
        self.offline_enabled.store(enabled, Ordering::SeqCst);
    }
}

impl Default for OfflineGlobals {
    fn default() -> Self {
        Self::new(true, true)
    }
}

impl ConnectivityProvider for OfflineGlobals {
    fn is_offline_enabled(&self) -> bool {
        self.offline_enabled.load(Ordering::SeqCst)
    }

    fn is_online(&self) -> bool {
        self.online.load(Ordering::SeqCst)
    }
}
