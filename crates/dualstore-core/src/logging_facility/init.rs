//! Logging initialization module
//!
//! Provides a single initialization point for the logging facility.

use serde::Deserialize;
use std::sync::OnceLock;
use tracing_subscriber::{util::SubscriberInitExt, EnvFilter};

/// Logging profile configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    /// Human-readable output for development
    #[default]
    Development,
    /// JSON structured output for production
    Production,
    /// Test capture mode for deterministic testing
    Test,
}

impl Profile {
    fn default_filter(&self) -> &'static str {
        match self {
            Profile::Development => "dualstore=debug",
            Profile::Production => "dualstore=info",
            Profile::Test => "dualstore=trace",
        }
    }
}

static INSTALLED: OnceLock<Profile> = OnceLock::new();

/// Initialize the logging facility
///
/// Call once at application startup. Later calls are no-ops, whatever
/// profile they pass. If another global subscriber is already installed
/// (for example by `init_test_capture()`), it is kept.
///
/// # Profiles
///
/// - **Development**: Human-readable logs at debug level
/// - **Production**: JSON structured logs at info level
/// - **Test**: Bare registry; use `init_test_capture()` to collect events
///
/// `RUST_LOG` overrides the profile's default filter.
pub fn init(profile: Profile) {
    INSTALLED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(profile.default_filter()));
        let installed = match profile {
            Profile::Development => tracing_subscriber::fmt()
                .with_env_filter(filter)
                .try_init()
                .is_ok(),
            Profile::Production => tracing_subscriber::fmt()
                .json()
                .with_env_filter(filter)
                .try_init()
                .is_ok(),
            // Capture is installed separately via init_test_capture()
            Profile::Test => tracing_subscriber::registry().try_init().is_ok(),
        };
        if !installed {
            tracing::debug!(?profile, "global subscriber already set; keeping it");
        }
        profile
    });
}

/// The profile the first [`init`] call selected, if any
pub fn active_profile() -> Option<Profile> {
    INSTALLED.get().copied()
}
