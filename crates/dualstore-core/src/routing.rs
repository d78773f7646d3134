//! Routing decision helpers
//!
//! Pure functions. The router calls them on every dispatch with freshly read
//! connectivity state.

use std::fmt;

use dualstore_core_types::schema::{ROUTE_LOCAL, ROUTE_REMOTE};

use crate::descriptor::OverrideSlot;
use crate::model::Options;

/// Which backing repository serves a call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Remote,
    Local,
}

impl Route {
    pub fn is_remote(&self) -> bool {
        matches!(self, Route::Remote)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Route::Remote => ROUTE_REMOTE,
            Route::Local => ROUTE_LOCAL,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pick the repository for a data operation
///
/// An explicit override always wins, so `Some(false)` forces the local
/// repository even while online. Only `None` defers to connectivity.
pub fn decide(explicit: Option<bool>, global_online: bool) -> Route {
    match explicit.unwrap_or(global_online) {
        true => Route::Remote,
        false => Route::Local,
    }
}

/// How adapter and serializer lookups read their override
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LookupPolicy {
    /// `Some(true)` forces remote; `Some(false)` is treated like `None`
    #[default]
    RemoteOverrideOnly,
    /// Same rule as data operations (see [`decide`])
    Symmetric,
}

/// Pick the repository for `adapter_for` / `serializer_for`
///
/// Under the default policy an explicit `false` does not force the local
/// repository; it falls through to the online state.
// TODO: drop RemoteOverrideOnly once callers relying on `Some(false)` being
// ignored have moved to the symmetric policy.
pub fn decide_lookup(explicit: Option<bool>, global_online: bool, policy: LookupPolicy) -> Route {
    match policy {
        LookupPolicy::Symmetric => decide(explicit, global_online),
        LookupPolicy::RemoteOverrideOnly => {
            if explicit == Some(true) || global_online {
                Route::Remote
            } else {
                Route::Local
            }
        }
    }
}

/// Read the override out of an options argument according to its slot
///
/// Returns the override and the options to forward. For slots marked
/// `strip` the `useOnlineStore` key is removed from the forwarded mapping.
/// Other slots leave the options untouched.
pub fn take_options_override(
    slot: &OverrideSlot,
    options: Option<Options>,
) -> (Option<bool>, Option<Options>) {
    match (slot, options) {
        (OverrideSlot::OptionsKey { strip: true, .. }, Some(mut options)) => {
            let explicit = options.take_override_flag();
            (explicit, Some(options))
        }
        (OverrideSlot::OptionsKey { .. }, Some(options)) => (options.override_flag(), Some(options)),
        (_, options) => (None, options),
    }
}
