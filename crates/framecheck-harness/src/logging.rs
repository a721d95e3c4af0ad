//! Process-wide log subscriber with a reloadable filter.
//!
//! `init` installs a `tracing-subscriber` registry whose `EnvFilter` can be
//! swapped at runtime; `QuietLogs` uses that to silence a scope.

use once_cell::sync::OnceCell;
use tracing_subscriber::{fmt, prelude::*, reload, EnvFilter, Registry};

/// Used when `RUST_LOG` is unset or invalid.
pub const DEFAULT_FILTER: &str = "info";

static FILTER: OnceCell<reload::Handle<EnvFilter, Registry>> = OnceCell::new();

/// Install the global subscriber. Returns `false` when another subscriber
/// was already installed, in which case the filter is not reloadable.
pub fn init() -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let (layer, handle) = reload::Layer::new(filter);
    let installed = tracing_subscriber::registry()
        .with(layer)
        .with(fmt::layer().with_writer(std::io::stderr))
        .try_init()
        .is_ok();
    if installed {
        let _ = FILTER.set(handle);
    }
    installed
}

pub fn is_reloadable() -> bool {
    FILTER.get().is_some()
}

/// Directives of the active filter, if `init` installed one.
pub fn current_filter() -> Option<String> {
    FILTER.get()?.with_current(|f| f.to_string()).ok()
}

/// Replace the active filter and return the previous directives.
pub(crate) fn swap_filter(directives: &str) -> Option<String> {
    let handle = FILTER.get()?;
    let previous = handle.with_current(|f| f.to_string()).ok()?;
    match handle.reload(EnvFilter::new(directives)) {
        Ok(()) => Some(previous),
        Err(e) => {
            tracing::warn!(error = %e, "failed to reload log filter");
            None
        }
    }
}
