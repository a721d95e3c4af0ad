//! Silence framework logging for the duration of a scope.

use crate::logging;

/// Only errors are logged while a `QuietLogs` is alive. The previous filter is
/// restored on drop. Without a reloadable subscriber this does nothing.
#[derive(Debug)]
pub struct QuietLogs {
    previous: Option<String>,
}

impl QuietLogs {
    pub fn new() -> Self {
        Self {
            previous: logging::swap_filter("error"),
        }
    }

    /// Whether a filter was actually lowered.
    pub fn is_active(&self) -> bool {
        self.previous.is_some()
    }
}

impl Default for QuietLogs {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for QuietLogs {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            logging::swap_filter(&previous);
        }
    }
}

/// Run `body` with logging quieted.
pub fn quiet<T>(body: impl FnOnce() -> T) -> T {
    let _guard = QuietLogs::new();
    body()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_scope_lowers_and_restores_the_filter() {
        logging::init();
        if !logging::is_reloadable() {
            return;
        }
        let before = logging::current_filter();
        quiet(|| assert_eq!(logging::current_filter().as_deref(), Some("error")));
        assert_eq!(logging::current_filter(), before);
    }
}
