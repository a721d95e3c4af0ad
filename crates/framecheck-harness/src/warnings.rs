//! Warnings raised by framework code, and scopes that capture them.
//!
//! `warn` records the caller's location. Inside a capture scope on the same
//! thread the warning goes to the innermost scope; otherwise it is logged.
//! Capture state is thread-local, so warnings raised on other threads are
//! not seen by a scope.
//!
//! Functions that raise a warning on behalf of their caller should be
//! `#[track_caller]` so the warning is attributed to the caller's file.

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::panic::Location;

use crate::error::{HarnessError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    /// Base category; every other category is a subclass.
    Warning,
    UserWarning,
    DeprecationWarning,
    FutureWarning,
    RuntimeWarning,
}

impl WarningCategory {
    pub fn name(&self) -> &'static str {
        match self {
            WarningCategory::Warning => "Warning",
            WarningCategory::UserWarning => "UserWarning",
            WarningCategory::DeprecationWarning => "DeprecationWarning",
            WarningCategory::FutureWarning => "FutureWarning",
            WarningCategory::RuntimeWarning => "RuntimeWarning",
        }
    }

    pub fn is_subclass_of(&self, other: WarningCategory) -> bool {
        *self == other || other == WarningCategory::Warning
    }
}

impl fmt::Display for WarningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WarningRecord {
    pub category: WarningCategory,
    pub message: String,
    pub file: String,
    pub line: u32,
}

impl fmt::Display for WarningRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}: {}", self.file, self.line, self.category, self.message)
    }
}

/// What a capture scope does with the warnings it receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterLevel {
    /// Record every warning.
    #[default]
    Always,
    /// Record the first warning of each `(category, message)`.
    Once,
    /// Record nothing.
    Ignore,
    /// Any warning fails the scope.
    Error,
}

#[derive(Debug)]
struct Capture {
    filter: FilterLevel,
    records: Vec<WarningRecord>,
    seen: HashSet<(WarningCategory, String)>,
    escalated: Option<WarningRecord>,
}

impl Capture {
    fn new(filter: FilterLevel) -> Self {
        Self {
            filter,
            records: Vec::new(),
            seen: HashSet::new(),
            escalated: None,
        }
    }

    fn receive(&mut self, record: WarningRecord) {
        match self.filter {
            FilterLevel::Always => self.records.push(record),
            FilterLevel::Once => {
                if self.seen.insert((record.category, record.message.clone())) {
                    self.records.push(record);
                }
            }
            FilterLevel::Ignore => {}
            FilterLevel::Error => {
                if self.escalated.is_none() {
                    self.escalated = Some(record);
                }
            }
        }
    }
}

thread_local! {
    static CAPTURES: RefCell<Vec<Capture>> = RefCell::new(Vec::new());
}

/// Raise a warning attributed to the caller.
#[track_caller]
pub fn warn(category: WarningCategory, message: impl Into<String>) {
    let location = Location::caller();
    let record = WarningRecord {
        category,
        message: message.into(),
        file: location.file().to_string(),
        line: location.line(),
    };
    let uncaptured = CAPTURES.with(|stack| match stack.borrow_mut().last_mut() {
        Some(capture) => {
            capture.receive(record);
            None
        }
        None => Some(record),
    });
    if let Some(record) = uncaptured {
        tracing::warn!(
            category = %record.category,
            file = %record.file,
            line = record.line,
            "{}",
            record.message
        );
    }
}

/// Pops its capture scope even when the body unwinds.
struct ScopeGuard {
    done: bool,
}

impl ScopeGuard {
    fn push(filter: FilterLevel) -> Self {
        CAPTURES.with(|stack| stack.borrow_mut().push(Capture::new(filter)));
        Self { done: false }
    }

    fn finish(mut self) -> Option<Capture> {
        self.done = true;
        CAPTURES.with(|stack| stack.borrow_mut().pop())
    }
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        if !self.done {
            CAPTURES.with(|stack| stack.borrow_mut().pop());
        }
    }
}

/// Run `body` with a capture scope and return what it recorded.
///
/// With `FilterLevel::Error` the first warning fails the scope.
pub fn catch_warnings<T>(
    filter: FilterLevel,
    body: impl FnOnce() -> T,
) -> Result<(T, Vec<WarningRecord>)> {
    let guard = ScopeGuard::push(filter);
    let value = body();
    let capture = guard
        .finish()
        .ok_or_else(|| HarnessError::Session("warning capture stack is empty".into()))?;
    if let Some(record) = capture.escalated {
        return Err(HarnessError::WarningAsError {
            category: record.category.to_string(),
            message: record.message,
        });
    }
    Ok((value, capture.records))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WarningOptions {
    pub filter: FilterLevel,
    /// Deprecation and future warnings must be attributed to the file that
    /// opened the scope.
    pub check_stacklevel: bool,
    pub raise_on_extra_warnings: bool,
}

impl Default for WarningOptions {
    fn default() -> Self {
        Self {
            filter: FilterLevel::Always,
            check_stacklevel: true,
            raise_on_extra_warnings: true,
        }
    }
}

/// Run `body` and check the warnings it raised. `expected = None` asserts
/// that no warning is raised at all.
#[track_caller]
pub fn assert_produces_warning<T>(
    expected: Option<WarningCategory>,
    options: WarningOptions,
    body: impl FnOnce() -> T,
) -> Result<T> {
    let caller = Location::caller().file();
    let (value, records) = catch_warnings(options.filter, body)?;

    let mut saw_warning = false;
    let mut extra = Vec::new();
    for record in records {
        let matched = expected.map_or(false, |e| record.category.is_subclass_of(e));
        if !matched {
            extra.push((record.category.to_string(), record.message, record.file, record.line));
            continue;
        }
        saw_warning = true;
        let needs_location = matches!(
            record.category,
            WarningCategory::FutureWarning | WarningCategory::DeprecationWarning
        );
        if options.check_stacklevel && needs_location && record.file != caller {
            return Err(HarnessError::WarningStackLevel {
                raised: record.file,
                caller: caller.to_string(),
                message: record.message,
            });
        }
    }

    if let Some(expected) = expected {
        if !saw_warning {
            return Err(HarnessError::MissingExpectedWarning(expected.to_string()));
        }
    }
    if options.raise_on_extra_warnings && !extra.is_empty() {
        return Err(HarnessError::UnexpectedWarnings(extra));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use WarningCategory::*;

    #[track_caller]
    fn deprecated_api() -> i32 {
        warn(DeprecationWarning, "deprecated_api is deprecated");
        1
    }

    #[test]
    fn expected_warning_passes_and_returns_body_value() {
        let value = assert_produces_warning(Some(UserWarning), WarningOptions::default(), || {
            warn(UserWarning, "careful");
            7
        })
        .unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn base_category_matches_any_warning() {
        let result = assert_produces_warning(Some(Warning), WarningOptions::default(), || {
            warn(RuntimeWarning, "overflow")
        });
        assert!(result.is_ok());
    }

    #[test]
    fn missing_warning_fails() {
        let err = assert_produces_warning(Some(UserWarning), WarningOptions::default(), || {
            warn(RuntimeWarning, "overflow")
        })
        .unwrap_err();
        // Missing is checked before extras.
        assert_eq!(err.to_string(), "Did not see expected warning of class 'UserWarning'");
    }

    #[test]
    fn unexpected_warnings_fail_unless_allowed() {
        let err = assert_produces_warning(None, WarningOptions::default(), || {
            warn(RuntimeWarning, "overflow")
        })
        .unwrap_err();
        assert!(matches!(err, HarnessError::UnexpectedWarnings(ref w) if w[0].0 == "RuntimeWarning"));

        let lenient = WarningOptions {
            raise_on_extra_warnings: false,
            ..WarningOptions::default()
        };
        assert!(assert_produces_warning(None, lenient, || warn(RuntimeWarning, "x")).is_ok());
    }

    #[test]
    fn stacklevel_follows_track_caller() {
        // Called from a closure so the location is a call site, not a fn pointer.
        assert!(
            assert_produces_warning(Some(DeprecationWarning), WarningOptions::default(), || deprecated_api())
                .is_ok()
        );
    }

    #[test]
    fn once_filter_deduplicates() {
        let (_, records) = catch_warnings(FilterLevel::Once, || {
            for _ in 0..3 {
                warn(UserWarning, "same");
            }
            warn(UserWarning, "different");
        })
        .unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn ignore_and_error_filters() {
        let (_, records) = catch_warnings(FilterLevel::Ignore, || warn(UserWarning, "x")).unwrap();
        assert!(records.is_empty());

        let err = catch_warnings(FilterLevel::Error, || warn(UserWarning, "boom")).unwrap_err();
        assert_eq!(err.to_string(), "UserWarning: boom");
    }

    #[test]
    fn nested_scopes_capture_innermost_only() {
        let (inner, outer) = catch_warnings(FilterLevel::Always, || {
            let (_, inner) = catch_warnings(FilterLevel::Always, || warn(UserWarning, "inner")).unwrap();
            warn(UserWarning, "outer");
            inner
        })
        .unwrap();
        assert_eq!(inner.len(), 1);
        assert_eq!(outer.len(), 1);
        assert_eq!(outer[0].message, "outer");
    }

    #[test]
    fn scope_is_popped_when_body_panics() {
        let result = std::panic::catch_unwind(|| {
            let _ = catch_warnings(FilterLevel::Always, || panic!("body failed"));
        });
        assert!(result.is_err());
        CAPTURES.with(|stack| assert!(stack.borrow().is_empty()));
    }
}
