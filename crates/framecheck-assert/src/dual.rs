//! Run one test body against two execution contexts and compare the results.

use std::fmt::Display;

use crate::engine::{equals, CompareOptions};
use crate::error::{AssertError, Result};
use crate::value::Value;

/// A reference context and a candidate context sharing one test body.
pub struct DualExecution<'a, C: ?Sized> {
    reference: &'a C,
    candidate: &'a C,
    options: CompareOptions,
}

impl<'a, C: ?Sized> DualExecution<'a, C> {
    /// Approximate comparison by default.
    pub fn new(reference: &'a C, candidate: &'a C) -> Self {
        Self {
            reference,
            candidate,
            options: CompareOptions::almost(),
        }
    }

    pub fn almost(mut self, almost: bool) -> Self {
        self.options = if almost {
            CompareOptions::almost()
        } else {
            CompareOptions::exact()
        };
        self
    }

    pub fn options(mut self, options: CompareOptions) -> Self {
        self.options = options;
        self
    }

    /// Evaluate `body` in both contexts. Results are compared pairwise in
    /// order; the result counts must agree.
    pub fn run<F, E>(&self, body: F) -> Result<()>
    where
        F: Fn(&C) -> std::result::Result<Vec<Value>, E>,
        E: Display,
    {
        let expected = body(self.reference).map_err(|e| AssertError::Body {
            context: "reference",
            message: e.to_string(),
        })?;
        let actual = body(self.candidate).map_err(|e| AssertError::Body {
            context: "candidate",
            message: e.to_string(),
        })?;
        equals(
            &Value::Sequence(expected),
            &Value::Sequence(actual),
            self.options,
        )
    }
}

/// One-shot form of [`DualExecution`].
pub fn compare_both<C, F, E>(reference: &C, candidate: &C, almost: bool, body: F) -> Result<()>
where
    C: ?Sized,
    F: Fn(&C) -> std::result::Result<Vec<Value>, E>,
    E: Display,
{
    DualExecution::new(reference, candidate).almost(almost).run(body)
}
