//! Operands of the equality engine and their classification.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use framecheck_core::table::{DataFrame, Index, Materialize, Series, Table};
use framecheck_core::types::Scalar;

use crate::error::Result;

/// Anything `equals` accepts.
#[derive(Debug, Clone)]
pub enum Value {
    Table(Table),
    /// A table that must be materialized before comparison.
    Deferred(Arc<dyn Materialize>),
    Sequence(Vec<Value>),
    Scalar(Scalar),
    Null,
}

impl Value {
    pub fn deferred(handle: impl Materialize + 'static) -> Self {
        Value::Deferred(Arc::new(handle))
    }

    pub fn sequence<T: Into<Value>>(items: impl IntoIterator<Item = T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

/// An operand after materialization, ready for dispatch.
#[derive(Debug)]
pub enum Classified<'a> {
    Table(Cow<'a, Table>),
    Sequence(&'a [Value]),
    Scalar(&'a Scalar),
    Null,
}

/// Materialize deferred tables and fold scalar null markers into `Null`.
pub fn classify(value: &Value) -> Result<Classified<'_>> {
    Ok(match value {
        Value::Table(t) => Classified::Table(Cow::Borrowed(t)),
        Value::Deferred(handle) => Classified::Table(Cow::Owned(handle.to_local_table()?)),
        Value::Sequence(items) => Classified::Sequence(items),
        Value::Scalar(s) if s.is_null() => Classified::Null,
        Value::Scalar(s) => Classified::Scalar(s),
        Value::Null => Classified::Null,
    })
}

fn write_sequence(f: &mut fmt::Formatter<'_>, items: &[Value]) -> fmt::Result {
    f.write_str("[")?;
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{}", item)?;
    }
    f.write_str("]")
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Table(t) => write!(f, "{}", t),
            Value::Deferred(handle) => write!(f, "<deferred {:?}>", handle),
            Value::Sequence(items) => write_sequence(f, items),
            Value::Scalar(s) => f.write_str(&s.repr()),
            Value::Null => f.write_str("None"),
        }
    }
}

impl fmt::Display for Classified<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Classified::Table(t) => write!(f, "{}", t),
            Classified::Sequence(items) => write_sequence(f, items),
            Classified::Scalar(s) => f.write_str(&s.repr()),
            Classified::Null => f.write_str("None"),
        }
    }
}

impl From<Table> for Value {
    fn from(t: Table) -> Self {
        Value::Table(t)
    }
}

impl From<DataFrame> for Value {
    fn from(t: DataFrame) -> Self {
        Value::Table(Table::Frame(t))
    }
}

impl From<Series> for Value {
    fn from(t: Series) -> Self {
        Value::Table(Table::Series(t))
    }
}

impl From<Index> for Value {
    fn from(t: Index) -> Self {
        Value::Table(Table::Index(t))
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s)
    }
}

macro_rules! scalar_value {
    ($($ty:ty),*) => {
        $(impl From<$ty> for Value {
            fn from(v: $ty) -> Self {
                Value::Scalar(Scalar::from(v))
            }
        })*
    };
}

scalar_value!(bool, i32, i64, f32, f64, &str, String);

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::sequence(items)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nan_scalars_classify_as_null() {
        assert!(matches!(classify(&Value::from(f64::NAN)).unwrap(), Classified::Null));
        assert!(matches!(classify(&Value::Null).unwrap(), Classified::Null));
        assert!(matches!(classify(&Value::from(0i64)).unwrap(), Classified::Scalar(_)));
    }

    #[test]
    fn deferred_tables_materialize() {
        let value = Value::deferred(Table::Index(Index::range(2)));
        match classify(&value).unwrap() {
            Classified::Table(t) => assert_eq!(t.kind_name(), "Index"),
            other => panic!("expected a table, got {}", other),
        }
    }

    #[test]
    fn sequences_render_element_reprs() {
        let value = Value::from(vec![Value::from("a"), Value::from(1i64), Value::Null]);
        assert_eq!(value.to_string(), "['a', 1, None]");
    }
}
