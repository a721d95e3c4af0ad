//! Cell values and named columns.

use serde::{Deserialize, Serialize};

use crate::schema::DataType;

/// One nullable cell.
///
/// A floating NaN is a null marker just like `Null`; see [`Scalar::is_null`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Scalar {
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F32(f32),
    F64(f64),
    Str(String),
    Bin(Vec<u8>),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        match self {
            Scalar::Null => true,
            Scalar::F32(v) => v.is_nan(),
            Scalar::F64(v) => v.is_nan(),
            _ => false,
        }
    }

    /// Type of a non-null cell. `Null` has none.
    pub fn data_type(&self) -> Option<DataType> {
        match self {
            Scalar::Null => None,
            Scalar::Bool(_) => Some(DataType::Boolean),
            Scalar::I32(_) => Some(DataType::Int32),
            Scalar::I64(_) => Some(DataType::Int64),
            Scalar::F32(_) => Some(DataType::Float32),
            Scalar::F64(_) => Some(DataType::Float64),
            Scalar::Str(_) => Some(DataType::Utf8),
            Scalar::Bin(_) => Some(DataType::Binary),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Scalar::I32(_) | Scalar::I64(_) | Scalar::F32(_) | Scalar::F64(_)
        )
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::I32(v) => Some(*v as f64),
            Scalar::I64(v) => Some(*v as f64),
            Scalar::F32(v) => Some(*v as f64),
            Scalar::F64(v) => Some(*v),
            _ => None,
        }
    }

    /// Integer cells widened to `i64`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Scalar::I32(v) => Some(i64::from(*v)),
            Scalar::I64(v) => Some(*v),
            _ => None,
        }
    }

    /// Value equality across numeric widths (`1 == 1.0`); other kinds must
    /// match exactly. Integers never go through `f64`, so values above 2^53
    /// keep their precision. Nulls are not handled here.
    pub fn value_eq(&self, other: &Scalar) -> bool {
        match (self.as_i64(), other.as_i64()) {
            (Some(a), Some(b)) => return a == b,
            (Some(i), None) => return other.as_f64().map_or(false, |f| int_eq_float(i, f)),
            (None, Some(i)) => return self.as_f64().map_or(false, |f| int_eq_float(i, f)),
            (None, None) => {}
        }
        match (self.as_f64(), other.as_f64()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Quoted form used inside lists and index reprs.
    pub fn repr(&self) -> String {
        match self {
            Scalar::Str(s) => format!("'{}'", s),
            other => other.to_string(),
        }
    }
}

/// An integral float inside the `i64` range compares as an integer.
fn int_eq_float(i: i64, f: f64) -> bool {
    const LIMIT: f64 = 9_223_372_036_854_775_808.0; // 2^63
    f.fract() == 0.0 && f >= -LIMIT && f < LIMIT && f as i64 == i
}

impl std::fmt::Display for Scalar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Scalar::Null => f.write_str("None"),
            Scalar::Bool(true) => f.write_str("True"),
            Scalar::Bool(false) => f.write_str("False"),
            Scalar::I32(v) => write!(f, "{}", v),
            Scalar::I64(v) => write!(f, "{}", v),
            Scalar::F32(v) if v.is_nan() => f.write_str("NaN"),
            Scalar::F64(v) if v.is_nan() => f.write_str("NaN"),
            // Debug keeps the trailing `.0` on whole floats.
            Scalar::F32(v) => write!(f, "{:?}", v),
            Scalar::F64(v) => write!(f, "{:?}", v),
            Scalar::Str(s) => f.write_str(s),
            Scalar::Bin(b) => write!(f, "b{:?}", String::from_utf8_lossy(b)),
        }
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Scalar::Bool(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Scalar::I32(v)
    }
}

impl From<i64> for Scalar {
    fn from(v: i64) -> Self {
        Scalar::I64(v)
    }
}

impl From<f32> for Scalar {
    fn from(v: f32) -> Self {
        Scalar::F32(v)
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Scalar::F64(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Scalar::Str(v.to_string())
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Scalar::Str(v)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Scalar::Null)
    }
}

/// Pick a dtype for a run of cells: the first non-null cell decides.
/// All-null runs become float64 when a NaN is present, object otherwise.
pub fn infer_data_type(values: &[Scalar]) -> DataType {
    if let Some(dt) = values
        .iter()
        .filter(|v| !v.is_null())
        .find_map(Scalar::data_type)
    {
        return dt;
    }
    if values.iter().any(|v| matches!(v, Scalar::F64(_))) {
        DataType::Float64
    } else if values.iter().any(|v| matches!(v, Scalar::F32(_))) {
        DataType::Float32
    } else {
        DataType::Utf8
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub data_type: DataType,
    pub values: Vec<Scalar>,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: DataType, values: Vec<Scalar>) -> Self {
        Self {
            name: name.into(),
            data_type,
            values,
        }
    }

    /// Build a column whose dtype is inferred from its cells.
    pub fn from_values<T: Into<Scalar>>(name: impl Into<String>, values: Vec<T>) -> Self {
        let values: Vec<Scalar> = values.into_iter().map(Into::into).collect();
        let data_type = infer_data_type(&values);
        Self::new(name, data_type, values)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn null_mask(&self) -> Vec<bool> {
        self.values.iter().map(Scalar::is_null).collect()
    }

    /// Cells with nulls dropped, order preserved.
    pub fn non_null(&self) -> impl Iterator<Item = &Scalar> {
        self.values.iter().filter(|v| !v.is_null())
    }
}
