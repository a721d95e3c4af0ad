//! Logical schema types. Pure data; no Arrow dependency here.
//!
//! `DataType` also carries the dtype names and equivalence classes the
//! equality engine reports and checks.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    Boolean,
    Int32,
    Int64,
    Float32,
    Float64,
    Utf8,
    Binary,
    Date64,
    Decimal128,
}

/// Groups of dtypes that an `equiv` axis check treats as interchangeable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeClass {
    Boolean,
    Integer,
    Float,
    Object,
    Datetime,
    Decimal,
}

impl DataType {
    /// dtype name as shown in diagnostics.
    pub fn dtype_name(&self) -> &'static str {
        match self {
            DataType::Boolean => "bool",
            DataType::Int32 => "int32",
            DataType::Int64 => "int64",
            DataType::Float32 => "float32",
            DataType::Float64 => "float64",
            DataType::Utf8 | DataType::Binary => "object",
            DataType::Date64 => "datetime64[ms]",
            DataType::Decimal128 => "decimal",
        }
    }

    pub fn type_class(&self) -> TypeClass {
        match self {
            DataType::Boolean => TypeClass::Boolean,
            DataType::Int32 | DataType::Int64 => TypeClass::Integer,
            DataType::Float32 | DataType::Float64 => TypeClass::Float,
            DataType::Utf8 | DataType::Binary => TypeClass::Object,
            DataType::Date64 => TypeClass::Datetime,
            DataType::Decimal128 => TypeClass::Decimal,
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(
            self.type_class(),
            TypeClass::Integer | TypeClass::Float | TypeClass::Decimal
        )
    }

    /// Marker printed for a missing cell of this type.
    pub fn null_repr(&self) -> &'static str {
        match self.type_class() {
            TypeClass::Integer | TypeClass::Float | TypeClass::Decimal => "NaN",
            TypeClass::Datetime => "NaT",
            TypeClass::Boolean | TypeClass::Object => "None",
        }
    }
}

impl std::fmt::Display for DataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.dtype_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    pub data_type: DataType,
    pub nullable: bool,
}

impl Field {
    pub fn new(name: impl Into<String>, data_type: DataType, nullable: bool) -> Self {
        Self {
            name: name.into(),
            data_type,
            nullable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub fields: Vec<Field>,
}

impl Schema {
    pub fn new(fields: Vec<Field>) -> Self {
        Self { fields }
    }

    pub fn field(&self, idx: usize) -> Option<&Field> {
        self.fields.get(idx)
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }
}
