use crate::{types::Timestamp, DbError, DbResult, TypeId};

/// Enum for all supported database value types.
///
/// The backends' many column types are mapped to these few variants,
/// see [`TypeId::from_type_name`](crate::TypeId::from_type_name).
#[allow(non_camel_case_types)]
#[derive(Clone, Debug, PartialEq)]
pub enum DbValue {
    /// Representation of a database NULL value.
    NULL,
    /// Stores a 64-bit signed integer; also used for smaller integers and booleans.
    INT(i64),
    /// Stores a double-precision 64-bit floating-point number;
    /// also used for fixed-point decimals (with possible loss of precision).
    DOUBLE(f64),
    /// Stores a character string.
    TEXT(String),
    /// Stores binary data, with its exact length; may contain zero bytes.
    BLOB(Vec<u8>),
    /// Stores a date-time with second precision.
    TIMESTAMP(Timestamp),
}

impl DbValue {
    /// Returns the `TypeId` that corresponds to the variant.
    pub fn type_id(&self) -> TypeId {
        match self {
            Self::NULL => TypeId::NULL,
            Self::INT(_) => TypeId::INT,
            Self::DOUBLE(_) => TypeId::DOUBLE,
            Self::TEXT(_) => TypeId::TEXT,
            Self::BLOB(_) => TypeId::BLOB,
            Self::TIMESTAMP(_) => TypeId::TIMESTAMP,
        }
    }

    /// Returns true if the value is a NULL value.
    pub fn is_null(&self) -> bool {
        matches!(*self, Self::NULL)
    }

    /// Returns the contained integer.
    ///
    /// # Errors
    ///
    /// `DbError::Usage` if the value is not an `INT`.
    pub fn try_into_i64(self) -> DbResult<i64> {
        match self {
            Self::INT(i) => Ok(i),
            v => Err(wrong_variant("INT", &v)),
        }
    }

    /// Returns the contained double; integers are converted.
    ///
    /// # Errors
    ///
    /// `DbError::Usage` if the value is neither a `DOUBLE` nor an `INT`.
    #[allow(clippy::cast_precision_loss)]
    pub fn try_into_f64(self) -> DbResult<f64> {
        match self {
            Self::DOUBLE(f) => Ok(f),
            Self::INT(i) => Ok(i as f64),
            v => Err(wrong_variant("DOUBLE", &v)),
        }
    }

    /// Returns the contained string.
    ///
    /// # Errors
    ///
    /// `DbError::Usage` if the value is not a `TEXT`.
    pub fn try_into_string(self) -> DbResult<String> {
        match self {
            Self::TEXT(s) => Ok(s),
            v => Err(wrong_variant("TEXT", &v)),
        }
    }

    /// Returns the contained bytes.
    ///
    /// # Errors
    ///
    /// `DbError::Usage` if the value is not a `BLOB`.
    pub fn try_into_bytes(self) -> DbResult<Vec<u8>> {
        match self {
            Self::BLOB(b) => Ok(b),
            v => Err(wrong_variant("BLOB", &v)),
        }
    }

    /// Returns the contained timestamp.
    ///
    /// # Errors
    ///
    /// `DbError::Usage` if the value is not a `TIMESTAMP`.
    pub fn try_into_timestamp(self) -> DbResult<Timestamp> {
        match self {
            Self::TIMESTAMP(ts) => Ok(ts),
            v => Err(wrong_variant("TIMESTAMP", &v)),
        }
    }

    /// Returns the contained integer, if the value is an `INT`.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::INT(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the contained string, if the value is a `TEXT`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::TEXT(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the contained bytes, if the value is a `BLOB`.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::BLOB(b) => Some(b),
            _ => None,
        }
    }
}

fn wrong_variant(expected: &str, found: &DbValue) -> DbError {
    usage_err!("value is not a {expected}, but a {}", found.type_id())
}

impl std::fmt::Display for DbValue {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::NULL => write!(fmt, "[null]"),
            Self::INT(i) => write!(fmt, "{i}"),
            Self::DOUBLE(f) => write!(fmt, "{f}"),
            Self::TEXT(s) => write!(fmt, "{s}"),
            Self::BLOB(b) => write!(fmt, "<BLOB length = {}>", b.len()),
            Self::TIMESTAMP(ts) => write!(fmt, "{ts}"),
        }
    }
}

impl From<i64> for DbValue {
    fn from(i: i64) -> Self {
        Self::INT(i)
    }
}
impl From<i32> for DbValue {
    fn from(i: i32) -> Self {
        Self::INT(i64::from(i))
    }
}
impl From<f64> for DbValue {
    fn from(f: f64) -> Self {
        Self::DOUBLE(f)
    }
}
impl From<bool> for DbValue {
    fn from(b: bool) -> Self {
        Self::INT(i64::from(b))
    }
}
impl From<&str> for DbValue {
    fn from(s: &str) -> Self {
        Self::TEXT(s.to_string())
    }
}
impl From<String> for DbValue {
    fn from(s: String) -> Self {
        Self::TEXT(s)
    }
}
impl From<Vec<u8>> for DbValue {
    fn from(b: Vec<u8>) -> Self {
        Self::BLOB(b)
    }
}
impl From<&[u8]> for DbValue {
    fn from(b: &[u8]) -> Self {
        Self::BLOB(b.to_vec())
    }
}
impl From<Timestamp> for DbValue {
    fn from(ts: Timestamp) -> Self {
        Self::TIMESTAMP(ts)
    }
}
impl<T: Into<DbValue>> From<Option<T>> for DbValue {
    fn from(o: Option<T>) -> Self {
        o.map_or(Self::NULL, Into::into)
    }
}
