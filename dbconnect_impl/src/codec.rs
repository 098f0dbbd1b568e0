//! Conversion between the raw representation of column values and [`DbValue`].
//!
//! Backends that transport values in text form (e.g. SQLite dates, which are stored as TEXT)
//! use [`decode`]; the opposite direction, [`encode_literal`], produces SQL literals
//! that are valid for a given backend, and is mainly used for logging and debugging.
//!
//! Statements should be built with parameters rather than with literals,
//! see [`Connection::execute_with_params`](crate::sync::Connection::execute_with_params).

use crate::{types::EscapedString, types::Timestamp, BackendKind, DbValue, DecodeError, TypeId};

/// Decodes the raw bytes of a non-null column value according to the declared type.
///
/// * `INT`: decimal digits with optional sign,
/// * `DOUBLE`: a decimal floating point number,
/// * `TEXT`: UTF-8,
/// * `BLOB`: any bytes; the length is taken as is, zero bytes included,
/// * `TIMESTAMP`: `YYYY-MM-DD HH:MM:SS`, see [`Timestamp::parse`],
/// * `NULL`: only an empty slice is accepted.
///
/// # Errors
///
/// `DecodeError` if the bytes do not satisfy the format of the declared type.
pub fn decode(raw: &[u8], type_id: TypeId) -> Result<DbValue, DecodeError> {
    Ok(match type_id {
        TypeId::NULL => {
            if raw.is_empty() {
                DbValue::NULL
            } else {
                return Err(DecodeError::new(
                    type_id,
                    format!("got {} bytes for a column without type", raw.len()),
                ));
            }
        }
        TypeId::INT => DbValue::INT(
            utf8(raw, type_id)?
                .parse::<i64>()
                .map_err(|e| DecodeError::new(type_id, e.to_string()))?,
        ),
        TypeId::DOUBLE => DbValue::DOUBLE(
            utf8(raw, type_id)?
                .parse::<f64>()
                .map_err(|e| DecodeError::new(type_id, e.to_string()))?,
        ),
        TypeId::TEXT => DbValue::TEXT(utf8(raw, type_id)?.to_string()),
        TypeId::BLOB => DbValue::BLOB(raw.to_vec()),
        TypeId::TIMESTAMP => DbValue::TIMESTAMP(Timestamp::parse(utf8(raw, type_id)?)?),
    })
}

/// Decodes a column value that may be NULL; `None` represents NULL.
///
/// # Errors
///
/// `DecodeError` if the bytes do not satisfy the format of the declared type.
pub fn decode_nullable(raw: Option<&[u8]>, type_id: TypeId) -> Result<DbValue, DecodeError> {
    match raw {
        None => Ok(DbValue::NULL),
        Some(raw) => decode(raw, type_id),
    }
}

/// Decodes a column value from a buffer for which the wire protocol announced a length.
///
/// Exactly `declared_len` bytes are used; trailing bytes in the buffer are ignored.
///
/// # Errors
///
/// `DecodeError` if the buffer is shorter than announced (truncated value),
/// or if the bytes do not satisfy the format of the declared type.
pub fn decode_sized(
    raw: &[u8],
    declared_len: usize,
    type_id: TypeId,
) -> Result<DbValue, DecodeError> {
    if raw.len() < declared_len {
        return Err(DecodeError::new(
            type_id,
            format!(
                "truncated value: {declared_len} bytes announced, only {} available",
                raw.len()
            ),
        ));
    }
    decode(&raw[..declared_len], type_id)
}

fn utf8(raw: &[u8], type_id: TypeId) -> Result<&str, DecodeError> {
    std::str::from_utf8(raw).map_err(|e| DecodeError::new(type_id, e.to_string()))
}

/// Produces a SQL literal for the value that is valid for the given backend.
///
/// Doubles use the shortest representation that parses back to the same value;
/// non-finite doubles have no SQL literal and are rendered as `NULL`.
/// Blobs are written as hex literals.
pub fn encode_literal(value: &DbValue, backend: BackendKind) -> String {
    match value {
        DbValue::NULL => "NULL".to_string(),
        DbValue::INT(i) => i.to_string(),
        DbValue::DOUBLE(f) if f.is_finite() => {
            let s = f.to_string();
            // keep the literal a floating point literal
            if s.contains(['.', 'e', 'E']) {
                s
            } else {
                format!("{s}.0")
            }
        }
        DbValue::DOUBLE(_) => "NULL".to_string(),
        DbValue::TEXT(s) => EscapedString::new(backend, s).quoted(),
        DbValue::BLOB(b) => match backend {
            BackendKind::MariaDb | BackendKind::Sqlite => format!("X'{}'", hex::encode_upper(b)),
            BackendKind::Postgres => format!("'\\x{}'::bytea", hex::encode(b)),
        },
        DbValue::TIMESTAMP(ts) => format!("'{ts}'"),
    }
}
