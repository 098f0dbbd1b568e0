//! Do not use this crate directly.
//!
//! This is the implementation crate for `dbconnect`.
//!

#![deny(missing_debug_implementations)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]

#[macro_use]
extern crate log;
#[macro_use]
extern crate serde;

#[macro_use]
mod db_error;

mod backends;
pub mod codec;
mod conn;
mod db_value;
mod field_metadata;
mod json;
mod query_error;
mod row;
mod type_id;
mod types_impl;
pub mod url;

pub mod sync;

pub use crate::backends::BackendKind;
pub use crate::conn::{
    ConnOpt, ConnectParams, ConnectParamsBuilder, ConnectionConfiguration, ConnectionState,
    ConnectionStatistics, IntoConnectParams, IntoConnectParamsBuilder,
};
pub use crate::db_error::{DbError, DbResult, DecodeError};
pub use crate::db_value::DbValue;
pub use crate::field_metadata::{FieldMetadata, ResultSetMetadata};
pub use crate::query_error::QueryError;
pub use crate::row::{Cell, Row};
pub use crate::type_id::TypeId;

pub use time;

/// Non-standard types that are used within the
/// [`DbValue`](crate::DbValue)s of a [`ResultSet`](crate::sync::ResultSet),
/// or that are produced by a connection.
pub mod types {
    pub use crate::types_impl::{escaped_string::EscapedString, timestamp::Timestamp};
}
