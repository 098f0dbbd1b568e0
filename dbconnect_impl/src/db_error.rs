use crate::{BackendKind, QueryError, TypeId};
use thiserror::Error;

/// A list specifying categories of [`DbError`](crate::DbError).
///
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum DbError {
    /// Opening the session failed, e.g. because the server is unreachable or
    /// the credentials were rejected.
    #[error("Connecting to the {backend} database failed")]
    Connect {
        /// The backend that was tried.
        backend: BackendKind,
        /// The causing Error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Database responded with an error, or the session broke during the call;
    /// the contained `QueryError` describes the concrete reason.
    #[error("Database responded with an error")]
    Query {
        /// The causing Error.
        #[from]
        source: QueryError,
    },

    /// A value delivered by the database could not be decoded.
    #[error("Error occured in decoding a database value")]
    Decode {
        /// The causing Error.
        #[from]
        source: DecodeError,
    },

    /// The connection was already closed, either explicitly or because the session
    /// was lost.
    #[error("The connection is not open")]
    NotConnected,

    /// Erroneous Connection Parameters, e.g. from a malformed connection URL.
    #[error("Erroneous Connection Parameters")]
    ConnParams {
        /// The causing Error.
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    /// Implementation error.
    #[error("Implementation error: {}", _0)]
    Impl(&'static str),

    /// Error occured in setting up the connection's local resources.
    #[error(transparent)]
    Io {
        /// The causing Error.
        #[from]
        source: std::io::Error,
    },

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    Usage(&'static str),

    /// Error caused by wrong usage.
    #[error("Wrong usage: {}", _0)]
    UsageDetailed(String),
}

/// Abbreviation of `Result<T, DbError>`.
pub type DbResult<T> = std::result::Result<T, DbError>;

impl DbError {
    /// Returns the contained `QueryError`, if any.
    ///
    /// This method helps in case you need programmatic access to e.g. the backend's error code.
    ///
    /// ```rust,no_run
    /// # use dbconnect::{Connection, DbResult};
    /// # fn main() -> DbResult<()> {
    /// # let mut connection = Connection::new("sqlite::memory:")?;
    /// if let Err(e) = connection.execute("insert into missing_table values (1)") {
    ///     if let Some(query_error) = e.query_error() {
    ///         println!("backend code: {:?}", query_error.backend_code());
    ///     }
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn query_error(&self) -> Option<&QueryError> {
        match self {
            Self::Query { source } => Some(source),
            _ => None,
        }
    }

    /// Returns the contained `DecodeError`, if any.
    pub fn decode_error(&self) -> Option<&DecodeError> {
        match self {
            Self::Decode { source } => Some(source),
            _ => None,
        }
    }

    /// Returns true if the error means that the session to the database is gone.
    ///
    /// The connection that produced such an error is in state `Closed`.
    pub fn is_connection_lost(&self) -> bool {
        match self {
            Self::Connect { .. } | Self::NotConnected => true,
            Self::Query { source } => source.is_connection_lost(),
            _ => false,
        }
    }

    /// Reveal the inner error
    pub fn inner(&self) -> Option<&dyn std::error::Error> {
        match self {
            Self::Connect { source, .. } | Self::ConnParams { source } => Some(&**source),
            Self::Query { source } => Some(source),
            Self::Decode { source } => Some(source),
            Self::Io { source } => Some(source),
            _ => None,
        }
    }

    pub(crate) fn conn_params(error: Box<dyn std::error::Error + Send + Sync + 'static>) -> Self {
        Self::ConnParams { source: error }
    }

    pub(crate) fn connect<E>(backend: BackendKind, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync + 'static>>,
    {
        Self::Connect {
            backend,
            source: error.into(),
        }
    }
}

/// Describes a database value that could not be converted into a [`DbValue`](crate::DbValue).
///
/// This indicates corrupted data or a driver issue, not a wrong query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("cannot decode value of type {type_id:?}: {reason}")]
pub struct DecodeError {
    type_id: Option<TypeId>,
    reason: String,
}
impl DecodeError {
    pub(crate) fn new<S: Into<String>>(type_id: TypeId, reason: S) -> Self {
        Self {
            type_id: Some(type_id),
            reason: reason.into(),
        }
    }

    pub(crate) fn untyped<S: Into<String>>(reason: S) -> Self {
        Self {
            type_id: None,
            reason: reason.into(),
        }
    }

    /// The declared type the value was supposed to have, if known.
    pub fn type_id(&self) -> Option<TypeId> {
        self.type_id
    }

    /// Describes what went wrong.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[macro_export]
macro_rules! usage_err {
    ($($arg:tt)*) => {{
        $crate::DbError::UsageDetailed(format!($($arg)*))
    }};
}
