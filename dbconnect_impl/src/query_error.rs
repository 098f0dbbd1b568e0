use std::error::Error;
use std::time::Duration;

/// Describes an error that occured while the database processed a statement.
///
/// Most query errors are reported by the database itself (syntax errors, constraint
/// violations, missing tables) and leave the connection usable.
/// If [`is_connection_lost`](QueryError::is_connection_lost) returns true, the session broke
/// during the call, and the connection that produced the error is closed.
#[derive(Clone, PartialEq, Eq)]
pub struct QueryError {
    backend_code: Option<String>,
    message: String,
    connection_lost: bool,
}

impl QueryError {
    /// Returns the backend's error code, if the backend reported one.
    ///
    /// For MariaDB this is the numeric server error code, for PostgreSQL the SQLSTATE,
    /// for SQLite the (extended) result code, each in its textual form.
    #[must_use]
    pub fn backend_code(&self) -> Option<&str> {
        self.backend_code.as_deref()
    }

    /// Returns the description of the error.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns true if the session to the database was lost.
    #[must_use]
    pub fn is_connection_lost(&self) -> bool {
        self.connection_lost
    }

    pub(crate) fn new(backend_code: Option<String>, message: String) -> Self {
        Self {
            backend_code,
            message,
            connection_lost: false,
        }
    }

    pub(crate) fn connection_lost(message: String) -> Self {
        Self {
            backend_code: None,
            message,
            connection_lost: true,
        }
    }

    // after a timeout the state of the wire protocol is unknown, so the session is given up
    pub(crate) fn timed_out(timeout: Duration) -> Self {
        Self::connection_lost(format!("no response from the database within {timeout:?}"))
    }
}

impl Error for QueryError {}

impl std::fmt::Display for QueryError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.backend_code {
            Some(ref code) => write!(fmt, "[{code}] {}", self.message)?,
            None => write!(fmt, "{}", self.message)?,
        }
        if self.connection_lost {
            write!(fmt, " (connection lost)")?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for QueryError {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self}")
    }
}
