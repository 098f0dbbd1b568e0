// The adapters to the database drivers.
//
// Each adapter owns one native connection and translates between the uniform vocabulary
// of this crate (DbValue, ResultSet, QueryError) and its driver.
#[cfg(feature = "mariadb")]
mod mariadb;
#[cfg(feature = "postgres")]
mod postgres;
#[cfg(feature = "sqlite")]
mod sqlite;

use crate::{
    sync::ResultSet, types::EscapedString, ConnectParams, DbError, DbResult, DbValue,
    DecodeError, FieldMetadata, QueryError, ResultSetMetadata,
};
use async_trait::async_trait;
use std::sync::Arc;

/// The supported database systems.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum BackendKind {
    /// MariaDB, or MySQL.
    MariaDb,
    /// PostgreSQL.
    Postgres,
    /// SQLite, with a database file or in memory.
    Sqlite,
}

impl BackendKind {
    /// The port the database server listens on by default; `0` for SQLite.
    pub fn default_port(self) -> u16 {
        match self {
            Self::MariaDb => 3306,
            Self::Postgres => 5432,
            Self::Sqlite => 0,
        }
    }

    /// The URL scheme.
    pub fn scheme(self) -> &'static str {
        match self {
            Self::MariaDb => crate::url::MARIADB,
            Self::Postgres => crate::url::POSTGRES,
            Self::Sqlite => crate::url::SQLITE,
        }
    }

    pub(crate) fn from_scheme(scheme: &str) -> Option<Self> {
        match scheme {
            crate::url::MARIADB | crate::url::MYSQL => Some(Self::MariaDb),
            crate::url::POSTGRES | crate::url::POSTGRESQL => Some(Self::Postgres),
            crate::url::SQLITE => Some(Self::Sqlite),
            _ => None,
        }
    }

    /// Returns true if support for this backend is compiled in.
    pub fn is_enabled(self) -> bool {
        match self {
            Self::MariaDb => cfg!(feature = "mariadb"),
            Self::Postgres => cfg!(feature = "postgres"),
            Self::Sqlite => cfg!(feature = "sqlite"),
        }
    }

    /// Escapes a string for use within a single-quoted string literal of this backend.
    ///
    /// Needs no database connection.
    pub fn escape(self, raw: &str) -> EscapedString {
        EscapedString::new(self, raw)
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(match self {
            Self::MariaDb => "MariaDB",
            Self::Postgres => "PostgreSQL",
            Self::Sqlite => "SQLite",
        })
    }
}

// What a statement execution reports back.
#[derive(Debug, Default)]
pub(crate) struct ExecOutcome {
    pub affected_rows: u64,
    // an insert that added rows; its key, or the lack of one, replaces the last insert id
    pub inserted: bool,
    pub last_insert_id: Option<i64>,
}

// The capability set that each adapter provides.
#[async_trait]
pub(crate) trait Backend: std::fmt::Debug + Send {
    fn kind(&self) -> BackendKind;

    async fn execute(&mut self, sql: &str, params: &[DbValue]) -> DbResult<ExecOutcome>;

    async fn select(&mut self, sql: &str, params: &[DbValue]) -> DbResult<ResultSet>;

    async fn close(self: Box<Self>) -> DbResult<()>;
}

pub(crate) async fn open(params: &ConnectParams) -> DbResult<Box<dyn Backend>> {
    match params.backend() {
        #[cfg(feature = "mariadb")]
        BackendKind::MariaDb => Ok(Box::new(mariadb::MariaDbBackend::connect(params).await?)),
        #[cfg(feature = "postgres")]
        BackendKind::Postgres => Ok(Box::new(postgres::PostgresBackend::connect(params).await?)),
        #[cfg(feature = "sqlite")]
        BackendKind::Sqlite => Ok(Box::new(sqlite::SqliteBackend::connect(params).await?)),
        #[allow(unreachable_patterns)]
        backend => Err(usage_err!(
            "support for {backend} is not compiled in; enable the corresponding cargo feature"
        )),
    }
}

// Maps driver errors to the error kinds of this crate.
pub(crate) fn query_error(error: sqlx::Error) -> DbError {
    match error {
        sqlx::Error::Database(db_error) => QueryError::new(
            db_error.code().map(|code| code.into_owned()),
            db_error.message().to_string(),
        )
        .into(),
        sqlx::Error::ColumnDecode { index, source } => {
            DecodeError::untyped(format!("column {index}: {source}")).into()
        }
        sqlx::Error::Decode(source) => DecodeError::untyped(source.to_string()).into(),
        e @ (sqlx::Error::ColumnNotFound(_)
        | sqlx::Error::ColumnIndexOutOfBounds { .. }
        | sqlx::Error::TypeNotFound { .. }) => DecodeError::untyped(e.to_string()).into(),
        e @ (sqlx::Error::Io(_)
        | sqlx::Error::Tls(_)
        | sqlx::Error::Protocol(_)
        | sqlx::Error::WorkerCrashed
        | sqlx::Error::PoolClosed
        | sqlx::Error::PoolTimedOut) => QueryError::connection_lost(e.to_string()).into(),
        e => QueryError::new(None, e.to_string()).into(),
    }
}

// Only inserts make a connection remember a generated key.
pub(crate) fn is_insert_statement(sql: &str) -> bool {
    let sql = sql.trim_start();
    ["insert", "replace"].iter().any(|keyword| {
        sql.get(..keyword.len())
            .is_some_and(|head| head.eq_ignore_ascii_case(keyword))
    })
}

// Several statements in one select text produce their rows one after the other;
// only rows of a single shape form a result set.
pub(crate) fn check_single_shape<R: sqlx::Row>(
    rows: &[R],
    metadata: &ResultSetMetadata,
) -> DbResult<()> {
    use sqlx::Column;
    for row in rows {
        let columns = row.columns();
        if columns.len() != metadata.len()
            || columns
                .iter()
                .zip(metadata.iter())
                .any(|(column, field)| column.name() != field.name())
        {
            return Err(usage_err!(
                "select must return a single result set; found rows with {} column(s) \
                 in a result with {} column(s)",
                columns.len(),
                metadata.len()
            ));
        }
    }
    Ok(())
}

pub(crate) fn metadata_of<C: sqlx::Column>(columns: &[C]) -> Arc<ResultSetMetadata> {
    use sqlx::TypeInfo;
    Arc::new(ResultSetMetadata::new(
        columns
            .iter()
            .map(|column| FieldMetadata::new(column.name(), column.type_info().name()))
            .collect(),
    ))
}
