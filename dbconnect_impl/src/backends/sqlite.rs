use super::{
    check_single_shape, is_insert_statement, metadata_of, query_error, Backend, BackendKind,
    ExecOutcome,
};
use crate::{
    codec, conn::parse_bool, sync::ResultSet, types::Timestamp, ConnOpt, ConnectParams, DbError,
    DbResult, DbValue, ResultSetMetadata, TypeId,
};
use async_trait::async_trait;
use sqlx::{
    query::Query,
    sqlite::{Sqlite, SqliteArguments, SqliteConnectOptions, SqliteConnection, SqliteRow},
    Connection, Executor, Row, Statement, TypeInfo, ValueRef,
};
use std::{str::FromStr, sync::Arc, time::Duration};

#[derive(Debug)]
pub(crate) struct SqliteBackend {
    conn: SqliteConnection,
}

impl SqliteBackend {
    pub(crate) async fn connect(params: &ConnectParams) -> DbResult<Self> {
        let dbname = params
            .dbname()
            .ok_or(DbError::Usage("SQLite requires the path of the database file"))?;
        let mut options = if dbname == ":memory:" {
            SqliteConnectOptions::from_str("sqlite::memory:")
                .map_err(|e| DbError::conn_params(Box::new(e)))?
        } else {
            SqliteConnectOptions::new().filename(dbname)
        };

        options = options.create_if_missing(true);
        for (opt, value) in params.options() {
            options = match opt {
                ConnOpt::CreateIfMissing => options.create_if_missing(parse_bool(opt, value)?),
                ConnOpt::ReadOnly => options.read_only(parse_bool(opt, value)?),
                ConnOpt::ForeignKeys => options.foreign_keys(parse_bool(opt, value)?),
                ConnOpt::BusyTimeoutMs => options.busy_timeout(Duration::from_millis(
                    value
                        .parse()
                        .map_err(|e| DbError::conn_params(Box::new(e)))?,
                )),
                _ => return Err(usage_err!("option {opt} is not supported by SQLite")),
            };
        }

        let conn = SqliteConnection::connect_with(&options)
            .await
            .map_err(|e| DbError::connect(BackendKind::Sqlite, e))?;
        debug!("opened SQLite database {dbname}");
        Ok(Self { conn })
    }

    // Column descriptions of a query that returned no rows.
    async fn describe(&mut self, sql: &str) -> Arc<ResultSetMetadata> {
        match (&mut self.conn).prepare(sql).await {
            Ok(statement) => metadata_of(statement.columns()),
            Err(e) => {
                debug!("cannot describe empty result: {e}");
                Arc::default()
            }
        }
    }
}

#[async_trait]
impl Backend for SqliteBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Sqlite
    }

    async fn execute(&mut self, sql: &str, params: &[DbValue]) -> DbResult<ExecOutcome> {
        let result = if params.is_empty() {
            (&mut self.conn).execute(sqlx::raw_sql(sql)).await
        } else {
            bind_all(sqlx::query(sql), params)
                .execute(&mut self.conn)
                .await
        }
        .map_err(query_error)?;

        let affected_rows = result.rows_affected();
        let inserted = affected_rows > 0 && is_insert_statement(sql);
        Ok(ExecOutcome {
            affected_rows,
            inserted,
            last_insert_id: inserted.then(|| result.last_insert_rowid()),
        })
    }

    async fn select(&mut self, sql: &str, params: &[DbValue]) -> DbResult<ResultSet> {
        let rows = if params.is_empty() {
            (&mut self.conn).fetch_all(sqlx::raw_sql(sql)).await
        } else {
            bind_all(sqlx::query(sql), params)
                .fetch_all(&mut self.conn)
                .await
        }
        .map_err(query_error)?;

        let metadata = match rows.first() {
            Some(row) => metadata_of(row.columns()),
            None => self.describe(sql).await,
        };
        check_single_shape(&rows, &metadata)?;
        let mut values = Vec::with_capacity(rows.len());
        for row in &rows {
            let mut row_values = Vec::with_capacity(metadata.len());
            for (col_idx, field) in metadata.iter().enumerate() {
                row_values.push(decode_cell(row, col_idx, field.type_id())?);
            }
            values.push(row_values);
        }
        Ok(ResultSet::new(metadata, values))
    }

    async fn close(self: Box<Self>) -> DbResult<()> {
        self.conn.close().await.map_err(query_error)
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &[DbValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for param in params {
        query = match param {
            DbValue::NULL => query.bind(None::<String>),
            DbValue::INT(i) => query.bind(*i),
            DbValue::DOUBLE(f) => query.bind(*f),
            DbValue::TEXT(s) => query.bind(s.clone()),
            DbValue::BLOB(b) => query.bind(b.clone()),
            // SQLite has no date type; timestamps are stored in their canonical text form
            DbValue::TIMESTAMP(ts) => query.bind(ts.to_string()),
        };
    }
    query
}

// SQLite values carry their own storage class, which can differ from the declared column type.
fn decode_cell(row: &SqliteRow, col_idx: usize, declared: TypeId) -> DbResult<DbValue> {
    let raw = row.try_get_raw(col_idx).map_err(query_error)?;
    if raw.is_null() {
        return Ok(DbValue::NULL);
    }
    let storage_class = TypeId::from_type_name(raw.type_info().name());

    Ok(match (storage_class, declared) {
        (TypeId::INT, TypeId::TIMESTAMP) => DbValue::TIMESTAMP(Timestamp::from_unix_timestamp(
            row.try_get_unchecked(col_idx).map_err(query_error)?,
        )?),
        (TypeId::TEXT, TypeId::TIMESTAMP) => {
            let text: String = row.try_get_unchecked(col_idx).map_err(query_error)?;
            codec::decode(text.as_bytes(), TypeId::TIMESTAMP)?
        }
        (TypeId::INT, _) => DbValue::INT(row.try_get_unchecked(col_idx).map_err(query_error)?),
        (TypeId::DOUBLE, _) => {
            DbValue::DOUBLE(row.try_get_unchecked(col_idx).map_err(query_error)?)
        }
        (TypeId::BLOB, _) => DbValue::BLOB(row.try_get_unchecked(col_idx).map_err(query_error)?),
        _ => DbValue::TEXT(row.try_get_unchecked(col_idx).map_err(query_error)?),
    })
}
