use super::{
    check_single_shape, is_insert_statement, metadata_of, query_error, Backend, BackendKind,
    ExecOutcome,
};
use crate::{
    sync::ResultSet, types::Timestamp, ConnOpt, ConnectParams, DbError, DbResult, DbValue,
    DecodeError, FieldMetadata, ResultSetMetadata, TypeId,
};
use async_trait::async_trait;
use bigdecimal::{BigDecimal, ToPrimitive};
use sqlx::{
    postgres::{
        types::Oid, PgArguments, PgConnectOptions, PgConnection, PgRow, PgSslMode, Postgres,
    },
    query::Query,
    types::Json,
    Connection, Decode, Executor, Row, Statement, ValueRef,
};
use std::sync::Arc;
use time::{Date, OffsetDateTime, PrimitiveDateTime};

#[derive(Debug)]
pub(crate) struct PostgresBackend {
    conn: PgConnection,
}

impl PostgresBackend {
    pub(crate) async fn connect(params: &ConnectParams) -> DbResult<Self> {
        let mut options = PgConnectOptions::new()
            .host(params.host())
            .port(params.port_or_default())
            .username(params.dbuser())
            .password(params.password().unsecure());
        if let Some(dbname) = params.dbname() {
            options = options.database(dbname);
        }
        for (opt, value) in params.options() {
            options = match opt {
                ConnOpt::Socket => options.socket(value),
                ConnOpt::ApplicationName => options.application_name(value),
                ConnOpt::SslMode => options.ssl_mode(
                    value
                        .parse::<PgSslMode>()
                        .map_err(|e| DbError::conn_params(Box::new(e)))?,
                ),
                _ => return Err(usage_err!("option {opt} is not supported by PostgreSQL")),
            };
        }

        let conn = PgConnection::connect_with(&options)
            .await
            .map_err(|e| DbError::connect(BackendKind::Postgres, e))?;
        debug!(
            "user \"{}\" connected to PostgreSQL at {}",
            params.dbuser(),
            params.addr()
        );
        Ok(Self { conn })
    }

    async fn describe(&mut self, sql: &str) -> Arc<ResultSetMetadata> {
        match (&mut self.conn).prepare(sql).await {
            Ok(statement) => metadata_of(statement.columns()),
            Err(e) => {
                debug!("cannot describe empty result: {e}");
                Arc::default()
            }
        }
    }

    // Postgres has no per-connection insert id; lastval() reports the value most recently
    // obtained from any sequence in this session, and fails if there is none.
    // The exception block runs as a subtransaction, so that failure cannot abort
    // a transaction of the caller.
    async fn last_sequence_value(&mut self) -> Option<i64> {
        if let Err(e) = (&mut self.conn)
            .execute(sqlx::raw_sql(CAPTURE_LASTVAL))
            .await
        {
            debug!("cannot determine last insert id: {e}");
            return None;
        }
        match sqlx::query_scalar::<Postgres, Option<String>>(
            "SELECT current_setting('dbconnect.lastval', true)",
        )
        .fetch_one(&mut self.conn)
        .await
        {
            Ok(value) => value.and_then(|v| v.parse().ok()),
            Err(e) => {
                debug!("cannot determine last insert id: {e}");
                None
            }
        }
    }
}

const CAPTURE_LASTVAL: &str = "DO $$ BEGIN \
       PERFORM set_config('dbconnect.lastval', lastval()::text, false); \
     EXCEPTION WHEN object_not_in_prerequisite_state THEN \
       PERFORM set_config('dbconnect.lastval', '', false); \
     END $$";

#[async_trait]
impl Backend for PostgresBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Postgres
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
        let last_insert_id = if inserted {
            self.last_sequence_value().await
        } else {
            None
        };
        Ok(ExecOutcome {
            affected_rows,
            inserted,
            last_insert_id,
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
                row_values.push(decode_cell(row, col_idx, field)?);
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
    mut query: Query<'q, Postgres, PgArguments>,
    params: &[DbValue],
) -> Query<'q, Postgres, PgArguments> {
    for param in params {
        query = match param {
            DbValue::NULL => query.bind(None::<String>),
            DbValue::INT(i) => query.bind(*i),
            DbValue::DOUBLE(f) => query.bind(*f),
            DbValue::TEXT(s) => query.bind(s.clone()),
            DbValue::BLOB(b) => query.bind(b.clone()),
            DbValue::TIMESTAMP(ts) => query.bind(ts.to_primitive_date_time()),
        };
    }
    query
}

fn get<'r, T: Decode<'r, Postgres>>(row: &'r PgRow, col_idx: usize) -> DbResult<T> {
    row.try_get_unchecked(col_idx).map_err(query_error)
}

fn decimal_to_f64(value: &BigDecimal) -> DbResult<f64> {
    value.to_f64().ok_or_else(|| {
        DecodeError::new(TypeId::DOUBLE, format!("{value} is not representable")).into()
    })
}

fn decode_cell(row: &PgRow, col_idx: usize, field: &FieldMetadata) -> DbResult<DbValue> {
    if row.try_get_raw(col_idx).map_err(query_error)?.is_null() {
        return Ok(DbValue::NULL);
    }

    Ok(match (field.type_id(), field.type_name()) {
        (TypeId::NULL, _) => DbValue::NULL,
        (TypeId::INT, "INT2") => DbValue::INT(get::<i16>(row, col_idx)?.into()),
        (TypeId::INT, "INT4") => DbValue::INT(get::<i32>(row, col_idx)?.into()),
        (TypeId::INT, "BOOL") => DbValue::INT(get::<bool>(row, col_idx)?.into()),
        (TypeId::INT, "OID") => DbValue::INT(get::<Oid>(row, col_idx)?.0.into()),
        (TypeId::INT, _) => DbValue::INT(get(row, col_idx)?),
        (TypeId::DOUBLE, "FLOAT4") => DbValue::DOUBLE(get::<f32>(row, col_idx)?.into()),
        (TypeId::DOUBLE, "NUMERIC") => {
            DbValue::DOUBLE(decimal_to_f64(&get::<BigDecimal>(row, col_idx)?)?)
        }
        (TypeId::DOUBLE, _) => DbValue::DOUBLE(get(row, col_idx)?),
        (TypeId::BLOB, _) => DbValue::BLOB(get(row, col_idx)?),
        (TypeId::TIMESTAMP, "DATE") => {
            DbValue::TIMESTAMP(Timestamp::from(get::<Date>(row, col_idx)?))
        }
        (TypeId::TIMESTAMP, "TIMESTAMPTZ") => {
            DbValue::TIMESTAMP(Timestamp::from(get::<OffsetDateTime>(row, col_idx)?))
        }
        (TypeId::TIMESTAMP, _) => {
            DbValue::TIMESTAMP(Timestamp::from(get::<PrimitiveDateTime>(row, col_idx)?))
        }
        (TypeId::TEXT, "JSON" | "JSONB") => {
            DbValue::TEXT(get::<Json<serde_json::Value>>(row, col_idx)?.0.to_string())
        }
        (TypeId::TEXT, "TIME") => {
            let time: time::Time = get(row, col_idx)?;
            DbValue::TEXT(format!(
                "{:02}:{:02}:{:02}",
                time.hour(),
                time.minute(),
                time.second()
            ))
        }
        (TypeId::TEXT, _) => DbValue::TEXT(get(row, col_idx)?),
    })
}
