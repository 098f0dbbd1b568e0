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
    mysql::{MySql, MySqlArguments, MySqlConnectOptions, MySqlConnection, MySqlRow, MySqlSslMode},
    query::Query,
    Connection, Decode, Executor, Row, Statement, ValueRef,
};
use std::sync::Arc;
use time::{Date, PrimitiveDateTime};

#[derive(Debug)]
pub(crate) struct MariaDbBackend {
    conn: MySqlConnection,
}

impl MariaDbBackend {
    pub(crate) async fn connect(params: &ConnectParams) -> DbResult<Self> {
        let mut options = MySqlConnectOptions::new()
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
                ConnOpt::Charset => options.charset(value),
                ConnOpt::SslMode => options.ssl_mode(
                    value
                        .parse::<MySqlSslMode>()
                        .map_err(|e| DbError::conn_params(Box::new(e)))?,
                ),
                _ => return Err(usage_err!("option {opt} is not supported by MariaDB")),
            };
        }

        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(|e| DbError::connect(BackendKind::MariaDb, e))?;
        debug!(
            "user \"{}\" connected to MariaDB at {}",
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
}

#[async_trait]
impl Backend for MariaDbBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::MariaDb
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
        // the server reports 0 if the statement did not generate a key
        let last_insert_id = match result.last_insert_id() {
            0 => None,
            id => i64::try_from(id).ok(),
        };
        Ok(ExecOutcome {
            affected_rows,
            inserted,
            last_insert_id: last_insert_id.filter(|_| inserted),
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
    mut query: Query<'q, MySql, MySqlArguments>,
    params: &[DbValue],
) -> Query<'q, MySql, MySqlArguments> {
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

fn get<'r, T: Decode<'r, MySql>>(row: &'r MySqlRow, col_idx: usize) -> DbResult<T> {
    row.try_get_unchecked(col_idx).map_err(query_error)
}

fn decode_cell(row: &MySqlRow, col_idx: usize, field: &FieldMetadata) -> DbResult<DbValue> {
    if row.try_get_raw(col_idx).map_err(query_error)?.is_null() {
        return Ok(DbValue::NULL);
    }
    let type_name = field.type_name();

    Ok(match field.type_id() {
        TypeId::NULL => DbValue::NULL,
        TypeId::INT if type_name.ends_with("UNSIGNED") => {
            let value: u64 = get(row, col_idx)?;
            DbValue::INT(i64::try_from(value).map_err(|_| {
                DecodeError::new(TypeId::INT, format!("{value} exceeds the range of INT"))
            })?)
        }
        TypeId::INT => DbValue::INT(get(row, col_idx)?),
        TypeId::DOUBLE if matches!(type_name, "DECIMAL" | "NUMERIC") => {
            let value: BigDecimal = get(row, col_idx)?;
            DbValue::DOUBLE(value.to_f64().ok_or_else(|| {
                DecodeError::new(TypeId::DOUBLE, format!("{value} is not representable"))
            })?)
        }
        TypeId::DOUBLE if type_name == "FLOAT" => {
            DbValue::DOUBLE(f64::from(get::<f32>(row, col_idx)?))
        }
        TypeId::DOUBLE => DbValue::DOUBLE(get(row, col_idx)?),
        TypeId::BLOB => DbValue::BLOB(get(row, col_idx)?),
        TypeId::TIMESTAMP if type_name == "DATE" => {
            DbValue::TIMESTAMP(Timestamp::from(get::<Date>(row, col_idx)?))
        }
        TypeId::TIMESTAMP => {
            DbValue::TIMESTAMP(Timestamp::from(get::<PrimitiveDateTime>(row, col_idx)?))
        }
        TypeId::TEXT if type_name == "TIME" => {
            let time: time::Time = get(row, col_idx)?;
            DbValue::TEXT(format!(
                "{:02}:{:02}:{:02}",
                time.hour(),
                time.minute(),
                time.second()
            ))
        }
        TypeId::TEXT => DbValue::TEXT(get(row, col_idx)?),
    })
}
