use crate::{
    backends::{self, Backend, BackendKind},
    conn::{ConnectParams, ConnectionConfiguration, ConnectionStatistics},
    sync::ResultSet,
    DbError, DbResult, DbValue, QueryError,
};
use std::{
    future::Future,
    time::{Duration, Instant},
};
use tokio::runtime::Runtime;

/// Describes whether a connection can be used for database calls.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ConnectionState {
    /// The connection is usable.
    Open,
    /// The connection was closed explicitly, or it was found to be broken.
    Closed,
}

// Owns the native connection and the runtime that drives it.
//
// The backend is dropped before the runtime, because the driver may need the runtime
// for tearing down its socket.
#[derive(Debug)]
pub(crate) struct ConnectionCore {
    backend: Option<Box<dyn Backend>>,
    kind: BackendKind,
    connect_params: ConnectParams,
    configuration: ConnectionConfiguration,
    last_insert_id: Option<i64>,
    statistics: ConnectionStatistics,
    runtime: Runtime,
}

impl ConnectionCore {
    pub(crate) fn try_new(
        connect_params: ConnectParams,
        configuration: &ConnectionConfiguration,
    ) -> DbResult<Self> {
        let kind = connect_params.backend();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let start = Instant::now();
        let opening = backends::open(&connect_params);
        let backend = match configuration.connect_timeout() {
            None => runtime.block_on(opening)?,
            Some(timeout) => runtime
                .block_on(async { tokio::time::timeout(timeout, opening).await })
                .map_err(|_elapsed| {
                    DbError::connect(kind, format!("no connection within {timeout:?}"))
                })??,
        };
        debug!(
            "connected to {} ({} µs)",
            connect_params,
            Instant::now().duration_since(start).as_micros()
        );

        Ok(Self {
            backend: Some(backend),
            kind,
            connect_params,
            configuration: configuration.clone(),
            last_insert_id: None,
            statistics: ConnectionStatistics::new(),
            runtime,
        })
    }

    pub(crate) fn spawn(&self) -> DbResult<Self> {
        Self::try_new(self.connect_params.clone(), &self.configuration)
    }

    pub(crate) fn kind(&self) -> BackendKind {
        self.kind
    }

    pub(crate) fn connect_params(&self) -> &ConnectParams {
        &self.connect_params
    }

    pub(crate) fn configuration(&self) -> &ConnectionConfiguration {
        &self.configuration
    }

    pub(crate) fn configuration_mut(&mut self) -> &mut ConnectionConfiguration {
        &mut self.configuration
    }

    pub(crate) fn statistics(&self) -> &ConnectionStatistics {
        &self.statistics
    }

    pub(crate) fn reset_statistics(&mut self) {
        self.statistics.reset();
    }

    pub(crate) fn state(&self) -> ConnectionState {
        if self.backend.is_some() {
            ConnectionState::Open
        } else {
            ConnectionState::Closed
        }
    }

    pub(crate) fn last_insert_id(&self) -> DbResult<DbValue> {
        if self.backend.is_none() {
            return Err(DbError::NotConnected);
        }
        Ok(self.last_insert_id.map_or(DbValue::NULL, DbValue::INT))
    }

    pub(crate) fn execute(&mut self, sql: &str, params: &[DbValue]) -> DbResult<u64> {
        let read_timeout = self.configuration.read_timeout();
        let backend = self.backend.as_mut().ok_or(DbError::NotConnected)?;
        let seq = self.statistics.next_sequence_number();
        trace!("call {seq}: execute {sql}");

        let start = Instant::now();
        let result = block_on(&self.runtime, read_timeout, backend.execute(sql, params));
        self.statistics.add_wait_time(start.elapsed());

        match result {
            Ok(outcome) => {
                self.statistics.add_execute();
                if outcome.inserted {
                    self.last_insert_id = outcome.last_insert_id;
                }
                Ok(outcome.affected_rows)
            }
            Err(e) => Err(self.handle_error(e)),
        }
    }

    pub(crate) fn select(&mut self, sql: &str, params: &[DbValue]) -> DbResult<ResultSet> {
        let read_timeout = self.configuration.read_timeout();
        let backend = self.backend.as_mut().ok_or(DbError::NotConnected)?;
        let seq = self.statistics.next_sequence_number();
        trace!("call {seq}: select {sql}");

        let start = Instant::now();
        let result = block_on(&self.runtime, read_timeout, backend.select(sql, params));
        self.statistics.add_wait_time(start.elapsed());

        match result {
            Ok(resultset) => {
                self.statistics.add_select(resultset.row_count());
                Ok(resultset)
            }
            Err(e) => Err(self.handle_error(e)),
        }
    }

    pub(crate) fn close(&mut self) -> DbResult<()> {
        match self.backend.take() {
            None => {
                trace!("connection is already closed");
                Ok(())
            }
            Some(backend) => {
                let result = block_on(
                    &self.runtime,
                    self.configuration.read_timeout(),
                    backend.close(),
                );
                debug!("closed connection to {}", self.connect_params);
                result
            }
        }
    }

    // A lost connection or a timed out call leaves the session in an unknown state,
    // so the connection is given up.
    fn handle_error(&mut self, error: DbError) -> DbError {
        self.statistics.add_error();
        if error.is_connection_lost() {
            warn!(
                "connection to {} is broken and gets closed: {error}",
                self.connect_params
            );
            if let Some(backend) = self.backend.take() {
                let _guard = self.runtime.enter();
                drop(backend);
            }
        } else {
            debug!("call failed: {error}");
        }
        error
    }
}

fn block_on<T, F>(runtime: &Runtime, timeout: Option<Duration>, future: F) -> DbResult<T>
where
    F: Future<Output = DbResult<T>>,
{
    match timeout {
        None => runtime.block_on(future),
        Some(timeout) => runtime
            .block_on(async { tokio::time::timeout(timeout, future).await })
            .unwrap_or_else(|_elapsed| Err(QueryError::timed_out(timeout).into())),
    }
}

impl Drop for ConnectionCore {
    fn drop(&mut self) {
        if self.backend.is_some() {
            if let Err(e) = self.close() {
                warn!("closing the connection failed with {e}");
            }
        }
    }
}
