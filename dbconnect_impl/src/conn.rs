// The database connection, the parameters for creating one, and its runtime settings.

mod connection_configuration;
mod connection_core;
mod connection_statistics;
mod params;

pub use {
    connection_configuration::ConnectionConfiguration,
    connection_core::ConnectionState,
    connection_statistics::ConnectionStatistics,
    params::{
        conn_opt::ConnOpt, connect_params::ConnectParams,
        connect_params_builder::ConnectParamsBuilder, into_connect_params::IntoConnectParams,
        into_connect_params_builder::IntoConnectParamsBuilder,
    },
};

pub(crate) use connection_core::ConnectionCore;
pub(crate) use params::conn_opt::parse_bool;
