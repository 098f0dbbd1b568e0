mod connection;
mod resultset;

pub use connection::Connection;
pub use resultset::ResultSet;
