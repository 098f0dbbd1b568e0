use crate::{ConnectParams, ConnectParamsBuilder, DbResult, IntoConnectParamsBuilder};
use url::Url;

/// A trait implemented by types that can be converted into a `ConnectParams`.
///
/// # Example
/// ```rust
///     use dbconnect::IntoConnectParams;
///
///     let conn_params = "sqlite::memory:".into_connect_params().unwrap();
///     assert_eq!(Some(":memory:"), conn_params.dbname());
/// ```
pub trait IntoConnectParams {
    /// Converts the value of `self` into a `ConnectParams`.
    ///
    /// # Errors
    /// `DbError::Usage` or `DbError::ConnParams` if wrong information was provided
    fn into_connect_params(self) -> DbResult<ConnectParams>;
}

impl IntoConnectParams for ConnectParams {
    fn into_connect_params(self) -> DbResult<ConnectParams> {
        Ok(self)
    }
}

impl IntoConnectParams for &ConnectParams {
    fn into_connect_params(self) -> DbResult<ConnectParams> {
        Ok(self.clone())
    }
}

impl IntoConnectParams for ConnectParamsBuilder {
    fn into_connect_params(self) -> DbResult<ConnectParams> {
        self.build()
    }
}

impl IntoConnectParams for &ConnectParamsBuilder {
    fn into_connect_params(self) -> DbResult<ConnectParams> {
        self.build()
    }
}

impl IntoConnectParams for &mut ConnectParamsBuilder {
    fn into_connect_params(self) -> DbResult<ConnectParams> {
        self.build()
    }
}

impl IntoConnectParams for &str {
    fn into_connect_params(self) -> DbResult<ConnectParams> {
        self.into_connect_params_builder()?.build()
    }
}

impl IntoConnectParams for String {
    fn into_connect_params(self) -> DbResult<ConnectParams> {
        self.as_str().into_connect_params()
    }
}

impl IntoConnectParams for Url {
    fn into_connect_params(self) -> DbResult<ConnectParams> {
        self.into_connect_params_builder()?.build()
    }
}
