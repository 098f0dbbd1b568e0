use std::time::Duration;

/// Runtime settings of a connection.
///
/// ```rust
/// use dbconnect::ConnectionConfiguration;
/// use std::time::Duration;
///
/// let config = ConnectionConfiguration::default()
///     .with_connect_timeout(Some(Duration::from_secs(5)))
///     .with_read_timeout(Some(Duration::from_secs(60)));
/// assert_eq!(Some(Duration::from_secs(60)), config.read_timeout());
/// ```
#[derive(Debug, Clone)]
pub struct ConnectionConfiguration {
    connect_timeout: Option<Duration>,
    read_timeout: Option<Duration>,
}

impl Default for ConnectionConfiguration {
    fn default() -> Self {
        Self {
            connect_timeout: Some(Self::DEFAULT_CONNECT_TIMEOUT),
            read_timeout: Self::DEFAULT_READ_TIMEOUT,
        }
    }
}

impl ConnectionConfiguration {
    /// Default value for the time that opening a connection may take.
    pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Default value for the time that a single database call may take.
    ///
    /// By default, calls are not limited in their duration.
    /// The value can be changed at runtime with `Connection::set_read_timeout()`.
    pub const DEFAULT_READ_TIMEOUT: Option<Duration> = None;

    /// Returns the connect timeout.
    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout
    }
    /// Sets the connect timeout; `None` waits without limit.
    pub fn set_connect_timeout(&mut self, connect_timeout: Option<Duration>) {
        self.connect_timeout = connect_timeout;
    }
    /// Builder-method for setting the connect timeout.
    #[must_use]
    pub fn with_connect_timeout(mut self, connect_timeout: Option<Duration>) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }

    /// Returns the read timeout.
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout
    }
    /// Sets the read timeout.
    ///
    /// A call that exceeds the read timeout fails, and the connection is closed, because
    /// it can not be known in which state the server is then.
    pub fn set_read_timeout(&mut self, read_timeout: Option<Duration>) {
        self.read_timeout = read_timeout;
    }
    /// Builder-method for setting the read timeout.
    #[must_use]
    pub fn with_read_timeout(mut self, read_timeout: Option<Duration>) -> Self {
        self.read_timeout = read_timeout;
        self
    }
}
