use crate::{BackendKind, DbError, DbResult};

/// Backend-specific connection options.
///
/// Options are given as URL query parameters (see module [`url`](crate::url)),
/// or with [`ConnectParamsBuilder::option`](crate::ConnectParamsBuilder::option).
/// Each option is supported only by some backends; using an option with a backend that
/// does not support it lets [`ConnectParamsBuilder::build`](crate::ConnectParamsBuilder::build)
/// fail.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ConnOpt {
    /// Path of a unix domain socket to use instead of TCP (MariaDB, PostgreSQL).
    Socket,
    /// Character set of the connection (MariaDB); one of `utf8`, `utf8mb3`, `utf8mb4`.
    Charset,
    /// The TLS mode, e.g. `disable`, `prefer`, `require` (MariaDB, PostgreSQL).
    SslMode,
    /// Application name reported to the server (PostgreSQL).
    ApplicationName,
    /// Create the database file if it does not exist; `true` by default (SQLite).
    CreateIfMissing,
    /// Open the database read-only (SQLite).
    ReadOnly,
    /// Milliseconds to wait on a locked database (SQLite).
    BusyTimeoutMs,
    /// Enforce foreign key constraints (SQLite).
    ForeignKeys,
}

const UTF8_CHARSETS: [&str; 3] = ["utf8", "utf8mb3", "utf8mb4"];

impl ConnOpt {
    /// The name of the option as it is used in URLs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Socket => "socket",
            Self::Charset => "charset",
            Self::SslMode => "ssl_mode",
            Self::ApplicationName => "application_name",
            Self::CreateIfMissing => "create_if_missing",
            Self::ReadOnly => "read_only",
            Self::BusyTimeoutMs => "busy_timeout_ms",
            Self::ForeignKeys => "foreign_keys",
        }
    }

    /// Finds the option with the given URL name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "socket" => Some(Self::Socket),
            "charset" => Some(Self::Charset),
            "ssl_mode" | "sslmode" => Some(Self::SslMode),
            "application_name" => Some(Self::ApplicationName),
            "create_if_missing" => Some(Self::CreateIfMissing),
            "read_only" => Some(Self::ReadOnly),
            "busy_timeout_ms" => Some(Self::BusyTimeoutMs),
            "foreign_keys" => Some(Self::ForeignKeys),
            _ => None,
        }
    }

    /// Returns true if the given backend understands this option.
    pub fn is_supported_by(self, backend: BackendKind) -> bool {
        match self {
            Self::Socket | Self::SslMode => {
                matches!(backend, BackendKind::MariaDb | BackendKind::Postgres)
            }
            Self::Charset => backend == BackendKind::MariaDb,
            Self::ApplicationName => backend == BackendKind::Postgres,
            Self::CreateIfMissing | Self::ReadOnly | Self::BusyTimeoutMs | Self::ForeignKeys => {
                backend == BackendKind::Sqlite
            }
        }
    }

    // Checks the syntax of typed option values.
    pub(crate) fn validate(self, value: &str) -> DbResult<()> {
        match self {
            Self::CreateIfMissing | Self::ReadOnly | Self::ForeignKeys => {
                parse_bool(self, value).map(|_| ())
            }
            Self::BusyTimeoutMs => value.parse::<u64>().map(|_| ()).map_err(|_| {
                usage_err!("option {self} requires a number of milliseconds, got {value:?}")
            }),
            // escaping relies on an ASCII-transparent encoding
            Self::Charset => {
                if UTF8_CHARSETS.contains(&value.to_ascii_lowercase().as_str()) {
                    Ok(())
                } else {
                    Err(usage_err!(
                        "option {self} supports only {UTF8_CHARSETS:?}, got {value:?}"
                    ))
                }
            }
            Self::Socket | Self::SslMode | Self::ApplicationName => {
                if value.is_empty() {
                    Err(usage_err!("option {self} requires a value"))
                } else {
                    Ok(())
                }
            }
        }
    }
}

pub(crate) fn parse_bool(opt: ConnOpt, value: &str) -> DbResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "" | "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(DbError::UsageDetailed(format!(
            "option {opt} requires a boolean value, got {value:?}"
        ))),
    }
}

impl std::fmt::Display for ConnOpt {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::{parse_bool, ConnOpt};
    use crate::BackendKind;

    #[test]
    fn test_names() {
        for opt in [
            ConnOpt::Socket,
            ConnOpt::Charset,
            ConnOpt::SslMode,
            ConnOpt::ApplicationName,
            ConnOpt::CreateIfMissing,
            ConnOpt::ReadOnly,
            ConnOpt::BusyTimeoutMs,
            ConnOpt::ForeignKeys,
        ] {
            assert_eq!(Some(opt), ConnOpt::from_name(opt.name()));
        }
        assert_eq!(None, ConnOpt::from_name("db"));
    }

    #[test]
    fn test_support_and_values() {
        assert!(ConnOpt::Charset.is_supported_by(BackendKind::MariaDb));
        assert!(!ConnOpt::Charset.is_supported_by(BackendKind::Postgres));
        assert!(ConnOpt::ForeignKeys.is_supported_by(BackendKind::Sqlite));
        assert!(!ConnOpt::Socket.is_supported_by(BackendKind::Sqlite));

        assert!(parse_bool(ConnOpt::ReadOnly, "TRUE").unwrap());
        assert!(!parse_bool(ConnOpt::ReadOnly, "0").unwrap());
        assert!(parse_bool(ConnOpt::ReadOnly, "maybe").is_err());
        assert!(ConnOpt::BusyTimeoutMs.validate("250").is_ok());
        assert!(ConnOpt::BusyTimeoutMs.validate("-1").is_err());
        assert!(ConnOpt::Charset.validate("").is_err());
        assert!(ConnOpt::Charset.validate("utf8mb4").is_ok());
        assert!(ConnOpt::Charset.validate("UTF8").is_ok());
        assert!(ConnOpt::Charset.validate("gbk").is_err());
        assert!(ConnOpt::Charset.validate("sjis").is_err());
    }
}
