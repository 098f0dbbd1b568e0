use crate::BackendKind;

/// A string that can be embedded between single quotes in a SQL statement
/// of a specific backend without terminating the literal early.
///
/// Produced by [`Connection::escape`](crate::sync::Connection::escape)
/// or [`BackendKind::escape`](crate::BackendKind::escape).
/// The value is independent of the connection that produced it.
///
/// Prefer parameterized statements
/// ([`Connection::execute_with_params`](crate::sync::Connection::execute_with_params))
/// over embedding escaped strings into statement text.
///
/// Escaping rules:
///
/// * MariaDB: backslash escapes for `'`, `"`, `\`, NUL, newline, carriage return, and
///   Ctrl-Z; this assumes the server does not run with `NO_BACKSLASH_ESCAPES`, and a UTF-8
///   connection character set (which is why [`ConnOpt::Charset`](crate::ConnOpt::Charset)
///   accepts only the UTF-8 charsets). With multibyte charsets like `gbk` or `sjis`, an
///   inserted backslash can become part of a character and the quote would not be escaped.
/// * PostgreSQL and SQLite: `'` is doubled; backslashes have no special meaning
///   (PostgreSQL with `standard_conforming_strings`, its default).
///   NUL characters cannot be part of a literal in these backends and are dropped.
#[derive(Clone, Debug, Eq, Hash, PartialEq)]
pub struct EscapedString(String);

impl EscapedString {
    pub(crate) fn new(backend: BackendKind, raw: &str) -> Self {
        let mut escaped = String::with_capacity(raw.len() + raw.len() / 8 + 2);
        match backend {
            BackendKind::MariaDb => {
                for c in raw.chars() {
                    match c {
                        '\0' => escaped.push_str("\\0"),
                        '\n' => escaped.push_str("\\n"),
                        '\r' => escaped.push_str("\\r"),
                        '\\' => escaped.push_str("\\\\"),
                        '\'' => escaped.push_str("\\'"),
                        '"' => escaped.push_str("\\\""),
                        '\x1a' => escaped.push_str("\\Z"),
                        c => escaped.push(c),
                    }
                }
            }
            BackendKind::Postgres | BackendKind::Sqlite => {
                for c in raw.chars() {
                    match c {
                        '\0' => {}
                        '\'' => escaped.push_str("''"),
                        c => escaped.push(c),
                    }
                }
            }
        }
        Self(escaped)
    }

    /// The escaped content, without surrounding quotes.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The escaped content, surrounded by single quotes, ready to be used as a literal.
    pub fn quoted(&self) -> String {
        format!("'{}'", self.0)
    }

    /// Returns the escaped content.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl AsRef<str> for EscapedString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for EscapedString {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        fmt.write_str(&self.0)
    }
}
