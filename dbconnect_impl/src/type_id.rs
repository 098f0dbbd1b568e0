/// ID of the value type of a database column, as far as `dbconnect` distinguishes types.
///
/// The backends have many more column types; each of them is mapped to one of these
/// (see [`TypeId::from_type_name`]).
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, Serialize, Deserialize)]
pub enum TypeId {
    /// Integer types of all widths, and booleans;
    /// used with [`DbValue::INT`](crate::DbValue::INT).
    INT,
    /// Floating point and fixed point types;
    /// used with [`DbValue::DOUBLE`](crate::DbValue::DOUBLE).
    DOUBLE,
    /// Character types, and all types that are not covered otherwise;
    /// used with [`DbValue::TEXT`](crate::DbValue::TEXT).
    TEXT,
    /// Binary types;
    /// used with [`DbValue::BLOB`](crate::DbValue::BLOB).
    BLOB,
    /// Date and date-time types;
    /// used with [`DbValue::TIMESTAMP`](crate::DbValue::TIMESTAMP).
    TIMESTAMP,
    /// Columns without a type, e.g. SQLite expressions that evaluate to NULL;
    /// used with [`DbValue::NULL`](crate::DbValue::NULL).
    NULL,
}

impl TypeId {
    /// Maps a backend's type name to a `TypeId`.
    ///
    /// The name is matched case-insensitively; length or precision suffixes
    /// like in `VARCHAR(64)` and the `UNSIGNED` qualifier are ignored.
    /// Unknown names map to `TEXT`.
    pub fn from_type_name(name: &str) -> Self {
        let upper = name.to_ascii_uppercase();
        let base = upper
            .split('(')
            .next()
            .unwrap_or_default()
            .trim_end_matches("UNSIGNED")
            .trim();
        match base {
            "NULL" | "VOID" => Self::NULL,

            "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "INTEGER" | "BIGINT" | "INT2"
            | "INT4" | "INT8" | "SERIAL" | "BIGSERIAL" | "SMALLSERIAL" | "BOOL" | "BOOLEAN"
            | "YEAR" | "OID" => Self::INT,

            "FLOAT" | "FLOAT4" | "FLOAT8" | "REAL" | "DOUBLE" | "DOUBLE PRECISION" | "DECIMAL"
            | "NUMERIC" | "NEWDECIMAL" => Self::DOUBLE,

            "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY" | "BYTEA" => {
                Self::BLOB
            }

            "DATE" | "DATETIME" | "TIMESTAMP" | "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE"
            | "TIMESTAMP WITHOUT TIME ZONE" => Self::TIMESTAMP,

            _ => Self::TEXT,
        }
    }
}

impl std::fmt::Display for TypeId {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(fmt, "{self:?}")
    }
}
