use crate::TypeId;
use std::ops::Deref;

/// Metadata of a single column of a [`ResultSet`](crate::sync::ResultSet).
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct FieldMetadata {
    name: String,
    type_id: TypeId,
    type_name: String,
}

impl FieldMetadata {
    pub(crate) fn new(name: &str, type_name: &str) -> Self {
        Self {
            name: name.to_string(),
            type_id: TypeId::from_type_name(type_name),
            type_name: type_name.to_string(),
        }
    }

    /// The column name, or its alias if one was given in the statement.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The type of the column, as far as `dbconnect` distinguishes types.
    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The backend's own name of the column type.
    pub fn type_name(&self) -> &str {
        &self.type_name
    }
}

/// List of metadata of the fields of a resultset.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ResultSetMetadata(Vec<FieldMetadata>);

impl ResultSetMetadata {
    pub(crate) fn new(fields: Vec<FieldMetadata>) -> Self {
        Self(fields)
    }

    /// Returns the index of the first column with the given name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.0.iter().position(|f| f.name == name)
    }
}

impl Deref for ResultSetMetadata {
    type Target = Vec<FieldMetadata>;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for ResultSetMetadata {
    fn fmt(&self, fmt: &mut std::fmt::Formatter) -> std::fmt::Result {
        for (i, field) in self.0.iter().enumerate() {
            if i > 0 {
                write!(fmt, ", ")?;
            }
            write!(fmt, "{} ({})", field.name, field.type_name)?;
        }
        Ok(())
    }
}
