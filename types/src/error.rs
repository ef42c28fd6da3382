use crate::Dialect;

/// A type name that a dialect's mapping table does not cover
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UnsupportedTypeError {
    #[error("database type `{db_type}` is not supported by the {dialect} type map")]
    DbType { dialect: Dialect, db_type: String },

    #[error("host type `{host_type}` is not supported by the {dialect} type map")]
    HostType { dialect: Dialect, host_type: String },

    #[error("enum underlying type `{underlying}` is not an integral type")]
    EnumUnderlying { underlying: String },
}

impl UnsupportedTypeError {
    /// The offending type name, whichever side of the mapping it came from
    #[must_use]
    pub fn type_name(&self) -> &str {
        match self {
            UnsupportedTypeError::DbType { db_type, .. } => db_type,
            UnsupportedTypeError::HostType { host_type, .. } => host_type,
            UnsupportedTypeError::EnumUnderlying { underlying } => underlying,
        }
    }
}
