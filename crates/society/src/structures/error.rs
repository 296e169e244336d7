/// Failures raised by the record structures and the services that own them.
///
/// Every variant is recoverable by the caller; none of them indicates a broken process.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StructureError {
    #[error("{key} already exists")]
    DuplicateKey { key: String },
    #[error("{key} not found")]
    NotFound { key: String },
    #[error("{structure} is empty")]
    Empty { structure: &'static str },
    #[error("facility '{label}' is not registered")]
    UnknownVertex { label: String },
    #[error("balance for {key} is out of range")]
    BalanceOverflow { key: String },
}

impl StructureError {
    pub(crate) fn duplicate(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    pub(crate) fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }

    pub(crate) fn balance_overflow(key: impl Into<String>) -> Self {
        Self::BalanceOverflow { key: key.into() }
    }

    pub(crate) fn unknown_vertex(label: impl Into<String>) -> Self {
        Self::UnknownVertex {
            label: label.into(),
        }
    }
}
