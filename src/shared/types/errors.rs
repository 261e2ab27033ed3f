use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Malformed or missing input: unknown template item, empty template,
    /// oversized or wrong-type file.
    #[error("Validation: {0}")]
    Validation(String),

    /// The request is well-formed but the target is in the wrong state
    /// (checklist already started, required items missing, status regression).
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Already exists: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, value: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            field: "id",
            value: value.into(),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(e: sea_orm::DbErr) -> Self {
        DomainError::Storage(format!("Database error: {}", e))
    }
}

impl From<opendal::Error> for DomainError {
    fn from(e: opendal::Error) -> Self {
        DomainError::Storage(format!("Blob store error: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_message_names_entity() {
        let err = DomainError::not_found("ServiceOrder", "so-1");
        assert_eq!(err.to_string(), "Not found: ServiceOrder with id=so-1");
    }
}
