use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Not authenticated: {0}")]
    Auth(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    #[error("Request failed: {0}")]
    Transient(String),

    #[error("Bulk delete incomplete: {deleted} deleted, {failed} failed")]
    BulkPartialFailure { deleted: usize, failed: usize },
}

impl Error {
    pub fn missing_fields(fields: &[&str]) -> Self {
        Error::Validation(format!(
            "Please fill in all required fields: {}",
            fields.join(", ")
        ))
    }

    pub fn transient(err: impl std::fmt::Display) -> Self {
        Error::Transient(err.to_string())
    }

    /// Text shown to the user in a transient notification.
    ///
    /// Lookups that miss and store faults render identically.
    pub fn notice(&self) -> String {
        match self {
            Error::Validation(msg) => msg.clone(),
            Error::Auth(_) => "Please sign in to continue".to_string(),
            Error::NotFound { .. } | Error::Transient(_) => {
                "Something went wrong. Please try again.".to_string()
            }
            Error::BulkPartialFailure { deleted, failed } => {
                format!("{deleted} deleted, {failed} could not be deleted")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_lists_every_field() {
        let err = Error::missing_fields(&["title", "content"]);
        assert_eq!(
            err.to_string(),
            "Validation failed: Please fill in all required fields: title, content"
        );
    }

    #[test]
    fn test_not_found_and_transient_share_notice() {
        let missing = Error::NotFound {
            kind: "post",
            id: "42".to_string(),
        };
        let fault = Error::transient("connection reset");
        assert_eq!(missing.notice(), fault.notice());
    }
}
