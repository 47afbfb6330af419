//! Domain error types.

use thiserror::Error;

/// Failure writing a collection to the underlying key-value store.
///
/// Reads never produce this error: a failed or malformed read degrades to an
/// empty collection so the tracking loop keeps running.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to serialize {collection}: {message}")]
    Serialization {
        collection: &'static str,
        message: String,
    },

    #[error("failed to write {collection}: {message}")]
    Write {
        collection: &'static str,
        message: String,
    },
}

/// Failure producing a location fix for a pet.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("no fix available for pet {0}")]
    NoFix(String),

    #[error("location source unavailable: {0}")]
    Unavailable(String),
}

/// Errors surfaced by the tracking services to their callers.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Ingest(#[from] IngestError),
}

impl From<validator::ValidationErrors> for DomainError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let messages: Vec<String> = errors
            .field_errors()
            .iter()
            .flat_map(|(field, errors)| {
                errors.iter().map(move |err| {
                    format!("{}: {}", field, err.message.as_ref().unwrap_or(&"".into()))
                })
            })
            .collect();
        DomainError::Validation(messages.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_error_display() {
        let err = StoreError::Write {
            collection: "pet_alerts",
            message: "disk full".to_string(),
        };
        assert_eq!(err.to_string(), "failed to write pet_alerts: disk full");
    }

    #[test]
    fn test_domain_error_wraps_store_error() {
        let err: DomainError = StoreError::Serialization {
            collection: "safe_zones",
            message: "bad float".to_string(),
        }
        .into();
        assert!(matches!(err, DomainError::Store(_)));
        assert_eq!(err.to_string(), "failed to serialize safe_zones: bad float");
    }

    #[test]
    fn test_domain_error_wraps_ingest_error() {
        let err: DomainError = IngestError::NoFix("p1".to_string()).into();
        assert_eq!(err.to_string(), "no fix available for pet p1");
    }

    #[test]
    fn test_domain_error_display() {
        assert_eq!(
            DomainError::NotFound("chip".to_string()).to_string(),
            "Not found: chip"
        );
        assert_eq!(
            DomainError::Conflict("dup".to_string()).to_string(),
            "Conflict: dup"
        );
        assert_eq!(
            DomainError::Validation("bad".to_string()).to_string(),
            "Validation error: bad"
        );
    }
}
