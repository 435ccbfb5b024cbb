//! Error types for the `domain` layer.
use entity_api::error::{EntityApiErrorKind, Error as EntityApiError};
use std::error::Error as StdError;
use std::fmt;

/// Top-level domain error type.
/// Errors in the Domain layer are modeled as a tree structure
/// with `domain::error::Error` as the root type holding a tree of `error_kind`
/// enums that represent the kinds of errors that can occur in the domain layer or
/// in lower layers. The `source` field holds the original error, if any. `web`
/// only ever sees this type and turns the `error_kind` into an HTTP status.
#[derive(Debug)]
pub struct Error {
    pub source: Option<Box<dyn StdError + Send + Sync>>,
    pub error_kind: DomainErrorKind,
}

/// Enum representing the major categories of errors that can occur in the `domain` layer.
#[derive(Debug, PartialEq)]
pub enum DomainErrorKind {
    Internal(InternalErrorKind),
}

#[derive(Debug, PartialEq)]
pub enum InternalErrorKind {
    Entity(EntityErrorKind),
    Other(String),
}

/// Entity errors translated from `entity_api`, plus the rule violations the
/// domain raises itself.
#[derive(Debug, PartialEq)]
pub enum EntityErrorKind {
    NotFound,
    /// The request breaks a business rule or carries bad input.
    Invalid,
    Unauthenticated,
    /// The user is known but not allowed to do this.
    Forbidden,
    DbTransaction,
    Other(String),
}

impl Error {
    fn entity(kind: EntityErrorKind) -> Self {
        Error {
            source: None,
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(kind)),
        }
    }

    pub fn not_found() -> Self {
        Self::entity(EntityErrorKind::NotFound)
    }

    pub fn invalid() -> Self {
        Self::entity(EntityErrorKind::Invalid)
    }

    pub fn forbidden() -> Self {
        Self::entity(EntityErrorKind::Forbidden)
    }

    pub fn unauthenticated() -> Self {
        Self::entity(EntityErrorKind::Unauthenticated)
    }

    pub fn entity_error_kind(&self) -> Option<&EntityErrorKind> {
        match &self.error_kind {
            DomainErrorKind::Internal(InternalErrorKind::Entity(kind)) => Some(kind),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.entity_error_kind() == Some(&EntityErrorKind::NotFound)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Domain Error: {self:?}")
    }
}

impl StdError for Error {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source
            .as_ref()
            .map(|e| e.as_ref() as &(dyn StdError + 'static))
    }
}

// This is where we translate errors from the `entity_api` layer to the `domain` layer.
impl From<EntityApiError> for Error {
    fn from(err: EntityApiError) -> Self {
        let entity_error_kind = match err.error_kind {
            EntityApiErrorKind::RecordNotFound | EntityApiErrorKind::RecordNotUpdated => {
                EntityErrorKind::NotFound
            }
            EntityApiErrorKind::InvalidQueryTerm | EntityApiErrorKind::ValidationError => {
                EntityErrorKind::Invalid
            }
            EntityApiErrorKind::RecordUnauthenticated => EntityErrorKind::Unauthenticated,
            EntityApiErrorKind::SystemError => EntityErrorKind::DbTransaction,
            EntityApiErrorKind::Other => EntityErrorKind::Other("EntityErrorKind".to_string()),
        };

        Error {
            source: Some(Box::new(err)),
            error_kind: DomainErrorKind::Internal(InternalErrorKind::Entity(entity_error_kind)),
        }
    }
}

impl From<sea_orm::DbErr> for Error {
    fn from(err: sea_orm::DbErr) -> Self {
        EntityApiError::from(err).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_errors_become_invalid() {
        let err: Error = EntityApiError::validation().into();
        assert_eq!(err.entity_error_kind(), Some(&EntityErrorKind::Invalid));
        assert!(err.source.is_some());
    }

    #[test]
    fn missing_records_become_not_found() {
        let err: Error = EntityApiError::not_found().into();
        assert!(err.is_not_found());

        let err: Error = sea_orm::DbErr::RecordNotUpdated.into();
        assert!(err.is_not_found());
    }

    #[test]
    fn connection_failures_become_db_transaction() {
        let err: Error = sea_orm::DbErr::Custom("connection reset".to_string()).into();
        assert_eq!(err.entity_error_kind(), Some(&EntityErrorKind::DbTransaction));
    }
}
