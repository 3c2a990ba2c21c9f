//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::entities::DeliveryStatus;
use crate::value_objects::{ConversationId, MessageId, UserId};

/// Domain layer errors
///
/// Every variant belongs to exactly one of four kinds - not found,
/// forbidden, validation, conflict - plus wrapped infrastructure failures.
/// The transport layer maps kinds to protocol codes without collapsing them.
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Conversation not found: {0}")]
    ConversationNotFound(ConversationId),

    #[error("Message not found: {0}")]
    MessageNotFound(MessageId),

    #[error("No reaction from user {user_id} on message {message_id}")]
    ReactionNotFound {
        message_id: MessageId,
        user_id: UserId,
    },

    #[error("User {0} is not a member of this conversation")]
    ParticipantNotFound(UserId),

    // =========================================================================
    // Forbidden Errors
    // =========================================================================
    #[error("Not a participant in this conversation")]
    NotParticipant,

    #[error("Not the sender of this message")]
    NotSender,

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Invalid username: {0:?} (must be 3-16 characters)")]
    InvalidUsername(String),

    #[error("Group name cannot be empty")]
    EmptyGroupName,

    #[error("Conversation {0} is not a group")]
    NotAGroup(ConversationId),

    #[error("Cannot start a direct conversation with yourself")]
    DirectWithSelf,

    #[error("Cannot move message status from {from:?} to {to:?}")]
    StatusRegression {
        from: DeliveryStatus,
        to: DeliveryStatus,
    },

    #[error("Message {0} has been deleted")]
    MessageDeleted(MessageId),

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("User {0} is already a participant")]
    AlreadyParticipant(UserId),

    #[error("Username already taken: {0}")]
    UsernameTaken(String),

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    Database(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::UserNotFound(_) => "UNKNOWN_USER",
            Self::ConversationNotFound(_) => "UNKNOWN_CONVERSATION",
            Self::MessageNotFound(_) => "UNKNOWN_MESSAGE",
            Self::ReactionNotFound { .. } => "UNKNOWN_REACTION",
            Self::ParticipantNotFound(_) => "UNKNOWN_PARTICIPANT",

            // Forbidden
            Self::NotParticipant => "NOT_PARTICIPANT",
            Self::NotSender => "NOT_SENDER",

            // Validation
            Self::InvalidUsername(_) => "INVALID_USERNAME",
            Self::EmptyGroupName => "EMPTY_GROUP_NAME",
            Self::NotAGroup(_) => "NOT_A_GROUP",
            Self::DirectWithSelf => "DIRECT_WITH_SELF",
            Self::StatusRegression { .. } => "STATUS_REGRESSION",
            Self::MessageDeleted(_) => "MESSAGE_DELETED",

            // Conflict
            Self::AlreadyParticipant(_) => "ALREADY_PARTICIPANT",
            Self::UsernameTaken(_) => "USERNAME_TAKEN",

            // Infrastructure
            Self::Database(_) => "DATABASE_ERROR",
            Self::Storage(_) => "STORAGE_ERROR",
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::UserNotFound(_)
                | Self::ConversationNotFound(_)
                | Self::MessageNotFound(_)
                | Self::ReactionNotFound { .. }
                | Self::ParticipantNotFound(_)
        )
    }

    /// Check if this is an authorization failure
    pub fn is_forbidden(&self) -> bool {
        matches!(self, Self::NotParticipant | Self::NotSender)
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidUsername(_)
                | Self::EmptyGroupName
                | Self::NotAGroup(_)
                | Self::DirectWithSelf
                | Self::StatusRegression { .. }
                | Self::MessageDeleted(_)
        )
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::AlreadyParticipant(_) | Self::UsernameTaken(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        let err = DomainError::UserNotFound(UserId::generate());
        assert_eq!(err.code(), "UNKNOWN_USER");

        let err = DomainError::NotSender;
        assert_eq!(err.code(), "NOT_SENDER");
    }

    #[test]
    fn test_every_variant_has_exactly_one_kind() {
        let errors = [
            DomainError::UserNotFound(UserId::generate()),
            DomainError::ConversationNotFound(ConversationId::generate()),
            DomainError::MessageNotFound(MessageId::generate()),
            DomainError::ReactionNotFound {
                message_id: MessageId::generate(),
                user_id: UserId::generate(),
            },
            DomainError::ParticipantNotFound(UserId::generate()),
            DomainError::NotParticipant,
            DomainError::NotSender,
            DomainError::InvalidUsername("x".to_string()),
            DomainError::EmptyGroupName,
            DomainError::NotAGroup(ConversationId::generate()),
            DomainError::DirectWithSelf,
            DomainError::StatusRegression {
                from: DeliveryStatus::Read,
                to: DeliveryStatus::Sent,
            },
            DomainError::MessageDeleted(MessageId::generate()),
            DomainError::AlreadyParticipant(UserId::generate()),
            DomainError::UsernameTaken("alice".to_string()),
        ];

        for err in &errors {
            let kinds = [
                err.is_not_found(),
                err.is_forbidden(),
                err.is_validation(),
                err.is_conflict(),
            ];
            assert_eq!(
                kinds.iter().filter(|k| **k).count(),
                1,
                "error {err:?} must belong to exactly one kind"
            );
        }
    }

    #[test]
    fn test_infrastructure_errors_have_no_client_kind() {
        let err = DomainError::Database("connection reset".to_string());
        assert!(!err.is_not_found());
        assert!(!err.is_forbidden());
        assert!(!err.is_validation());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_error_display() {
        let err = DomainError::EmptyGroupName;
        assert_eq!(err.to_string(), "Group name cannot be empty");

        let err = DomainError::StatusRegression {
            from: DeliveryStatus::Read,
            to: DeliveryStatus::Received,
        };
        assert!(err.to_string().contains("Read"));
        assert!(err.to_string().contains("Received"));
    }
}
