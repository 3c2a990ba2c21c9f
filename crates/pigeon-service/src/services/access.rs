//! Authorization guard
//!
//! Pure predicates over already-loaded entities: participant membership and
//! sender ownership. No collaborator calls, no side effects; the sibling
//! services run these checks before any mutation.

use pigeon_core::entities::{Conversation, Message};
use pigeon_core::error::DomainError;
use pigeon_core::value_objects::UserId;

/// Check whether a user belongs to a conversation
pub fn is_participant(conversation: &Conversation, user_id: UserId) -> bool {
    conversation.has_participant(user_id)
}

/// Require conversation membership
pub fn require_participant(
    conversation: &Conversation,
    user_id: UserId,
) -> Result<(), DomainError> {
    if is_participant(conversation, user_id) {
        Ok(())
    } else {
        Err(DomainError::NotParticipant)
    }
}

/// Require that a user is the sender of a message
pub fn require_sender(message: &Message, user_id: UserId) -> Result<(), DomainError> {
    if message.sender.user_id == user_id {
        Ok(())
    } else {
        Err(DomainError::NotSender)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pigeon_core::entities::{MessageKind, Participant};
    use pigeon_core::value_objects::{ConversationId, MessageId};

    fn snapshot(name: &str) -> Participant {
        Participant {
            user_id: UserId::generate(),
            name: name.to_string(),
            photo: None,
        }
    }

    #[test]
    fn test_is_participant() {
        let alice = snapshot("alice");
        let alice_id = alice.user_id;
        let conv =
            Conversation::new_group(ConversationId::generate(), "g".to_string(), vec![alice]);

        assert!(is_participant(&conv, alice_id));
        assert!(!is_participant(&conv, UserId::generate()));
    }

    #[test]
    fn test_require_participant() {
        let alice = snapshot("alice");
        let alice_id = alice.user_id;
        let conv =
            Conversation::new_group(ConversationId::generate(), "g".to_string(), vec![alice]);

        assert!(require_participant(&conv, alice_id).is_ok());
        assert!(matches!(
            require_participant(&conv, UserId::generate()),
            Err(DomainError::NotParticipant)
        ));
    }

    #[test]
    fn test_require_sender() {
        let alice = snapshot("alice");
        let alice_id = alice.user_id;
        let message = Message::new(
            MessageId::generate(),
            ConversationId::generate(),
            alice,
            "hi".to_string(),
            MessageKind::Text,
        );

        assert!(require_sender(&message, alice_id).is_ok());
        assert!(matches!(
            require_sender(&message, UserId::generate()),
            Err(DomainError::NotSender)
        ));
    }
}
