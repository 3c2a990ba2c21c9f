//! Reaction entity - an emoji reaction on a message

use serde::{Deserialize, Serialize};

use crate::value_objects::{MessageId, UserId};

/// Reaction entity
///
/// At most one reaction exists per (message, user) pair; reacting again
/// replaces the emoji rather than adding a second row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reaction {
    pub message_id: MessageId,
    pub user_id: UserId,
    pub emoji: String,
}

impl Reaction {
    /// Create a new Reaction
    pub fn new(message_id: MessageId, user_id: UserId, emoji: String) -> Self {
        Self {
            message_id,
            user_id,
            emoji,
        }
    }

    /// Check if this reaction belongs to a user
    #[inline]
    pub fn is_from(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reaction_creation() {
        let user = UserId::generate();
        let reaction = Reaction::new(MessageId::generate(), user, "👍".to_string());
        assert!(reaction.is_from(user));
        assert!(!reaction.is_from(UserId::generate()));
        assert_eq!(reaction.emoji, "👍");
    }
}
