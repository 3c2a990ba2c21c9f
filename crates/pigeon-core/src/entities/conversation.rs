//! Conversation entity - a direct or group chat

use serde::{Deserialize, Serialize};

use crate::entities::Message;
use crate::value_objects::{ConversationId, UserId};

/// Kind of conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConversationKind {
    Direct,
    Group,
}

impl ConversationKind {
    /// Stable string form, as stored by the persistence collaborator
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Group => "group",
        }
    }

    /// Parse the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "direct" => Some(Self::Direct),
            "group" => Some(Self::Group),
            _ => None,
        }
    }
}

/// Denormalized display snapshot of a conversation member
///
/// The source of truth for name and photo is the User entity; the snapshot
/// exists so a conversation can be rendered without extra lookups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    pub user_id: UserId,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
}

/// Conversation entity
///
/// A direct conversation always has exactly two participants and no name or
/// photo of its own; a group has one or more participants and a mutable
/// name and photo. The participant set never contains duplicate user ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: ConversationId,
    pub kind: ConversationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    pub participants: Vec<Participant>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_message: Option<Box<Message>>,
}

impl Conversation {
    /// Create a new direct conversation between two users
    pub fn new_direct(id: ConversationId, a: Participant, b: Participant) -> Self {
        Self {
            id,
            kind: ConversationKind::Direct,
            name: None,
            photo: None,
            participants: vec![a, b],
            last_message: None,
        }
    }

    /// Create a new group conversation
    pub fn new_group(id: ConversationId, name: String, participants: Vec<Participant>) -> Self {
        Self {
            id,
            kind: ConversationKind::Group,
            name: Some(name),
            photo: None,
            participants,
            last_message: None,
        }
    }

    #[inline]
    pub fn is_direct(&self) -> bool {
        self.kind == ConversationKind::Direct
    }

    #[inline]
    pub fn is_group(&self) -> bool {
        self.kind == ConversationKind::Group
    }

    /// Check whether a user belongs to this conversation
    pub fn has_participant(&self, user_id: UserId) -> bool {
        self.participants.iter().any(|p| p.user_id == user_id)
    }

    /// Get the membership snapshot for a user, if present
    pub fn participant(&self, user_id: UserId) -> Option<&Participant> {
        self.participants.iter().find(|p| p.user_id == user_id)
    }

    /// In a direct conversation, the participant other than the viewer
    pub fn counterpart(&self, viewer: UserId) -> Option<&Participant> {
        if !self.is_direct() {
            return None;
        }
        self.participants.iter().find(|p| p.user_id != viewer)
    }

    /// Name to display for a given viewer
    ///
    /// Groups carry their own name; a direct conversation is titled after
    /// the other participant.
    pub fn display_name(&self, viewer: UserId) -> Option<&str> {
        match self.kind {
            ConversationKind::Group => self.name.as_deref(),
            ConversationKind::Direct => self.counterpart(viewer).map(|p| p.name.as_str()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(name: &str) -> Participant {
        Participant {
            user_id: UserId::generate(),
            name: name.to_string(),
            photo: None,
        }
    }

    #[test]
    fn test_kind_roundtrip() {
        assert_eq!(
            ConversationKind::parse(ConversationKind::Direct.as_str()),
            Some(ConversationKind::Direct)
        );
        assert_eq!(
            ConversationKind::parse(ConversationKind::Group.as_str()),
            Some(ConversationKind::Group)
        );
        assert_eq!(ConversationKind::parse("channel"), None);
    }

    #[test]
    fn test_direct_has_no_own_name() {
        let conv = Conversation::new_direct(ConversationId::generate(), snapshot("a"), snapshot("b"));
        assert!(conv.is_direct());
        assert!(conv.name.is_none());
        assert_eq!(conv.participants.len(), 2);
    }

    #[test]
    fn test_display_name_for_direct_is_counterpart() {
        let alice = snapshot("alice");
        let bob = snapshot("bob");
        let alice_id = alice.user_id;
        let bob_id = bob.user_id;
        let conv = Conversation::new_direct(ConversationId::generate(), alice, bob);

        assert_eq!(conv.display_name(alice_id), Some("bob"));
        assert_eq!(conv.display_name(bob_id), Some("alice"));
    }

    #[test]
    fn test_display_name_for_group_is_own_name() {
        let alice = snapshot("alice");
        let viewer = alice.user_id;
        let conv = Conversation::new_group(
            ConversationId::generate(),
            "weekend plans".to_string(),
            vec![alice],
        );
        assert_eq!(conv.display_name(viewer), Some("weekend plans"));
        assert!(conv.counterpart(viewer).is_none());
    }

    #[test]
    fn test_has_participant() {
        let alice = snapshot("alice");
        let alice_id = alice.user_id;
        let conv = Conversation::new_group(ConversationId::generate(), "g".to_string(), vec![alice]);

        assert!(conv.has_participant(alice_id));
        assert!(!conv.has_participant(UserId::generate()));
    }
}
