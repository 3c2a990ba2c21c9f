//! Message entity - a text or photo message in a conversation

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Participant, Reaction};
use crate::value_objects::{ConversationId, MessageId};

/// Kind of message content
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Literal text content
    Text,
    /// Content is a blob-store reference to a photo
    Photo,
}

impl MessageKind {
    /// Stable string form, as stored by the persistence collaborator
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Photo => "photo",
        }
    }

    /// Parse the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "text" => Some(Self::Text),
            "photo" => Some(Self::Photo),
            _ => None,
        }
    }
}

/// Delivery status of a message
///
/// Progresses `Sent -> Received -> Read` and never regresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Sent,
    Received,
    Read,
}

impl DeliveryStatus {
    /// Stable string form, as stored by the persistence collaborator
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Sent => "sent",
            Self::Received => "received",
            Self::Read => "read",
        }
    }

    /// Parse the stable string form
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "sent" => Some(Self::Sent),
            "received" => Some(Self::Received),
            "read" => Some(Self::Read),
            _ => None,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Self::Sent => 0,
            Self::Received => 1,
            Self::Read => 2,
        }
    }

    /// Whether moving to `next` is a forward transition
    pub fn can_advance_to(self, next: Self) -> bool {
        next.rank() > self.rank()
    }
}

/// Message entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: MessageId,
    pub conversation_id: ConversationId,
    pub sender: Participant,
    pub sent_at: DateTime<Utc>,
    pub content: String,
    pub kind: MessageKind,
    pub status: DeliveryStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<MessageId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub reactions: Vec<Reaction>,
}

impl Message {
    /// Create a new message with status `Sent` and the current timestamp
    pub fn new(
        id: MessageId,
        conversation_id: ConversationId,
        sender: Participant,
        content: String,
        kind: MessageKind,
    ) -> Self {
        Self {
            id,
            conversation_id,
            sender,
            sent_at: Utc::now(),
            content,
            kind,
            status: DeliveryStatus::Sent,
            reply_to: None,
            deleted_at: None,
            reactions: Vec::new(),
        }
    }

    /// Create a reply message
    pub fn new_reply(
        id: MessageId,
        conversation_id: ConversationId,
        sender: Participant,
        content: String,
        kind: MessageKind,
        reply_to: MessageId,
    ) -> Self {
        let mut message = Self::new(id, conversation_id, sender, content, kind);
        message.reply_to = Some(reply_to);
        message
    }

    /// Check if the message has been soft deleted
    #[inline]
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Check if the message is a reply
    #[inline]
    pub fn is_reply(&self) -> bool {
        self.reply_to.is_some()
    }

    /// Overwrite the content in place
    ///
    /// Leaves timestamp, status, and deletion state untouched.
    pub fn edit(&mut self, content: String) {
        self.content = content;
    }

    /// Set the deletion marker once; returns false if already deleted
    pub fn mark_deleted(&mut self, at: DateTime<Utc>) -> bool {
        if self.deleted_at.is_some() {
            return false;
        }
        self.deleted_at = Some(at);
        true
    }

    /// Build a fresh copy of this message for another conversation
    ///
    /// Only content and kind carry over; the forwarded message gets a new
    /// id, the forwarding user as sender, a fresh timestamp, and status
    /// `Sent`. The original is untouched.
    pub fn forward_to(
        &self,
        id: MessageId,
        conversation_id: ConversationId,
        sender: Participant,
    ) -> Self {
        Self::new(id, conversation_id, sender, self.content.clone(), self.kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::UserId;

    fn sender(name: &str) -> Participant {
        Participant {
            user_id: UserId::generate(),
            name: name.to_string(),
            photo: None,
        }
    }

    fn text_message(content: &str) -> Message {
        Message::new(
            MessageId::generate(),
            ConversationId::generate(),
            sender("alice"),
            content.to_string(),
            MessageKind::Text,
        )
    }

    #[test]
    fn test_new_message_is_sent_and_not_deleted() {
        let msg = text_message("hi");
        assert_eq!(msg.status, DeliveryStatus::Sent);
        assert!(!msg.is_deleted());
        assert!(!msg.is_reply());
        assert!(msg.reactions.is_empty());
    }

    #[test]
    fn test_status_advances_only_forward() {
        use DeliveryStatus::{Read, Received, Sent};

        assert!(Sent.can_advance_to(Received));
        assert!(Received.can_advance_to(Read));
        assert!(Sent.can_advance_to(Read));

        assert!(!Read.can_advance_to(Received));
        assert!(!Read.can_advance_to(Sent));
        assert!(!Received.can_advance_to(Sent));
        assert!(!Sent.can_advance_to(Sent));
    }

    #[test]
    fn test_status_string_roundtrip() {
        for status in [
            DeliveryStatus::Sent,
            DeliveryStatus::Received,
            DeliveryStatus::Read,
        ] {
            assert_eq!(DeliveryStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(DeliveryStatus::parse("delivered"), None);
    }

    #[test]
    fn test_edit_touches_content_only() {
        let mut msg = text_message("first");
        let sent_at = msg.sent_at;

        msg.edit("second".to_string());
        assert_eq!(msg.content, "second");
        assert_eq!(msg.sent_at, sent_at);
        assert_eq!(msg.status, DeliveryStatus::Sent);
        assert!(!msg.is_deleted());
    }

    #[test]
    fn test_mark_deleted_is_idempotent() {
        let mut msg = text_message("gone");
        let first = Utc::now();
        assert!(msg.mark_deleted(first));

        let later = first + chrono::Duration::seconds(10);
        assert!(!msg.mark_deleted(later));
        assert_eq!(msg.deleted_at, Some(first));
    }

    #[test]
    fn test_forward_copies_content_and_kind_only() {
        let mut original = text_message("hi");
        original.status = DeliveryStatus::Read;
        original.reply_to = Some(MessageId::generate());

        let target = ConversationId::generate();
        let bob = sender("bob");
        let forwarded = original.forward_to(MessageId::generate(), target, bob.clone());

        assert_ne!(forwarded.id, original.id);
        assert_eq!(forwarded.conversation_id, target);
        assert_eq!(forwarded.content, "hi");
        assert_eq!(forwarded.kind, MessageKind::Text);
        assert_eq!(forwarded.sender, bob);
        assert_eq!(forwarded.status, DeliveryStatus::Sent);
        assert!(forwarded.reply_to.is_none());
    }
}
