//! Message model <-> entity mapper

use pigeon_core::entities::{DeliveryStatus, Message, MessageKind, Participant};
use pigeon_core::error::DomainError;
use pigeon_core::value_objects::{ConversationId, MessageId, UserId};

use crate::models::MessageModel;

impl TryFrom<MessageModel> for Message {
    type Error = DomainError;

    fn try_from(model: MessageModel) -> Result<Self, Self::Error> {
        let kind = MessageKind::parse(&model.kind)
            .ok_or_else(|| DomainError::Database(format!("unknown message kind: {}", model.kind)))?;
        let status = DeliveryStatus::parse(&model.status).ok_or_else(|| {
            DomainError::Database(format!("unknown message status: {}", model.status))
        })?;

        Ok(Message {
            id: MessageId::from_uuid(model.id),
            conversation_id: ConversationId::from_uuid(model.conversation_id),
            sender: Participant {
                user_id: UserId::from_uuid(model.sender_id),
                name: model.sender_name,
                photo: model.sender_photo,
            },
            sent_at: model.sent_at,
            content: model.content,
            kind,
            status,
            reply_to: model.reply_to.map(MessageId::from_uuid),
            deleted_at: model.deleted_at,
            // Hydrated separately by the service layer
            reactions: Vec::new(),
        })
    }
}
