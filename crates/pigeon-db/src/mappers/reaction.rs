//! Reaction model <-> entity mapper

use pigeon_core::entities::Reaction;
use pigeon_core::value_objects::{MessageId, UserId};

use crate::models::ReactionModel;

impl From<ReactionModel> for Reaction {
    fn from(model: ReactionModel) -> Self {
        Reaction {
            message_id: MessageId::from_uuid(model.message_id),
            user_id: UserId::from_uuid(model.user_id),
            emoji: model.emoji,
        }
    }
}
