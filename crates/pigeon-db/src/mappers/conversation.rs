//! Conversation model <-> entity mapper

use pigeon_core::entities::{Conversation, ConversationKind, Message, Participant};
use pigeon_core::error::DomainError;
use pigeon_core::traits::RepoResult;
use pigeon_core::value_objects::{ConversationId, UserId};

use crate::models::{ConversationModel, ParticipantModel};

impl From<ParticipantModel> for Participant {
    fn from(model: ParticipantModel) -> Self {
        Participant {
            user_id: UserId::from_uuid(model.user_id),
            name: model.name,
            photo: model.photo,
        }
    }
}

/// Assemble a hydrated Conversation entity from its stored parts
///
/// Fails with a database error when the stored kind column holds an
/// unknown value (a corrupt row, not a caller mistake).
pub fn conversation_from_parts(
    model: ConversationModel,
    participants: Vec<ParticipantModel>,
    last_message: Option<Message>,
) -> RepoResult<Conversation> {
    let kind = ConversationKind::parse(&model.kind)
        .ok_or_else(|| DomainError::Database(format!("unknown conversation kind: {}", model.kind)))?;

    Ok(Conversation {
        id: ConversationId::from_uuid(model.id),
        kind,
        name: model.name,
        photo: model.photo,
        participants: participants.into_iter().map(Participant::from).collect(),
        last_message: last_message.map(Box::new),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn test_rejects_unknown_kind() {
        let model = ConversationModel {
            id: Uuid::new_v4(),
            kind: "broadcast".to_string(),
            name: None,
            photo: None,
            last_activity: Utc::now(),
        };
        let result = conversation_from_parts(model, vec![], None);
        assert!(matches!(result, Err(DomainError::Database(_))));
    }

    #[test]
    fn test_maps_participants() {
        let model = ConversationModel {
            id: Uuid::new_v4(),
            kind: "group".to_string(),
            name: Some("plans".to_string()),
            photo: None,
            last_activity: Utc::now(),
        };
        let participants = vec![ParticipantModel {
            user_id: Uuid::new_v4(),
            name: "alice".to_string(),
            photo: None,
        }];

        let conv = conversation_from_parts(model, participants, None).unwrap();
        assert!(conv.is_group());
        assert_eq!(conv.participants.len(), 1);
        assert_eq!(conv.participants[0].name, "alice");
    }
}
