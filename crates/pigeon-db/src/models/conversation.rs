//! Conversation database models

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the conversations table
#[derive(Debug, Clone, FromRow)]
pub struct ConversationModel {
    pub id: Uuid,
    pub kind: String,
    pub name: Option<String>,
    pub photo: Option<String>,
    pub last_activity: DateTime<Utc>,
}

/// Membership row joined with the user's display fields
///
/// Produced by joining conversation_participants with users; the snapshot
/// the core hands out is materialized from this row.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantModel {
    pub user_id: Uuid,
    pub name: String,
    pub photo: Option<String>,
}
