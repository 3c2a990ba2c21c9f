//! Reaction database model

use sqlx::FromRow;
use uuid::Uuid;

/// Database model for the reactions table
#[derive(Debug, Clone, FromRow)]
pub struct ReactionModel {
    pub message_id: Uuid,
    pub user_id: Uuid,
    pub emoji: String,
}
