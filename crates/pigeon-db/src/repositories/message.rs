//! PostgreSQL implementation of MessageRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use pigeon_core::entities::{DeliveryStatus, Message};
use pigeon_core::error::DomainError;
use pigeon_core::traits::{MessageRepository, RepoResult};
use pigeon_core::value_objects::{ConversationId, MessageId};

use crate::models::MessageModel;

use super::error::map_db_error;

/// PostgreSQL implementation of MessageRepository
#[derive(Clone)]
pub struct PgMessageRepository {
    pool: PgPool,
}

impl PgMessageRepository {
    /// Create a new PgMessageRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageRepository for PgMessageRepository {
    #[instrument(skip(self, message))]
    async fn create(&self, message: &Message) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO messages (id, conversation_id, sender_id, content, kind, status, reply_to, sent_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(message.id.into_uuid())
        .bind(message.conversation_id.into_uuid())
        .bind(message.sender.user_id.into_uuid())
        .bind(&message.content)
        .bind(message.kind.as_str())
        .bind(message.status.as_str())
        .bind(message.reply_to.map(MessageId::into_uuid))
        .bind(message.sent_at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>> {
        // Soft-deleted rows are still found by id; listings mask them.
        let result = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, u.name AS sender_name,
                   u.photo AS sender_photo, m.content, m.kind, m.status,
                   m.reply_to, m.sent_at, m.deleted_at
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.id = $1
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        result.map(Message::try_from).transpose()
    }

    #[instrument(skip(self))]
    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> RepoResult<Vec<Message>> {
        let results = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, u.name AS sender_name,
                   u.photo AS sender_photo, m.content, m.kind, m.status,
                   m.reply_to, m.sent_at, m.deleted_at
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.conversation_id = $1 AND m.deleted_at IS NULL
            ORDER BY m.sent_at ASC
            "#,
        )
        .bind(conversation_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        results.into_iter().map(Message::try_from).collect()
    }

    #[instrument(skip(self, content))]
    async fn update_content(&self, id: MessageId, content: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET content = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.into_uuid())
        .bind(content)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MessageNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn update_status(&self, id: MessageId, status: DeliveryStatus) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE messages SET status = $2 WHERE id = $1
            "#,
        )
        .bind(id.into_uuid())
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::MessageNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn soft_delete(&self, id: MessageId, at: DateTime<Utc>) -> RepoResult<()> {
        // Zero rows affected means the message was already deleted; the
        // original deletion timestamp stays untouched.
        sqlx::query(
            r#"
            UPDATE messages SET deleted_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id.into_uuid())
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgMessageRepository>();
    }
}
