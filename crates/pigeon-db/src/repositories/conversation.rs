//! PostgreSQL implementation of ConversationRepository

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use pigeon_core::entities::{Conversation, ConversationKind, Message};
use pigeon_core::error::DomainError;
use pigeon_core::traits::{ConversationRepository, RepoResult};
use pigeon_core::value_objects::{ConversationId, UserId};

use crate::mappers::conversation_from_parts;
use crate::models::{ConversationModel, MessageModel, ParticipantModel};

use super::error::{map_db_error, map_unique_violation};

/// Canonical key for the unordered pair of users in a direct conversation
///
/// Sorting the two ids gives one representation per pair, so the unique
/// index on this column is what serializes concurrent find-or-create calls.
fn direct_key(a: UserId, b: UserId) -> String {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    format!("{lo}:{hi}")
}

/// PostgreSQL implementation of ConversationRepository
#[derive(Clone)]
pub struct PgConversationRepository {
    pool: PgPool,
}

impl PgConversationRepository {
    /// Create a new PgConversationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Load a conversation hydrated with participants and its last message
    async fn load(&self, id: ConversationId) -> RepoResult<Option<Conversation>> {
        let model = sqlx::query_as::<_, ConversationModel>(
            r#"
            SELECT id, kind, name, photo, last_activity
            FROM conversations
            WHERE id = $1
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        let Some(model) = model else {
            return Ok(None);
        };

        let participants = sqlx::query_as::<_, ParticipantModel>(
            r#"
            SELECT u.id AS user_id, u.name, u.photo
            FROM conversation_participants cp
            JOIN users u ON u.id = cp.user_id
            WHERE cp.conversation_id = $1
            ORDER BY u.name
            "#,
        )
        .bind(id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let last_message = sqlx::query_as::<_, MessageModel>(
            r#"
            SELECT m.id, m.conversation_id, m.sender_id, u.name AS sender_name,
                   u.photo AS sender_photo, m.content, m.kind, m.status,
                   m.reply_to, m.sent_at, m.deleted_at
            FROM messages m
            JOIN users u ON u.id = m.sender_id
            WHERE m.conversation_id = $1 AND m.deleted_at IS NULL
            ORDER BY m.sent_at DESC
            LIMIT 1
            "#,
        )
        .bind(id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?
        .map(Message::try_from)
        .transpose()?;

        conversation_from_parts(model, participants, last_message).map(Some)
    }
}

#[async_trait]
impl ConversationRepository for PgConversationRepository {
    #[instrument(skip(self))]
    async fn create_direct(&self, user_a: UserId, user_b: UserId) -> RepoResult<Conversation> {
        let key = direct_key(user_a, user_b);

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        // One atomic upsert: concurrent identical calls race on the unique
        // direct_key and all observe the same winning row.
        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO conversations (id, kind, direct_key, last_activity)
            VALUES ($1, 'direct', $2, NOW())
            ON CONFLICT (direct_key) DO UPDATE SET direct_key = EXCLUDED.direct_key
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&key)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id)
            VALUES ($1, $2), ($1, $3)
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(id)
        .bind(user_a.into_uuid())
        .bind(user_b.into_uuid())
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        tx.commit().await.map_err(map_db_error)?;

        self.load(ConversationId::from_uuid(id)).await?.ok_or_else(|| {
            DomainError::Database("direct conversation missing after upsert".to_string())
        })
    }

    #[instrument(skip(self, participant_ids))]
    async fn create_group(
        &self,
        name: &str,
        participant_ids: &[UserId],
    ) -> RepoResult<Conversation> {
        let id = Uuid::new_v4();

        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query(
            r#"
            INSERT INTO conversations (id, kind, name, last_activity)
            VALUES ($1, 'group', $2, NOW())
            "#,
        )
        .bind(id)
        .bind(name)
        .execute(&mut *tx)
        .await
        .map_err(map_db_error)?;

        for user_id in participant_ids {
            sqlx::query(
                r#"
                INSERT INTO conversation_participants (conversation_id, user_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(user_id.into_uuid())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        self.load(ConversationId::from_uuid(id)).await?.ok_or_else(|| {
            DomainError::Database("group conversation missing after insert".to_string())
        })
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: ConversationId) -> RepoResult<Option<Conversation>> {
        self.load(id).await
    }

    #[instrument(skip(self))]
    async fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<Conversation>> {
        let ids = sqlx::query_scalar::<_, Uuid>(
            r#"
            SELECT c.id
            FROM conversations c
            JOIN conversation_participants cp ON cp.conversation_id = c.id
            WHERE cp.user_id = $1
            ORDER BY c.last_activity DESC
            "#,
        )
        .bind(user_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        let mut conversations = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(conversation) = self.load(ConversationId::from_uuid(id)).await? {
                conversations.push(conversation);
            }
        }

        Ok(conversations)
    }

    #[instrument(skip(self))]
    async fn add_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<()> {
        sqlx::query(
            r#"
            INSERT INTO conversation_participants (conversation_id, user_id)
            VALUES ($1, $2)
            "#,
        )
        .bind(conversation_id.into_uuid())
        .bind(user_id.into_uuid())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, || DomainError::AlreadyParticipant(user_id)))?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM conversation_participants
            WHERE conversation_id = $1 AND user_id = $2
            "#,
        )
        .bind(conversation_id.into_uuid())
        .bind(user_id.into_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ParticipantNotFound(user_id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn rename_group(&self, id: ConversationId, name: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE conversations SET name = $2
            WHERE id = $1 AND kind = $3
            "#,
        )
        .bind(id.into_uuid())
        .bind(name)
        .bind(ConversationKind::Group.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConversationNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_group_photo(&self, id: ConversationId, photo: &str) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE conversations SET photo = $2
            WHERE id = $1 AND kind = $3
            "#,
        )
        .bind(id.into_uuid())
        .bind(photo)
        .bind(ConversationKind::Group.as_str())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ConversationNotFound(id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn bump_recency(&self, id: ConversationId, at: DateTime<Utc>) -> RepoResult<()> {
        sqlx::query(
            r#"
            UPDATE conversations SET last_activity = $2
            WHERE id = $1 AND last_activity < $2
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
    fn test_direct_key_ignores_argument_order() {
        let a = UserId::generate();
        let b = UserId::generate();
        assert_eq!(direct_key(a, b), direct_key(b, a));
    }

    #[test]
    fn test_direct_key_distinct_per_pair() {
        let a = UserId::generate();
        let b = UserId::generate();
        let c = UserId::generate();
        assert_ne!(direct_key(a, b), direct_key(a, c));
    }

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgConversationRepository>();
    }
}
