//! PostgreSQL implementation of ReactionRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use pigeon_core::entities::Reaction;
use pigeon_core::error::DomainError;
use pigeon_core::traits::{ReactionRepository, RepoResult};
use pigeon_core::value_objects::{MessageId, UserId};

use crate::models::ReactionModel;

use super::error::map_db_error;

/// PostgreSQL implementation of ReactionRepository
#[derive(Clone)]
pub struct PgReactionRepository {
    pool: PgPool,
}

impl PgReactionRepository {
    /// Create a new PgReactionRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ReactionRepository for PgReactionRepository {
    #[instrument(skip(self))]
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()> {
        // The (message_id, user_id) primary key turns a second reaction
        // from the same user into an emoji replacement.
        sqlx::query(
            r#"
            INSERT INTO reactions (message_id, user_id, emoji)
            VALUES ($1, $2, $3)
            ON CONFLICT (message_id, user_id) DO UPDATE SET emoji = EXCLUDED.emoji
            "#,
        )
        .bind(reaction.message_id.into_uuid())
        .bind(reaction.user_id.into_uuid())
        .bind(&reaction.emoji)
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(())
    }

    #[instrument(skip(self))]
    async fn remove(&self, message_id: MessageId, user_id: UserId) -> RepoResult<()> {
        let result = sqlx::query(
            r#"
            DELETE FROM reactions WHERE message_id = $1 AND user_id = $2
            "#,
        )
        .bind(message_id.into_uuid())
        .bind(user_id.into_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::ReactionNotFound {
                message_id,
                user_id,
            });
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn find(&self, message_id: MessageId, user_id: UserId) -> RepoResult<Option<Reaction>> {
        let result = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, user_id, emoji
            FROM reactions
            WHERE message_id = $1 AND user_id = $2
            "#,
        )
        .bind(message_id.into_uuid())
        .bind(user_id.into_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Reaction::from))
    }

    #[instrument(skip(self))]
    async fn list_by_message(&self, message_id: MessageId) -> RepoResult<Vec<Reaction>> {
        let results = sqlx::query_as::<_, ReactionModel>(
            r#"
            SELECT message_id, user_id, emoji
            FROM reactions
            WHERE message_id = $1
            "#,
        )
        .bind(message_id.into_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Reaction::from).collect())
    }
}
