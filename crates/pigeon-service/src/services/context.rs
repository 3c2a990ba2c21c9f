//! Service context - dependency container for services
//!
//! Holds the collaborator handles (repositories, blob store) and the
//! delivery scheduler. The context is passed into every service; nothing
//! here is a global.

use std::sync::Arc;
use std::time::Duration;

use pigeon_core::traits::{
    BlobStore, ConversationRepository, MessageRepository, ReactionRepository, UserRepository,
};
use pigeon_core::value_objects::MessageId;

use super::delivery::DeliveryScheduler;

/// Service context containing all dependencies
///
/// Provides access to:
/// - The persistence collaborator (one repository per aggregate)
/// - The blob store for photo bytes
/// - The delivery scheduler for background status advances
#[derive(Clone)]
pub struct ServiceContext {
    user_repo: Arc<dyn UserRepository>,
    conversation_repo: Arc<dyn ConversationRepository>,
    message_repo: Arc<dyn MessageRepository>,
    reaction_repo: Arc<dyn ReactionRepository>,
    blob_store: Arc<dyn BlobStore>,
    delivery: Arc<DeliveryScheduler>,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        conversation_repo: Arc<dyn ConversationRepository>,
        message_repo: Arc<dyn MessageRepository>,
        reaction_repo: Arc<dyn ReactionRepository>,
        blob_store: Arc<dyn BlobStore>,
        received_delay: Duration,
    ) -> Self {
        Self {
            user_repo,
            conversation_repo,
            message_repo,
            reaction_repo,
            blob_store,
            delivery: Arc::new(DeliveryScheduler::new(received_delay)),
        }
    }

    // === Collaborators ===

    /// Get the user repository
    pub fn user_repo(&self) -> &dyn UserRepository {
        self.user_repo.as_ref()
    }

    /// Get the conversation repository
    pub fn conversation_repo(&self) -> &dyn ConversationRepository {
        self.conversation_repo.as_ref()
    }

    /// Get the message repository
    pub fn message_repo(&self) -> &dyn MessageRepository {
        self.message_repo.as_ref()
    }

    /// Get the reaction repository
    pub fn reaction_repo(&self) -> &dyn ReactionRepository {
        self.reaction_repo.as_ref()
    }

    /// Get the blob store
    pub fn blob_store(&self) -> &dyn BlobStore {
        self.blob_store.as_ref()
    }

    // === Delivery ===

    /// Get the delivery scheduler (for shutdown/drain at process exit)
    pub fn delivery(&self) -> &DeliveryScheduler {
        self.delivery.as_ref()
    }

    /// Schedule the background advance of a message to `Received`
    pub fn schedule_received(&self, message_id: MessageId) {
        self.delivery
            .schedule_received(Arc::clone(&self.message_repo), message_id);
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("blob_store", &"...")
            .field("delivery", &self.delivery)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
pub struct ServiceContextBuilder {
    user_repo: Option<Arc<dyn UserRepository>>,
    conversation_repo: Option<Arc<dyn ConversationRepository>>,
    message_repo: Option<Arc<dyn MessageRepository>>,
    reaction_repo: Option<Arc<dyn ReactionRepository>>,
    blob_store: Option<Arc<dyn BlobStore>>,
    received_delay: Duration,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self {
            user_repo: None,
            conversation_repo: None,
            message_repo: None,
            reaction_repo: None,
            blob_store: None,
            received_delay: Duration::from_secs(1),
        }
    }

    pub fn user_repo(mut self, repo: Arc<dyn UserRepository>) -> Self {
        self.user_repo = Some(repo);
        self
    }

    pub fn conversation_repo(mut self, repo: Arc<dyn ConversationRepository>) -> Self {
        self.conversation_repo = Some(repo);
        self
    }

    pub fn message_repo(mut self, repo: Arc<dyn MessageRepository>) -> Self {
        self.message_repo = Some(repo);
        self
    }

    pub fn reaction_repo(mut self, repo: Arc<dyn ReactionRepository>) -> Self {
        self.reaction_repo = Some(repo);
        self
    }

    pub fn blob_store(mut self, store: Arc<dyn BlobStore>) -> Self {
        self.blob_store = Some(store);
        self
    }

    pub fn received_delay(mut self, delay: Duration) -> Self {
        self.received_delay = delay;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any required dependency is missing
    pub fn build(self) -> super::error::ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.user_repo
                .ok_or_else(|| super::error::ServiceError::validation("user_repo is required"))?,
            self.conversation_repo.ok_or_else(|| {
                super::error::ServiceError::validation("conversation_repo is required")
            })?,
            self.message_repo
                .ok_or_else(|| super::error::ServiceError::validation("message_repo is required"))?,
            self.reaction_repo.ok_or_else(|| {
                super::error::ServiceError::validation("reaction_repo is required")
            })?,
            self.blob_store
                .ok_or_else(|| super::error::ServiceError::validation("blob_store is required"))?,
            self.received_delay,
        ))
    }
}

impl Default for ServiceContextBuilder {
    fn default() -> Self {
        Self::new()
    }
}
