//! # pigeon-core
//!
//! Domain layer containing entities, typed ids, the domain error taxonomy,
//! and the ports (repository and blob-store traits) the core talks through.
//! This crate has zero dependencies on infrastructure (database, filesystem, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Conversation, ConversationKind, DeliveryStatus, Message, MessageKind, Participant, Reaction,
    User,
};
pub use error::DomainError;
pub use traits::{
    BlobStore, ConversationRepository, MessageRepository, ReactionRepository, RepoResult,
    UserRepository,
};
pub use value_objects::{ConversationId, IdParseError, MessageId, UserId};
