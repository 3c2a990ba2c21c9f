//! Ports - traits the domain core uses to reach its collaborators

mod ports;

pub use ports::{
    BlobStore, ConversationRepository, MessageRepository, ReactionRepository, RepoResult,
    UserRepository,
};
