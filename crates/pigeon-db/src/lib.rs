//! # pigeon-db
//!
//! Persistence layer implementing the pigeon-core ports with PostgreSQL via
//! SQLx, plus the filesystem blob store.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - Connection pool management
//! - Database models with SQLx `FromRow` derives
//! - Model -> entity mappers
//! - Repository implementations for users, conversations, messages, reactions
//! - `FsBlobStore`, a directory-backed blob store for photos
//!
//! ## Usage
//!
//! ```rust,ignore
//! use pigeon_db::pool::{create_pool, DatabaseConfig};
//! use pigeon_db::repositories::PgUserRepository;
//! use pigeon_core::traits::UserRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     let user_repo = PgUserRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod blob;
pub mod mappers;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use blob::FsBlobStore;
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgConversationRepository, PgMessageRepository, PgReactionRepository, PgUserRepository,
};
