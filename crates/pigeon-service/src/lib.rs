//! # pigeon-service
//!
//! Application layer containing the business logic of the messaging core:
//! conversation registry, message ledger, reaction index, and the
//! authorization guard, all reached through a shared [`services::ServiceContext`].

pub mod services;

pub use services::{
    ConversationService, DeliveryScheduler, MessageService, ReactionService, ServiceContext,
    ServiceContextBuilder, ServiceError, ServiceResult, UserService,
};
