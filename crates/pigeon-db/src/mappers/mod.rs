//! Model -> entity mappers

mod conversation;
mod message;
mod reaction;
mod user;

pub use conversation::conversation_from_parts;
