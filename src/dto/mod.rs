//! Request/response types crossing the HTTP boundary.

pub mod chat;
pub mod health;
pub mod player;
pub mod validation;
