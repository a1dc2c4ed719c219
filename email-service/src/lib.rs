//! Email drafting service: validates a drafting request, asks a chat
//! completion API for the email, and reports how long the call took.

pub mod config;
pub mod dtos;
pub mod handlers;
pub mod services;
pub mod startup;

pub use startup::{build_router, AppState, Application};
