//! HTTP handlers for the email service.

pub mod email;
pub mod health;
