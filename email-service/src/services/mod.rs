pub mod generator;
pub mod providers;
pub mod validation;

pub use generator::{build_user_message, load_system_prompt, EmailGenerator};
pub use validation::parse_email_request;
