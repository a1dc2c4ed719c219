pub mod email;

pub use email::{ApiResponse, EmailRequest, GenerationResult, Tone};
