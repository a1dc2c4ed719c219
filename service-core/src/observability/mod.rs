pub mod file_sink;
pub mod logging;

pub use file_sink::{LOG_FILE_NAME, json_file_layer, open_log_file};
pub use logging::{LoggingConfig, init_tracing};
