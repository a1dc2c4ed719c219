//! Append-only JSON-lines log sink.
//!
//! Every event is rendered into one buffer and handed to the file in a single
//! `write_all` while the mutex is held, so concurrent requests never
//! interleave records. The file is opened with `O_APPEND`.

use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing::Subscriber;
use tracing_subscriber::Layer;
use tracing_subscriber::registry::LookupSpan;

pub const LOG_FILE_NAME: &str = "app.log";

/// Open `<dir>/app.log` for appending, creating `dir` if it is missing.
pub fn open_log_file(dir: &Path) -> io::Result<File> {
    fs::create_dir_all(dir)?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE_NAME))
}

/// JSON formatting layer writing one record per line to `file`.
///
/// Records carry `timestamp`, `level`, `message` and the event's fields at the
/// top level.
pub fn json_file_layer<S>(file: File) -> impl Layer<S> + Send + Sync
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    tracing_subscriber::fmt::layer()
        .json()
        .flatten_event(true)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
}
