//! Optional file log of lifecycle events.
//!
//! Off by default. When a path is set, every `log_event` call appends a line
//! stamped with milliseconds since the log was opened.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

static EVENT_LOGGER: LazyLock<Mutex<EventLogger>> =
    LazyLock::new(|| Mutex::new(EventLogger::new()));

#[derive(Debug)]
struct EventLogger {
    start: Instant,
    writer: Option<BufWriter<File>>,
}

impl EventLogger {
    fn new() -> Self {
        Self {
            start: Instant::now(),
            writer: None,
        }
    }
}

fn logger() -> MutexGuard<'static, EventLogger> {
    EVENT_LOGGER.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Open (truncating) or close the event log.
///
/// # Errors
/// Returns an error if the file cannot be created or the header written.
pub fn set_log_path(path: Option<&Path>) -> std::io::Result<()> {
    let mut logger = logger();
    if let Some(path) = path {
        let mut writer = BufWriter::new(File::create(path)?);
        writeln!(writer, "wysiwyg-mount event log start")?;
        writer.flush()?;
        logger.start = Instant::now();
        logger.writer = Some(writer);
    } else {
        logger.writer = None;
    }
    Ok(())
}

pub fn is_enabled() -> bool {
    logger().writer.is_some()
}

pub fn log_event(name: &str, detail: impl AsRef<str>) {
    let mut logger = logger();
    let elapsed_ms = logger.start.elapsed().as_secs_f64() * 1000.0;
    if let Some(writer) = logger.writer.as_mut() {
        let _ = writeln!(
            writer,
            "[{elapsed_ms:>10.3} ms] {name}: {}",
            detail.as_ref()
        );
        let _ = writer.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_log_path_enables_logging_and_writes() {
        let temp_file = NamedTempFile::new().unwrap();
        set_log_path(Some(temp_file.path())).unwrap();
        assert!(is_enabled());
        log_event("lifecycle.ready", "editor=classic element=host");
        set_log_path(None).unwrap();
        assert!(!is_enabled());

        let content = std::fs::read_to_string(temp_file.path()).unwrap();
        assert!(content.contains("wysiwyg-mount event log start"));
        assert!(content.contains("lifecycle.ready: editor=classic element=host"));
    }
}
