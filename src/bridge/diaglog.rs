use crate::stdio;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

type SharedFile = Arc<Mutex<BufWriter<File>>>;

/// File sink for the backend's progress output during one call.
///
/// The log is a plain value owned by the session.  A log that failed to
/// open, or was never given a path, is inactive and leaves the backend
/// writing to its default target.
#[derive(Debug, Default)]
pub struct DiagnosticLog {
    path: Option<PathBuf>,
    file: Option<SharedFile>,
}

impl DiagnosticLog {
    /// Opens (creating or truncating) the log at `path`.  An empty path
    /// gives an inactive log.
    pub fn open(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Self::default();
        }

        match File::create(path) {
            Ok(file) => {
                log::debug!("opened diagnostic log {}", path.display());
                Self {
                    path: Some(path.to_path_buf()),
                    file: Some(Arc::new(Mutex::new(BufWriter::new(file)))),
                }
            }
            Err(e) => {
                log::warn!("cannot open diagnostic log {}: {e}", path.display());
                let _ = writeln!(
                    stdio::stderr(),
                    "Cannot open log file [{}]: {e}",
                    path.display()
                );
                Self::default()
            }
        }
    }

    pub fn is_open(&self) -> bool {
        self.file.is_some()
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// A handle that writes into the log, if it is open.
    pub fn writer(&self) -> Option<Box<dyn Write + Send>> {
        self.file
            .as_ref()
            .map(|f| Box::new(LogWriter(Arc::clone(f))) as Box<dyn Write + Send>)
    }

    /// Flushes and closes the log.  Any writer handed out earlier keeps
    /// the file alive until it is dropped as well.
    pub fn close(self) -> std::io::Result<()> {
        if let Some(file) = self.file {
            let mut guard = file.lock().map_err(|_| poisoned())?;
            guard.flush()?;
            log::debug!("closed diagnostic log");
        }
        Ok(())
    }
}

fn poisoned() -> std::io::Error {
    std::io::Error::new(std::io::ErrorKind::Other, "diagnostic log lock poisoned")
}

struct LogWriter(SharedFile);

impl Write for LogWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().map_err(|_| poisoned())?.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.0.lock().map_err(|_| poisoned())?.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("solve.log");

        let log = DiagnosticLog::open(&path);
        assert!(log.is_open());
        assert_eq!(log.path(), Some(path.as_path()));

        let mut w = log.writer().unwrap();
        writeln!(w, "iteration 1").unwrap();
        drop(w);
        log.close().unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "iteration 1\n");
    }

    #[test]
    fn test_log_inactive() {
        let log = DiagnosticLog::open("");
        assert!(!log.is_open());
        assert!(log.writer().is_none());
        assert!(log.close().is_ok());

        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::open(dir.path().join("missing").join("solve.log"));
        assert!(!log.is_open());
    }
}
