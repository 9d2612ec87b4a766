// Audit module - append-only transcript of every message seen
//
// The audit trail ignores the channel filter: every normalized message gets one
// line, `[time] domain.slack.com #channel| [user]> text`. Without a `--log`
// path the lines are discarded.
//
// Example: tail -f respite.log | grep '#general'

use anyhow::{Context, Result};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audit log sink (file or discard)
#[derive(Debug, Default)]
pub struct AuditLog {
    target: Option<(PathBuf, File)>,
}

impl AuditLog {
    /// A sink that drops every line
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Open the audit file in append mode, creating it if needed
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::disabled());
        };

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open audit log {}", path.display()))?;

        Ok(Self {
            target: Some((path.to_path_buf(), file)),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.target.as_ref().map(|(path, _)| path.as_path())
    }

    /// Write one line and flush so it survives a crash
    pub fn record(&mut self, line: &str) -> Result<()> {
        let Some((_, file)) = self.target.as_mut() else {
            return Ok(());
        };

        writeln!(file, "{}", line).context("Failed to write to audit log")?;
        file.flush().context("Failed to flush audit log")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_sink_accepts_and_drops() {
        let mut audit = AuditLog::open(None).unwrap();
        assert!(audit.path().is_none());
        audit.record("[t] x.slack.com #c| [u]> dropped").unwrap();
    }

    #[test]
    fn appends_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("audit.log");

        let mut first = AuditLog::open(Some(&path)).unwrap();
        first.record("one").unwrap();
        drop(first);

        let mut second = AuditLog::open(Some(&path)).unwrap();
        second.record("two").unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "one\ntwo\n");
    }

    #[test]
    fn missing_directory_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope").join("audit.log");
        assert!(AuditLog::open(Some(&path)).is_err());
    }
}
