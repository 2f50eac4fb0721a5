use std::time::{Duration, Instant};

use crate::data::loader::{self, Encoding, LoadOptions};
use crate::data::{LoadError, Table};

// ---------------------------------------------------------------------------
// Session – host-held state between user actions
// ---------------------------------------------------------------------------

/// Everything a host remembers between interactions. The data operations
/// never see it; they take tables in and hand tables back.
#[derive(Debug, Clone)]
pub struct Session {
    options: LoadOptions,
    table: Option<Table>,
    /// Encoding and skipped-row count of the current table.
    last_load: Option<(Encoding, usize)>,
    started_at: Option<Instant>,
    user_count: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(LoadOptions::default())
    }
}

impl Session {
    pub fn new(options: LoadOptions) -> Self {
        Self {
            options,
            table: None,
            last_load: None,
            started_at: None,
            user_count: 1,
        }
    }

    /// Load `bytes` unless a table is already held, in which case the held
    /// table is returned untouched.
    pub fn load(&mut self, bytes: &[u8]) -> Result<&Table, LoadError> {
        match self.table {
            Some(ref table) => Ok(table),
            None => self.replace(bytes),
        }
    }

    /// Load `bytes`, discarding any held table. On failure the session is
    /// left as it was.
    pub fn replace(&mut self, bytes: &[u8]) -> Result<&Table, LoadError> {
        let started_at = Instant::now();
        let report = loader::load_with_report(bytes, &self.options)?;
        self.started_at = Some(started_at);
        self.last_load = Some((report.encoding, report.skipped_rows));
        let table: &Table = self.table.insert(report.table);
        Ok(table)
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn options(&self) -> &LoadOptions {
        &self.options
    }

    /// Encoding the current table was decoded with.
    pub fn encoding(&self) -> Option<Encoding> {
        self.last_load.map(|(encoding, _)| encoding)
    }

    /// Malformed rows dropped while loading the current table.
    pub fn skipped_rows(&self) -> usize {
        self.last_load.map_or(0, |(_, skipped)| skipped)
    }

    /// Time since the current table started loading.
    pub fn elapsed(&self) -> Duration {
        self.started_at.map(|t| t.elapsed()).unwrap_or_default()
    }

    pub fn user_count(&self) -> u64 {
        self.user_count
    }

    /// Forget everything, keeping only the loader options.
    pub fn reset(&mut self) {
        *self = Self::new(self.options.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_session() {
        let session = Session::default();
        assert!(session.table().is_none());
        assert_eq!(session.elapsed(), Duration::ZERO);
        assert_eq!(session.user_count(), 1);
        assert_eq!(session.skipped_rows(), 0);
    }

    #[test]
    fn test_load_keeps_first_table() {
        let mut session = Session::default();
        assert_eq!(session.load(b"a\n1\n").unwrap().num_rows(), 1);
        assert_eq!(session.load(b"a\n1\n2\n").unwrap().num_rows(), 1);
        assert_eq!(session.replace(b"a\n1\n2\n").unwrap().num_rows(), 2);
    }

    #[test]
    fn test_load_records_diagnostics() {
        let mut session = Session::default();
        session.load(b"a,b\n1,2\n3\nZ\xfc,4\n").unwrap();
        assert_eq!(session.encoding(), Some(Encoding::Latin1));
        assert_eq!(session.skipped_rows(), 1);
    }

    #[test]
    fn test_failed_replace_keeps_table() {
        let mut session = Session::default();
        session.load(b"a\n1\n").unwrap();
        assert!(session.replace(b"").is_err());
        assert_eq!(session.table().map(Table::num_rows), Some(1));
    }

    #[test]
    fn test_reset() {
        let mut session = Session::default();
        session.load(b"a\n1\n").unwrap();
        session.reset();
        assert!(session.table().is_none());
        assert!(session.encoding().is_none());
        assert_eq!(session.elapsed(), Duration::ZERO);
    }
}
