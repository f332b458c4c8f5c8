use crate::entity::FeedError;
use std::fmt;

/// Counters and terminal state of one ingestion run.
#[derive(Debug, Default)]
pub struct IngestionReport {
    pub resume_index: Option<i64>,
    pub pages: usize,
    pub fetched: usize,
    pub accepted: usize,
    pub rejected: usize,
    pub inserted: usize,
    pub already_present: usize,
    pub memos_omitted: usize,
    pub highest_ledger_index: Option<i64>,
    pub error: Option<FeedError>,
}

impl IngestionReport {
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Records processed through persistence, new or not.
    pub fn processed(&self) -> usize {
        self.inserted + self.already_present
    }

    pub(crate) fn observe_ledger(&mut self, ledger_index: i64) {
        self.highest_ledger_index = Some(match self.highest_ledger_index {
            Some(current) => current.max(ledger_index),
            None => ledger_index,
        });
    }

    pub(crate) fn fail(&mut self, error: FeedError) {
        self.error = Some(error);
    }
}

impl fmt::Display for IngestionReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "pages={} fetched={} accepted={} rejected={} inserted={} already_present={} memos_omitted={}",
            self.pages,
            self.fetched,
            self.accepted,
            self.rejected,
            self.inserted,
            self.already_present,
            self.memos_omitted,
        )?;

        if let Some(resume) = self.resume_index {
            write!(f, " resume_index={}", resume)?;
        }
        if let Some(highest) = self.highest_ledger_index {
            write!(f, " highest_ledger_index={}", highest)?;
        }
        if let Some(error) = &self.error {
            write!(f, " error=\"{}\"", error)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn highest_ledger_only_moves_forward() {
        let mut report = IngestionReport::default();
        report.observe_ledger(90);
        report.observe_ledger(120);
        report.observe_ledger(100);
        assert_eq!(report.highest_ledger_index, Some(120));
    }

    #[test]
    fn display_includes_terminal_error() {
        let mut report = IngestionReport::default();
        report.fail(FeedError::FetchFailed {
            attempts: 4,
            reason: "timeout".to_string(),
        });
        let text = report.to_string();
        assert!(text.contains("error=\"Ledger fetch failed after 4 attempt(s): timeout\""));
        assert!(!report.is_success());
    }
}
