//! Activity log store: append-only, insertion order.

use jiff::Timestamp;

use crate::model::{ActivityLog, LogCategory};

use super::Desk;

const LOG_ID_PREFIX: &str = "LOG";

impl Desk {
    /// Appends an entry stamped now and returns it.
    pub fn append_log(
        &mut self,
        category: LogCategory,
        description: impl Into<String>,
    ) -> &ActivityLog {
        let id = self.next_log_id();
        let entry = ActivityLog {
            id,
            timestamp: Timestamp::now(),
            description: description.into(),
            category,
        };
        tracing::debug!(log = %entry.id, %category, "{}", entry.description);
        self.logs.push(entry);
        &self.logs[self.logs.len() - 1]
    }

    /// The latest `limit` entries, newest first.
    pub fn recent_logs(&self, limit: usize) -> Vec<&ActivityLog> {
        self.logs.iter().rev().take(limit).collect()
    }

    fn next_log_id(&mut self) -> String {
        loop {
            self.log_counter += 1;
            let id = format!("{LOG_ID_PREFIX}{:03}", self.log_counter);
            if !self.logs.iter().any(|l| l.id == id) {
                return id;
            }
        }
    }
}
