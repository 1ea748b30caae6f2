//! Shared, append-only request log.

use crate::error::ReportError;
use crate::measurement::MeasurementRow;
use std::sync::{Arc, Mutex};

/// Append-only measurement log shared between concurrent sweep tasks.
///
/// Cloning is cheap and every clone appends into the same underlying list;
/// a lock around each append guarantees no entry is lost or torn when many
/// simulated users record at once. Entries are never mutated or removed
/// during a run; the reporter reads them out at the end.
#[derive(Debug, Clone, Default)]
pub struct RequestLog<M> {
    entries: Arc<Mutex<Vec<M>>>,
}

impl<M: MeasurementRow> RequestLog<M> {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Append one measurement. Side-effecting and infallible; the lock is
    /// held only for the push.
    pub fn append(&self, measurement: M) {
        self.entries
            .lock()
            .expect("request log lock poisoned")
            .push(measurement);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().expect("request log lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Snapshot of all measurements ordered by resource name ascending,
    /// then sequence index ascending. The ordering is a contract: it keeps
    /// detail output diffable between runs of the same input.
    ///
    /// Fails when nothing has been captured; an empty detail table is
    /// always an operator-visible error, not an empty file.
    pub fn detail(&self) -> Result<Vec<M>, ReportError> {
        let entries = self.entries.lock().expect("request log lock poisoned");
        if entries.is_empty() {
            return Err(ReportError::NoMeasurements);
        }

        let mut rows = entries.clone();
        rows.sort_by(|a, b| {
            a.resource()
                .cmp(b.resource())
                .then(a.sequence().cmp(&b.sequence()))
        });
        Ok(rows)
    }
}
