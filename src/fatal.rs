//! Process-wide fatal error flag.
//!
//! Individual request failures are recorded in the measurement log and do
//! not stop a run, but they must still fail the process so CI treats the
//! run as broken. Any task that hits an unrecoverable error raises the
//! flag; `main` observes it exactly once at shutdown, after the reports
//! have been written.

use std::sync::atomic::{AtomicBool, Ordering};

static FIRED: AtomicBool = AtomicBool::new(false);

/// Marks the run as failed. Safe to call from any task, any number of
/// times.
pub fn fire() {
    FIRED.store(true, Ordering::SeqCst);
}

/// Returns whether the flag was fired and clears it, so a second observer
/// sees a clean flag.
pub fn take() -> bool {
    FIRED.swap(false, Ordering::SeqCst)
}
