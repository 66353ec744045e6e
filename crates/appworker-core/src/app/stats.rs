//! WorkerStats - 実行状況のカウンタ

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use crate::domain::StatusKind;

#[derive(Debug, Default)]
pub struct WorkerStats {
    claimed: AtomicUsize,
    in_flight: AtomicUsize,
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    not_found: AtomicUsize,
    decode_errors: AtomicUsize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub claimed: usize,
    pub in_flight: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub not_found: usize,
    pub decode_errors: usize,
}

impl WorkerStats {
    pub(crate) fn record_claim(&self) {
        self.claimed.fetch_add(1, Ordering::Relaxed);
        self.in_flight.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_done(&self) {
        self.in_flight.fetch_sub(1, Ordering::Relaxed);
    }

    pub(crate) fn record_decode_error(&self) {
        self.decode_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_terminal(&self, kind: StatusKind) {
        let counter = match kind {
            StatusKind::Success => &self.succeeded,
            StatusKind::Failure => &self.failed,
            StatusKind::NotFound => &self.not_found,
            StatusKind::Started => return,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            claimed: self.claimed.load(Ordering::Relaxed),
            in_flight: self.in_flight.load(Ordering::Relaxed),
            succeeded: self.succeeded.load(Ordering::Relaxed),
            failed: self.failed.load(Ordering::Relaxed),
            not_found: self.not_found.load(Ordering::Relaxed),
            decode_errors: self.decode_errors.load(Ordering::Relaxed),
        }
    }
}
