//! SLA deadline computation and status derivation.
//!
//! Durations and the nearing-due window live in an explicit [`SlaConfig`]
//! so callers (and tests) can override them without global state.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::entity::{OrderStatus, Priority};

/// Per-priority SLA durations plus the nearing-due window.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlaConfig {
    pub critical: Duration,
    pub high: Duration,
    pub medium: Duration,
    pub low: Duration,
    /// Orders due within this window count as nearing due
    pub nearing_window: Duration,
}

impl Default for SlaConfig {
    fn default() -> Self {
        Self {
            critical: Duration::hours(4),
            high: Duration::hours(24),
            medium: Duration::hours(48),
            low: Duration::hours(72),
            nearing_window: Duration::hours(24),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SlaStatus {
    OnTime,
    NearingDue,
    Overdue,
}

impl std::fmt::Display for SlaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SlaStatus::OnTime => write!(f, "on_time"),
            SlaStatus::NearingDue => write!(f, "nearing_due"),
            SlaStatus::Overdue => write!(f, "overdue"),
        }
    }
}

impl SlaConfig {
    pub fn duration_for(&self, priority: Priority) -> Duration {
        match priority {
            Priority::Critical => self.critical,
            Priority::High => self.high,
            Priority::Medium => self.medium,
            Priority::Low => self.low,
        }
    }

    /// Deadline for an order opened at `reference` with the given priority.
    pub fn deadline_for(&self, priority: Priority, reference: DateTime<Utc>) -> DateTime<Utc> {
        reference + self.duration_for(priority)
    }

    /// Derive the SLA status of an order at `now`.
    ///
    /// Completed work is never late, and an order without a deadline is not
    /// SLA-tracked.
    pub fn status_of(
        &self,
        deadline: Option<DateTime<Utc>>,
        status: OrderStatus,
        now: DateTime<Utc>,
    ) -> SlaStatus {
        if status == OrderStatus::Completed {
            return SlaStatus::OnTime;
        }

        let Some(deadline) = deadline else {
            return SlaStatus::OnTime;
        };

        if now > deadline {
            SlaStatus::Overdue
        } else if deadline - now <= self.nearing_window {
            SlaStatus::NearingDue
        } else {
            SlaStatus::OnTime
        }
    }
}
