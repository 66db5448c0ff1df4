//! Read-only reporting over non-deleted orders.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::Result;
use crate::sla::{SlaConfig, SlaStatus};
use crate::store::{ListFilter, OrderStore};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: String,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SlaBuckets {
    pub due_in_24h: usize,
    pub due_in_48h: usize,
    pub late: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Overview {
    pub total_orders: usize,
    pub by_status: Vec<StatusCount>,
    pub sla: SlaBuckets,
}

/// Aggregate counts over all non-deleted orders at `now`.
///
/// `late` counts orders whose derived SLA status is overdue; the due
/// buckets take the remaining orders with a deadline not yet past, within
/// 24h and within 48h respectively (the 48h bucket excludes the 24h one).
pub fn overview(store: &OrderStore, sla: &SlaConfig, now: DateTime<Utc>) -> Result<Overview> {
    let orders = store.list_orders(&ListFilter::default())?;

    let mut by_status: Vec<StatusCount> = Vec::new();
    let mut due_in_24h = 0;
    let mut due_in_48h = 0;
    let mut late = 0;

    for order in &orders {
        let status = order.status.to_string();
        match by_status.iter_mut().find(|c| c.status == status) {
            Some(count) => count.total += 1,
            None => by_status.push(StatusCount { status, total: 1 }),
        }

        if sla.status_of(order.sla_deadline, order.status, now) == SlaStatus::Overdue {
            late += 1;
        } else if let Some(deadline) = order.sla_deadline {
            let delta = deadline - now;
            if delta < chrono::Duration::zero() {
                // Past deadline but not overdue (completed work); not due
            } else if delta <= chrono::Duration::hours(24) {
                due_in_24h += 1;
            } else if delta <= chrono::Duration::hours(48) {
                due_in_48h += 1;
            }
        }
    }

    Ok(Overview {
        total_orders: orders.len(),
        by_status,
        sla: SlaBuckets {
            due_in_24h,
            due_in_48h,
            late,
        },
    })
}
