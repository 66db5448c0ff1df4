//! Audit entry construction.
//!
//! Every lifecycle event is recorded as a full before/after field snapshot,
//! not a delta. Snapshots are taken as plain value copies of the order and
//! serialized into JSON-safe maps (dates become ISO-8601 strings,
//! identifiers become strings, scalars pass through).

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::entity::{ChangeType, OrderLog, ServiceOrder};
use crate::error::Result;

/// Serialize an order into a JSON-safe field snapshot.
pub fn snapshot(order: &ServiceOrder) -> Result<Map<String, Value>> {
    match serde_json::to_value(order)? {
        Value::Object(map) => Ok(map),
        // ServiceOrder is a struct; serde always produces an object
        other => Ok(Map::from_iter([("value".to_string(), other)])),
    }
}

/// Build the audit entry for a lifecycle event.
///
/// `old` is the pre-mutation copy of the order for UPDATED/DELETED;
/// CREATED entries carry no old values.
pub fn log_entry(
    order: &ServiceOrder,
    actor: &str,
    change_type: ChangeType,
    old: Option<&ServiceOrder>,
) -> Result<OrderLog> {
    let old_values = old.map(snapshot).transpose()?;
    let new_values = snapshot(order)?;

    Ok(OrderLog {
        id: Uuid::new_v4(),
        order_id: order.id,
        change_type,
        changed_by: Some(actor.to_string()),
        changed_at: Utc::now(),
        old_values,
        new_values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{NewOrder, OrderStatus, Priority};
    use chrono::{DateTime, TimeZone};

    fn sample_order() -> ServiceOrder {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let new = NewOrder {
            protocol: "PROT-001".to_string(),
            so_number: "OS-001".to_string(),
            recipient_name: "Cliente Teste".to_string(),
            description: "Trocar disco".to_string(),
            priority: Priority::High,
            cpf: Some("40185332099".to_string()),
            ..NewOrder::default()
        };
        ServiceOrder {
            id: Uuid::new_v4(),
            protocol: new.protocol,
            so_number: new.so_number,
            kind: new.kind,
            status: new.status,
            provider: new.provider,
            priority: new.priority,
            recipient_name: new.recipient_name,
            cpf: new.cpf,
            description: new.description,
            open_date: now,
            sla_deadline: Some(now + chrono::Duration::hours(24)),
            created_by: "tester".to_string(),
            updated_by: None,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        }
    }

    #[test]
    fn test_snapshot_serializes_dates_as_iso8601() {
        let order = sample_order();
        let snap = snapshot(&order).unwrap();

        let open_date = snap.get("open_date").unwrap().as_str().unwrap();
        assert!(open_date.starts_with("2024-01-01T00:00:00"));
        // round-trips back to the same instant
        let parsed: DateTime<Utc> = open_date.parse().unwrap();
        assert_eq!(parsed, order.open_date);
    }

    #[test]
    fn test_snapshot_serializes_id_as_string() {
        let order = sample_order();
        let snap = snapshot(&order).unwrap();
        assert_eq!(
            snap.get("id").unwrap().as_str().unwrap(),
            order.id.to_string()
        );
    }

    #[test]
    fn test_snapshot_scalars_pass_through() {
        let order = sample_order();
        let snap = snapshot(&order).unwrap();
        assert_eq!(snap.get("protocol").unwrap(), "PROT-001");
        assert_eq!(snap.get("priority").unwrap(), "high");
        assert_eq!(snap.get("is_deleted").unwrap(), false);
    }

    #[test]
    fn test_created_entry_has_no_old_values() {
        let order = sample_order();
        let entry = log_entry(&order, "tester", ChangeType::Created, None).unwrap();
        assert_eq!(entry.order_id, order.id);
        assert_eq!(entry.change_type, ChangeType::Created);
        assert_eq!(entry.changed_by.as_deref(), Some("tester"));
        assert!(entry.old_values.is_none());
        assert_eq!(entry.new_values.get("protocol").unwrap(), "PROT-001");
    }

    #[test]
    fn test_updated_entry_carries_pre_mutation_snapshot() {
        let before = sample_order();
        let mut after = before.clone();
        after.priority = Priority::Critical;
        after.status = OrderStatus::InProgress;

        let entry = log_entry(&after, "tester", ChangeType::Updated, Some(&before)).unwrap();
        let old = entry.old_values.unwrap();
        assert_eq!(old.get("priority").unwrap(), "high");
        assert_eq!(entry.new_values.get("priority").unwrap(), "critical");
        assert_eq!(entry.new_values.get("status").unwrap(), "in_progress");
    }
}
