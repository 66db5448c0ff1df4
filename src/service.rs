//! Order lifecycle operations.
//!
//! Each operation validates its input, mutates the order, and commits the
//! order row together with its audit entry as one transaction. Status is
//! caller-driven: no transition graph is enforced here.

use chrono::Utc;
use tracing::info;

use crate::audit::log_entry;
use crate::cpf::validate_cpf;
use crate::entity::{ChangeType, NewOrder, OrderLog, OrderPatch, ServiceOrder};
use crate::error::{OrdemError, Result};
use crate::sla::SlaConfig;
use crate::store::{ListFilter, OrderStore};

pub struct OrderService {
    store: OrderStore,
    sla: SlaConfig,
}

impl OrderService {
    pub fn new(store: OrderStore) -> Self {
        Self::with_sla(store, SlaConfig::default())
    }

    pub fn with_sla(store: OrderStore, sla: SlaConfig) -> Self {
        Self { store, sla }
    }

    pub fn store(&self) -> &OrderStore {
        &self.store
    }

    pub fn sla(&self) -> &SlaConfig {
        &self.sla
    }

    /// Create an order and its CREATED audit entry.
    pub fn create(&mut self, new: NewOrder, actor: &str) -> Result<ServiceOrder> {
        require(&new.protocol, "protocol")?;
        require(&new.so_number, "so_number")?;
        require(&new.recipient_name, "recipient_name")?;
        require(&new.description, "description")?;
        let cpf = new.cpf.as_deref().map(validate_cpf).transpose()?;

        if self.store.protocol_exists(&new.protocol)? {
            return Err(OrdemError::ProtocolConflict(new.protocol));
        }

        let now = Utc::now();
        let open_date = new.open_date.unwrap_or(now);

        let order = ServiceOrder {
            id: uuid::Uuid::new_v4(),
            protocol: new.protocol,
            so_number: new.so_number,
            kind: new.kind,
            status: new.status,
            provider: new.provider,
            priority: new.priority,
            recipient_name: new.recipient_name,
            cpf,
            description: new.description,
            open_date,
            sla_deadline: Some(self.sla.deadline_for(new.priority, open_date)),
            created_by: actor.to_string(),
            updated_by: None,
            created_at: now,
            updated_at: now,
            is_deleted: false,
        };

        let log = log_entry(&order, actor, ChangeType::Created, None)?;
        self.store.insert_order_with_log(&order, &log)?;

        info!(
            order_id = %order.id,
            protocol = %order.protocol,
            change = %ChangeType::Created,
            "order created"
        );
        Ok(order)
    }

    /// Apply a patch to an order and record the UPDATED audit entry.
    ///
    /// The SLA deadline is recomputed from open_date on every update, since
    /// priority or open_date may have changed.
    pub fn update(&mut self, id_or_prefix: &str, patch: OrderPatch, actor: &str) -> Result<ServiceOrder> {
        let mut order = self.fetch_active(id_or_prefix)?;
        let before = order.clone();

        if let Some(so_number) = patch.so_number {
            require(&so_number, "so_number")?;
            order.so_number = so_number;
        }
        if let Some(kind) = patch.kind {
            order.kind = kind;
        }
        if let Some(status) = patch.status {
            order.status = status;
        }
        if let Some(provider) = patch.provider {
            order.provider = provider;
        }
        if let Some(priority) = patch.priority {
            order.priority = priority;
        }
        if let Some(recipient_name) = patch.recipient_name {
            require(&recipient_name, "recipient_name")?;
            order.recipient_name = recipient_name;
        }
        if let Some(cpf) = patch.cpf {
            order.cpf = cpf.as_deref().map(validate_cpf).transpose()?;
        }
        if let Some(description) = patch.description {
            require(&description, "description")?;
            order.description = description;
        }
        if let Some(open_date) = patch.open_date {
            order.open_date = open_date;
        }

        order.sla_deadline = Some(self.sla.deadline_for(order.priority, order.open_date));
        order.updated_by = Some(actor.to_string());
        order.updated_at = Utc::now();

        let log = log_entry(&order, actor, ChangeType::Updated, Some(&before))?;
        self.store.update_order_with_log(&order, &log)?;

        info!(
            order_id = %order.id,
            protocol = %order.protocol,
            change = %ChangeType::Updated,
            "order updated"
        );
        Ok(order)
    }

    /// Mark an order logically deleted and record the DELETED audit entry.
    ///
    /// The row stays in the store and its audit trail stays queryable; the
    /// order just disappears from default listings and the overview.
    pub fn soft_delete(&mut self, id_or_prefix: &str, actor: &str) -> Result<ServiceOrder> {
        let mut order = self.fetch_active(id_or_prefix)?;
        let before = order.clone();

        order.is_deleted = true;
        order.updated_by = Some(actor.to_string());
        order.updated_at = Utc::now();

        let log = log_entry(&order, actor, ChangeType::Deleted, Some(&before))?;
        self.store.update_order_with_log(&order, &log)?;

        info!(
            order_id = %order.id,
            protocol = %order.protocol,
            change = %ChangeType::Deleted,
            "order soft-deleted"
        );
        Ok(order)
    }

    pub fn get(&self, id_or_prefix: &str) -> Result<ServiceOrder> {
        self.fetch_active(id_or_prefix)
    }

    pub fn list(&self, filter: &ListFilter) -> Result<Vec<ServiceOrder>> {
        self.store.list_orders(filter)
    }

    /// Audit trail for an order, soft-deleted ones included.
    pub fn logs(&self, id_or_prefix: &str) -> Result<Vec<OrderLog>> {
        let order = self.store.resolve_order(id_or_prefix)?;
        self.store.logs_for_order(order.id)
    }

    fn fetch_active(&self, id_or_prefix: &str) -> Result<ServiceOrder> {
        let order = self.store.resolve_order(id_or_prefix)?;
        if order.is_deleted {
            return Err(OrdemError::OrderNotFound(id_or_prefix.to_string()));
        }
        Ok(order)
    }
}

fn require(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(OrdemError::validation(field, "must not be empty"));
    }
    Ok(())
}
