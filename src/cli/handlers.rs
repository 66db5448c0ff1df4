use std::env;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::entity::{NewOrder, OrderPatch, ServiceOrder};
use crate::error::{OrdemError, Result};
use crate::import::import_csv_file;
use crate::overview::overview;
use crate::service::OrderService;
use crate::store::{ListFilter, OrderStore};

/// Find the project root by looking for .ordem/ or .git/
fn find_project_root() -> PathBuf {
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let mut current = cwd.as_path();
    loop {
        if current.join(".ordem").exists() || current.join(".git").exists() {
            return current.to_path_buf();
        }
        match current.parent() {
            Some(parent) => current = parent,
            None => return cwd,
        }
    }
}

fn open_service() -> Result<OrderService> {
    let store = OrderStore::open(&find_project_root())?;
    Ok(OrderService::new(store))
}

/// Acting identity: explicit flag, then $ORDEM_ACTOR, then the OS username.
fn resolve_actor(flag: Option<String>) -> String {
    flag.or_else(|| env::var("ORDEM_ACTOR").ok())
        .or_else(|| env::var("USER").ok())
        .or_else(|| env::var("USERNAME").ok())
        .unwrap_or_else(|| "unknown".to_string())
}

fn parse_enum<T>(field: &str, value: Option<String>) -> Result<Option<T>>
where
    T: std::str::FromStr<Err = String>,
{
    value
        .map(|s| s.parse().map_err(|e| OrdemError::validation(field, e)))
        .transpose()
}

fn print_order_line(order: &ServiceOrder) {
    println!(
        "{} [{}] {} - {} (priority: {}, sla: {})",
        &order.id.to_string()[..7],
        order.status,
        order.protocol,
        order.recipient_name,
        order.priority,
        order
            .sla_deadline
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "-".to_string()),
    );
}

pub fn handle_init() -> Result<()> {
    let root = env::current_dir()?;

    let _store = OrderStore::init(&root)?;

    println!("Initialized ordem project in {}", root.display());
    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_add(
    protocol: String,
    so_number: String,
    recipient: String,
    description: String,
    kind: Option<String>,
    status: Option<String>,
    provider: Option<String>,
    priority: Option<String>,
    cpf: Option<String>,
    actor: Option<String>,
    json: bool,
) -> Result<()> {
    let mut svc = open_service()?;
    let actor = resolve_actor(actor);

    let new = NewOrder {
        protocol,
        so_number,
        recipient_name: recipient,
        description,
        kind: parse_enum("type", kind)?.unwrap_or_default(),
        status: parse_enum("status", status)?.unwrap_or_default(),
        provider: parse_enum("provider", provider)?.unwrap_or_default(),
        priority: parse_enum("priority", priority)?.unwrap_or_default(),
        cpf,
        open_date: None,
    };

    let order = svc.create(new, &actor)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        println!(
            "Created order {} ({}) - {}",
            &order.id.to_string()[..7],
            order.protocol,
            order.recipient_name
        );
    }

    Ok(())
}

pub fn handle_list(
    status: Option<String>,
    created_by: Option<String>,
    include_deleted: bool,
    json: bool,
) -> Result<()> {
    let svc = open_service()?;

    let filter = ListFilter {
        status: parse_enum("status", status)?,
        created_by,
        include_deleted,
    };
    let orders = svc.list(&filter)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&orders)?);
    } else if orders.is_empty() {
        println!("No orders found.");
    } else {
        for order in &orders {
            print_order_line(order);
        }
    }

    Ok(())
}

pub fn handle_get(id: String, json: bool) -> Result<()> {
    let svc = open_service()?;
    let order = svc.get(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&order)?);
        return Ok(());
    }

    let sla_status = svc.sla().status_of(order.sla_deadline, order.status, Utc::now());

    println!("Order {} ({})", order.id, order.protocol);
    println!("  O.S. number: {}", order.so_number);
    println!("  Type:        {}", order.kind);
    println!("  Status:      {}", order.status);
    println!("  Provider:    {}", order.provider);
    println!("  Priority:    {}", order.priority);
    println!("  Recipient:   {}", order.recipient_name);
    println!("  CPF:         {}", order.cpf.as_deref().unwrap_or("-"));
    println!("  Description: {}", order.description);
    println!("  Opened:      {}", order.open_date.to_rfc3339());
    println!(
        "  SLA:         {} ({})",
        order
            .sla_deadline
            .map(|d| d.to_rfc3339())
            .unwrap_or_else(|| "-".to_string()),
        sla_status
    );
    println!("  Created by:  {}", order.created_by);
    if let Some(updated_by) = &order.updated_by {
        println!("  Updated by:  {}", updated_by);
    }

    Ok(())
}

#[allow(clippy::too_many_arguments)]
pub fn handle_update(
    id: String,
    so_number: Option<String>,
    recipient: Option<String>,
    description: Option<String>,
    kind: Option<String>,
    status: Option<String>,
    provider: Option<String>,
    priority: Option<String>,
    cpf: Option<String>,
    clear_cpf: bool,
    actor: Option<String>,
    json: bool,
) -> Result<()> {
    let mut svc = open_service()?;
    let actor = resolve_actor(actor);

    let patch = OrderPatch {
        so_number,
        recipient_name: recipient,
        description,
        kind: parse_enum("type", kind)?,
        status: parse_enum("status", status)?,
        provider: parse_enum("provider", provider)?,
        priority: parse_enum("priority", priority)?,
        cpf: if clear_cpf {
            Some(None)
        } else {
            cpf.map(Some)
        },
        open_date: None,
    };

    if patch.is_empty() {
        return Err(OrdemError::validation("update", "nothing to change"));
    }

    let order = svc.update(&id, patch, &actor)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&order)?);
    } else {
        println!(
            "Updated order {} ({}) - status {}",
            &order.id.to_string()[..7],
            order.protocol,
            order.status
        );
    }

    Ok(())
}

pub fn handle_delete(id: String, actor: Option<String>) -> Result<()> {
    let mut svc = open_service()?;
    let actor = resolve_actor(actor);

    let order = svc.soft_delete(&id, &actor)?;

    println!(
        "Deleted order {} ({}) - audit trail kept",
        &order.id.to_string()[..7],
        order.protocol
    );
    Ok(())
}

pub fn handle_logs(id: String, json: bool) -> Result<()> {
    let svc = open_service()?;
    let logs = svc.logs(&id)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&logs)?);
        return Ok(());
    }

    if logs.is_empty() {
        println!("No log entries.");
        return Ok(());
    }

    for log in &logs {
        println!(
            "{} {} by {}",
            log.changed_at.to_rfc3339(),
            log.change_type,
            log.changed_by.as_deref().unwrap_or("-"),
        );
    }

    Ok(())
}

pub fn handle_overview(json: bool) -> Result<()> {
    let svc = open_service()?;
    let report = overview(svc.store(), svc.sla(), Utc::now())?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Total orders: {}", report.total_orders);
    for count in &report.by_status {
        println!("  {}: {}", count.status, count.total);
    }
    println!("SLA:");
    println!("  due in 24h: {}", report.sla.due_in_24h);
    println!("  due in 48h: {}", report.sla.due_in_48h);
    println!("  late:       {}", report.sla.late);

    Ok(())
}

pub fn handle_import(file: &Path, actor: Option<String>, json: bool) -> Result<()> {
    let mut svc = open_service()?;
    let actor = resolve_actor(actor);

    let report = import_csv_file(&mut svc, file, &actor)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Imported {} orders", report.created);
    for err in &report.errors {
        println!("  line {}: {}", err.line, err.error);
    }

    Ok(())
}
