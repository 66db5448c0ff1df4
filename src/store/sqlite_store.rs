use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::entity::{ChangeType, OrderLog, OrderStatus, ServiceOrder};
use crate::error::{OrdemError, Result};

const ORDEM_DIR: &str = ".ordem";
const ORDERS_DB: &str = "orders.db";

/// Listing filter; the default excludes soft-deleted orders.
#[derive(Debug, Clone, Default)]
pub struct ListFilter {
    pub status: Option<OrderStatus>,
    pub created_by: Option<String>,
    pub include_deleted: bool,
}

/// SQLite store for orders and their audit log.
///
/// Every lifecycle write commits the order row and its log row in one
/// transaction; neither is ever visible without the other.
pub struct OrderStore {
    conn: Connection,
    #[allow(dead_code)]
    path: PathBuf,
}

impl OrderStore {
    /// Initialize a new ordem project
    pub fn init(root: &Path) -> Result<Self> {
        let ordem_dir = root.join(ORDEM_DIR);

        if ordem_dir.exists() {
            return Err(OrdemError::AlreadyInitialized);
        }

        fs::create_dir_all(&ordem_dir)?;
        Self::open_db(ordem_dir.join(ORDERS_DB))
    }

    /// Open an existing ordem project
    pub fn open(root: &Path) -> Result<Self> {
        let path = root.join(ORDEM_DIR).join(ORDERS_DB);

        if !path.exists() {
            return Err(OrdemError::NotInitialized);
        }

        Self::open_db(path)
    }

    fn open_db(path: PathBuf) -> Result<Self> {
        let conn = Connection::open(&path)?;
        conn.pragma_update(None, "foreign_keys", "ON")?;

        let store = Self { conn, path };
        store.init_schema()?;
        Ok(store)
    }

    /// Initialize the database schema
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS orders (
                id TEXT PRIMARY KEY,
                protocol TEXT NOT NULL UNIQUE,
                so_number TEXT NOT NULL,
                kind TEXT NOT NULL,
                status TEXT NOT NULL,
                provider TEXT NOT NULL,
                priority TEXT NOT NULL,
                recipient_name TEXT NOT NULL,
                cpf TEXT,
                description TEXT NOT NULL,
                open_date TEXT NOT NULL,
                sla_deadline TEXT,
                created_by TEXT NOT NULL,
                updated_by TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                is_deleted INTEGER NOT NULL DEFAULT 0
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status)",
            [],
        )?;
        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_orders_is_deleted ON orders(is_deleted)",
            [],
        )?;

        // Append-only: rows here are never updated or deleted
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS order_logs (
                id TEXT PRIMARY KEY,
                order_id TEXT NOT NULL REFERENCES orders(id),
                change_type TEXT NOT NULL,
                changed_by TEXT,
                changed_at TEXT NOT NULL,
                old_values TEXT,
                new_values TEXT NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_order_logs_order ON order_logs(order_id)",
            [],
        )?;

        Ok(())
    }

    /// Persist a new order and its CREATED log entry atomically.
    pub fn insert_order_with_log(&mut self, order: &ServiceOrder, log: &OrderLog) -> Result<()> {
        let tx = self.conn.transaction()?;

        tx.execute(
            "INSERT INTO orders
             (id, protocol, so_number, kind, status, provider, priority, recipient_name,
              cpf, description, open_date, sla_deadline, created_by, updated_by,
              created_at, updated_at, is_deleted)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17)",
            params![
                order.id.to_string(),
                order.protocol,
                order.so_number,
                order.kind.to_string(),
                order.status.to_string(),
                order.provider.to_string(),
                order.priority.to_string(),
                order.recipient_name,
                order.cpf,
                order.description,
                order.open_date.to_rfc3339(),
                order.sla_deadline.map(|d| d.to_rfc3339()),
                order.created_by,
                order.updated_by,
                order.created_at.to_rfc3339(),
                order.updated_at.to_rfc3339(),
                order.is_deleted,
            ],
        )?;

        Self::insert_log(&tx, log)?;

        tx.commit()?;
        Ok(())
    }

    /// Persist an order mutation and its log entry atomically.
    pub fn update_order_with_log(&mut self, order: &ServiceOrder, log: &OrderLog) -> Result<()> {
        let tx = self.conn.transaction()?;

        let changed = tx.execute(
            "UPDATE orders SET
                so_number = ?2, kind = ?3, status = ?4, provider = ?5, priority = ?6,
                recipient_name = ?7, cpf = ?8, description = ?9, open_date = ?10,
                sla_deadline = ?11, updated_by = ?12, updated_at = ?13, is_deleted = ?14
             WHERE id = ?1",
            params![
                order.id.to_string(),
                order.so_number,
                order.kind.to_string(),
                order.status.to_string(),
                order.provider.to_string(),
                order.priority.to_string(),
                order.recipient_name,
                order.cpf,
                order.description,
                order.open_date.to_rfc3339(),
                order.sla_deadline.map(|d| d.to_rfc3339()),
                order.updated_by,
                order.updated_at.to_rfc3339(),
                order.is_deleted,
            ],
        )?;

        if changed == 0 {
            return Err(OrdemError::OrderNotFound(order.id.to_string()));
        }

        Self::insert_log(&tx, log)?;

        tx.commit()?;
        Ok(())
    }

    fn insert_log(tx: &rusqlite::Transaction<'_>, log: &OrderLog) -> Result<()> {
        let old_values = log
            .old_values
            .as_ref()
            .map(serde_json::to_string)
            .transpose()?;
        let new_values = serde_json::to_string(&log.new_values)?;

        tx.execute(
            "INSERT INTO order_logs
             (id, order_id, change_type, changed_by, changed_at, old_values, new_values)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                log.id.to_string(),
                log.order_id.to_string(),
                log.change_type.to_string(),
                log.changed_by,
                log.changed_at.to_rfc3339(),
                old_values,
                new_values,
            ],
        )?;
        Ok(())
    }

    pub fn get_order(&self, id: Uuid) -> Result<Option<ServiceOrder>> {
        let order = self
            .conn
            .query_row(
                &format!("SELECT {} FROM orders WHERE id = ?1", ORDER_COLUMNS),
                [id.to_string()],
                row_to_order,
            )
            .optional()?;
        Ok(order)
    }

    /// Resolve a full UUID or a unique UUID prefix to an order.
    pub fn resolve_order(&self, id_or_prefix: &str) -> Result<ServiceOrder> {
        if let Ok(id) = id_or_prefix.parse::<Uuid>() {
            return self
                .get_order(id)?
                .ok_or_else(|| OrdemError::OrderNotFound(id_or_prefix.to_string()));
        }

        let mut stmt = self.conn.prepare(&format!(
            "SELECT {} FROM orders WHERE id LIKE ?1 LIMIT 2",
            ORDER_COLUMNS
        ))?;
        let mut matches = stmt
            .query_map([format!("{}%", id_or_prefix)], row_to_order)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        match matches.len() {
            0 => Err(OrdemError::OrderNotFound(id_or_prefix.to_string())),
            1 => Ok(matches.remove(0)),
            _ => Err(OrdemError::validation("id", "ambiguous id prefix")),
        }
    }

    pub fn find_by_protocol(&self, protocol: &str) -> Result<Option<ServiceOrder>> {
        let order = self
            .conn
            .query_row(
                &format!("SELECT {} FROM orders WHERE protocol = ?1", ORDER_COLUMNS),
                [protocol],
                row_to_order,
            )
            .optional()?;
        Ok(order)
    }

    /// Protocol uniqueness spans deleted orders too.
    pub fn protocol_exists(&self, protocol: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM orders WHERE protocol = ?1",
            [protocol],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    /// List orders, newest first.
    pub fn list_orders(&self, filter: &ListFilter) -> Result<Vec<ServiceOrder>> {
        let mut sql = format!("SELECT {} FROM orders WHERE 1=1", ORDER_COLUMNS);
        let mut params_vec: Vec<String> = Vec::new();

        if !filter.include_deleted {
            sql.push_str(" AND is_deleted = 0");
        }
        if let Some(status) = filter.status {
            params_vec.push(status.to_string());
            sql.push_str(&format!(" AND status = ?{}", params_vec.len()));
        }
        if let Some(created_by) = &filter.created_by {
            params_vec.push(created_by.clone());
            sql.push_str(&format!(" AND created_by = ?{}", params_vec.len()));
        }
        sql.push_str(" ORDER BY created_at DESC");

        let mut stmt = self.conn.prepare(&sql)?;
        let orders = stmt
            .query_map(rusqlite::params_from_iter(params_vec.iter()), row_to_order)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(orders)
    }

    /// Audit trail for an order, newest first. Works for soft-deleted orders.
    pub fn logs_for_order(&self, order_id: Uuid) -> Result<Vec<OrderLog>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, order_id, change_type, changed_by, changed_at, old_values, new_values
             FROM order_logs WHERE order_id = ?1
             ORDER BY changed_at DESC",
        )?;

        let logs = stmt
            .query_map([order_id.to_string()], row_to_log)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(logs)
    }
}

const ORDER_COLUMNS: &str = "id, protocol, so_number, kind, status, provider, priority, \
     recipient_name, cpf, description, open_date, sla_deadline, created_by, updated_by, \
     created_at, updated_at, is_deleted";

fn parse_text<T>(idx: usize, s: &str) -> rusqlite::Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    s.parse().map_err(|e: String| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, e.into())
    })
}

fn parse_datetime(idx: usize, s: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_uuid(idx: usize, s: &str) -> rusqlite::Result<Uuid> {
    s.parse().map_err(|e: uuid::Error| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn parse_json_map(idx: usize, s: &str) -> rusqlite::Result<Map<String, Value>> {
    serde_json::from_str(s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn row_to_order(row: &rusqlite::Row<'_>) -> rusqlite::Result<ServiceOrder> {
    let id: String = row.get(0)?;
    let kind: String = row.get(3)?;
    let status: String = row.get(4)?;
    let provider: String = row.get(5)?;
    let priority: String = row.get(6)?;
    let open_date: String = row.get(10)?;
    let sla_deadline: Option<String> = row.get(11)?;
    let created_at: String = row.get(14)?;
    let updated_at: String = row.get(15)?;

    Ok(ServiceOrder {
        id: parse_uuid(0, &id)?,
        protocol: row.get(1)?,
        so_number: row.get(2)?,
        kind: parse_text(3, &kind)?,
        status: parse_text(4, &status)?,
        provider: parse_text(5, &provider)?,
        priority: parse_text(6, &priority)?,
        recipient_name: row.get(7)?,
        cpf: row.get(8)?,
        description: row.get(9)?,
        open_date: parse_datetime(10, &open_date)?,
        sla_deadline: sla_deadline.map(|s| parse_datetime(11, &s)).transpose()?,
        created_by: row.get(12)?,
        updated_by: row.get(13)?,
        created_at: parse_datetime(14, &created_at)?,
        updated_at: parse_datetime(15, &updated_at)?,
        is_deleted: row.get(16)?,
    })
}

fn row_to_log(row: &rusqlite::Row<'_>) -> rusqlite::Result<OrderLog> {
    let id: String = row.get(0)?;
    let order_id: String = row.get(1)?;
    let change_type: String = row.get(2)?;
    let changed_at: String = row.get(4)?;
    let old_values: Option<String> = row.get(5)?;
    let new_values: String = row.get(6)?;

    Ok(OrderLog {
        id: parse_uuid(0, &id)?,
        order_id: parse_uuid(1, &order_id)?,
        change_type: parse_text::<ChangeType>(2, &change_type)?,
        changed_by: row.get(3)?,
        changed_at: parse_datetime(4, &changed_at)?,
        old_values: old_values.map(|s| parse_json_map(5, &s)).transpose()?,
        new_values: parse_json_map(6, &new_values)?,
    })
}

impl From<rusqlite::Error> for OrdemError {
    fn from(e: rusqlite::Error) -> Self {
        OrdemError::Transaction(format!("SQLite error: {}", e))
    }
}
