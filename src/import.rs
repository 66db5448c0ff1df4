//! CSV bulk import.
//!
//! Each row goes through the same validation and create path as a single
//! order. Import is best-effort per row: failed rows are reported with
//! their line numbers, valid rows commit independently.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::entity::NewOrder;
use crate::error::Result;
use crate::service::OrderService;

/// CSV row shape. Headers:
/// protocol,so_number,type,status,provider,priority,recipient_name,cpf,description
#[derive(Debug, Deserialize)]
struct CsvRow {
    protocol: String,
    so_number: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    priority: Option<String>,
    recipient_name: String,
    #[serde(default)]
    cpf: Option<String>,
    description: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportError {
    pub line: usize,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportReport {
    pub created: usize,
    pub errors: Vec<ImportError>,
}

pub fn import_csv_file(svc: &mut OrderService, path: &Path, actor: &str) -> Result<ImportReport> {
    let content = std::fs::read_to_string(path)?;
    import_csv(svc, &content, actor)
}

pub fn import_csv(svc: &mut OrderService, content: &str, actor: &str) -> Result<ImportReport> {
    let mut rdr = csv::Reader::from_reader(content.as_bytes());

    let mut created = 0;
    let mut errors = Vec::new();

    // Line 1 is the header row
    for (line, rec) in rdr.deserialize().enumerate() {
        let line = line + 2;

        let row: CsvRow = match rec {
            Ok(row) => row,
            Err(e) => {
                errors.push(ImportError {
                    line,
                    error: e.to_string(),
                });
                continue;
            }
        };

        match row_to_new_order(row).and_then(|new| svc.create(new, actor).map_err(|e| e.to_string())) {
            Ok(_) => created += 1,
            Err(error) => {
                warn!(line, %error, "import row rejected");
                errors.push(ImportError { line, error });
            }
        }
    }

    Ok(ImportReport { created, errors })
}

fn row_to_new_order(row: CsvRow) -> std::result::Result<NewOrder, String> {
    let mut new = NewOrder {
        protocol: row.protocol,
        so_number: row.so_number,
        recipient_name: row.recipient_name,
        cpf: row.cpf.filter(|s| !s.trim().is_empty()),
        description: row.description,
        ..NewOrder::default()
    };

    if let Some(kind) = nonempty(row.kind) {
        new.kind = kind.parse()?;
    }
    if let Some(status) = nonempty(row.status) {
        new.status = status.parse()?;
    }
    if let Some(provider) = nonempty(row.provider) {
        new.provider = provider.parse()?;
    }
    if let Some(priority) = nonempty(row.priority) {
        new.priority = priority.parse()?;
    }

    Ok(new)
}

fn nonempty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
