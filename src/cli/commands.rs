use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "ordem")]
#[command(version, about = "Service-order tracking with SLA deadlines and an audit trail")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a new ordem project in the current directory
    Init,

    /// Create a new service order
    Add {
        /// Unique order protocol (e.g. "PROT-2024-001")
        protocol: String,

        /// O.S. number
        #[arg(long = "so-number")]
        so_number: String,

        /// Recipient/client name
        #[arg(long)]
        recipient: String,

        /// Order description
        #[arg(long)]
        description: String,

        /// Service type (installation, corrective_maintenance, inspection, ...)
        #[arg(long = "type")]
        kind: Option<String>,

        /// Order status (open, in_progress, completed, cancelled)
        #[arg(long)]
        status: Option<String>,

        /// Provider type (technical, consulting, logistics, ...)
        #[arg(long)]
        provider: Option<String>,

        /// Priority (critical, high, medium, low) - drives the SLA deadline
        #[arg(long)]
        priority: Option<String>,

        /// Recipient CPF (formatted or bare digits)
        #[arg(long)]
        cpf: Option<String>,

        /// Acting user (defaults to $ORDEM_ACTOR, then the OS username)
        #[arg(long)]
        actor: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List orders (soft-deleted ones are hidden by default)
    List {
        /// Filter by status
        #[arg(long)]
        status: Option<String>,

        /// Filter by creating actor
        #[arg(long = "created-by")]
        created_by: Option<String>,

        /// Include soft-deleted orders
        #[arg(long)]
        include_deleted: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Get a single order by ID (full UUID or unique prefix)
    Get {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update fields of an order
    Update {
        id: String,

        #[arg(long = "so-number")]
        so_number: Option<String>,

        #[arg(long)]
        recipient: Option<String>,

        #[arg(long)]
        description: Option<String>,

        #[arg(long = "type")]
        kind: Option<String>,

        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        provider: Option<String>,

        #[arg(long)]
        priority: Option<String>,

        #[arg(long, conflicts_with = "clear_cpf")]
        cpf: Option<String>,

        /// Remove the stored CPF
        #[arg(long)]
        clear_cpf: bool,

        #[arg(long)]
        actor: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Soft-delete an order (keeps its audit trail)
    Delete {
        id: String,

        #[arg(long)]
        actor: Option<String>,
    },

    /// Show the audit trail of an order
    Logs {
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Aggregate counts by status and SLA urgency
    Overview {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Bulk-import orders from a CSV file (best-effort per row)
    Import {
        /// CSV file with a header row
        file: PathBuf,

        #[arg(long)]
        actor: Option<String>,

        /// Output the report as JSON
        #[arg(long)]
        json: bool,
    },
}
