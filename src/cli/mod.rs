mod commands;
mod handlers;

pub use commands::{Cli, Commands};
pub use handlers::{
    handle_add, handle_delete, handle_get, handle_import, handle_init, handle_list, handle_logs,
    handle_overview, handle_update,
};
