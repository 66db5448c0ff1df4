use clap::Parser;
use ordem::cli::{
    handle_add, handle_delete, handle_get, handle_import, handle_init, handle_list, handle_logs,
    handle_overview, handle_update, Cli, Commands,
};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init => handle_init(),
        Commands::Add {
            protocol,
            so_number,
            recipient,
            description,
            kind,
            status,
            provider,
            priority,
            cpf,
            actor,
            json,
        } => handle_add(
            protocol, so_number, recipient, description, kind, status, provider, priority, cpf,
            actor, json,
        ),
        Commands::List {
            status,
            created_by,
            include_deleted,
            json,
        } => handle_list(status, created_by, include_deleted, json),
        Commands::Get { id, json } => handle_get(id, json),
        Commands::Update {
            id,
            so_number,
            recipient,
            description,
            kind,
            status,
            provider,
            priority,
            cpf,
            clear_cpf,
            actor,
            json,
        } => handle_update(
            id, so_number, recipient, description, kind, status, provider, priority, cpf,
            clear_cpf, actor, json,
        ),
        Commands::Delete { id, actor } => handle_delete(id, actor),
        Commands::Logs { id, json } => handle_logs(id, json),
        Commands::Overview { json } => handle_overview(json),
        Commands::Import { file, actor, json } => handle_import(&file, actor, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
