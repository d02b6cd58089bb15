//! `bizdash-gatecheck`: inspect what the access gate does for a session.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};

use bizdash_auth::{SessionState, explain};
use bizdash_dashboard::{
    GateConfig, MemoryHistory, Notifier, PermissionGuard, RecordingNotifier, RouteTable,
    TracingNotifier, guard, route_gate, visibility,
};

#[derive(Parser)]
#[command(name = "bizdash-gatecheck")]
#[command(about = "Check dashboard access decisions offline", long_about = None)]
#[command(version)]
struct Cli {
    /// Route table JSON (defaults to the built-in dashboard table)
    #[arg(short, long, global = true)]
    routes: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what each adapter does for a path
    Check {
        /// Persisted session JSON; omit for an anonymous visitor
        #[arg(short, long)]
        session: Option<PathBuf>,
        #[arg(short, long)]
        path: String,
    },
    /// Print the JSON explanation of a decision
    Explain {
        #[arg(short, long)]
        session: Option<PathBuf>,
        #[arg(short, long)]
        path: String,
    },
    /// List protected routes
    Routes,
}

fn main() {
    bizdash_observability::init();

    if let Err(e) = run() {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = GateConfig::from_env().context("invalid gate configuration")?;
    let table = load_table(cli.routes.as_deref(), &config)?;

    match cli.command {
        Commands::Check { session, path } => cmd_check(&config, &table, session.as_deref(), &path),
        Commands::Explain { session, path } => cmd_explain(&table, session.as_deref(), &path),
        Commands::Routes => cmd_routes(&table),
    }
}

fn load_table(path: Option<&Path>, config: &GateConfig) -> Result<RouteTable> {
    let Some(path) = path else {
        let table = RouteTable::dashboard_default();
        table
            .validate_with(config)
            .context("built-in route table conflicts with the gate configuration")?;
        return Ok(table);
    };
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read route table {}", path.display()))?;
    RouteTable::from_json(&raw, config)
        .with_context(|| format!("invalid route table {}", path.display()))
}

fn load_session(path: Option<&Path>) -> Result<SessionState> {
    let raw = match path {
        Some(path) => Some(
            std::fs::read_to_string(path)
                .with_context(|| format!("failed to read session {}", path.display()))?,
        ),
        None => None,
    };
    Ok(SessionState::from_persisted(raw.as_deref(), Utc::now()))
}

fn cmd_check(config: &GateConfig, table: &RouteTable, session: Option<&Path>, path: &str) -> Result<()> {
    let session = load_session(session)?;

    let Some(region) = table.region_for(path) else {
        println!("{path}: public");
        return Ok(());
    };
    println!("{path}: requires {}", region.requirement);

    let history = MemoryHistory::new(path);
    let outcome = route_gate::enforce(&history, &session, region, config);
    println!("  route wrapper: {outcome:?} (history {:?})", history.entries());

    let history = MemoryHistory::new(path);
    let notifier = RecordingNotifier::new();
    let mut guard = PermissionGuard::new(&history, &notifier, config.clone());
    let view = guard.render(&session, region);
    println!("  guard: {view:?} (history {:?})", history.entries());
    for n in notifier.sent() {
        println!("    notify [{:?}] {}: {}", n.severity, n.title, n.description);
    }

    println!(
        "  visibility: {:?}",
        visibility::visibility(&session, &region.requirement)
    );

    Ok(())
}

fn cmd_explain(table: &RouteTable, session: Option<&Path>, path: &str) -> Result<()> {
    let session = load_session(session)?;
    let Some(region) = table.region_for(path) else {
        println!("{path}: public");
        return Ok(());
    };

    let explanation = explain(session.actor(), &region.requirement);
    // Same notification the guard would show in the browser.
    if let Some(notification) = explanation.denial.as_ref().and_then(guard::denial_notification) {
        TracingNotifier.notify(notification);
    }
    println!("{}", serde_json::to_string_pretty(&explanation)?);
    Ok(())
}

fn cmd_routes(table: &RouteTable) -> Result<()> {
    for entry in table.routes() {
        match &entry.region.fallback_path {
            Some(fallback) => println!("{:<24} {} (denied -> {fallback})", entry.pattern, entry.region.requirement),
            None => println!("{:<24} {}", entry.pattern, entry.region.requirement),
        }
    }
    Ok(())
}
