#![forbid(unsafe_code)]

mod catalog;
mod constants;
mod gui;
mod ipc;
mod manager;
mod overrides;
mod projection;
mod reorder;
mod store;

use std::path::PathBuf;

use anyhow::{Result, bail};
use clap::{Parser, Subcommand};
use tracing::{Level as TraceLevel, info, warn};
use tracing_subscriber::FmtSubscriber;

use ipc::{ConfigServer, RemoteConfigStore};
use manager::SectionManager;
use store::{ConfigStore, FileConfigStore};

#[derive(Parser, Debug)]
#[command(name = "sections-admin", about = "Visibility and ordering manager for the public site's sections")]
struct Cli {
    /// Connect to a running config service socket instead of the local file
    #[arg(long, global = true)]
    socket: Option<PathBuf>,

    /// Path of the config file (defaults to the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the local config service (fronts the config file over a socket)
    Serve,
    /// Print the current section layout
    List,
    /// Make a section visible on the public site
    Show { key: String },
    /// Hide a section from the public site
    Hide { key: String },
    /// Move a section to another section's position
    Move { key: String, target: String },
}

fn main() -> Result<()> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        None => gui::run_gui(build_store(&cli)?),
        Some(Command::Serve) => serve(&cli),
        Some(Command::List) => with_manager(&cli, |manager| {
            print_layout(manager);
            Ok(())
        }),
        Some(Command::Show { ref key }) => {
            with_manager(&cli, |manager| set_visibility(manager, &key, true))
        }
        Some(Command::Hide { ref key }) => {
            with_manager(&cli, |manager| set_visibility(manager, &key, false))
        }
        Some(Command::Move { ref key, ref target }) => with_manager(&cli, |manager| {
            if !catalog::contains(&key) {
                bail_unknown(&key)?;
            }
            if !catalog::contains(&target) {
                bail_unknown(&target)?;
            }
            if manager.reorder(&key, &target)? {
                println!("Moved '{key}' to the position of '{target}'.");
                print_layout(manager);
            } else {
                println!("Nothing to do.");
            }
            Ok(())
        }),
    }
}

fn build_store(cli: &Cli) -> Result<Box<dyn ConfigStore>> {
    if let Some(socket) = &cli.socket {
        info!(socket = %socket.display(), "Using remote config service");
        return Ok(Box::new(RemoteConfigStore::connect_to(socket)?));
    }
    let path = cli
        .config
        .clone()
        .unwrap_or_else(FileConfigStore::default_path);
    info!(path = %path.display(), "Using file-backed config store");
    Ok(Box::new(FileConfigStore::new(path)))
}

fn serve(cli: &Cli) -> Result<()> {
    let path = cli
        .config
        .clone()
        .unwrap_or_else(FileConfigStore::default_path);
    let mut store = FileConfigStore::new(path);
    let server = match &cli.socket {
        Some(socket) => ConfigServer::bind_to(socket.clone())?,
        None => ConfigServer::bind()?,
    };
    ipc::serve(&server, &mut store)
}

/// Build a manager over the selected store, refresh it, and run the command.
/// A failed refresh is reported but not fatal: the command then operates on
/// catalog defaults, matching what an operator would see in the GUI.
fn with_manager(cli: &Cli, run: impl FnOnce(&mut SectionManager) -> Result<()>) -> Result<()> {
    let mut manager = SectionManager::new(build_store(cli)?);
    if let Err(err) = manager.refresh() {
        warn!(error = ?err, "Showing catalog defaults");
        eprintln!("warning: could not load saved layout, showing defaults");
    }
    run(&mut manager)
}

fn set_visibility(manager: &mut SectionManager, key: &str, visible: bool) -> Result<()> {
    if !manager.set_visibility(key, visible)? {
        bail_unknown(key)?;
    }
    let verb = if visible { "visible" } else { "hidden" };
    println!("Section '{key}' is now {verb}.");
    Ok(())
}

fn bail_unknown(key: &str) -> Result<()> {
    let known: Vec<_> = catalog::SECTIONS.iter().map(|s| s.key).collect();
    bail!("Unknown section '{key}' (known sections: {})", known.join(", "));
}

fn print_layout(manager: &SectionManager) {
    println!("{:>3}  {:<16} {:<20} {}", "#", "key", "name", "state");
    for (index, section) in manager.sections().iter().enumerate() {
        let state = if section.effective_visible {
            "visible"
        } else {
            "hidden"
        };
        println!(
            "{index:>3}  {:<16} {:<20} {state}",
            section.key, section.name
        );
    }
}
