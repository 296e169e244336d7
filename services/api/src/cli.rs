use crate::demo::{run_demo, DemoArgs};
use crate::infra::{open_society, SnapshotStore};
use crate::server;
use clap::{Args, Parser, Subcommand};
use society::config::AppConfig;
use society::error::AppError;
use society::roster::RosterImporter;
use society::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Society Records",
    about = "Run and administer the residential society records service",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Walk through residents, billing undo, search and sorting on a fresh society
    Demo(DemoArgs),
    /// Inspect the persisted society snapshot
    Snapshot {
        #[command(subcommand)]
        command: SnapshotCommand,
    },
    /// Manage residents in the persisted snapshot
    Residents {
        #[command(subcommand)]
        command: ResidentsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum SnapshotCommand {
    /// Print the snapshot as JSON, or write it to a file
    Export(SnapshotExportArgs),
}

#[derive(Subcommand, Debug)]
enum ResidentsCommand {
    /// Bulk-add residents from a CSV roster (flat,name,phone,email,pending_bills)
    Import(ResidentImportArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

#[derive(Args, Debug)]
pub(crate) struct SnapshotExportArgs {
    /// Write the snapshot here instead of stdout
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ResidentImportArgs {
    /// CSV roster to import
    #[arg(long)]
    pub(crate) csv: PathBuf,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Snapshot {
            command: SnapshotCommand::Export(args),
        } => export_snapshot(args),
        Command::Residents {
            command: ResidentsCommand::Import(args),
        } => import_residents(args),
    }
}

fn export_snapshot(args: SnapshotExportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let store = SnapshotStore::new(config.storage.data_dir.clone());
    let context = open_society(&config, &store)?;
    let json = serde_json::to_string_pretty(&context.dump())?;

    match args.out {
        Some(path) => {
            std::fs::write(&path, json)?;
            println!("Snapshot written to {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn import_residents(args: ResidentImportArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let store = SnapshotStore::new(config.storage.data_dir.clone());
    let context = open_society(&config, &store)?;
    let summary = {
        let mut residents = context.residents();
        RosterImporter::from_path(&args.csv, &mut residents)?
    };
    store.save(&context.dump())?;

    println!(
        "Imported {} resident(s) from {}",
        summary.added.len(),
        args.csv.display()
    );
    if !summary.skipped.is_empty() {
        println!("Skipped: {}", summary.skipped.join(", "));
    }
    Ok(())
}
