//! Command-line front end over a parcel database file.
//!
//! # Responsibility
//! - Expose each parcel store operation as one subcommand.
//! - Keep output line-oriented and deterministic for scripting.

use clap::{Parser, Subcommand};
use log::info;
use parcel_core::db::open_db;
use parcel_core::{
    default_log_level, init_logging, ClientId, Parcel, ParcelId, ParcelService, ParcelStatus,
    SqliteParcelRepository,
};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Debug, Parser)]
#[command(name = "parcel", version, about = "Track parcels in a SQLite database")]
struct Cli {
    /// SQLite database file; created when missing.
    #[arg(long, global = true, default_value = "tracker.db")]
    db: PathBuf,

    /// trace|debug|info|warn|error. Only valid together with --log-dir.
    #[arg(long, global = true, requires = "log_dir")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files. Logging is off when omitted.
    #[arg(long, global = true)]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Register a new parcel and print it.
    Register {
        #[arg(long)]
        client: ClientId,
        #[arg(long)]
        address: String,
    },
    /// Print one parcel.
    Get { number: ParcelId },
    /// Print every parcel of a client.
    List {
        #[arg(long)]
        client: ClientId,
    },
    /// Change the delivery address.
    SetAddress { number: ParcelId, address: String },
    /// Change the status (registered|sent|delivered).
    SetStatus {
        number: ParcelId,
        status: ParcelStatus,
    },
    /// Remove a parcel.
    Delete { number: ParcelId },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli.log_level.as_deref().unwrap_or(default_log_level());
        init_logging(level, log_dir)?;
        info!(
            "event=cli_start module=cli status=ok core_version={}",
            parcel_core::core_version()
        );
    }

    // Dropping `conn` at the end of this scope closes the database.
    let conn = open_db(&cli.db)?;
    let service = ParcelService::new(SqliteParcelRepository::try_new(&conn)?);

    match cli.command {
        Command::Register { client, address } => {
            print_parcel(&service.register(client, address)?);
        }
        Command::Get { number } => print_parcel(&service.get(number)?),
        Command::List { client } => {
            for parcel in service.get_by_client(client)? {
                print_parcel(&parcel);
            }
        }
        Command::SetAddress { number, address } => service.set_address(number, &address)?,
        Command::SetStatus { number, status } => service.set_status(number, status)?,
        Command::Delete { number } => service.delete(number)?,
    }

    Ok(())
}

fn print_parcel(parcel: &Parcel) {
    println!("{}", format_parcel(parcel));
}

fn format_parcel(parcel: &Parcel) -> String {
    format!(
        "number={} client={} status={} address={} created_at={}",
        parcel.number, parcel.client, parcel.status, parcel.address, parcel.created_at
    )
}
