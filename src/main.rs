//! `vr-engine` command line.
//!
//! Runs the HTTP service or a one-shot pipeline over a directory or archive
//! of HR extracts.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing::{error, info};

use vr_engine::api::{AppState, create_router};
use vr_engine::config::ConfigLoader;
use vr_engine::service::VrService;
use vr_engine::telemetry;

#[derive(Parser, Debug)]
#[command(
    name = "vr-engine",
    about = "Reconcile monthly meal-voucher (VR) payouts from HR extracts",
    version
)]
struct Cli {
    /// YAML configuration file (defaults apply when omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Load the extracts and print the row counts
    Consolidate(SourceArgs),
    /// Consolidate, then write the payout table and validation report
    Run(SourceArgs),
}

#[derive(Args, Debug)]
struct ServeArgs {
    /// Address to bind
    #[arg(long, default_value = "127.0.0.1")]
    host: String,
    /// Port to bind
    #[arg(long, default_value_t = 8080)]
    port: u16,
}

impl Default for ServeArgs {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
        }
    }
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// A `.zip` archive or directory of extracts (defaults to the data directory)
    source: Option<PathBuf>,
}

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = telemetry::init() {
        eprintln!("{}", err);
        return ExitCode::FAILURE;
    }

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "vr-engine failed");
            eprintln!("error: {}", err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult {
    let loader = match &cli.config {
        Some(path) => ConfigLoader::load(path)?,
        None => ConfigLoader::from_env()?,
    };
    let service = VrService::new(loader.into_config());

    match cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    {
        Command::Serve(args) => serve(service, args).await,
        Command::Consolidate(args) => {
            let summary = service.consolidate(args.source.as_deref())?;
            println!("{}", summary);
            Ok(())
        }
        Command::Run(args) => {
            let summary = service.consolidate(args.source.as_deref())?;
            println!("{}", summary);
            let result = service.calculate()?;
            println!("Payout table written to {}", result.display());
            let validation = service.validate()?;
            println!("Validation report written to {}", validation.display());
            Ok(())
        }
    }
}

async fn serve(service: VrService, args: ServeArgs) -> CliResult {
    let addr: SocketAddr = format!("{}:{}", args.host, args.port).parse()?;
    let router = create_router(AppState::new(service));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(address = %addr, "VR engine listening");
    axum::serve(listener, router).await?;
    Ok(())
}
