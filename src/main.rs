// file: src/main.rs
// version: 2.0.0
// guid: a751c2ff-e054-49ab-8803-6fe338ec299f

//! pve-cloud-templates - Main entry point

use clap::{error::ErrorKind, Parser};
use pve_cloud_templates::{
    cli::{args::Cli, commands::*},
    logging::logger,
};
use tokio::signal;
use tracing::{error, warn};

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            let _ = e.print();
            std::process::exit(1);
        }
    };

    if let Err(e) = logger::init_logger(cli.verbose, cli.quiet) {
        eprintln!("{}", e);
    }

    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
        warn!("Received Ctrl+C, initiating shutdown...");
        cleanup_on_interrupt(&cli.work_dir).await;
    };

    tokio::select! {
        result = import_command(&cli) => {
            let code = match result {
                Ok(summary) if summary.has_failures() => 1,
                Ok(_) => 0,
                Err(e) => {
                    error!("{}", e);
                    e.exit_code()
                }
            };
            std::process::exit(code);
        }
        _ = shutdown_signal => {
            warn!("Application interrupted by user");
            std::process::exit(130);
        }
    }
}
