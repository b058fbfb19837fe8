// file: src/cli/commands.rs
// version: 2.0.0
// guid: a3b6b006-7ff4-4de9-864d-66e9a464c04c

//! Command implementations for the CLI

use crate::{
    cli::args::Cli,
    config::ConfigLoader,
    exec::LocalRunner,
    image::remove_partial_downloads,
    importer::{ImportSummary, TemplateImporter},
    network::NetworkDownloader,
    pve::{StorageResolver, VmRegistry},
    utils::system::SystemUtils,
    Result,
};
use std::path::Path;
use tracing::{info, warn};

/// Import every configured template (or the one named on the command line)
pub async fn import_command(cli: &Cli) -> Result<ImportSummary> {
    SystemUtils::check_prerequisites()?;

    let loader = ConfigLoader::new();
    let templates = loader.load_templates(&cli.config)?;
    info!(
        "Loaded {} templates from {}",
        templates.templates.len(),
        cli.config.display()
    );

    let mut runner = LocalRunner::new();
    let storage = StorageResolver::new().resolve(&mut runner, &cli.storage).await?;

    let downloader = if cli.quiet {
        NetworkDownloader::new().without_progress()
    } else {
        NetworkDownloader::new()
    };

    let mut importer = TemplateImporter::new(
        runner,
        downloader,
        storage,
        VmRegistry::new(&cli.vm_config_dir),
        &cli.work_dir,
    );

    let summary = importer
        .import_all(&templates, cli.vm_name.as_deref())
        .await?;
    summary.log();

    Ok(summary)
}

/// Cleanup after an interrupted run
pub async fn cleanup_on_interrupt(work_dir: &Path) {
    info!("Performing cleanup on exit...");

    match remove_partial_downloads(work_dir).await {
        Ok(0) => {}
        Ok(n) => info!("Removed {} partial downloads", n),
        Err(e) => warn!("Failed to clean {}: {}", work_dir.display(), e),
    }
}
