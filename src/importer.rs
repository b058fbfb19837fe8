// file: src/importer.rs
// version: 1.0.0
// guid: 55f65d31-8ece-467a-990c-3376932077c0

//! Per-template import pipeline
//!
//! For each selected template: skip if the VM id is taken, otherwise
//! download → unpack → customize → create/import/configure → templatize,
//! and always remove the transient image files afterwards. A failing
//! template is recorded and the run moves on to the next one.

use crate::config::{TemplateList, TemplateSpec};
use crate::exec::CommandRunner;
use crate::image::{Customizer, ImageFetcher, ImagePaths};
use crate::network::ImageSource;
use crate::pve::{StorageDescriptor, VmProvisioner, VmRegistry};
use crate::Result;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{error, info, info_span, warn, Instrument};

/// Outcome of one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateStatus {
    Imported,
    /// A VM with the template's id already exists
    Skipped,
    Failed(String),
}

impl fmt::Display for TemplateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateStatus::Imported => f.write_str("imported"),
            TemplateStatus::Skipped => f.write_str("skipped"),
            TemplateStatus::Failed(reason) => write!(f, "failed: {}", reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateReport {
    pub vmid: u32,
    pub name: String,
    pub status: TemplateStatus,
}

/// Results of a whole run, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub reports: Vec<TemplateReport>,
}

impl ImportSummary {
    fn count(&self, pred: impl Fn(&TemplateStatus) -> bool) -> usize {
        self.reports.iter().filter(|r| pred(&r.status)).count()
    }

    pub fn imported(&self) -> usize {
        self.count(|s| *s == TemplateStatus::Imported)
    }

    pub fn skipped(&self) -> usize {
        self.count(|s| *s == TemplateStatus::Skipped)
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, TemplateStatus::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    /// Write the summary to the log
    pub fn log(&self) {
        info!(
            "Summary: {} imported, {} skipped, {} failed",
            self.imported(),
            self.skipped(),
            self.failed()
        );
        for report in &self.reports {
            if let TemplateStatus::Failed(reason) = &report.status {
                error!("  {} ({}): {}", report.vmid, report.name, reason);
            }
        }
    }
}

/// Drives templates through the import pipeline against one storage
pub struct TemplateImporter<R: CommandRunner, S: ImageSource> {
    runner: R,
    fetcher: ImageFetcher<S>,
    customizer: Customizer,
    provisioner: VmProvisioner,
    registry: VmRegistry,
    storage: StorageDescriptor,
    work_dir: PathBuf,
}

impl<R: CommandRunner, S: ImageSource> TemplateImporter<R, S> {
    pub fn new(
        runner: R,
        source: S,
        storage: StorageDescriptor,
        registry: VmRegistry,
        work_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            runner,
            fetcher: ImageFetcher::new(source),
            customizer: Customizer::new(),
            provisioner: VmProvisioner::default(),
            registry,
            storage,
            work_dir: work_dir.into(),
        }
    }

    /// Replace the provisioner (and with it the VM defaults)
    pub fn with_provisioner(mut self, provisioner: VmProvisioner) -> Self {
        self.provisioner = provisioner;
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn storage(&self) -> &StorageDescriptor {
        &self.storage
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    /// Import the templates selected by `filter` (all when `None`)
    pub async fn import_all(&mut self, list: &TemplateList, filter: Option<&str>) -> Result<ImportSummary> {
        let mut summary = ImportSummary::default();

        for template in list.select(filter) {
            let span = info_span!("template", vmid = template.vmid, name = %template.name);
            let status = match self.import_template(template).instrument(span).await {
                Ok(status) => status,
                Err(e) => {
                    error!("Import of {} ({}) failed: {}", template.vmid, template.name, e);
                    TemplateStatus::Failed(e.to_string())
                }
            };

            summary.reports.push(TemplateReport {
                vmid: template.vmid,
                name: template.name.clone(),
                status,
            });
        }

        if let (Some(name), true) = (filter, summary.reports.is_empty()) {
            warn!("No template named '{}' in the configuration", name);
        }

        Ok(summary)
    }

    /// Import a single template unless its VM id is already taken
    pub async fn import_template(&mut self, template: &TemplateSpec) -> Result<TemplateStatus> {
        if self.registry.exists(template.vmid).await? {
            info!("VM {} exists, skipping.", template.vmid);
            return Ok(TemplateStatus::Skipped);
        }

        info!(
            "Importing {} ({}) from {}",
            template.vmid, template.name, template.url
        );

        tokio::fs::create_dir_all(&self.work_dir).await?;
        let paths = ImagePaths::for_template(&self.work_dir, &template.name);
        let result = self.run_pipeline(template, &paths).await;

        info!("Deleting {}", paths.image.display());
        if let Err(e) = paths.remove_all().await {
            warn!("Failed to remove transient files for {}: {}", template.name, e);
        }

        result?;
        info!("Done");
        Ok(TemplateStatus::Imported)
    }

    async fn run_pipeline(&mut self, template: &TemplateSpec, paths: &ImagePaths) -> Result<()> {
        self.fetcher.fetch(&mut self.runner, template, paths).await?;

        self.customizer
            .customize(&mut self.runner, &paths.image, template.effective_customize())
            .await?;

        self.provisioner
            .provision(&mut self.runner, template, &paths.image, &self.storage)
            .await
    }
}
