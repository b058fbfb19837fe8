// file: src/image/fetcher.rs
// version: 1.0.0
// guid: e2c1c6a6-8201-4986-8aa3-c50a2e63c926

//! Image download, unpacking and cleanup

use crate::config::TemplateSpec;
use crate::error::ImportError;
use crate::exec::{CommandRunner, HostCommand};
use crate::network::ImageSource;
use crate::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Local files used while importing one template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImagePaths {
    /// Download target, never the final name
    pub download: PathBuf,
    /// Raw disk image handed to the host
    pub image: PathBuf,
}

impl ImagePaths {
    /// Paths for `name` inside `work_dir`
    pub fn for_template(work_dir: &Path, name: &str) -> Self {
        Self {
            download: work_dir.join(format!("{}.img.download", name)),
            image: work_dir.join(format!("{}.img", name)),
        }
    }

    /// Substitute `{dl}` and `{img}` in an unpack command
    pub fn render_unpack(&self, unpack: &str) -> String {
        unpack
            .replace("{dl}", &self.download.display().to_string())
            .replace("{img}", &self.image.display().to_string())
    }

    /// Delete both files, ignoring ones that do not exist
    pub async fn remove_all(&self) -> Result<()> {
        remove_if_exists(&self.download).await?;
        remove_if_exists(&self.image).await?;
        Ok(())
    }
}

/// Remove a file, treating "not found" as success
pub async fn remove_if_exists(path: &Path) -> Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            debug!("Removed {}", path.display());
            Ok(true)
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Remove `*.img.download` files left in `work_dir` by an interrupted run
pub async fn remove_partial_downloads(work_dir: &Path) -> Result<usize> {
    let mut removed = 0;
    let mut entries = match tokio::fs::read_dir(work_dir).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(0),
        Err(e) => return Err(e.into()),
    };

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_partial = path
            .file_name()
            .and_then(|n| n.to_str())
            .map_or(false, |n| n.ends_with(".img.download"));
        if is_partial && remove_if_exists(&path).await? {
            removed += 1;
        }
    }

    Ok(removed)
}

/// Downloads a template's image and leaves it at [`ImagePaths::image`]
pub struct ImageFetcher<S: ImageSource> {
    source: S,
}

impl<S: ImageSource> ImageFetcher<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Download and unpack the image for `template`
    pub async fn fetch<R: CommandRunner>(
        &self,
        runner: &mut R,
        template: &TemplateSpec,
        paths: &ImagePaths,
    ) -> Result<()> {
        // Leftovers from an earlier failed run
        paths.remove_all().await?;

        let bytes = self.source.fetch(&template.url, &paths.download).await?;
        debug!("Fetched {} bytes for {}", bytes, template.name);

        match &template.unpack {
            Some(unpack) => {
                let command = HostCommand::shell(paths.render_unpack(unpack));
                runner.run_checked(&command).await?;

                if !tokio::fs::try_exists(&paths.image).await? {
                    return Err(ImportError::image(format!(
                        "unpack command for {} did not produce {}",
                        template.name,
                        paths.image.display()
                    )));
                }
            }
            None => {
                tokio::fs::rename(&paths.download, &paths.image).await?;
            }
        }

        info!("Image ready at {}", paths.image.display());
        Ok(())
    }
}
