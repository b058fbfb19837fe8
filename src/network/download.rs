// file: src/network/download.rs
// version: 2.0.0
// guid: eaac416a-7a38-41c3-a1d5-3b846afb5133

//! Network download utilities

use crate::error::ImportError;
use crate::Result;
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

/// Where cloud images come from
#[async_trait::async_trait]
pub trait ImageSource: Send + Sync {
    /// Fetch `url` into `dest`, returning the number of bytes written
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64>;
}

/// Network downloader with progress tracking
pub struct NetworkDownloader {
    client: reqwest::Client,
    show_progress: bool,
}

impl NetworkDownloader {
    /// Create a new network downloader
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            show_progress: true,
        }
    }

    /// Create a downloader around a preconfigured client
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            show_progress: true,
        }
    }

    /// Disable the progress bar (for quiet runs)
    pub fn without_progress(mut self) -> Self {
        self.show_progress = false;
        self
    }

    fn progress_bar(&self, total_size: Option<u64>) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }

        match total_size {
            Some(total) => {
                let pb = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta})",
                ) {
                    pb.set_style(style.progress_chars("#>-"));
                }
                pb
            }
            None => {
                let pb = ProgressBar::new_spinner();
                if let Ok(style) = ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {bytes} ({bytes_per_sec})")
                {
                    pb.set_style(style);
                }
                pb
            }
        }
    }

    /// Download file with progress bar
    pub async fn download_with_progress<P: AsRef<Path>>(&self, url: &str, dest: P) -> Result<u64> {
        info!("Downloading: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(ImportError::network(format!(
                "Download of {} failed with status: {}",
                url,
                response.status()
            )));
        }

        let pb = self.progress_bar(response.content_length());

        let mut file = File::create(&dest).await?;
        let mut stream = response.bytes_stream();
        let mut downloaded = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            downloaded += chunk.len() as u64;
            pb.set_position(downloaded);
        }

        file.flush().await?;
        pb.finish_with_message("Download completed");

        info!(
            "Downloaded {} bytes to: {}",
            downloaded,
            dest.as_ref().display()
        );
        Ok(downloaded)
    }
}

impl Default for NetworkDownloader {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl ImageSource for NetworkDownloader {
    async fn fetch(&self, url: &str, dest: &Path) -> Result<u64> {
        self.download_with_progress(url, dest).await
    }
}
