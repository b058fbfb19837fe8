// file: src/config/template.rs
// version: 1.0.0
// guid: ca04b4cb-961b-4fe7-8fb7-d111d95f3d75

//! Template descriptors as read from the templates file

use crate::error::ImportError;
use crate::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Lowest and highest VM ids accepted by the host
pub const MIN_VMID: u32 = 100;
pub const MAX_VMID: u32 = 999_999_999;

/// Root of the templates file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateList {
    pub templates: Vec<TemplateSpec>,
}

/// One cloud image to be turned into a VM template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateSpec {
    pub vmid: u32,
    pub name: String,
    pub url: String,
    /// Shell command with `{dl}` and `{img}` placeholders
    #[serde(default)]
    pub unpack: Option<String>,
    #[serde(default)]
    pub customize: Option<CustomizeSpec>,
    #[serde(default)]
    pub cloud_init: bool,
}

/// Guest customization applied to the image before import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomizeSpec {
    #[serde(default)]
    pub uploads: Vec<String>,
    #[serde(default)]
    pub commands: Vec<String>,
}

impl CustomizeSpec {
    /// True when there is nothing to upload or run
    pub fn is_empty(&self) -> bool {
        self.uploads.is_empty() && self.commands.is_empty()
    }
}

impl TemplateSpec {
    /// Validate a single template entry
    pub fn validate(&self) -> Result<()> {
        if !(MIN_VMID..=MAX_VMID).contains(&self.vmid) {
            return Err(ImportError::config(format!(
                "template '{}': vmid {} is outside {}..={}",
                self.name, self.vmid, MIN_VMID, MAX_VMID
            )));
        }

        let name_re = Regex::new(r"^[A-Za-z0-9][A-Za-z0-9.-]*$")
            .map_err(|e| ImportError::config(format!("Invalid regex pattern: {}", e)))?;
        if !name_re.is_match(&self.name) {
            return Err(ImportError::config(format!(
                "template {}: invalid name '{}' (letters, digits, '.' and '-' only)",
                self.vmid, self.name
            )));
        }

        let url = url::Url::parse(&self.url).map_err(|e| {
            ImportError::config(format!(
                "template '{}': invalid url '{}': {}",
                self.name, self.url, e
            ))
        })?;
        if !matches!(url.scheme(), "http" | "https" | "ftp") {
            return Err(ImportError::config(format!(
                "template '{}': unsupported url scheme '{}'",
                self.name,
                url.scheme()
            )));
        }

        if let Some(unpack) = &self.unpack {
            if !unpack.contains("{img}") {
                return Err(ImportError::config(format!(
                    "template '{}': unpack command must write to {{img}}",
                    self.name
                )));
            }
        }

        Ok(())
    }

    /// Customization spec, if it has anything to do
    pub fn effective_customize(&self) -> Option<&CustomizeSpec> {
        self.customize.as_ref().filter(|c| !c.is_empty())
    }
}

impl TemplateList {
    /// Validate every entry and reject duplicate ids or names
    pub fn validate(&self) -> Result<()> {
        let mut vmids = HashSet::new();
        let mut names = HashSet::new();

        for template in &self.templates {
            template.validate()?;

            if !vmids.insert(template.vmid) {
                return Err(ImportError::config(format!(
                    "duplicate vmid {}",
                    template.vmid
                )));
            }
            if !names.insert(template.name.as_str()) {
                return Err(ImportError::config(format!(
                    "duplicate template name '{}'",
                    template.name
                )));
            }
        }

        Ok(())
    }

    /// Templates selected by an optional name filter, in file order
    pub fn select<'a>(&'a self, name: Option<&'a str>) -> impl Iterator<Item = &'a TemplateSpec> + 'a {
        self.templates
            .iter()
            .filter(move |t| name.map_or(true, |n| t.name == n))
    }
}
