// file: src/config/loader.rs
// version: 2.0.0
// guid: 3d030c38-c539-47db-af42-5b0643e5ba41

//! Template file loading and environment variable substitution

use super::TemplateList;
use crate::error::ImportError;
use crate::Result;
use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

/// Configuration loader with environment variable substitution
///
/// `${VAR}` is replaced with the value of `VAR`; `$${VAR}` is left in the
/// output as a literal `${VAR}` so shell commands can still use it.
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load and validate the template list from a YAML file
    pub fn load_templates<P: AsRef<Path>>(&self, path: P) -> Result<TemplateList> {
        let content = fs::read_to_string(&path).map_err(|e| {
            ImportError::config(format!(
                "Failed to read templates file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let list = self.parse_templates(&content)?;
        debug!(
            "Loaded {} templates from {}",
            list.templates.len(),
            path.as_ref().display()
        );
        Ok(list)
    }

    /// Parse and validate a template list from YAML text
    pub fn parse_templates(&self, content: &str) -> Result<TemplateList> {
        let expanded = self.expand_env_vars(content)?;
        let list: TemplateList = serde_yaml::from_str(&expanded)
            .map_err(|e| ImportError::config(format!("Malformed templates file: {}", e)))?;

        list.validate()?;

        Ok(list)
    }

    /// Expand environment variables in configuration content
    ///
    /// Full-line `#` comments are copied through untouched.
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$?\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ImportError::config(format!("Invalid regex pattern: {}", e)))?;

        let mut missing_vars: Vec<String> = Vec::new();
        let mut result = String::with_capacity(content.len());

        for line in content.split_inclusive('\n') {
            if line.trim_start().starts_with('#') {
                result.push_str(line);
                continue;
            }

            let expanded = re.replace_all(line, |cap: &Captures| {
                let placeholder = &cap[0];
                if let Some(escaped) = placeholder.strip_prefix("$$") {
                    return format!("${}", escaped);
                }

                let var_name = &cap[1];
                match self.env_vars.get(var_name) {
                    Some(value) => value.clone(),
                    None => {
                        if !missing_vars.iter().any(|v| v == var_name) {
                            missing_vars.push(var_name.to_string());
                        }
                        placeholder.to_string()
                    }
                }
            });
            result.push_str(&expanded);
        }

        if !missing_vars.is_empty() {
            return Err(ImportError::config(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
