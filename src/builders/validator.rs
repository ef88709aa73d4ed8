use anyhow::Result;
use std::path::Path;

use crate::core::config::FileCrudConfig;

/// The `ConfigValidator` trait defines the public interface for validating the
/// file-crud configuration.
pub trait ConfigValidator {
    /// Performs a full validation of the `FileCrudConfig` and returns a list
    /// of issues found. An empty list means the configuration is usable.
    ///
    /// # Arguments
    /// * `config`: The `FileCrudConfig` to be validated.
    ///
    /// # Returns
    /// A `Result<Vec<String>>` where each string describes one issue.
    fn validate_config(&self, config: &FileCrudConfig) -> Result<Vec<String>>;

    /// Validates only the target path, as given on the command line or in the
    /// configuration file.
    ///
    /// # Arguments
    /// * `target`: The path the file store would own.
    ///
    /// # Returns
    /// A `Vec<String>` of issues; empty when a store can be built on `target`.
    fn validate_target(&self, target: &Path) -> Vec<String>;
}

/// The `StandardValidator` is a concrete implementation of `ConfigValidator`.
///
/// It checks that the configured target can actually hold a file store
/// before any operation is attempted.
pub struct StandardValidator;

impl StandardValidator {
    pub fn new() -> Self {
        Self
    }
}

impl Default for StandardValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigValidator for StandardValidator {
    fn validate_config(&self, config: &FileCrudConfig) -> Result<Vec<String>> {
        let mut issues = Vec::new();

        // Check for an unsupported configuration version.
        if config.version != "1.0" {
            issues.push(format!("Unsupported config version: {}", config.version));
        }

        issues.extend(self.validate_target(&config.target_path));
        Ok(issues)
    }

    /// Checks the target path against what the store can work with.
    ///
    /// Flags an empty path, a path without a file name, a target that is a
    /// directory, a parent that is a regular file, and a parent chain with
    /// more than one missing level, since the provisioner only creates one.
    fn validate_target(&self, target: &Path) -> Vec<String> {
        let mut issues = Vec::new();

        if target.as_os_str().is_empty() {
            issues.push("Target path is empty".to_string());
            return issues;
        }

        if target.file_name().is_none() {
            issues.push(format!("Target path does not name a file: {}", target.display()));
        }

        if target.is_dir() {
            issues.push(format!("Target path is a directory: {}", target.display()));
        }

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            if parent.exists() && !parent.is_dir() {
                issues.push(format!(
                    "Parent of target is not a directory: {}",
                    parent.display()
                ));
            } else if !parent.exists()
                && parent.parent().is_some_and(|grand| {
                    !grand.as_os_str().is_empty() && !grand.exists()
                })
            {
                // Only a single missing level gets provisioned automatically.
                issues.push(format!(
                    "More than one missing directory level above target: {}",
                    parent.display()
                ));
            }
        }

        issues
    }
}
