use colored::Colorize;
use std::path::{Path, PathBuf};

use crate::core::error::{Result, StoreError};
use crate::core::store::{FileStore, UpdateSummary};

/// A snapshot of the target file, used by the `status` command.
#[derive(Debug)]
pub struct FileStatus {
    pub path: PathBuf,
    /// Indicates whether the file exists in the filesystem.
    pub exists: bool,
    /// The total number of lines in the file.
    pub total_lines: usize,
    pub size_bytes: u64,
}

impl FileStatus {
    /// Collects the status of the store's file. A missing file is a valid
    /// status, not an error.
    pub fn collect(store: &FileStore) -> Result<Self> {
        if !store.exists() {
            return Ok(Self {
                path: store.path().to_path_buf(),
                exists: false,
                total_lines: 0,
                size_bytes: 0,
            });
        }

        let mut total_lines = 0;
        for line in store.read()? {
            line?;
            total_lines += 1;
        }
        let size_bytes = std::fs::metadata(store.path())
            .map_err(|e| StoreError::unreadable(store.path(), e))?
            .len();

        Ok(Self {
            path: store.path().to_path_buf(),
            exists: true,
            total_lines,
            size_bytes,
        })
    }
}

/// The `OperationReporter` trait defines how the results of store operations
/// are presented to the user.
///
/// Command handlers only talk to this trait, so the console output can be
/// swapped for another presentation without touching the handlers.
pub trait OperationReporter {
    /// Reports a successful `create`.
    ///
    /// # Arguments
    /// * `path`: The file that was written.
    /// * `bytes`: The number of bytes written.
    fn report_created(&self, path: &Path, bytes: usize);

    /// Reports a single line produced by `read`, in file order.
    ///
    /// # Arguments
    /// * `line`: The line content, without its terminator.
    fn report_line(&self, line: &str);

    /// Reports the outcome of an `update`, including the no-match case.
    ///
    /// # Arguments
    /// * `path`: The file that was rewritten.
    /// * `old`: The search text.
    /// * `new`: The replacement text.
    /// * `summary`: The counts gathered during the rewrite.
    fn report_updated(&self, path: &Path, old: &str, new: &str, summary: &UpdateSummary);

    /// Reports a successful `delete`.
    ///
    /// # Arguments
    /// * `path`: The file that was removed.
    fn report_deleted(&self, path: &Path);

    /// Prints the status snapshot collected for the `status` command.
    ///
    /// # Arguments
    /// * `status`: The `FileStatus` of the target file.
    fn report_status(&self, status: &FileStatus);
}

/// Prints operation results to the console.
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new() -> Self {
        Self
    }

    /// A private helper function to format the status line for the target.
    ///
    /// This function generates a human-readable string with an icon, the
    /// file path, and its line and byte counts.
    /// 🟢: File exists.
    /// 🔴: File does not exist.
    ///
    /// # Arguments
    /// * `status`: A reference to the `FileStatus` of the target file.
    ///
    /// # Returns
    /// A `String` containing the formatted status line.
    fn format_status(&self, status: &FileStatus) -> String {
        let status_icon = if status.exists { "🟢" } else { "🔴" };
        if status.exists {
            format!(
                "{} {} ({} lines, {} bytes)",
                status_icon,
                status.path.display(),
                status.total_lines,
                status.size_bytes
            )
        } else {
            format!("{} {} (missing)", status_icon, status.path.display())
        }
    }
}

impl Default for ConsoleReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationReporter for ConsoleReporter {
    fn report_created(&self, path: &Path, bytes: usize) {
        println!(
            "{} Wrote {} bytes to {}",
            "✓".green(),
            bytes,
            path.display().to_string().bold()
        );
    }

    fn report_line(&self, line: &str) {
        println!("{line}");
    }

    fn report_updated(&self, path: &Path, old: &str, new: &str, summary: &UpdateSummary) {
        if summary.replacements == 0 {
            println!(
                "{} No occurrences of '{}' in {}",
                "•".bright_blue(),
                old,
                path.display()
            );
            return;
        }

        println!(
            "{} Replaced '{}' with '{}' in {}",
            "✓".green(),
            old.red(),
            new.bright_green(),
            path.display().to_string().bold()
        );
        println!(
            "  └─ {} replacements on {}/{} lines",
            summary.replacements, summary.lines_changed, summary.lines_scanned
        );
    }

    fn report_deleted(&self, path: &Path) {
        println!("{} File deleted successfully: {}", "✓".green(), path.display());
    }

    fn report_status(&self, status: &FileStatus) {
        println!("{}", "📊 File Store Status".cyan().bold());
        println!("====================");
        println!("{}", self.format_status(status));
    }
}
