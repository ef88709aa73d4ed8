use anyhow::{Context, Result};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::builders::provisioner::ProvisionOutcome;
use crate::builders::reporter::{ConsoleReporter, FileStatus, OperationReporter};
use crate::builders::validator::{ConfigValidator, StandardValidator};
use crate::core::config::{ConfigManager, ConfigProvider, ExportFormat, StoreSettings};
use crate::core::store::FileStore;

pub mod logging;

/// Output format for the `read` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ReadFormat {
    Plain,
    Json,
}

/// Everything a command handler needs: where the configuration lives, an
/// optional `--path` override, and where to print results.
pub struct CommandContext {
    config_manager: ConfigManager,
    target_override: Option<PathBuf>,
    reporter: Box<dyn OperationReporter>,
}

impl CommandContext {
    pub fn new(config_manager: ConfigManager, target_override: Option<PathBuf>) -> Self {
        Self {
            config_manager,
            target_override,
            reporter: Box::new(ConsoleReporter::new()),
        }
    }

    pub fn config_manager(&self) -> &ConfigManager {
        &self.config_manager
    }

    /// The target path after applying the `--path` override.
    pub fn target_path(&self) -> Result<PathBuf> {
        match &self.target_override {
            Some(path) => Ok(path.clone()),
            None => Ok(self.config_manager.load_config()?.target_path),
        }
    }

    /// Builds a `FileStore` for the configured target, provisioning its
    /// directory along the way.
    pub fn open_store(&self) -> Result<FileStore> {
        let settings = self.settings()?;
        let target = self.target_path()?;

        let store = FileStore::new(&target)
            .with_context(|| format!("Failed to open file store at {}", target.display()))?;
        if store.provisioned() == ProvisionOutcome::Created {
            println!(
                "Creating output directory {}",
                parent_display(&target).bright_yellow()
            );
        }

        Ok(store.with_sync(settings.sync_on_write))
    }

    /// Store settings from the configuration file.
    ///
    /// With an explicit `--path` the configuration is optional, so a file
    /// that fails to load falls back to the defaults instead of blocking the
    /// command.
    fn settings(&self) -> Result<StoreSettings> {
        match self.config_manager.load_config() {
            Ok(config) => Ok(config.settings),
            Err(error) if self.target_override.is_some() => {
                warn!(error = %format!("{error:#}"), "ignoring configuration, using defaults");
                Ok(StoreSettings::default())
            }
            Err(error) => Err(error),
        }
    }
}

/// Whether logging should run at debug level.
///
/// A configuration that fails to load counts as "not verbose" here; the
/// command itself decides whether that failure matters.
pub fn verbose_requested(config_manager: &ConfigManager, flag: bool) -> bool {
    flag || config_manager
        .load_config()
        .map(|config| config.settings.verbose)
        .unwrap_or(false)
}

fn parent_display(target: &Path) -> String {
    target
        .parent()
        .map(|parent| parent.display().to_string())
        .unwrap_or_default()
}

pub fn initialize_config(ctx: &CommandContext) -> Result<()> {
    let manager = ctx.config_manager();
    if manager.initialize()? {
        println!(
            "✓ Wrote default configuration to {}",
            manager.get_config_path().display()
        );
    } else {
        println!(
            "Configuration already present at {}",
            manager.get_config_path().display()
        );
    }
    Ok(())
}

pub fn create_file(ctx: &CommandContext, text: &str) -> Result<()> {
    let store = ctx.open_store()?;
    store.create(text)?;
    ctx.reporter.report_created(store.path(), text.len());
    Ok(())
}

pub fn read_file(ctx: &CommandContext, format: ReadFormat) -> Result<()> {
    let store = ctx.open_store()?;
    let lines = store.read()?;

    match format {
        ReadFormat::Plain => {
            for line in lines {
                ctx.reporter.report_line(&line?);
            }
        }
        ReadFormat::Json => {
            let lines = lines.collect::<Result<Vec<String>, _>>()?;
            let json =
                serde_json::to_string_pretty(&lines).context("Failed to serialize lines")?;
            println!("{json}");
        }
    }
    Ok(())
}

pub fn update_file(ctx: &CommandContext, old: &str, new: &str) -> Result<()> {
    let store = ctx.open_store()?;
    let summary = store.update(old, new)?;
    ctx.reporter.report_updated(store.path(), old, new, &summary);
    Ok(())
}

pub fn delete_file(ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    store.delete()?;
    ctx.reporter.report_deleted(store.path());
    Ok(())
}

pub fn show_status(ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;
    let status = FileStatus::collect(&store)?;
    ctx.reporter.report_status(&status);
    Ok(())
}

pub fn validate(ctx: &CommandContext) -> Result<()> {
    let mut issues = ctx.config_manager().validate_config()?;
    if let Some(path) = &ctx.target_override {
        issues.extend(StandardValidator::new().validate_target(path));
    }

    if issues.is_empty() {
        println!("✓ Configuration is valid.");
        Ok(())
    } else {
        println!("⚠️  Found issues in configuration:");
        for issue in issues {
            println!("  - {issue}");
        }
        anyhow::bail!("Configuration validation failed.");
    }
}

pub fn export_config(ctx: &CommandContext, file: &Path, format: ExportFormat) -> Result<()> {
    ctx.config_manager().export_config(file, format)?;
    println!("✓ Exported configuration to {}", file.display());
    Ok(())
}

pub fn set_target_path(ctx: &mut CommandContext, path: PathBuf) -> Result<()> {
    ctx.config_manager.initialize()?;
    ctx.config_manager.set_target_path(path.clone())?;
    println!("✓ Target path set to {}", path.display());
    Ok(())
}

/// Walks through every operation once against the configured target.
pub fn run_demo(ctx: &CommandContext) -> Result<()> {
    let store = ctx.open_store()?;

    println!("{}", "CREATE".cyan().bold());
    let text = "STOP LOOKING AT ME!";
    store.create(text)?;
    ctx.reporter.report_created(store.path(), text.len());

    println!("{}", "READ".cyan().bold());
    for line in store.read()? {
        ctx.reporter.report_line(&line?);
    }

    println!("{}", "UPDATE".cyan().bold());
    let summary = store.update("STOP", "KEEP")?;
    ctx.reporter
        .report_updated(store.path(), "STOP", "KEEP", &summary);

    println!("{}", "READ".cyan().bold());
    for line in store.read()? {
        ctx.reporter.report_line(&line?);
    }

    println!("{}", "DELETE".cyan().bold());
    store.delete()?;
    ctx.reporter.report_deleted(store.path());
    Ok(())
}
