/// file-crud:
/// Create, read, update and delete a single text file from the command line.
/// Updates are a literal find-and-replace over every line, written to a
/// temporary file first and renamed into place, so an interrupted update
/// never leaves a half-written target behind.
use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use file_crud::core::config::{ConfigManager, ExportFormat};
use file_crud::utils::{self, CommandContext, ReadFormat, logging};

#[derive(Parser)]
#[command(name = "file-crud")]
#[command(about = "Create, read, update and delete a single text file")]
struct Cli {
    /// Configuration file (defaults to ./file-crud.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Target file, overriding the configured one
    #[arg(long, global = true)]
    path: Option<PathBuf>,

    /// Log every store operation
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default configuration file
    Init,
    /// Write TEXT as the whole content of the target file
    Create { text: String },
    /// Print the target file line by line
    Read {
        #[arg(long, value_enum, default_value = "plain")]
        format: ReadFormat,
    },
    /// Replace every occurrence of OLD with NEW
    Update { old: String, new: String },
    /// Remove the target file
    Delete,
    /// Show whether the target exists and how large it is
    Status,
    /// Check the configuration for problems
    Validate,
    /// Write the configuration to FILE in another format
    Export {
        file: PathBuf,
        #[arg(long, value_enum, default_value = "toml")]
        format: ExportFormat,
    },
    /// Store a new target path in the configuration
    SetPath { path: PathBuf },
    /// Run create, read, update, read and delete against the target
    Demo,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(path) => ConfigManager::new_at(path),
        None => ConfigManager::new()?,
    };
    logging::init_logging(utils::verbose_requested(&config_manager, cli.verbose))?;

    let mut ctx = CommandContext::new(config_manager, cli.path);

    match cli.command {
        Commands::Init => utils::initialize_config(&ctx),
        Commands::Create { text } => utils::create_file(&ctx, &text),
        Commands::Read { format } => utils::read_file(&ctx, format),
        Commands::Update { old, new } => utils::update_file(&ctx, &old, &new),
        Commands::Delete => utils::delete_file(&ctx),
        Commands::Status => utils::show_status(&ctx),
        Commands::Validate => utils::validate(&ctx),
        Commands::Export { file, format } => utils::export_config(&ctx, &file, format),
        Commands::SetPath { path } => utils::set_target_path(&mut ctx, path),
        Commands::Demo => utils::run_demo(&ctx),
    }
}
