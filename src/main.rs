//! Tern - A terminal rich-text editor.
//!
//! # Usage
//!
//! ```bash
//! tern
//! tern --key journal
//! tern --store ~/notes --reset
//! ```

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tern::app::App;
use tern::config::{
    ConfigFlags, clear_config_flags, default_store_dir, global_config_path, load_config_flags,
    local_override_path, save_config_flags,
};
use tern::persist::{DEFAULT_KEY, FileStore};

/// A terminal rich-text editor
#[derive(Parser, Debug)]
#[command(name = "tern", version, about, long_about = None)]
struct Cli {
    /// Directory the document is stored in
    #[arg(long, value_name = "DIR")]
    store: Option<PathBuf>,

    /// Storage key of the document to edit
    #[arg(long, value_name = "NAME")]
    key: Option<String>,

    /// Discard the stored document and start from the default one
    #[arg(long)]
    reset: bool,

    /// Write log events to a file instead of stderr
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Save current command-line flags as defaults
    #[arg(long)]
    save: bool,

    /// Clear saved defaults
    #[arg(long)]
    clear: bool,
}

fn env_filter() -> EnvFilter {
    EnvFilter::from_default_env().add_directive(tracing::Level::WARN.into())
}

fn init_logging(log_file: Option<&Path>) -> Result<()> {
    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {}", path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(env_filter())
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let global_path = global_config_path();
    let local_path = local_override_path();
    let cli_flags = ConfigFlags {
        store_dir: cli.store,
        key: cli.key,
        reset: cli.reset,
        log_file: cli.log_file,
    };

    if cli.clear {
        clear_config_flags(&global_path)?;
    }
    if cli.save {
        save_config_flags(&global_path, &cli_flags)?;
    }

    let file_flags = if cli.clear {
        ConfigFlags::default()
    } else {
        let global_flags = load_config_flags(&global_path)?;
        let local_flags = load_config_flags(&local_path)?;
        global_flags.union(&local_flags)
    };
    let effective = file_flags.union(&cli_flags);

    init_logging(effective.log_file.as_deref())?;

    let store_dir = effective.store_dir.clone().unwrap_or_else(default_store_dir);
    let key = effective.key.clone().unwrap_or_else(|| DEFAULT_KEY.to_string());
    tracing::debug!(dir = %store_dir.display(), %key, "opening store");

    let store = FileStore::new(store_dir, key).context("Invalid --key")?;
    let mut app = App::new(Box::new(store))
        .with_reset(effective.reset)
        .with_config_paths(
            Some(global_path.clone()),
            if local_path.exists() {
                Some(local_path.clone())
            } else {
                None
            },
        );

    app.run().context("Application error")
}
