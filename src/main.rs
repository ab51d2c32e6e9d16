//! Command-line entry point: resolves translation keys for one language.

use std::io::{
    self,
    Write as _,
};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;
use wedding_i18n::Localization;
use wedding_i18n::config::{
    ConfigManager,
    LocalizationSettings,
};

/// Resolves translation keys against the dictionary and remote overrides.
#[derive(Parser, Debug)]
#[command(name = "wedding-i18n", version)]
struct Cli {
    /// Language to resolve in (defaults to the configured language).
    #[arg(long, value_name = "CODE")]
    lang: Option<String>,

    /// Directory holding `.wedding-i18n.json`.
    #[arg(short = 'C', long, value_name = "DIR")]
    workspace: Option<PathBuf>,

    /// Skips the remote fetch and uses the local dictionary only.
    #[arg(long)]
    offline: bool,

    /// Dotted keys to resolve.
    #[arg(value_name = "KEY", required = true)]
    keys: Vec<String>,
}

/// Loads settings, builds the scope and prints each key.
async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let workspace = match cli.workspace {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    let mut config_manager = ConfigManager::new();
    config_manager.load_settings(Some(&workspace))?;

    let settings = if cli.offline {
        LocalizationSettings { remote: None, ..config_manager.get_settings().clone() }
    } else {
        config_manager.get_settings().clone()
    };

    let localization = Localization::from_settings(&settings)?;
    if let Some(language) = &cli.lang {
        localization.change_language(language);
    }
    if settings.remote.is_some() {
        localization.mount().await?;
    }

    let mut stdout = io::stdout().lock();
    for key in &cli.keys {
        writeln!(stdout, "{key} = {}", localization.t(key))?;
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            tracing::error!("{error}");
            ExitCode::FAILURE
        }
    }
}
