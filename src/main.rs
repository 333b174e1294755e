use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use xrate::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for xrate::AppCommand {
    fn from(cmd: Commands) -> xrate::AppCommand {
        match cmd {
            Commands::Query { args } => xrate::AppCommand::Query(args),
            Commands::Repl => xrate::AppCommand::Repl,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Run one rate query, e.g. `query usd cny 37.95*12` or `query cc`
    Query {
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
    /// Keep rates refreshed and answer queries read from stdin
    Repl,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(cli.config_path.as_deref()),
        Some(cmd) => xrate::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn setup(config_path: Option<&str>) -> anyhow::Result<()> {
    use anyhow::Context;

    let path = match config_path {
        Some(p) => std::path::PathBuf::from(p),
        None => xrate::core::config::AppConfig::default_config_path()?,
    };

    if path.exists() {
        anyhow::bail!("Configuration file already exists at {}", path.display());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    let default_config = r#"---
provider:
  base_url: "https://openexchangerates.org/api/latest.json?app_id="
  app_ids:
    - "replace-with-app-id-1"
    - "replace-with-app-id-2"
  request_timeout_secs: 10

cache_duration_secs: 7200
refresh_interval_secs: 7200
timezone: "Asia/Shanghai"
"#;

    std::fs::write(&path, default_config)
        .with_context(|| format!("Failed to write config file to {}", path.display()))?;

    tracing::info!("Created default configuration at {}", path.display());
    Ok(())
}
