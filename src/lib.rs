pub mod command;
pub mod core;
pub mod plugin;
pub mod providers;

#[cfg(test)]
mod test_utils;

use crate::core::config::AppConfig;
use crate::plugin::RatePlugin;
use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};

pub enum AppCommand {
    /// Answer a single `rate` invocation and exit.
    Query(Vec<String>),
    /// Keep the plugin running and answer one invocation per stdin line.
    Repl,
}

fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

pub async fn run_command(cmd: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrate starting...");

    let config = load_config(config_path)?;
    let plugin = RatePlugin::from_config(&config)?;

    match cmd {
        AppCommand::Query(args) => {
            let reply = plugin.handle(&args.join(" ")).await;
            println!("{reply}");
        }
        AppCommand::Repl => {
            plugin.start().await;
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            while let Some(line) = lines.next_line().await? {
                let args = line.trim().trim_start_matches(',');
                let args = args
                    .strip_prefix(command::COMMAND)
                    .map_or(args, str::trim_start);
                println!("{}\n", plugin.handle(args).await);
            }
            plugin.shutdown().await;
        }
    }

    Ok(())
}
