//! CLI for the konv batch media converter.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use konv_core::config;
use konv_core::options::{Format, Quality};
use std::path::PathBuf;

use commands::{run_config, run_convert, run_stats, ConvertArgs};

/// Top-level CLI for the konv batch media converter.
#[derive(Debug, Parser)]
#[command(name = "konv")]
#[command(about = "konv: convert video files to audio through a konverter service", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Upload video files one by one and convert them to audio.
    Convert {
        /// Files to convert. Non-video files are skipped.
        #[arg(required = true, value_name = "PATHS")]
        paths: Vec<PathBuf>,
        /// Target audio format (mp3, wav, ogg, aac, flac, m4a, opus). Defaults to the config value.
        #[arg(long, short = 'f')]
        format: Option<Format>,
        /// Quality preset (high, medium, low, podcast). Defaults to the config value.
        #[arg(long, short = 'q')]
        quality: Option<Quality>,
        /// Service root URL for this run, overriding the config.
        #[arg(long, value_name = "URL")]
        service_url: Option<String>,
    },

    /// Show the service's total conversion counter.
    Stats {
        /// Keep polling every 2 seconds until interrupted.
        #[arg(long)]
        watch: bool,
        /// Service root URL, overriding the config.
        #[arg(long, value_name = "URL")]
        service_url: Option<String>,
    },

    /// Print the config file path and the effective configuration.
    Config,
}

impl CliCommand {
    pub async fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        match cli.command {
            CliCommand::Convert {
                paths,
                format,
                quality,
                service_url,
            } => {
                if let Some(url) = service_url {
                    cfg.service_url = url;
                }
                let args = ConvertArgs {
                    paths,
                    format: format.unwrap_or(cfg.default_format),
                    quality: quality.unwrap_or(cfg.default_quality),
                };
                run_convert(&cfg, args).await?;
            }
            CliCommand::Stats { watch, service_url } => {
                if let Some(url) = service_url {
                    cfg.service_url = url;
                }
                run_stats(&cfg, watch).await?;
            }
            CliCommand::Config => run_config(&cfg)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
