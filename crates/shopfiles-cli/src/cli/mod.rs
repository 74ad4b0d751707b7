//! CLI for the shopfiles tools.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use shopfiles_core::config::{self, ShopConfig};
use shopfiles_core::export::ExportFormat;
use std::path::PathBuf;

use commands::{run_download, run_export, run_list};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "shopfiles")]
#[command(about = "Download or export every file stored in a Shopify store", long_about = None)]
pub struct Cli {
    /// Store host, e.g. my-store.myshopify.com (overrides SHOP and the config file).
    #[arg(long, global = true, value_name = "HOST")]
    pub shop: Option<String>,

    /// Admin API access token (overrides ACCESS_TOKEN and the config file).
    #[arg(long, global = true, value_name = "TOKEN")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Download every store file into a directory; files already present are skipped.
    Download {
        /// Target directory (default: DOWNLOAD_FOLDER or download_dir from config).
        #[arg(long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },

    /// Write a filename,url table of every store file.
    Export {
        /// Output file (default: OUTPUT_FILE or output_file from config).
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,

        /// csv or json (default: from the output file extension).
        #[arg(long, value_name = "FORMAT")]
        format: Option<ExportFormat>,
    },

    /// Print every store file as JSON on stdout.
    List,
}

impl Cli {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let mut cfg = config::load()?;
        cli.apply_overrides(&mut cfg);
        tracing::debug!(shop = %cfg.shop_host(), api_url = %cfg.api_url(), "resolved config");

        match cli.command {
            CliCommand::Download { dir } => {
                if let Some(dir) = dir {
                    cfg.download_dir = dir;
                }
                run_download(&cfg)?;
            }
            CliCommand::Export { output, format } => {
                let output = output.unwrap_or_else(|| cfg.output_file.clone());
                let format = format.unwrap_or_else(|| ExportFormat::from_path(&output));
                run_export(&cfg, &output, format)?;
            }
            CliCommand::List => run_list(&cfg)?,
        }

        Ok(())
    }

    /// Flags win over config file and environment.
    pub fn apply_overrides(&self, cfg: &mut ShopConfig) {
        if let Some(shop) = &self.shop {
            cfg.shop = shop.clone();
        }
        if let Some(token) = &self.token {
            cfg.access_token = Some(token.clone());
        }
    }
}

#[cfg(test)]
mod tests;
