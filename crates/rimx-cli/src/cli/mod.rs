//! CLI for rimx: run the remote image operations against the local store.

mod commands;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rimx_core::config::{self, RimxConfig};
use rimx_core::http::CurlClient;
use rimx_core::registry::Registry;
use rimx_core::store::DirStore;
use rimx_core::InvocationContext;

use commands::{run_describe, run_fetch, run_import, run_list, run_ops, run_post};

/// Top-level CLI for rimx.
#[derive(Debug, Parser)]
#[command(name = "rimx")]
#[command(about = "rimx: fetch remote images into a local store and post stored images to endpoints", long_about = None)]
pub struct Cli {
    /// Graph execution session that owns images created by this run.
    #[arg(long, global = true, default_value = "cli", value_name = "ID")]
    pub session_id: String,

    #[command(subcommand)]
    pub command: CliCommand,
}

#[derive(Debug, Subcommand)]
pub enum CliCommand {
    /// Fetch an image from a URL, decode it and register it in the store.
    Fetch {
        /// HTTP/HTTPS URL of the image.
        url: String,
        /// Node identifier recorded with the stored image.
        #[arg(long, default_value = "cli", value_name = "ID")]
        node_id: String,
        /// Mark the stored image as intermediate.
        #[arg(long)]
        intermediate: bool,
    },

    /// Post a stored image to an endpoint as multipart/form-data.
    Post {
        /// Image name as printed by `fetch` or `list`.
        image: String,
        /// Endpoint URL. Defaults to `default_endpoint` from config.
        endpoint: Option<String>,
    },

    /// Show the dimensions of a stored image.
    Describe {
        /// Image name.
        image: String,
    },

    /// List stored images.
    List,

    /// Print the registered operations as JSON.
    Ops,

    /// Decode a local image file and register it in the store.
    Import {
        /// Path to the image file.
        path: String,
    },
}

/// Collaborators shared by the commands.
pub struct Host {
    pub cfg: RimxConfig,
    pub store: DirStore,
    pub http: CurlClient,
    pub registry: Registry,
}

impl Host {
    pub fn from_config(cfg: RimxConfig) -> Result<Self> {
        let dir = cfg.resolved_store_dir()?;
        let store = DirStore::open(&dir)
            .with_context(|| format!("open image store at {}", dir.display()))?;
        let http = cfg.http_client();
        Ok(Self {
            cfg,
            store,
            http,
            registry: Registry::builtin(),
        })
    }

    pub fn context(&self, session_id: &str) -> InvocationContext<'_> {
        InvocationContext::new(session_id, &self.store, &self.http)
            .with_content_type(self.cfg.content_type.clone())
    }
}

impl CliCommand {
    pub fn run_from_args() -> Result<()> {
        let cli = Cli::parse();
        let cfg = config::load_or_init()?;
        tracing::debug!("loaded config: {:?}", cfg);

        let host = Host::from_config(cfg)?;
        let ctx = host.context(&cli.session_id);

        match cli.command {
            CliCommand::Fetch {
                url,
                node_id,
                intermediate,
            } => run_fetch(&host.registry, &ctx, &url, &node_id, intermediate)?,
            CliCommand::Post { image, endpoint } => {
                let endpoint = endpoint
                    .or_else(|| host.cfg.default_endpoint.clone())
                    .context("no endpoint given and no default_endpoint in config")?;
                run_post(&host.registry, &ctx, &image, &endpoint)?;
            }
            CliCommand::Describe { image } => run_describe(&host.store, &image)?,
            CliCommand::List => run_list(&host.store)?,
            CliCommand::Import { path } => run_import(&ctx, std::path::Path::new(&path))?,
            CliCommand::Ops => run_ops(&host.registry)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests;
