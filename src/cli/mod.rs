//! Command-line interface for megan-remote.
//!
//! This module implements the CLI using clap. Available commands:
//!
//! - **list**: List the datasets offered by a server
//! - **info**: Show read/match counts and classifications of a dataset
//! - **classification**: Print the per-class counts of a classification
//! - **aux**: List the auxiliary data blobs of a dataset
//! - **reads**: Stream the reads assigned to a class
//! - **find**: Search reads on the server
//! - **hash**: Hash or verify a password
//!
//! ## Usage
//!
//! ```text
//! # List datasets
//! megan-remote --server http://localhost:8001/megan6server --user guest --password guest list
//!
//! # Same, with settings from a JSON config file
//! megan-remote --config ~/.megan-remote.json list
//!
//! # Taxonomy counts as JSON
//! megan-remote --config cfg.json --format json classification Alice/gut.rma6 Taxonomy
//!
//! # Reads assigned to E. coli
//! megan-remote --config cfg.json reads Alice/gut.rma6 --class-id 562
//!
//! # Hash a password for a config file
//! megan-remote hash 'my password'
//! ```

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::auth::{CredentialHasher, HasherConfig};
use crate::config::{ClientConfig, ProxySettings};
use crate::utils::validation::parse_proxy;

pub mod datasets;
pub mod hash;
pub mod reads;

#[derive(Parser)]
#[command(name = "megan-remote")]
#[command(author = "Fulcrum Genomics")]
#[command(version)]
#[command(about = "Browse MEGAN alignment datasets hosted on a remote server")]
#[command(
    long_about = "megan-remote connects to a MEGAN server over HTTP and gives command-line access to its datasets.\n\nIt can:\n- List datasets and their read/match counts\n- Print classification summaries (Taxonomy, SEED, ...)\n- Stream the reads assigned to a class, or search reads on the server\n- Show auxiliary data attached to a dataset"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub session: SessionArgs,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the datasets offered by the server
    List,

    /// Show read and match counts of a dataset
    Info(datasets::InfoArgs),

    /// Print the per-class counts of a classification
    Classification(datasets::ClassificationArgs),

    /// List the auxiliary data blobs of a dataset
    Aux(datasets::AuxArgs),

    /// Stream the reads assigned to a class
    Reads(reads::ReadsArgs),

    /// Find reads matching a text
    Find(reads::FindArgs),

    /// Hash a password, or verify one against a hash
    Hash(hash::HashArgs),
}

/// Connection settings shared by all commands
#[derive(clap::Args, Debug, Default)]
pub struct SessionArgs {
    /// JSON config file; other flags override its values
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Server base URL, e.g. http://localhost:8001/megan6server
    #[arg(short, long, global = true)]
    pub server: Option<String>,

    /// User name
    #[arg(short, long, global = true)]
    pub user: Option<String>,

    /// Password (hashed before it is sent)
    #[arg(long, global = true, conflicts_with = "password_hash")]
    pub password: Option<String>,

    /// Pre-computed credential hash, as printed by `hash`
    #[arg(long, global = true)]
    pub password_hash: Option<String>,

    /// Connect and request timeout in seconds
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// HTTP proxy as HOST:PORT
    #[arg(long, global = true, value_parser = parse_proxy)]
    pub proxy: Option<ProxySettings>,

    /// Reads fetched per request when streaming
    #[arg(long, global = true)]
    pub page_size: Option<usize>,
}

impl SessionArgs {
    fn base_config(&self) -> anyhow::Result<ClientConfig> {
        match &self.config {
            Some(path) => ClientConfig::load_from_file(path)
                .with_context(|| format!("Failed to load config {}", path.display())),
            None => Ok(ClientConfig::default()),
        }
    }

    /// Hash settings from the config file, or the defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded.
    pub fn hasher_config(&self) -> anyhow::Result<HasherConfig> {
        Ok(self.base_config()?.hasher)
    }

    /// Merge the config file and flags into validated session settings
    ///
    /// # Errors
    ///
    /// Returns an error if the config file cannot be loaded, the password cannot
    /// be hashed, or the merged settings are invalid.
    pub fn to_config(&self) -> anyhow::Result<ClientConfig> {
        let mut config = self.base_config()?;

        if let Some(server) = &self.server {
            config.server_url.clone_from(server);
        }
        if let Some(user) = &self.user {
            config.user.clone_from(user);
        }
        if let Some(password) = &self.password {
            let hasher = CredentialHasher::new(&config.hasher)?;
            config.password_hash = hasher.hash(password.as_bytes())?;
        } else if let Some(hash) = &self.password_hash {
            config.password_hash.clone_from(hash);
        }
        if let Some(timeout) = self.timeout {
            config.timeout_secs = timeout;
        }
        if let Some(proxy) = &self.proxy {
            config.proxy = Some(proxy.clone());
        }
        if let Some(page_size) = self.page_size {
            config.page_size = page_size;
        }

        if config.server_url.is_empty() {
            anyhow::bail!("No server given; use --server or a config file with server_url");
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}
