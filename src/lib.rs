//! # megan-remote
//!
//! A client for MEGAN alignment datasets hosted on a remote server.
//!
//! Large metagenomic datasets (reads, their alignments, and the taxonomic and
//! functional classifications computed from them) are often kept on a shared
//! server rather than copied to every workstation. `megan-remote` talks to such a
//! server over HTTP and exposes the datasets as ordinary Rust values and iterators.
//!
//! ## Features
//!
//! - **Dataset listing**: enumerate the datasets a server offers
//! - **Classification summaries**: per-class counts for any classification
//! - **Read streaming**: page-by-page iteration over the reads of a class
//! - **Server-side search**: find reads whose names, sequences or alignments match a text
//! - **Auxiliary data**: fetch the small named blobs attached to a dataset
//! - **Compact wire format**: little-endian, zero-terminated, length-prefixed buffers
//! - **Hashed credentials**: raw passwords never leave the client
//!
//! ## Example
//!
//! ```rust,no_run
//! use megan_remote::auth::{CredentialHasher, HasherConfig};
//! use megan_remote::config::ClientConfig;
//! use megan_remote::remote::RemoteServer;
//!
//! let hasher = CredentialHasher::new(&HasherConfig::default()).unwrap();
//! let config = ClientConfig::new("http://localhost:8001/megan6server")
//!     .with_credentials("guest", hasher.hash(b"guest").unwrap());
//!
//! let server = RemoteServer::connect(&config).unwrap();
//! let connector = server.open("Alice/gut.rma6");
//!
//! let taxonomy = connector.get_classification_block("Taxonomy").unwrap();
//! for (class_id, counts) in taxonomy.iter() {
//!     println!("{class_id}\t{}", counts.sum);
//! }
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Data types for summaries, auxiliary data, reads and datasets
//! - [`codec`]: Binary encoding and decoding of server payloads
//! - [`auth`]: Credential hashing
//! - [`remote`]: Transport client, dataset connector and read iterators
//! - [`config`]: Session configuration
//! - [`cli`]: Command-line interface implementation

pub mod auth;
pub mod cli;
pub mod codec;
pub mod config;
pub mod core;
pub mod remote;
pub mod utils;

// Re-export commonly used types for convenience
pub use auth::CredentialHasher;
pub use config::ClientConfig;
pub use core::auxiliary::AuxiliaryData;
pub use core::reads::{MatchBlock, ReadBlock};
pub use core::summary::{ClassCounts, ClassificationSummary};
pub use core::types::DatasetDescriptor;
pub use remote::{ClientError, RemoteConnector, RemoteServer};
