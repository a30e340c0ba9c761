//! Client side of the remote dataset protocol.
//!
//! - [`TransportClient`]: authenticated HTTP requests returning lines, text or bytes,
//!   with detection of the `401 Error:` sentinel in response bodies
//! - [`RemoteServer`]: session with one server; lists datasets
//! - [`RemoteConnector`]: per-dataset queries, classification and auxiliary data,
//!   paginated read iteration and server-side search
//! - [`ReadBlockIterator`], [`ReadBlockGetter`]: sequential and random access to reads
//!
//! All calls block. There are no background threads and no retries.
//!
//! ## Example
//!
//! ```rust,no_run
//! use megan_remote::config::ClientConfig;
//! use megan_remote::remote::{ReadOptions, RemoteServer};
//!
//! let config = ClientConfig::new("http://localhost:8001/megan6server")
//!     .with_credentials("guest", "$argon2id$v=19$m=19456,t=2,p=1$...");
//! let server = RemoteServer::connect(&config).unwrap();
//!
//! for dataset in server.list_datasets().unwrap() {
//!     let connector = server.open(&dataset.id);
//!     let taxonomy = connector.get_classification_block("Taxonomy").unwrap();
//!     println!("{dataset}: {} classes", taxonomy.len());
//!
//!     for read in connector.get_reads_iterator("Taxonomy", 562, 100, &ReadOptions::default()) {
//!         println!("{}", read.unwrap().name);
//!     }
//! }
//! ```

pub mod client;
pub mod command;
pub mod connector;
pub mod error;
pub mod iter;

pub use client::{TransportClient, ERROR_SENTINEL};
pub use connector::{RemoteConnector, RemoteServer};
pub use error::ClientError;
pub use iter::{FindSelection, ReadBlockGetter, ReadBlockIterator, ReadOptions};
