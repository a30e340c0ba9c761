//! Core data types exchanged with a remote MEGAN server.
//!
//! - [`ClassificationSummary`]: per-class counts for one classification scheme
//! - [`AuxiliaryData`]: named binary blobs attached to a dataset
//! - [`ReadBlock`], [`MatchBlock`]: a read and its alignments
//! - [`ReadPage`]: one page of reads from a paginated command
//! - [`DatasetDescriptor`]: an entry of the server's dataset listing
//!
//! [`ClassificationSummary`]: summary::ClassificationSummary
//! [`AuxiliaryData`]: auxiliary::AuxiliaryData
//! [`ReadBlock`]: reads::ReadBlock
//! [`MatchBlock`]: reads::MatchBlock
//! [`ReadPage`]: reads::ReadPage
//! [`DatasetDescriptor`]: types::DatasetDescriptor

pub mod auxiliary;
pub mod reads;
pub mod summary;
pub mod types;
