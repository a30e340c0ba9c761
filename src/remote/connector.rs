use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use tracing::debug;

use crate::codec::{decode_auxiliary_data, decode_classification_summary};
use crate::config::ClientConfig;
use crate::core::auxiliary::AuxiliaryData;
use crate::core::summary::ClassificationSummary;
use crate::core::types::DatasetDescriptor;
use crate::remote::client::TransportClient;
use crate::remote::command::Command;
use crate::remote::error::ClientError;
use crate::remote::iter::{FindSelection, ReadBlockGetter, ReadBlockIterator, ReadOptions};
use crate::utils::validation::{clamp_page_size, DEFAULT_PAGE_SIZE};

/// A session with one server
#[derive(Debug, Clone)]
pub struct RemoteServer {
    client: TransportClient,
    page_size: usize,
}

impl RemoteServer {
    /// Open a session described by `config`
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Config` for invalid settings or
    /// `ClientError::Transport` if the HTTP client cannot be built.
    pub fn connect(config: &ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            client: TransportClient::new(config)?,
            page_size: config.page_size,
        })
    }

    pub fn from_client(client: TransportClient) -> Self {
        Self {
            client,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }

    pub fn client(&self) -> &TransportClient {
        &self.client
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Change the page size used by connectors opened afterwards, clamped to
    /// `1..=MAX_PAGE_SIZE`
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = clamp_page_size(page_size);
    }

    /// Server banner
    ///
    /// # Errors
    ///
    /// Returns any transport or server error.
    pub fn about(&self) -> Result<String, ClientError> {
        self.client.get_string("about")
    }

    /// Datasets offered by the server
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` if the listing starts with the error sentinel,
    /// or any transport error.
    pub fn list_datasets(&self) -> Result<Vec<DatasetDescriptor>, ClientError> {
        let datasets: Vec<_> = self
            .client
            .get_lines("list")?
            .iter()
            .filter_map(|line| DatasetDescriptor::parse_line(line))
            .collect();
        debug!(count = datasets.len(), "listed datasets");
        Ok(datasets)
    }

    /// Connector for one dataset of this server
    pub fn open(&self, dataset: impl Into<String>) -> RemoteConnector {
        RemoteConnector {
            client: self.client.clone(),
            dataset: dataset.into(),
            page_size: self.page_size,
        }
    }
}

/// Access to one server-hosted dataset
#[derive(Debug, Clone)]
pub struct RemoteConnector {
    client: TransportClient,
    dataset: String,
    page_size: usize,
}

impl RemoteConnector {
    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    fn command(&self, name: &'static str) -> Command {
        Command::new(name).arg("file", &self.dataset)
    }

    /// # Errors
    ///
    /// Returns any transport or server error, or `ClientError::InvalidNumber`.
    pub fn get_number_of_reads(&self) -> Result<i64, ClientError> {
        self.client.get_long(&self.command("getNumberOfReads").build())
    }

    /// # Errors
    ///
    /// Returns any transport or server error, or `ClientError::InvalidNumber`.
    pub fn get_number_of_matches(&self) -> Result<i64, ClientError> {
        self.client.get_long(&self.command("getNumberOfMatches").build())
    }

    /// Number of reads assigned to a class
    ///
    /// # Errors
    ///
    /// Returns any transport or server error, or `ClientError::InvalidNumber`.
    pub fn get_class_size(&self, classification: &str, class_id: i32) -> Result<i32, ClientError> {
        self.client.get_int(
            &self
                .command("getClassSize")
                .arg("classification", classification)
                .arg("classId", class_id)
                .build(),
        )
    }

    /// Names of the classifications present in the dataset
    ///
    /// # Errors
    ///
    /// Returns any transport or server error.
    pub fn get_classification_names(&self) -> Result<Vec<String>, ClientError> {
        let lines = self
            .client
            .get_lines(&self.command("getClassificationNames").build())?;
        Ok(lines
            .into_iter()
            .map(|line| line.trim().to_string())
            .filter(|line| !line.is_empty())
            .collect())
    }

    /// Per-class counts of one classification
    ///
    /// # Errors
    ///
    /// Returns any transport or server error, or `ClientError::Decode` if the
    /// response is not a valid summary buffer.
    pub fn get_classification_block(&self, classification: &str) -> Result<ClassificationSummary, ClientError> {
        let bytes = self.client.get_bytes(
            &self
                .command("getClassificationBlock")
                .arg("classification", classification)
                .build(),
        )?;
        Ok(decode_classification_summary(&bytes)?)
    }

    /// Auxiliary blobs attached to the dataset
    ///
    /// # Errors
    ///
    /// Returns any transport or server error, or `ClientError::Decode` if the
    /// response is not a valid auxiliary data buffer.
    pub fn get_auxiliary_data(&self) -> Result<AuxiliaryData, ClientError> {
        let bytes = self
            .client
            .get_bytes(&self.command("getAuxiliaryData").build())?;
        Ok(decode_auxiliary_data(&bytes)?)
    }

    /// Reads assigned to one class, fetched `page_size` at a time
    ///
    /// `page_size` is clamped to `1..=MAX_PAGE_SIZE`.
    pub fn get_reads_iterator(
        &self,
        classification: &str,
        class_id: i32,
        page_size: usize,
        options: &ReadOptions,
    ) -> ReadBlockIterator {
        let page_size = clamp_page_size(page_size);
        let first = options
            .append_to(
                self.command("getReads")
                    .arg("classification", classification)
                    .arg("classId", class_id)
                    .arg("pageSize", page_size),
            )
            .build();
        ReadBlockIterator::new(self.client.clone(), first, page_size)
    }

    /// Reads with at least one field matching `text`, filtered server-side.
    ///
    /// Setting `cancel` stops further page requests; the iterator then ends
    /// without an error.
    pub fn get_find_all_reads_iterator(
        &self,
        text: &str,
        selection: &FindSelection,
        cancel: Arc<AtomicBool>,
    ) -> ReadBlockIterator {
        let first = selection
            .append_to(
                self.command("findAllReads")
                    .arg("text", text)
                    .arg("pageSize", self.page_size),
            )
            .build();
        ReadBlockIterator::new(self.client.clone(), first, self.page_size).with_cancel_flag(cancel)
    }

    /// Random access to reads of this dataset by unique id
    pub fn get_read_block_getter(&self, options: &ReadOptions) -> ReadBlockGetter {
        ReadBlockGetter::new(self.client.clone(), self.dataset.clone(), *options)
    }
}
