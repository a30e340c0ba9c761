use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::codec::{decode_read_block, decode_read_page};
use crate::core::reads::ReadBlock;
use crate::remote::client::TransportClient;
use crate::remote::command::Command;
use crate::remote::error::ClientError;
use crate::utils::validation::clamp_page_size;

/// What to ship with each read and which matches to keep
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadOptions {
    pub want_sequences: bool,
    pub want_matches: bool,

    /// Matches below this bit score are dropped server-side
    pub min_score: f32,

    /// Matches above this e-value are dropped server-side
    pub max_expected: f32,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            want_sequences: false,
            want_matches: true,
            min_score: 0.0,
            max_expected: 10_000.0,
        }
    }
}

impl ReadOptions {
    pub(crate) fn append_to(&self, command: Command) -> Command {
        command
            .arg("minScore", self.min_score)
            .arg("maxExpected", self.max_expected)
            .arg("sequences", self.want_sequences)
            .arg("matches", self.want_matches)
    }
}

/// Which parts of a read a text search looks at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FindSelection {
    pub read_name: bool,
    pub read_header: bool,
    pub read_sequence: bool,
    pub match_text: bool,
}

impl Default for FindSelection {
    fn default() -> Self {
        Self {
            read_name: false,
            read_header: false,
            read_sequence: false,
            match_text: true,
        }
    }
}

impl FindSelection {
    pub(crate) fn append_to(&self, command: Command) -> Command {
        command
            .arg("readName", self.read_name)
            .arg("readHeader", self.read_header)
            .arg("readSequence", self.read_sequence)
            .arg("matchText", self.match_text)
    }
}

/// Position of an iterator in the server's page sequence
#[derive(Debug)]
enum Cursor {
    /// Nothing fetched yet; holds the command for the first page
    Start(String),
    /// The server holds an open page with this id
    Open(i64),
    /// No server-side state remains
    Exhausted,
}

/// Lazy, forward-only sequence of read blocks fetched page by page.
///
/// Reads come back in the order the server pages them. A page is requested only
/// when the previous one has been consumed, so the consumer sets the pace.
///
/// The iterator is finite and cannot be restarted. Closing it early, explicitly
/// or by dropping it, tells the server to release its cursor. After an error
/// has been yielded the iterator is closed and returns `None`.
///
/// If a cancellation flag is attached, it is checked before every page fetch and
/// again when a page arrives; once set, the iterator closes without an error and
/// the page in flight is discarded.
#[derive(Debug)]
pub struct ReadBlockIterator {
    client: TransportClient,
    cursor: Cursor,
    page_size: usize,
    buffer: VecDeque<ReadBlock>,
    position: u64,
    maximum: u64,
    cancel: Option<Arc<AtomicBool>>,
    closed: bool,
}

impl ReadBlockIterator {
    pub(crate) fn new(client: TransportClient, first_page: String, page_size: usize) -> Self {
        Self {
            client,
            cursor: Cursor::Start(first_page),
            page_size: clamp_page_size(page_size),
            buffer: VecDeque::new(),
            position: 0,
            maximum: 0,
            cancel: None,
            closed: false,
        }
    }

    /// Attach a shared flag that stops the iteration when set
    #[must_use]
    pub fn with_cancel_flag(mut self, cancel: Arc<AtomicBool>) -> Self {
        self.cancel = Some(cancel);
        self
    }

    /// Reads requested per follow-up page
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Number of reads yielded so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Expected number of reads, as announced by the server; never below `position`
    pub fn maximum(&self) -> u64 {
        self.maximum
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Stop iterating and release server-side resources.
    ///
    /// Idempotent. A failure to release the server cursor is logged, not returned.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.buffer.clear();

        if let Cursor::Open(page_id) = std::mem::replace(&mut self.cursor, Cursor::Exhausted) {
            let command = Command::new("closePage").arg("pageId", page_id).build();
            match self.client.get_string(&command) {
                Ok(_) => debug!(page_id, "released server-side read page"),
                Err(e) => warn!(page_id, error = %e, "failed to release server-side read page"),
            }
        }
    }

    fn is_cancelled(&self) -> bool {
        self.cancel
            .as_ref()
            .is_some_and(|flag| flag.load(Ordering::Relaxed))
    }

    /// Fetch the next page into the buffer, returning the number of reads received
    fn fetch_page(&mut self) -> Result<usize, ClientError> {
        let command = match &self.cursor {
            Cursor::Start(command) => command.clone(),
            Cursor::Open(page_id) => Command::new("getNext")
                .arg("pageId", page_id)
                .arg("pageSize", self.page_size)
                .build(),
            Cursor::Exhausted => return Ok(0),
        };

        let bytes = self.client.get_bytes(&command)?;
        let page = decode_read_page(&bytes)?;

        self.cursor = if page.has_more() {
            Cursor::Open(page.next_page_id)
        } else {
            Cursor::Exhausted
        };

        if self.is_cancelled() {
            debug!("cancelled while fetching, discarding page");
            return Ok(0);
        }

        let received = page.blocks.len();
        let total = u64::try_from(page.total).unwrap_or(0);
        self.maximum = self.maximum.max(total).max(self.position + received as u64);
        self.buffer.extend(page.blocks);

        debug!(
            received,
            position = self.position,
            maximum = self.maximum,
            more = page.next_page_id > 0,
            "fetched read page"
        );
        Ok(received)
    }
}

impl Iterator for ReadBlockIterator {
    type Item = Result<ReadBlock, ClientError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(block) = self.buffer.pop_front() {
                self.position += 1;
                return Some(Ok(block));
            }

            if self.closed || matches!(self.cursor, Cursor::Exhausted) {
                self.close();
                return None;
            }

            if self.is_cancelled() {
                debug!(position = self.position, "read iteration cancelled");
                self.close();
                return None;
            }

            match self.fetch_page() {
                // An empty page ends the iteration even if the server claims more
                Ok(0) => {
                    self.close();
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.close();
                    return Some(Err(e));
                }
            }
        }
    }
}

impl FusedIterator for ReadBlockIterator {}

impl Drop for ReadBlockIterator {
    fn drop(&mut self) {
        self.close();
    }
}

/// Random access to individual reads by unique id
#[derive(Debug, Clone)]
pub struct ReadBlockGetter {
    client: TransportClient,
    dataset: String,
    options: ReadOptions,
}

impl ReadBlockGetter {
    pub(crate) fn new(client: TransportClient, dataset: String, options: ReadOptions) -> Self {
        Self {
            client,
            dataset,
            options,
        }
    }

    /// Fetch the read with the given unique id
    ///
    /// # Errors
    ///
    /// Returns `ClientError::Server` if the server does not know the read, or any
    /// transport or decode error.
    pub fn get_read_block(&self, uid: i64) -> Result<ReadBlock, ClientError> {
        let command = self
            .options
            .append_to(
                Command::new("getRead")
                    .arg("file", &self.dataset)
                    .arg("readId", uid),
            )
            .build();
        let bytes = self.client.get_bytes(&command)?;
        Ok(decode_read_block(&bytes)?)
    }

    /// Number of reads in the dataset
    ///
    /// # Errors
    ///
    /// Returns any transport error or `ClientError::InvalidNumber`.
    pub fn count(&self) -> Result<i64, ClientError> {
        self.client.get_long(
            &Command::new("getNumberOfReads")
                .arg("file", &self.dataset)
                .build(),
        )
    }
}
