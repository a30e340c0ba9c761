//! Simulated MEGAN server for integration tests.
//!
//! Serves one dataset of synthetic reads over the same commands and wire format a
//! real server uses, on an ephemeral local port. Every request is recorded so tests
//! can check which pages were fetched and released.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, RawQuery, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Redirect, Response};
use axum::routing::get;
use axum::Router;
use base64::Engine;

use megan_remote::codec::{
    encode_auxiliary_data, encode_classification_summary, encode_read_block, encode_read_page,
};
use megan_remote::core::reads::{MatchBlock, ReadBlock, ReadPage};
use megan_remote::{AuxiliaryData, ClassificationSummary, ClientConfig};

pub const USER: &str = "alice";
pub const PASSWORD_HASH: &str = "$argon2id$v=19$m=64,t=1,p=1$dGVzdHNhbHQ$c2ltdWxhdGVk";
pub const DATASET: &str = "Alice/gut.rma6";

/// Class id of reads with an even index
pub const ECOLI: i32 = 562;
/// Class id of reads with an odd index
pub const BACILLUS: i32 = 1386;

enum Reply {
    Text(String),
    Bytes(Vec<u8>),
}

struct OpenPage {
    remaining: VecDeque<ReadBlock>,
    total: i64,
}

struct ServerState {
    reads: Vec<ReadBlock>,
    pages: HashMap<i64, OpenPage>,
    next_page_id: i64,
    requests: Vec<String>,
    expected_auth: String,
    fail_next_page: Option<String>,
}

type Shared = Arc<Mutex<ServerState>>;

pub struct MockServer {
    pub base_url: String,
    pub address: String,
    state: Shared,
}

/// Synthetic reads: even indices hit E. coli, odd ones Bacillus, every third
/// read has "Escherichia" in its alignment text.
pub fn sample_reads(count: usize) -> Vec<ReadBlock> {
    (0..count)
        .map(|i| {
            let uid = 1000 + i as i64;
            let class_id = if i % 2 == 0 { ECOLI } else { BACILLUS };
            let text = if i % 3 == 0 {
                format!("Escherichia coli str. K-12 hit {i}")
            } else {
                format!("Bacillus subtilis hit {i}")
            };
            let mut class_ids = vec![("Taxonomy".to_string(), class_id)];
            if i % 5 == 0 {
                class_ids.push(("SEED".to_string(), 3));
            }

            ReadBlock {
                uid,
                name: format!("read_{i:04}"),
                header: format!(">read_{i:04} run=7"),
                sequence: "ACGT".repeat(i % 4 + 1),
                length: 4 * (i as i32 % 4 + 1),
                matches: vec![MatchBlock {
                    uid: uid * 10,
                    ref_name: format!("WP_{i:09}.1"),
                    bit_score: 40.0 + i as f32,
                    percent_identity: 90.0,
                    expected: 1e-10,
                    aligned_query_start: 1,
                    aligned_query_end: 4,
                    text,
                    class_ids,
                }],
            }
        })
        .collect()
}

pub fn sample_aux() -> AuxiliaryData {
    [
        ("SampleAttributes", b"#SampleID\tDepth\ngut\t12\n".to_vec()),
        ("UserState", vec![0, 1, 2, 255]),
        ("Empty", Vec::new()),
    ]
    .into_iter()
    .collect()
}

impl MockServer {
    pub fn start(read_count: usize) -> Self {
        Self::start_with_auth(read_count, USER, PASSWORD_HASH)
    }

    pub fn start_with_auth(read_count: usize, user: &str, password_hash: &str) -> Self {
        let token = base64::engine::general_purpose::STANDARD.encode(format!("{user}:{password_hash}"));
        let state = Arc::new(Mutex::new(ServerState {
            reads: sample_reads(read_count),
            pages: HashMap::new(),
            next_page_id: 1,
            requests: Vec::new(),
            expected_auth: format!("Basic {token}"),
            fail_next_page: None,
        }));

        let app = Router::new()
            .route("/megan/{command}", get(dispatch))
            .route("/moved/{command}", get(moved))
            .with_state(state.clone());

        let (tx, rx) = std::sync::mpsc::channel();
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("failed to build runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
                    .await
                    .expect("failed to bind");
                tx.send(listener.local_addr().expect("no local address"))
                    .expect("test thread went away");
                axum::serve(listener, app).await.expect("server failed");
            });
        });

        let addr = rx.recv().expect("server did not start");
        Self {
            base_url: format!("http://{addr}/megan"),
            address: addr.to_string(),
            state,
        }
    }

    /// Client settings with the credentials this server accepts
    pub fn config(&self) -> ClientConfig {
        let mut config = ClientConfig::new(&self.base_url).with_credentials(USER, PASSWORD_HASH);
        config.timeout_secs = 5;
        config
    }

    /// Number of requests received for a command
    pub fn requests(&self, command: &str) -> usize {
        let state = self.state.lock().unwrap();
        state.requests.iter().filter(|c| *c == command).count()
    }

    /// Number of server-side page cursors still open
    pub fn open_pages(&self) -> usize {
        self.state.lock().unwrap().pages.len()
    }

    /// Answer the next `getNext` with an error line, leaving the page open
    pub fn fail_next_page(&self, message: &str) {
        self.state.lock().unwrap().fail_next_page = Some(message.to_string());
    }

    pub fn reads(&self) -> Vec<ReadBlock> {
        self.state.lock().unwrap().reads.clone()
    }
}

async fn moved(Path(command): Path<String>, RawQuery(query): RawQuery) -> Redirect {
    match query {
        Some(query) => Redirect::temporary(&format!("/megan/{command}?{query}")),
        None => Redirect::temporary(&format!("/megan/{command}")),
    }
}

async fn dispatch(
    State(state): State<Shared>,
    Path(command): Path<String>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.requests.push(command.clone());

    let auth = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if auth != Some(state.expected_auth.as_str()) {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    match state.handle(&command, &params) {
        Ok(Some(Reply::Text(text))) => text.into_response(),
        Ok(Some(Reply::Bytes(bytes))) => (
            [(header::CONTENT_TYPE, "application/octet-stream")],
            bytes,
        )
            .into_response(),
        Ok(None) => StatusCode::NOT_FOUND.into_response(),
        Err(message) => format!("401 Error: {message}\n").into_response(),
    }
}

fn flag(params: &HashMap<String, String>, key: &str) -> bool {
    params.get(key).is_some_and(|v| v == "true")
}

fn number<T: std::str::FromStr>(params: &HashMap<String, String>, key: &str) -> Result<T, String> {
    params
        .get(key)
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| format!("missing or bad parameter {key}"))
}

/// Apply the requested read options to a stored read
fn shape(read: &ReadBlock, params: &HashMap<String, String>) -> ReadBlock {
    let mut read = read.clone();
    if !flag(params, "sequences") {
        read.header.clear();
        read.sequence.clear();
    }
    if flag(params, "matches") {
        let min_score: f32 = params
            .get("minScore")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);
        read.matches.retain(|m| m.bit_score >= min_score);
    } else {
        read.matches.clear();
    }
    read
}

impl ServerState {
    fn handle(&mut self, command: &str, params: &HashMap<String, String>) -> Result<Option<Reply>, String> {
        let reply = match command {
            "about" => Reply::Text("MeganServer (simulated)\n".to_string()),
            "list" => Reply::Text(format!("{DATASET}\tGut sample\tfalse\n\nSoil.rma6\n")),
            "fail" => Reply::Text("401 Error: bad credentials\n".to_string()),
            "notAnError" => Reply::Text("OK 401 Error: mentioned later\n".to_string()),
            "getNext" => self.next_page(params)?,
            "closePage" => {
                let page_id: i64 = number(params, "pageId")?;
                self.pages
                    .remove(&page_id)
                    .ok_or_else(|| format!("unknown page {page_id}"))?;
                Reply::Text("OK\n".to_string())
            }
            _ => {
                if params.get("file").map(String::as_str) != Some(DATASET) {
                    return Err("unknown dataset".to_string());
                }
                match self.handle_dataset(command, params)? {
                    Some(reply) => reply,
                    None => return Ok(None),
                }
            }
        };
        Ok(Some(reply))
    }

    fn handle_dataset(&mut self, command: &str, params: &HashMap<String, String>) -> Result<Option<Reply>, String> {
        let reply = match command {
            "getNumberOfReads" => Reply::Text(format!("{}\n", self.reads.len())),
            "getNumberOfMatches" => {
                let matches: usize = self.reads.iter().map(ReadBlock::num_matches).sum();
                Reply::Text(format!("{matches} matches\n"))
            }
            "getClassificationNames" => Reply::Text("Taxonomy\nSEED\n".to_string()),
            "getClassSize" => {
                let classification = params.get("classification").cloned().unwrap_or_default();
                let class_id: i32 = number(params, "classId")?;
                let size = self
                    .reads
                    .iter()
                    .filter(|r| r.is_assigned_to(&classification, class_id))
                    .count();
                Reply::Text(format!("{size}\n"))
            }
            "getClassificationBlock" => {
                let classification = params.get("classification").cloned().unwrap_or_default();
                match classification.as_str() {
                    "Taxonomy" | "SEED" => {
                        Reply::Bytes(encode_classification_summary(&self.summary(&classification)).unwrap())
                    }
                    "Truncated" => Reply::Bytes(b"Truncated\0\x05\0\0\0\x01\0".to_vec()),
                    other => return Err(format!("unknown classification {other}")),
                }
            }
            "getAuxiliaryData" => Reply::Bytes(encode_auxiliary_data(&sample_aux()).unwrap()),
            "getReads" => {
                let classification = params.get("classification").cloned().unwrap_or_default();
                if classification != "Taxonomy" && classification != "SEED" {
                    return Err(format!("unknown classification {classification}"));
                }
                let class_id: i32 = number(params, "classId")?;
                let selected = self
                    .reads
                    .iter()
                    .filter(|r| r.is_assigned_to(&classification, class_id))
                    .map(|r| shape(r, params))
                    .collect();
                self.open_page(selected, number(params, "pageSize")?)
            }
            "findAllReads" => {
                let text = params.get("text").cloned().unwrap_or_default();
                let selected = self
                    .reads
                    .iter()
                    .filter(|r| {
                        (flag(params, "readName") && r.name.contains(&text))
                            || (flag(params, "readHeader") && r.header.contains(&text))
                            || (flag(params, "readSequence") && r.sequence.contains(&text))
                            || (flag(params, "matchText") && r.matches.iter().any(|m| m.text.contains(&text)))
                    })
                    .cloned()
                    .collect();
                self.open_page(selected, number(params, "pageSize")?)
            }
            "getRead" => {
                let uid: i64 = number(params, "readId")?;
                let read = self
                    .reads
                    .iter()
                    .find(|r| r.uid == uid)
                    .ok_or_else(|| format!("no read with id {uid}"))?;
                Reply::Bytes(encode_read_block(&shape(read, params)).unwrap())
            }
            _ => return Ok(None),
        };
        Ok(Some(reply))
    }

    /// Counts per class in order of first appearance
    fn summary(&self, classification: &str) -> ClassificationSummary {
        let mut order = Vec::new();
        let mut counts: HashMap<i32, i32> = HashMap::new();
        for read in &self.reads {
            if let Some(class_id) = read.matches.first().and_then(|m| m.class_id(classification)) {
                if !counts.contains_key(&class_id) {
                    order.push(class_id);
                }
                *counts.entry(class_id).or_default() += 1;
            }
        }
        order.into_iter().fold(ClassificationSummary::new(classification), |s, id| {
            s.with_class(id, 2 * counts[&id], counts[&id])
        })
    }

    fn open_page(&mut self, mut selected: VecDeque<ReadBlock>, page_size: usize) -> Reply {
        let total = selected.len() as i64;
        let first: Vec<_> = selected.drain(..page_size.min(selected.len())).collect();
        let next_page_id = if selected.is_empty() {
            0
        } else {
            let id = self.next_page_id;
            self.next_page_id += 1;
            self.pages.insert(
                id,
                OpenPage {
                    remaining: selected,
                    total,
                },
            );
            id
        };
        Reply::Bytes(
            encode_read_page(&ReadPage {
                next_page_id,
                total,
                blocks: first,
            })
            .unwrap(),
        )
    }

    fn next_page(&mut self, params: &HashMap<String, String>) -> Result<Reply, String> {
        if let Some(message) = self.fail_next_page.take() {
            return Err(message);
        }
        let page_id: i64 = number(params, "pageId")?;
        let page_size: usize = number(params, "pageSize")?;
        let page = self
            .pages
            .get_mut(&page_id)
            .ok_or_else(|| format!("unknown page {page_id}"))?;

        let blocks: Vec<_> = page
            .remaining
            .drain(..page_size.min(page.remaining.len()))
            .collect();
        let total = page.total;
        let next_page_id = if page.remaining.is_empty() {
            self.pages.remove(&page_id);
            0
        } else {
            page_id
        };

        Ok(Reply::Bytes(
            encode_read_page(&ReadPage {
                next_page_id,
                total,
                blocks,
            })
            .unwrap(),
        ))
    }
}
