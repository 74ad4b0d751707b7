//! Minimal HTTP/1.1 server standing in for a store in integration tests.
//!
//! Answers `POST /admin/api/graphql.json` with a scripted page chosen by the
//! request's `variables.cursor`, and `GET /files/<name>` with static bodies.
//! Bodies can be trickled or stalled to exercise timeouts.
//! Every request is recorded so tests can assert on cursors, auth headers and
//! how often a file was fetched.

#![allow(dead_code)]

use serde_json::{json, Value};
use std::collections::{HashMap, HashSet};
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

/// One GraphQL request as the server saw it.
#[derive(Debug, Clone)]
pub struct RecordedQuery {
    pub cursor: Option<String>,
    pub token: Option<String>,
    pub body: Value,
}

/// How a file body is written after the response head.
#[derive(Debug, Clone, Copy)]
pub enum Pace {
    /// All at once.
    Immediate,
    /// One byte, then a pause, until done.
    Trickle(Duration),
    /// The first `n` bytes, then silence.
    StallAfter(usize),
}

/// How long a stalled response stays silent before the connection is dropped.
const STALL: Duration = Duration::from_secs(10);

#[derive(Default)]
struct State {
    pages: HashMap<Option<String>, (u16, String)>,
    silent_pages: HashSet<Option<String>>,
    files: HashMap<String, (Vec<u8>, Pace)>,
    queries: Vec<RecordedQuery>,
    file_hits: HashMap<String, usize>,
}

pub struct ShopServer {
    base_url: String,
    state: Arc<Mutex<State>>,
}

impl ShopServer {
    /// Start on an ephemeral port. The server runs until the process exits.
    pub fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let port = listener.local_addr().unwrap().port();
        let state = Arc::new(Mutex::new(State::default()));
        let shared = Arc::clone(&state);
        thread::spawn(move || {
            for stream in listener.incoming().flatten() {
                let state = Arc::clone(&shared);
                thread::spawn(move || handle(stream, &state));
            }
        });
        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            state,
        }
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/admin/api/graphql.json", self.base_url)
    }

    pub fn file_url(&self, name: &str) -> String {
        format!("{}/files/{}", self.base_url, name)
    }

    /// Serve `body` with status 200 for requests carrying `cursor`.
    pub fn page(&self, cursor: Option<&str>, body: Value) {
        self.raw_page(cursor, 200, body.to_string());
    }

    pub fn raw_page(&self, cursor: Option<&str>, status: u16, body: String) {
        self.state
            .lock()
            .unwrap()
            .pages
            .insert(cursor.map(str::to_string), (status, body));
    }

    /// Accept the query for `cursor` but never answer it.
    pub fn silent_page(&self, cursor: Option<&str>) {
        self.state
            .lock()
            .unwrap()
            .silent_pages
            .insert(cursor.map(str::to_string));
    }

    pub fn file(&self, name: &str, body: &[u8]) {
        self.paced_file(name, body, Pace::Immediate);
    }

    pub fn paced_file(&self, name: &str, body: &[u8], pace: Pace) {
        self.state
            .lock()
            .unwrap()
            .files
            .insert(name.to_string(), (body.to_vec(), pace));
    }

    pub fn queries(&self) -> Vec<RecordedQuery> {
        self.state.lock().unwrap().queries.clone()
    }

    pub fn file_hits(&self, name: &str) -> usize {
        self.state
            .lock()
            .unwrap()
            .file_hits
            .get(name)
            .copied()
            .unwrap_or(0)
    }
}

/// A files page. Each item is `("image", url)`, `("file", url)` or `("other", "")`.
pub fn files_page(items: &[(&str, &str)], next: Option<&str>) -> Value {
    let edges: Vec<Value> = items
        .iter()
        .map(|(kind, url)| match *kind {
            "image" => json!({ "node": { "image": { "url": url } } }),
            "file" => json!({ "node": { "url": url } }),
            _ => json!({ "node": {} }),
        })
        .collect();
    json!({
        "data": {
            "files": {
                "edges": edges,
                "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next }
            }
        }
    })
}

struct Request {
    method: String,
    path: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Request {
    fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

fn handle(mut stream: TcpStream, state: &Mutex<State>) {
    let _ = stream.set_read_timeout(Some(Duration::from_secs(2)));
    let _ = stream.set_write_timeout(Some(Duration::from_secs(2)));
    let request = match read_request(&mut stream) {
        Some(r) => r,
        None => return,
    };

    let (status, content_type, body, pace) = if request.method.eq_ignore_ascii_case("POST")
        && request.path.ends_with("graphql.json")
    {
        let parsed: Value = serde_json::from_slice(&request.body).unwrap_or(Value::Null);
        let cursor = parsed["variables"]["cursor"].as_str().map(str::to_string);
        let mut st = state.lock().unwrap();
        st.queries.push(RecordedQuery {
            cursor: cursor.clone(),
            token: request.header("X-Shopify-Access-Token").map(str::to_string),
            body: parsed,
        });
        if st.silent_pages.contains(&cursor) {
            drop(st);
            thread::sleep(STALL);
            return;
        }
        match st.pages.get(&cursor) {
            Some((status, body)) => (
                *status,
                "application/json",
                body.clone().into_bytes(),
                Pace::Immediate,
            ),
            None => (404, "text/plain", b"no such page".to_vec(), Pace::Immediate),
        }
    } else if request.method.eq_ignore_ascii_case("GET") {
        let name = request.path.trim_start_matches("/files/").to_string();
        let mut st = state.lock().unwrap();
        *st.file_hits.entry(name.clone()).or_insert(0) += 1;
        match st.files.get(&name) {
            Some((body, pace)) => (200, "application/octet-stream", body.clone(), *pace),
            None => (404, "text/plain", b"not found".to_vec(), Pace::Immediate),
        }
    } else {
        (405, "text/plain", Vec::new(), Pace::Immediate)
    };

    let head = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
        status,
        reason(status),
        content_type,
        body.len()
    );
    let _ = stream.write_all(head.as_bytes());
    write_body(&mut stream, &body, pace);
}

fn write_body(stream: &mut TcpStream, body: &[u8], pace: Pace) {
    match pace {
        Pace::Immediate => {
            let _ = stream.write_all(body);
        }
        Pace::Trickle(gap) => {
            let _ = stream.set_write_timeout(None);
            for byte in body {
                if stream.write_all(std::slice::from_ref(byte)).is_err() {
                    return;
                }
                let _ = stream.flush();
                thread::sleep(gap);
            }
        }
        Pace::StallAfter(n) => {
            let _ = stream.write_all(&body[..n.min(body.len())]);
            let _ = stream.flush();
            thread::sleep(STALL);
        }
    }
}

fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = std::str::from_utf8(&buf[..head_end]).ok()?.to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let headers: Vec<(String, String)> = lines
        .filter_map(|l| l.split_once(':'))
        .map(|(n, v)| (n.trim().to_string(), v.trim().to_string()))
        .collect();

    let mut request = Request {
        method,
        path,
        headers,
        body: buf[head_end + 4..].to_vec(),
    };
    let content_length: usize = request
        .header("Content-Length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    if request
        .header("Expect")
        .is_some_and(|v| v.eq_ignore_ascii_case("100-continue"))
    {
        let _ = stream.write_all(b"HTTP/1.1 100 Continue\r\n\r\n");
    }
    while request.body.len() < content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        request.body.extend_from_slice(&chunk[..n]);
    }
    Some(request)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        401 => "Unauthorized",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "Status",
    }
}
