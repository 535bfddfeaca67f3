//! Shared test infrastructure for integration tests.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::sync::mpsc::{self, Receiver};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

/// Isolated data and config directory for one test.
pub struct Workspace {
    pub dir: TempDir,
}

impl Workspace {
    pub fn create() -> Self {
        let dir = tempfile::tempdir().expect("create temp dir");
        std::fs::write(dir.path().join("config.json"), r#"{"schema_version": 1}"#)
            .expect("write config");
        Self { dir }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.dir.path().join("data")
    }

    /// `mj` with an explicit config and no completion credentials.
    pub fn mj(&self) -> Command {
        let mut command = Command::new(env!("CARGO_BIN_EXE_mj"));
        command
            .arg("--config")
            .arg(self.dir.path().join("config.json"))
            .env("MJ_DATA_DIR", self.data_dir())
            .env("MJ_COMPLETION_URL", "http://127.0.0.1:9/v1/chat/completions")
            .env_remove("MJ_API_KEY")
            .env_remove("MJ_LANGUAGE")
            .env_remove("MJ_LOG");
        command
    }

    /// `mj` pointed at a completion endpoint with a test key.
    pub fn mj_with_endpoint(&self, url: &str) -> Command {
        let mut command = self.mj();
        command
            .env("MJ_COMPLETION_URL", url)
            .env("MJ_API_KEY", "test-key");
        command
    }

    pub fn write_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }
}

pub fn run_ok(command: &mut Command) -> String {
    let output = command.output().expect("run mj");
    assert_success(&output);
    String::from_utf8(output.stdout).expect("stdout is utf-8")
}

pub fn assert_success(output: &Output) {
    assert!(
        output.status.success(),
        "mj failed: {}\nstdout:\n{}\nstderr:\n{}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn read_json(path: &Path) -> serde_json::Value {
    let text = std::fs::read_to_string(path).expect("read json file");
    serde_json::from_str(&text).expect("parse json file")
}

/// A completion endpoint that answers exactly one request.
pub struct StubEndpoint {
    pub url: String,
    requests: Receiver<String>,
}

impl StubEndpoint {
    pub fn serve_once(status: u16, body: &str) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind stub endpoint");
        let port = listener.local_addr().expect("stub address").port();
        let body = body.to_string();
        let (sender, requests) = mpsc::channel();
        thread::spawn(move || {
            let Ok((stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream);
            let request = read_request(&mut reader);
            let reason = if status < 400 { "OK" } else { "Error" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let mut stream = reader.into_inner();
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
            let _ = sender.send(request);
        });
        Self {
            url: format!("http://127.0.0.1:{port}/v1/chat/completions"),
            requests,
        }
    }

    /// The raw request text, once the stub has answered.
    pub fn received(&self) -> Option<String> {
        self.requests.recv_timeout(Duration::from_secs(5)).ok()
    }
}

fn read_request(reader: &mut BufReader<std::net::TcpStream>) -> String {
    let mut head = String::new();
    let mut content_length = 0usize;
    let mut chunked = false;
    loop {
        let mut line = String::new();
        if reader.read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        let lowered = line.to_ascii_lowercase();
        if let Some(value) = lowered.strip_prefix("content-length:") {
            content_length = value.trim().parse().unwrap_or(0);
        }
        if lowered.starts_with("transfer-encoding:") && lowered.contains("chunked") {
            chunked = true;
        }
        head.push_str(&line);
        if line == "\r\n" {
            break;
        }
    }
    let body = if chunked {
        read_chunked(reader)
    } else {
        let mut bytes = vec![0u8; content_length];
        let _ = reader.read_exact(&mut bytes);
        String::from_utf8_lossy(&bytes).into_owned()
    };
    head + &body
}

fn read_chunked(reader: &mut BufReader<std::net::TcpStream>) -> String {
    let mut body = Vec::new();
    loop {
        let mut size_line = String::new();
        if reader.read_line(&mut size_line).unwrap_or(0) == 0 {
            break;
        }
        let size = usize::from_str_radix(size_line.trim(), 16).unwrap_or(0);
        let mut chunk = vec![0u8; size + 2];
        if reader.read_exact(&mut chunk).is_err() {
            break;
        }
        if size == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..size]);
    }
    String::from_utf8_lossy(&body).into_owned()
}

/// A chat-completion envelope whose single message is `content`.
pub fn envelope(content: &str) -> String {
    serde_json::json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "choices": [
            {"index": 0, "message": {"role": "assistant", "content": content}, "finish_reason": "stop"}
        ]
    })
    .to_string()
}
