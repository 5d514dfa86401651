//! Shared helpers: a canned-response HTTP server and a `wptsync` command builder.

#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::path::Path;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};
use std::thread;

pub struct Stub {
    pub base: String,
    pub requests: Arc<Mutex<Vec<String>>>,
}

impl Stub {
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

/// Serve `routes` (request target → (status, body)) until the test exits.
/// Unknown targets answer 404.
pub fn serve(routes: &[(&str, u16, &str)]) -> Stub {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    let routes: HashMap<String, (u16, String)> = routes
        .iter()
        .map(|(target, status, body)| (target.to_string(), (*status, body.to_string())))
        .collect();
    let requests = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&requests);

    thread::spawn(move || {
        for stream in listener.incoming() {
            let Ok(mut stream) = stream else { continue };
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));

            let mut request_line = String::new();
            if reader.read_line(&mut request_line).is_err() {
                continue;
            }
            loop {
                let mut header = String::new();
                match reader.read_line(&mut header) {
                    Ok(0) | Err(_) => break,
                    Ok(_) if header == "\r\n" => break,
                    Ok(_) => {}
                }
            }

            let target = request_line
                .split_whitespace()
                .nth(1)
                .unwrap_or_default()
                .to_string();
            log.lock().unwrap().push(target.clone());

            let (status, body) = routes
                .get(&target)
                .cloned()
                .unwrap_or((404, "not found".to_string()));
            let reason = if status == 200 { "OK" } else { "Not Found" };
            let response = format!(
                "HTTP/1.1 {status} {reason}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });

    Stub { base, requests }
}

/// `wptsync` running in `dir` with both endpoints pointed at `stub`.
pub fn wptsync(dir: &Path, stub: &Stub) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("wptsync"));
    cmd.current_dir(dir)
        .env("WPTSYNC_RAW_URL", &stub.base)
        .env("WPTSYNC_API_URL", &stub.base)
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

pub fn git_available() -> bool {
    Command::new("git")
        .arg("--version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
