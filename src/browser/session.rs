use std::io::{BufRead, BufReader, Write};
use std::process::{Child, Command, Stdio};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::browser::locale::LocaleProfile;
use crate::error::AuditError;

/// Default location of the Node.js sidecar script.
pub const DEFAULT_SERVER_SCRIPT: &str = "scripts/browser_server.js";

/// Request sent to browser_server.js over stdin (one JSON line).
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BrowserRequest {
    Navigate { cmd: &'static str, url: String },
    Extract { cmd: &'static str },
    Screenshot { cmd: &'static str, path: String },
    Quit { cmd: &'static str },
}

impl BrowserRequest {
    pub fn navigate(url: &str) -> Self {
        BrowserRequest::Navigate {
            cmd: "navigate",
            url: url.to_string(),
        }
    }

    pub fn extract() -> Self {
        BrowserRequest::Extract { cmd: "extract" }
    }

    pub fn screenshot(path: &str) -> Self {
        BrowserRequest::Screenshot {
            cmd: "screenshot",
            path: path.to_string(),
        }
    }

    pub fn quit() -> Self {
        BrowserRequest::Quit { cmd: "quit" }
    }
}

/// Response received from browser_server.js over stdout (one JSON line).
#[derive(Debug, Deserialize)]
pub struct BrowserResponse {
    pub ok: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
    #[serde(default)]
    pub ready: Option<bool>,
}

/// A persistent, locale-pinned browser session backed by browser_server.js.
///
/// Launches a long-lived Node.js process that keeps a Chromium context open
/// with the profile's language and Accept-Language settings. Commands are
/// sent as NDJSON over stdin, responses read from stdout. One session serves
/// one locale; a check run launches two in sequence.
pub struct BrowserSession {
    child: Child,
    stdin: std::process::ChildStdin,
    reader: BufReader<std::process::ChildStdout>,
}

impl BrowserSession {
    /// Spawn browser_server.js pinned to a locale profile.
    pub fn launch(profile: &LocaleProfile, server_script: &str) -> Result<Self, AuditError> {
        let mut child = Command::new("node")
            .arg(server_script)
            .arg("--lang")
            .arg(&profile.lang)
            .arg("--accept-language")
            .arg(&profile.accept_language)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| AuditError::SubprocessSpawn {
                script: server_script.to_string(),
                source: e,
            })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| AuditError::SessionIo("Failed to capture sidecar stdin".into()))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| AuditError::SessionIo("Failed to capture sidecar stdout".into()))?;

        let mut reader = BufReader::new(stdout);

        // Wait for the ready signal before accepting commands
        let mut line = String::new();
        reader
            .read_line(&mut line)
            .map_err(|e| AuditError::SessionIo(format!("Failed to read ready signal: {}", e)))?;

        let response: BrowserResponse =
            serde_json::from_str(line.trim()).map_err(|e| AuditError::JsonParse {
                context: "sidecar ready signal".into(),
                source: e,
            })?;

        if !response.ok || response.ready != Some(true) {
            return Err(AuditError::SessionProtocol {
                command: "launch".into(),
                error: "Sidecar did not report ready".into(),
            });
        }

        Ok(BrowserSession {
            child,
            stdin,
            reader,
        })
    }

    /// Send a request and read the response line.
    fn send(&mut self, request: &BrowserRequest) -> Result<BrowserResponse, AuditError> {
        let json = serde_json::to_string(request).map_err(|e| AuditError::JsonSerialize {
            context: "BrowserRequest".into(),
            source: e,
        })?;

        writeln!(self.stdin, "{}", json)
            .map_err(|e| AuditError::SessionIo(format!("Failed to write to sidecar stdin: {}", e)))?;
        self.stdin
            .flush()
            .map_err(|e| AuditError::SessionIo(format!("Failed to flush sidecar stdin: {}", e)))?;

        let mut line = String::new();
        self.reader
            .read_line(&mut line)
            .map_err(|e| AuditError::SessionIo(format!("Failed to read from sidecar stdout: {}", e)))?;

        if line.trim().is_empty() {
            return Err(AuditError::SessionIo(
                "Empty response from sidecar (process may have died)".into(),
            ));
        }

        serde_json::from_str(line.trim()).map_err(|e| AuditError::JsonParse {
            context: "sidecar response".into(),
            source: e,
        })
    }

    /// Send a request and verify it succeeded.
    fn send_ok(&mut self, request: &BrowserRequest, command_name: &str) -> Result<BrowserResponse, AuditError> {
        let response = self.send(request)?;
        if !response.ok {
            return Err(AuditError::SessionProtocol {
                command: command_name.into(),
                error: response.error.unwrap_or_else(|| "Unknown error".into()),
            });
        }
        Ok(response)
    }

    /// Navigate to a URL.
    pub fn navigate(&mut self, url: &str) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::navigate(url), "navigate")?;
        Ok(())
    }

    /// Extract the current page's visible text elements. Returns the raw
    /// payload; `extract::build_elements` turns it into matcher input.
    pub fn extract(&mut self) -> Result<Value, AuditError> {
        let response = self.send_ok(&BrowserRequest::extract(), "extract")?;
        response.data.ok_or_else(|| AuditError::SessionProtocol {
            command: "extract".into(),
            error: "No data in extract response".into(),
        })
    }

    /// Capture a full-page screenshot to `path`.
    pub fn screenshot(&mut self, path: &str) -> Result<(), AuditError> {
        self.send_ok(&BrowserRequest::screenshot(path), "screenshot")?;
        Ok(())
    }

    /// Quit the browser session.
    pub fn quit(&mut self) -> Result<(), AuditError> {
        // Best-effort quit, the process may already be gone
        let _ = self.send(&BrowserRequest::quit());
        let _ = self.child.wait();
        Ok(())
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        let _ = self.quit();
    }
}
