//! [`WindowManager`] implementation backed by i3 IPC.
//!
//! Communicates directly with i3 (or sway) through its Unix socket using the
//! i3-ipc binary framing, avoiding any `i3-msg` invocation per command.
//!
//! # Wire format
//!
//! Every message, in both directions, is a 14-byte header followed by a JSON
//! payload:
//!
//! ```text
//! "i3-ipc" | payload length (u32, LE) | message type (u32, LE) | payload
//! ```

use crate::command::{OutputInfo, WorkspaceInfo};
use crate::traits::WindowManager;
use log::trace;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::{Path, PathBuf};

const IPC_MAGIC: &[u8; 6] = b"i3-ipc";
const IPC_HEADER_SIZE: usize = 14;

const IPC_RUN_COMMAND: u32 = 0;
const IPC_GET_WORKSPACES: u32 = 1;
const IPC_GET_OUTPUTS: u32 = 3;

/// Reject replies larger than this to guard against a bogus length field.
const MAX_IPC_PAYLOAD: usize = 64 * 1024 * 1024;

/// i3-backed window manager.
///
/// Each method call opens a short-lived connection to the IPC socket.
#[derive(Debug, Clone)]
pub struct I3Wm {
    socket_path: PathBuf,
}

/// Errors that can occur when talking to i3.
#[derive(Debug, thiserror::Error)]
#[error("i3 IPC error: {0}")]
pub struct I3WmError(String);

impl I3Wm {
    /// Locate the running window manager's socket.
    ///
    /// No connection is opened eagerly.
    pub fn new() -> Result<Self, I3WmError> {
        Ok(Self::with_socket(discover_socket_path()?))
    }

    /// Use an explicit socket path.
    pub fn with_socket(path: impl AsRef<Path>) -> Self {
        Self {
            socket_path: path.as_ref().to_path_buf(),
        }
    }

    /// The filesystem path of the IPC socket.
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    fn request(&self, msg_type: u32, payload: &str) -> Result<Vec<u8>, I3WmError> {
        ipc_request(&self.socket_path, msg_type, payload.as_bytes())
    }

    fn query<T: DeserializeOwned>(&self, msg_type: u32) -> Result<T, I3WmError> {
        let reply = self.request(msg_type, "")?;
        serde_json::from_slice(&reply).map_err(|e| I3WmError(format!("parse: {}", e)))
    }

    fn command(&self, command: &str) -> Result<(), I3WmError> {
        trace!("i3 command: {}", command);
        let reply = self.request(IPC_RUN_COMMAND, command)?;
        check_command_reply(command, &reply)
    }
}

//  Socket discovery

/// Resolve the IPC socket path.
///
/// `$I3SOCK` wins, then `$SWAYSOCK`, then whatever `i3 --get-socketpath`
/// prints (i3 itself keeps the path in an X11 root window property).
fn discover_socket_path() -> Result<PathBuf, I3WmError> {
    for var in ["I3SOCK", "SWAYSOCK"] {
        if let Some(path) = std::env::var_os(var).filter(|p| !p.is_empty()) {
            return Ok(PathBuf::from(path));
        }
    }

    let output = std::process::Command::new("i3")
        .arg("--get-socketpath")
        .output()
        .map_err(|e| I3WmError(format!("I3SOCK/SWAYSOCK not set and `i3 --get-socketpath` failed: {}", e)))?;
    let path = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if !output.status.success() || path.is_empty() {
        return Err(I3WmError("could not determine the i3 IPC socket path".into()));
    }
    Ok(PathBuf::from(path))
}

//  Framing

fn write_message<W: Write>(w: &mut W, msg_type: u32, payload: &[u8]) -> std::io::Result<()> {
    let mut header = [0u8; IPC_HEADER_SIZE];
    header[..6].copy_from_slice(IPC_MAGIC);
    header[6..10].copy_from_slice(&(payload.len() as u32).to_le_bytes());
    header[10..14].copy_from_slice(&msg_type.to_le_bytes());
    w.write_all(&header)?;
    w.write_all(payload)?;
    w.flush()
}

/// Read one message and return `(message type, payload)`.
fn read_message<R: Read>(r: &mut R) -> Result<(u32, Vec<u8>), I3WmError> {
    let mut header = [0u8; IPC_HEADER_SIZE];
    r.read_exact(&mut header)
        .map_err(|e| I3WmError(format!("read header: {}", e)))?;

    if &header[..6] != IPC_MAGIC {
        return Err(I3WmError("invalid i3-ipc magic".into()));
    }

    let len = u32::from_le_bytes([header[6], header[7], header[8], header[9]]) as usize;
    let msg_type = u32::from_le_bytes([header[10], header[11], header[12], header[13]]);
    if len > MAX_IPC_PAYLOAD {
        return Err(I3WmError(format!("reply too large: {} bytes", len)));
    }

    let mut payload = vec![0u8; len];
    r.read_exact(&mut payload)
        .map_err(|e| I3WmError(format!("read payload: {}", e)))?;
    Ok((msg_type, payload))
}

/// Send one request on a fresh connection and return the reply payload.
fn ipc_request(path: &Path, msg_type: u32, payload: &[u8]) -> Result<Vec<u8>, I3WmError> {
    let mut stream = UnixStream::connect(path)
        .map_err(|e| I3WmError(format!("connect to {}: {}", path.display(), e)))?;

    write_message(&mut stream, msg_type, payload)
        .map_err(|e| I3WmError(format!("write: {}", e)))?;

    let (reply_type, reply) = read_message(&mut stream)?;
    if reply_type != msg_type {
        return Err(I3WmError(format!(
            "expected reply type {}, got {}",
            msg_type, reply_type
        )));
    }
    Ok(reply)
}

//  Command replies

/// One entry of the array i3 answers `RUN_COMMAND` with.
#[derive(Deserialize)]
struct CommandOutcomeJson {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

fn check_command_reply(command: &str, reply: &[u8]) -> Result<(), I3WmError> {
    let outcomes: Vec<CommandOutcomeJson> =
        serde_json::from_slice(reply).map_err(|e| I3WmError(format!("parse: {}", e)))?;
    match outcomes.into_iter().find(|o| !o.success) {
        None => Ok(()),
        Some(failed) => Err(I3WmError(format!(
            "command {:?} failed: {}",
            command,
            failed.error.as_deref().unwrap_or("unknown error")
        ))),
    }
}

//  WindowManager implementation

impl WindowManager for I3Wm {
    type Error = I3WmError;

    fn workspaces(&self) -> Result<Vec<WorkspaceInfo>, Self::Error> {
        self.query(IPC_GET_WORKSPACES)
    }

    fn outputs(&self) -> Result<Vec<OutputInfo>, Self::Error> {
        self.query(IPC_GET_OUTPUTS)
    }

    fn focus_workspace(&self, selector: &str) -> Result<(), Self::Error> {
        self.command(&format!("workspace {}", selector))
    }

    fn run_command(&self, verb: &str, args: &str) -> Result<(), Self::Error> {
        self.command(&format!("{} {}", verb, args))
    }
}
