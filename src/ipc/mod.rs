//! IPC via Unix sockets
//!
//! Message-based communication between the admin manager and the local config
//! service, using length-prefixed JSON over Unix domain sockets. The service
//! fronts a [`FileConfigStore`] and plays the site backend's role for local
//! operation; the manager side is exposed as a [`ConfigStore`] so callers
//! cannot tell it apart from a direct file store.

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::{Read, Write};
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

mod messages;
pub use messages::{ConfigRequest, ConfigResponse};

use crate::store::{ConfigStore, FileConfigStore};

/// Maximum message size (1 MB); config documents are tiny, anything bigger
/// is a framing error or garbage
const MAX_MESSAGE_SIZE: usize = 1024 * 1024;

/// Get default socket path (XDG_RUNTIME_DIR with fallback to cache)
pub fn default_socket_path() -> Result<PathBuf> {
    let app_dir = crate::constants::config::APP_DIR;
    let filename = crate::constants::ipc::SOCKET_FILENAME;
    if let Ok(runtime_dir) = std::env::var("XDG_RUNTIME_DIR") {
        return Ok(PathBuf::from(runtime_dir).join(app_dir).join(filename));
    }

    let cache = dirs::cache_dir()
        .context("Failed to determine cache directory (no XDG_RUNTIME_DIR or HOME)")?;
    Ok(cache.join(app_dir).join(filename))
}

/// Client connection to the config service
pub struct ConfigClient {
    stream: UnixStream,
}

impl ConfigClient {
    /// Connect to a specific socket path
    pub fn connect_to(path: &Path) -> Result<Self> {
        let stream = UnixStream::connect(path)
            .with_context(|| format!("Failed to connect to config service at {}", path.display()))?;
        Ok(Self { stream })
    }

    /// Send request and wait for the response
    pub fn request(&mut self, req: ConfigRequest) -> Result<ConfigResponse> {
        write_message(&mut self.stream, &req)?;
        read_message(&mut self.stream)
    }
}

/// [`ConfigStore`] implementation that forwards to a config service
pub struct RemoteConfigStore {
    client: ConfigClient,
}

impl RemoteConfigStore {
    pub fn connect_to(path: &Path) -> Result<Self> {
        Ok(Self {
            client: ConfigClient::connect_to(path)?,
        })
    }
}

impl ConfigStore for RemoteConfigStore {
    fn fetch_all(&mut self) -> Result<HashMap<String, serde_json::Value>> {
        match self.client.request(ConfigRequest::FetchAll)? {
            ConfigResponse::Documents(documents) => Ok(documents),
            ConfigResponse::Error(err) => Err(anyhow!("Config service error: {err}")),
            other => Err(anyhow!("Unexpected response to FetchAll: {other:?}")),
        }
    }

    fn upsert(&mut self, key: &str, value: serde_json::Value) -> Result<()> {
        let request = ConfigRequest::Upsert {
            key: key.to_string(),
            value,
        };
        match self.client.request(request)? {
            ConfigResponse::Updated => Ok(()),
            ConfigResponse::Error(err) => Err(anyhow!("Config service error: {err}")),
            other => Err(anyhow!("Unexpected response to Upsert: {other:?}")),
        }
    }
}

/// Listener side of the config service
pub struct ConfigServer {
    listener: UnixListener,
    socket_path: PathBuf,
}

impl ConfigServer {
    /// Bind to the default socket path
    pub fn bind() -> Result<Self> {
        let socket_path = default_socket_path()?;
        Self::bind_to(socket_path)
    }

    /// Bind to a specific socket path
    pub fn bind_to(socket_path: PathBuf) -> Result<Self> {
        if let Some(parent) = socket_path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create socket directory: {}", parent.display()))?;
        }

        // Remove stale socket if exists
        if socket_path.exists() {
            std::fs::remove_file(&socket_path)
                .with_context(|| format!("Failed to remove stale socket: {}", socket_path.display()))?;
        }

        let listener = UnixListener::bind(&socket_path)
            .with_context(|| format!("Failed to bind socket at {}", socket_path.display()))?;

        // Owner-only: the config documents are operator-private
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&socket_path, std::fs::Permissions::from_mode(0o700))
            .context("Failed to set socket permissions")?;

        Ok(Self {
            listener,
            socket_path,
        })
    }

    /// Accept an incoming connection (blocking)
    pub fn accept(&self) -> Result<UnixStream> {
        let (stream, _addr) = self
            .listener
            .accept()
            .context("Failed to accept IPC connection")?;
        Ok(stream)
    }

    pub fn path(&self) -> &Path {
        &self.socket_path
    }
}

impl Drop for ConfigServer {
    fn drop(&mut self) {
        // Clean up socket file
        let _ = std::fs::remove_file(&self.socket_path);
    }
}

/// Run the config service until a client requests shutdown.
/// Connections are served one at a time; each request is a short
/// read-modify-write over the backing file, so there is nothing to overlap.
pub fn serve(server: &ConfigServer, store: &mut FileConfigStore) -> Result<()> {
    info!(path = %server.path().display(), "Config service listening");
    loop {
        let mut stream = server.accept()?;
        match handle_connection(&mut stream, store) {
            Ok(true) => {
                info!("Shutdown requested, stopping config service");
                return Ok(());
            }
            Ok(false) => {}
            Err(err) => warn!(error = ?err, "Connection ended with error"),
        }
    }
}

/// Serve one connection until the peer disconnects.
/// Returns `Ok(true)` when the peer requested shutdown.
pub(crate) fn handle_connection(
    stream: &mut UnixStream,
    store: &mut impl ConfigStore,
) -> Result<bool> {
    loop {
        let request: ConfigRequest = match read_message(stream) {
            Ok(request) => request,
            // Peer closed the connection; a clean disconnect is not an error
            Err(_) => return Ok(false),
        };

        let response = match request {
            ConfigRequest::FetchAll => match store.fetch_all() {
                Ok(documents) => ConfigResponse::Documents(documents),
                Err(err) => ConfigResponse::Error(format!("{err:#}")),
            },
            ConfigRequest::Upsert { key, value } => match store.upsert(&key, value) {
                Ok(()) => {
                    info!(key = %key, "Document upserted");
                    ConfigResponse::Updated
                }
                Err(err) => ConfigResponse::Error(format!("{err:#}")),
            },
            ConfigRequest::Ping => ConfigResponse::Pong,
            ConfigRequest::Shutdown => {
                write_message(stream, &ConfigResponse::ShuttingDown)?;
                return Ok(true);
            }
        };

        write_message(stream, &response)?;
    }
}

/// Write length-prefixed message to stream
fn write_message<T: Serialize>(stream: &mut UnixStream, msg: &T) -> Result<()> {
    let json = serde_json::to_vec(msg).context("Failed to serialize message to JSON")?;

    // Length prefix (u32 little-endian), then JSON payload
    let len = json.len() as u32;
    stream
        .write_all(&len.to_le_bytes())
        .context("Failed to write message length")?;
    stream
        .write_all(&json)
        .context("Failed to write message payload")?;
    stream.flush().context("Failed to flush stream")?;

    Ok(())
}

/// Read length-prefixed message from stream
fn read_message<T: for<'de> Deserialize<'de>>(stream: &mut UnixStream) -> Result<T> {
    let mut len_buf = [0u8; 4];
    stream
        .read_exact(&mut len_buf)
        .context("Failed to read message length")?;
    let len = u32::from_le_bytes(len_buf) as usize;

    // Sanity check (prevent huge allocation from a garbage prefix)
    if len > MAX_MESSAGE_SIZE {
        return Err(anyhow!(
            "Message too large: {} bytes (max: {})",
            len,
            MAX_MESSAGE_SIZE
        ));
    }

    let mut json_buf = vec![0u8; len];
    stream
        .read_exact(&mut json_buf)
        .context("Failed to read message payload")?;

    serde_json::from_slice(&json_buf).context("Failed to deserialize message from JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_remote_store_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("config.sock");
        let config_path = dir.path().join("site-config.json");

        let server = ConfigServer::bind_to(socket_path.clone()).unwrap();
        let handle = std::thread::spawn(move || {
            let mut store = FileConfigStore::new(config_path);
            let mut stream = server.accept().unwrap();
            handle_connection(&mut stream, &mut store).unwrap()
        });

        let mut store = RemoteConfigStore::connect_to(&socket_path).unwrap();
        assert!(store.fetch_all().unwrap().is_empty());

        store
            .upsert("sections_visibility", json!({"about": false}))
            .unwrap();
        let documents = store.fetch_all().unwrap();
        assert_eq!(documents["sections_visibility"], json!({"about": false}));

        drop(store); // disconnect ends the handler
        assert!(!handle.join().unwrap());
    }

    #[test]
    fn test_shutdown_request() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("config.sock");
        let config_path = dir.path().join("site-config.json");

        let server = ConfigServer::bind_to(socket_path.clone()).unwrap();
        let handle = std::thread::spawn(move || {
            let mut store = FileConfigStore::new(config_path);
            let mut stream = server.accept().unwrap();
            handle_connection(&mut stream, &mut store).unwrap()
        });

        let mut client = ConfigClient::connect_to(&socket_path).unwrap();
        match client.request(ConfigRequest::Shutdown).unwrap() {
            ConfigResponse::ShuttingDown => {}
            other => panic!("unexpected response: {other:?}"),
        }
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_ping() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("config.sock");
        let config_path = dir.path().join("site-config.json");

        let server = ConfigServer::bind_to(socket_path.clone()).unwrap();
        let handle = std::thread::spawn(move || {
            let mut store = FileConfigStore::new(config_path);
            let mut stream = server.accept().unwrap();
            let _ = handle_connection(&mut stream, &mut store);
        });

        let mut client = ConfigClient::connect_to(&socket_path).unwrap();
        match client.request(ConfigRequest::Ping).unwrap() {
            ConfigResponse::Pong => {}
            other => panic!("unexpected response: {other:?}"),
        }
        drop(client);
        handle.join().unwrap();
    }

    #[test]
    fn test_stale_socket_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let socket_path = dir.path().join("config.sock");

        // Leave a stale socket file behind, then rebind over it
        drop(ConfigServer::bind_to(socket_path.clone()).unwrap());
        std::fs::write(&socket_path, b"").unwrap();
        let server = ConfigServer::bind_to(socket_path.clone()).unwrap();
        assert_eq!(server.path(), socket_path);
    }
}
