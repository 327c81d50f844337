//! Moves exported snapshots to and from local files or Google Drive.
//!
//! Transports only ever see the export text; they never reformat it. Failures
//! surface once as `TrackerError::Transport`, there are no retries.

use std::io::ErrorKind;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{Client, Response};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info};

use crate::db::Store;
use crate::error::{Result, TrackerError};
use crate::models::AppData;

const DRIVE_API: &str = "https://www.googleapis.com/drive/v3";
const DRIVE_UPLOAD_API: &str = "https://www.googleapis.com/upload/drive/v3";

pub fn export_file_name(date: NaiveDate) -> String {
    format!("preceptor_evaluations_{date}.json")
}

#[async_trait]
pub trait SnapshotTransport: Send + Sync {
    /// Stores `text` under `name` and returns where it ended up.
    async fn push(&self, name: &str, text: &str) -> Result<String>;

    /// Text stored under `name`, or `None` when there is nothing there.
    async fn pull(&self, name: &str) -> Result<Option<String>>;
}

pub struct FileTransport {
    dir: PathBuf,
}

impl FileTransport {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileTransport { dir: dir.into() }
    }
}

#[async_trait]
impl SnapshotTransport for FileTransport {
    async fn push(&self, name: &str, text: &str) -> Result<String> {
        let path = self.dir.join(name);
        tokio::fs::write(&path, text.as_bytes())
            .await
            .map_err(|e| TrackerError::Transport(format!("could not write {}: {e}", path.display())))?;
        debug!(path = %path.display(), bytes = text.len(), "wrote snapshot file");
        Ok(path.display().to_string())
    }

    async fn pull(&self, name: &str) -> Result<Option<String>> {
        let path = self.dir.join(name);
        match tokio::fs::read_to_string(&path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(TrackerError::Transport(format!(
                "could not read {}: {e}",
                path.display()
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct DriveFileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

/// Google Drive v3 files API, authorised with a caller-supplied bearer token.
pub struct DriveTransport {
    client: Client,
    token: String,
    api_base: String,
    upload_base: String,
}

impl DriveTransport {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("preceptor-eval/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(DriveTransport {
            client,
            token: token.into(),
            api_base: DRIVE_API.to_string(),
            upload_base: DRIVE_UPLOAD_API.to_string(),
        })
    }

    #[cfg(test)]
    pub fn with_endpoints(mut self, api_base: &str, upload_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self.upload_base = upload_base.trim_end_matches('/').to_string();
        self
    }

    async fn find_file(&self, name: &str) -> Result<Option<String>> {
        let query = name_query(name);
        let response = self
            .client
            .get(format!("{}/files", self.api_base))
            .bearer_auth(&self.token)
            .query(&[
                ("q", query.as_str()),
                ("fields", "files(id, name)"),
                ("spaces", "drive"),
            ])
            .send()
            .await
            .map_err(request_failed)?;

        let list: DriveFileList = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(request_failed)?;
        debug!(name, matches = list.files.len(), "searched Google Drive");
        Ok(list.files.into_iter().next().map(|file| file.id))
    }

    async fn create_file(&self, name: &str) -> Result<String> {
        let response = self
            .client
            .post(format!("{}/files", self.api_base))
            .bearer_auth(&self.token)
            .json(&json!({ "name": name, "mimeType": "application/json" }))
            .send()
            .await
            .map_err(request_failed)?;

        let file: DriveFile = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(request_failed)?;
        Ok(file.id)
    }

    async fn upload_content(&self, file_id: &str, text: &str) -> Result<String> {
        let response = self
            .client
            .patch(format!("{}/files/{}", self.upload_base, file_id))
            .bearer_auth(&self.token)
            .query(&[("uploadType", "media")])
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body(text.to_owned())
            .send()
            .await
            .map_err(request_failed)?;

        let file: DriveFile = ensure_success(response)
            .await?
            .json()
            .await
            .map_err(request_failed)?;
        debug!(file_id = %file.id, bytes = text.len(), "uploaded Google Drive content");
        Ok(file.id)
    }
}

#[async_trait]
impl SnapshotTransport for DriveTransport {
    async fn push(&self, name: &str, text: &str) -> Result<String> {
        let file_id = match self.find_file(name).await? {
            Some(id) => id,
            None => {
                let id = self.create_file(name).await?;
                info!(name, file_id = %id, "created Google Drive file");
                id
            }
        };
        self.upload_content(&file_id, text).await
    }

    async fn pull(&self, name: &str) -> Result<Option<String>> {
        let Some(file_id) = self.find_file(name).await? else {
            return Ok(None);
        };

        let response = self
            .client
            .get(format!("{}/files/{}", self.api_base, file_id))
            .bearer_auth(&self.token)
            .query(&[("alt", "media")])
            .send()
            .await
            .map_err(request_failed)?;

        let text = ensure_success(response)
            .await?
            .text()
            .await
            .map_err(request_failed)?;
        debug!(%file_id, bytes = text.len(), "downloaded Google Drive content");
        Ok(Some(text))
    }
}

/// Drive search expression matching one untrashed file by exact name.
fn name_query(name: &str) -> String {
    let escaped = name.replace('\\', "\\\\").replace('\'', "\\'");
    format!("name='{escaped}' and trashed=false")
}

fn request_failed(err: reqwest::Error) -> TrackerError {
    TrackerError::Transport(format!("Google Drive request failed: {err}"))
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(TrackerError::Transport(format!(
        "Google Drive returned {status}: {}",
        body.trim()
    )))
}

/// Exports the stored document and hands it to `transport`.
pub async fn push_snapshot(
    store: &Store,
    transport: &dyn SnapshotTransport,
    name: &str,
) -> Result<String> {
    let text = store.export_snapshot().await?;
    let location = transport.push(name, &text).await?;
    info!(%location, "pushed evaluation snapshot");
    Ok(location)
}

/// Fetches a snapshot and replaces the stored document with it.
/// `Ok(None)` when the transport has nothing under `name`.
pub async fn pull_snapshot(
    store: &Store,
    transport: &dyn SnapshotTransport,
    name: &str,
) -> Result<Option<AppData>> {
    let Some(text) = transport.pull(name).await? else {
        info!(name, "no snapshot found");
        return Ok(None);
    };
    let data = store.import_snapshot(&text).await?;
    Ok(Some(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::memory_store;

    #[test]
    fn export_file_name_carries_the_date() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 9).unwrap();
        assert_eq!(export_file_name(date), "preceptor_evaluations_2026-03-09.json");
    }

    #[test]
    fn name_query_escapes_quotes() {
        assert_eq!(
            name_query("dr o'neil.json"),
            "name='dr o\\'neil.json' and trashed=false"
        );
    }

    #[tokio::test]
    async fn file_transport_preserves_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FileTransport::new(dir.path());
        let text = "{\n  \"version\": \"1.0.0\"\n}\n";

        transport.push("backup.json", text).await.unwrap();
        assert_eq!(transport.pull("backup.json").await.unwrap().as_deref(), Some(text));
        assert_eq!(transport.pull("missing.json").await.unwrap(), None);
    }

    #[tokio::test]
    async fn file_write_failure_is_a_transport_error() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FileTransport::new(dir.path().join("missing"));

        let err = transport.push("backup.json", "{}").await.unwrap_err();
        assert!(matches!(err, TrackerError::Transport(_)));
        assert!(err.to_string().contains("could not write"));
    }

    #[tokio::test]
    async fn snapshot_moves_between_stores() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FileTransport::new(dir.path());
        let source = memory_store("source").await;
        source.seed().await.unwrap();

        push_snapshot(&source, &transport, "rotation.json").await.unwrap();

        let target = memory_store("target").await;
        let pulled = pull_snapshot(&target, &transport, "rotation.json")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(pulled, source.load().await);
        assert_eq!(target.load().await, pulled);

        assert!(pull_snapshot(&target, &transport, "absent.json")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn unreadable_snapshot_does_not_touch_store() {
        let dir = tempfile::tempdir().unwrap();
        let transport = FileTransport::new(dir.path());
        transport.push("broken.json", "not json").await.unwrap();

        let store = memory_store("target").await;
        store.seed().await.unwrap();
        let before = store.load().await;

        let err = pull_snapshot(&store, &transport, "broken.json").await.unwrap_err();
        assert!(matches!(err, TrackerError::ImportParse(_)));
        assert_eq!(store.load().await, before);
    }

    #[tokio::test]
    async fn unreachable_drive_surfaces_transport_error() {
        let transport = DriveTransport::new("token")
            .unwrap()
            .with_endpoints("http://127.0.0.1:9/drive/v3", "http://127.0.0.1:9/upload/drive/v3");

        let err = transport.pull("preceptor_evaluations.json").await.unwrap_err();
        assert!(matches!(err, TrackerError::Transport(_)));
        assert!(err.to_string().contains("Google Drive request failed"));
    }
}
